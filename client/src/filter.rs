//! Per-field filter predicates for list endpoints.
//!
//! Every type here implements [`QuerySerialize`] and writes at most one entry
//! per predicate into the [`QueryValues`] sink. Unpopulated filters are inert:
//! they write nothing and succeed.
//!
//! Wire forms:
//! - `tag=v1,v2` / `tag[not]=v1,v2` for [`Filter`] and [`ExclusionFilter`]
//! - `tag=<rfc3339>,...` or `tag[gt|gte|lt|lte]=<rfc3339>` for [`TimestampFilterList`]
//! - `tag=a,!b,c=1,d!=1,e in (1,2),f notin (1,2)` for [`LabelSelector`]

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use indexmap::IndexMap;

use crate::query::{QuerySerialize, QueryValues};

/// Comparison operator attached to a timestamp predicate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterModifier {
    #[default]
    None,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl FilterModifier {
    /// Bracket suffix used on the wire; empty for `None`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterModifier::None => "",
            FilterModifier::GreaterThan => "gt",
            FilterModifier::LessThan => "lt",
            FilterModifier::GreaterThanOrEqual => "gte",
            FilterModifier::LessThanOrEqual => "lte",
        }
    }
}

impl fmt::Display for FilterModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn collect_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ============================================================================
// Timestamp filters
// ============================================================================

/// One timestamp predicate: equality over a set of instants, or a single bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampFilter {
    pub timestamps: Vec<DateTime<FixedOffset>>,
    pub modifier: FilterModifier,
}

impl TimestampFilter {
    fn bound(ts: DateTime<FixedOffset>, modifier: FilterModifier) -> Self {
        Self {
            timestamps: vec![ts],
            modifier,
        }
    }
}

impl QuerySerialize for TimestampFilter {
    fn serialize(&self, values: &mut QueryValues, tag: &str) -> Result<()> {
        if self.timestamps.is_empty() {
            return Ok(());
        }
        let tag = match self.modifier {
            FilterModifier::None => tag.to_string(),
            modifier => format!("{}[{}]", tag, modifier),
        };
        let joined = self
            .timestamps
            .iter()
            .map(format_timestamp)
            .collect::<Vec<_>>()
            .join(",");
        values.add(tag, joined);
        Ok(())
    }
}

/// Ordered list of timestamp predicates sharing one parameter tag.
///
/// Each helper appends a predicate; serialization emits one entry per predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampFilterList(Vec<TimestampFilter>);

impl TimestampFilterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches any of `timestamps`.
    pub fn equal_to<I, T>(&mut self, timestamps: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<DateTime<FixedOffset>>,
    {
        self.0.push(TimestampFilter {
            timestamps: timestamps.into_iter().map(Into::into).collect(),
            modifier: FilterModifier::None,
        });
        self
    }

    pub fn before(&mut self, ts: impl Into<DateTime<FixedOffset>>) -> &mut Self {
        self.push(TimestampFilter::bound(ts.into(), FilterModifier::LessThan))
    }

    pub fn before_or_equal_to(&mut self, ts: impl Into<DateTime<FixedOffset>>) -> &mut Self {
        self.push(TimestampFilter::bound(
            ts.into(),
            FilterModifier::LessThanOrEqual,
        ))
    }

    pub fn after(&mut self, ts: impl Into<DateTime<FixedOffset>>) -> &mut Self {
        self.push(TimestampFilter::bound(ts.into(), FilterModifier::GreaterThan))
    }

    pub fn after_or_equal_to(&mut self, ts: impl Into<DateTime<FixedOffset>>) -> &mut Self {
        self.push(TimestampFilter::bound(
            ts.into(),
            FilterModifier::GreaterThanOrEqual,
        ))
    }

    /// Append an already-built predicate.
    pub fn push(&mut self, filter: TimestampFilter) -> &mut Self {
        self.0.push(filter);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimestampFilter> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl QuerySerialize for TimestampFilterList {
    fn serialize(&self, values: &mut QueryValues, tag: &str) -> Result<()> {
        for filter in &self.0 {
            filter.serialize(values, tag)?;
        }
        Ok(())
    }
}

// ============================================================================
// String filters
// ============================================================================

/// Exact-match filter: "equal to any of" the stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub values: Vec<String>,
}

impl Filter {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: collect_strings(values),
        }
    }

    /// Replace the value set.
    pub fn equal_to<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = collect_strings(values);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl QuerySerialize for Filter {
    fn serialize(&self, values: &mut QueryValues, tag: &str) -> Result<()> {
        if !self.values.is_empty() {
            values.add(tag, self.values.join(","));
        }
        Ok(())
    }
}

/// Exact-match filter that can be negated, encoded as `tag[not]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionFilter {
    pub values: Vec<String>,
    pub not: bool,
}

impl ExclusionFilter {
    /// Replace the value set and clear negation.
    ///
    /// A previous [`not_equal_to`](Self::not_equal_to) does not survive this call:
    /// the filter serializes as plain `tag`, never `tag[not]`.
    pub fn equal_to<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = collect_strings(values);
        self.not = false;
        self
    }

    /// Replace the value set and negate it.
    pub fn not_equal_to<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = collect_strings(values);
        self.not = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Label-selector clause for `key`.
    fn selector_clause(&self, key: &str) -> String {
        match (self.values.as_slice(), self.not) {
            ([], false) => key.to_string(),
            ([], true) => format!("!{}", key),
            ([value], false) => format!("{}={}", key, value),
            ([value], true) => format!("{}!={}", key, value),
            (values, false) => format!("{} in ({})", key, values.join(",")),
            (values, true) => format!("{} notin ({})", key, values.join(",")),
        }
    }
}

impl From<Filter> for ExclusionFilter {
    fn from(filter: Filter) -> Self {
        Self {
            values: filter.values,
            not: false,
        }
    }
}

impl QuerySerialize for ExclusionFilter {
    fn serialize(&self, values: &mut QueryValues, tag: &str) -> Result<()> {
        if self.values.is_empty() {
            return Ok(());
        }
        if self.not {
            values.add(format!("{}[not]", tag), self.values.join(","));
        } else {
            values.add(tag, self.values.join(","));
        }
        Ok(())
    }
}

// ============================================================================
// Label selector
// ============================================================================

/// Label requirements keyed by label name, serialized as one combined value.
///
/// Keys keep their first-insertion position; setting a key again replaces
/// its requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: IndexMap<String, ExclusionFilter>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the label to be present, any value.
    pub fn exists(&mut self, key: impl Into<String>) -> &mut Self {
        self.set(key.into(), Vec::new(), false)
    }

    /// Require the label to be absent.
    pub fn not_exists(&mut self, key: impl Into<String>) -> &mut Self {
        self.set(key.into(), Vec::new(), true)
    }

    pub fn equal_to<I, S>(&mut self, key: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(key.into(), collect_strings(values), false)
    }

    pub fn not_equal_to<I, S>(&mut self, key: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(key.into(), collect_strings(values), true)
    }

    fn set(&mut self, key: String, values: Vec<String>, not: bool) -> &mut Self {
        self.requirements.insert(key, ExclusionFilter { values, not });
        self
    }

    pub fn get(&self, key: &str) -> Option<&ExclusionFilter> {
        self.requirements.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ExclusionFilter> {
        self.requirements.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExclusionFilter)> {
        self.requirements.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self
            .requirements
            .iter()
            .map(|(key, filter)| filter.selector_clause(key))
            .collect();
        f.write_str(&clauses.join(","))
    }
}

impl QuerySerialize for LabelSelector {
    fn serialize(&self, values: &mut QueryValues, tag: &str) -> Result<()> {
        if !self.requirements.is_empty() {
            values.add(tag, self.to_string());
        }
        Ok(())
    }
}

/// Split on commas that are not inside a parenthesised value set.
fn split_top_level(input: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    bail!("Unbalanced ')' in label selector: {}", input);
                }
                depth -= 1;
            }
            ',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        bail!("Unclosed '(' in label selector: {}", input);
    }
    parts.push(&input[start..]);
    Ok(parts)
}

fn parse_key(key: &str, clause: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        bail!("Invalid label key in clause '{}'", clause);
    }
    if let Some(c) = key.chars().find(|c| matches!(c, '!' | '=' | '(' | ')')) {
        bail!("Unexpected '{}' in label key '{}' of clause '{}'", c, key, clause);
    }
    Ok(key.to_string())
}

fn parse_value_set(set: &str, clause: &str) -> Result<Vec<String>> {
    let inner = set
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| anyhow::anyhow!("Expected '(v1,v2,...)' in clause '{}'", clause))?;
    let values: Vec<String> = inner
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        bail!("Empty value set in clause '{}'", clause);
    }
    Ok(values)
}

impl FromStr for LabelSelector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut selector = LabelSelector::new();
        if s.trim().is_empty() {
            return Ok(selector);
        }
        for raw in split_top_level(s)? {
            let clause = raw.trim();
            if clause.is_empty() {
                bail!("Empty clause in label selector: {}", s);
            }
            if let Some((key, set)) = clause.split_once(" notin ") {
                let values = parse_value_set(set, clause)?;
                selector.not_equal_to(parse_key(key, clause)?, values);
            } else if let Some((key, set)) = clause.split_once(" in ") {
                let values = parse_value_set(set, clause)?;
                selector.equal_to(parse_key(key, clause)?, values);
            } else if let Some((key, value)) = clause.split_once("!=") {
                selector.not_equal_to(parse_key(key, clause)?, [value.trim()]);
            } else if let Some((key, value)) = clause.split_once("==") {
                selector.equal_to(parse_key(key, clause)?, [value.trim()]);
            } else if let Some((key, value)) = clause.split_once('=') {
                selector.equal_to(parse_key(key, clause)?, [value.trim()]);
            } else if let Some(key) = clause.strip_prefix('!') {
                selector.not_exists(parse_key(key, clause)?);
            } else {
                selector.exists(parse_key(clause, clause)?);
            }
        }
        Ok(selector)
    }
}
