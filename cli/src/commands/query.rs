use anyhow::{bail, Result};
use cf_client::{ExclusionFilter, Filter, ListQuery, QuerySerialize, QueryValues};

use super::list_options;
use crate::argparse::QueryArgs;

/// Split `NAME=V1,V2` into the parameter name and its values.
fn parse_filter_arg(arg: &str) -> Result<(&str, Vec<&str>)> {
    let Some((name, values)) = arg.split_once('=') else {
        bail!("Expected NAME=V1,V2, got '{}'", arg);
    };
    let name = name.trim();
    let values: Vec<&str> = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();
    if name.is_empty() || values.is_empty() {
        bail!("Expected NAME=V1,V2, got '{}'", arg);
    }
    Ok((name, values))
}

pub fn build_query(args: &QueryArgs) -> Result<QueryValues> {
    let mut values = list_options(&args.filters)?.to_query_values()?;

    for arg in &args.equal {
        let (name, filter_values) = parse_filter_arg(arg)?;
        Filter::new(filter_values).serialize(&mut values, name)?;
    }
    for arg in &args.not_equal {
        let (name, filter_values) = parse_filter_arg(arg)?;
        let mut filter = ExclusionFilter::default();
        filter.not_equal_to(filter_values);
        filter.serialize(&mut values, name)?;
    }
    Ok(values)
}

pub fn handle_query_command(args: &QueryArgs) -> Result<()> {
    println!("{}", build_query(args)?.encode());
    Ok(())
}
