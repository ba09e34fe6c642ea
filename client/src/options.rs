//! Query options for list endpoints.
//!
//! Every options type flattens into a [`QueryValues`] through [`ListQuery`].
//! Filters left at their defaults contribute nothing to the query string.

use anyhow::Result;

use crate::filter::{Filter, LabelSelector, TimestampFilterList};
use crate::query::{QuerySerialize, QueryValues};

/// Anything that can be turned into the query of a list request.
pub trait ListQuery {
    fn to_query_values(&self) -> Result<QueryValues>;
}

/// Paging, ordering and the filters every collection supports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Field to sort by; prefix with `-` for descending order.
    pub order_by: Option<String>,
    pub label_selector: LabelSelector,
    pub created_ats: TimestampFilterList,
    pub updated_ats: TimestampFilterList,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    fn write(&self, values: &mut QueryValues) -> Result<()> {
        if let Some(page) = self.page {
            values.add("page", page.to_string());
        }
        if let Some(per_page) = self.per_page {
            values.add("per_page", per_page.to_string());
        }
        if let Some(order_by) = &self.order_by {
            values.add("order_by", order_by.as_str());
        }
        self.label_selector.serialize(values, "label_selector")?;
        self.created_ats.serialize(values, "created_ats")?;
        self.updated_ats.serialize(values, "updated_ats")?;
        Ok(())
    }
}

impl ListQuery for ListOptions {
    fn to_query_values(&self) -> Result<QueryValues> {
        let mut values = QueryValues::new();
        self.write(&mut values)?;
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildListOptions {
    pub list: ListOptions,
    pub states: Filter,
    pub app_guids: Filter,
    pub package_guids: Filter,
}

impl BuildListOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListQuery for BuildListOptions {
    fn to_query_values(&self) -> Result<QueryValues> {
        let mut values = QueryValues::new();
        self.list.write(&mut values)?;
        self.states.serialize(&mut values, "states")?;
        self.app_guids.serialize(&mut values, "app_guids")?;
        self.package_guids.serialize(&mut values, "package_guids")?;
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentListOptions {
    pub list: ListOptions,
    pub app_guids: Filter,
    pub states: Filter,
    pub status_reasons: Filter,
    pub status_values: Filter,
}

impl DeploymentListOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListQuery for DeploymentListOptions {
    fn to_query_values(&self) -> Result<QueryValues> {
        let mut values = QueryValues::new();
        self.list.write(&mut values)?;
        self.app_guids.serialize(&mut values, "app_guids")?;
        self.states.serialize(&mut values, "states")?;
        self.status_reasons.serialize(&mut values, "status_reasons")?;
        self.status_values.serialize(&mut values, "status_values")?;
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessListOptions {
    pub list: ListOptions,
    pub guids: Filter,
    pub types: Filter,
    pub app_guids: Filter,
    pub space_guids: Filter,
    pub organization_guids: Filter,
}

impl ProcessListOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListQuery for ProcessListOptions {
    fn to_query_values(&self) -> Result<QueryValues> {
        let mut values = QueryValues::new();
        self.list.write(&mut values)?;
        self.guids.serialize(&mut values, "guids")?;
        self.types.serialize(&mut values, "types")?;
        self.app_guids.serialize(&mut values, "app_guids")?;
        self.space_guids.serialize(&mut values, "space_guids")?;
        self.organization_guids
            .serialize(&mut values, "organization_guids")?;
        Ok(values)
    }
}
