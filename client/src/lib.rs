//! Client for the Cloud Foundry V3 management API.
//!
//! The interesting part is the list-query layer: [`filter`] holds composable
//! predicates (exact match, exclusion, timestamp bounds, label selectors) that
//! serialize into a [`QueryValues`] sink, and [`options`] groups them per
//! resource collection. [`Client`] sends the resulting requests.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use cf_client::{BuildListOptions, Client, ClientConfig};
//!
//! let client = Client::new(&ClientConfig::new("https://api.example.org").with_token("..."))?;
//! let mut opts = BuildListOptions::new();
//! opts.states.equal_to(["FAILED"]);
//! opts.list.label_selector.equal_to("env", ["prod"]);
//! for build in client.builds().list_all(&opts).await? {
//!     println!("{} {}", build.resource.guid, build.state);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod filter;
pub mod options;
pub mod query;
pub mod resource;
pub mod services;

#[cfg(test)]
mod test_fixtures;

pub use client::Client;
pub use config::ClientConfig;
pub use filter::{
    ExclusionFilter, Filter, FilterModifier, LabelSelector, TimestampFilter, TimestampFilterList,
};
pub use options::{
    BuildListOptions, DeploymentListOptions, ListOptions, ListQuery, ProcessListOptions,
};
pub use query::{QuerySerialize, QueryValues};
