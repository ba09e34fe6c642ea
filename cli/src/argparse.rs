use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cfq",
    about = "Query Cloud Foundry V3 collections with server-side filters",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Path to a TOML config file (default: <config dir>/cfq/config.toml)
    #[arg(long, global = true, env = "CF_CONFIG")]
    pub config: Option<PathBuf>,

    /// API endpoint, overrides the config file
    #[arg(long, global = true, env = "CF_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token, overrides the config file
    #[arg(long, global = true, env = "CF_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Pick which subcommand to use
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List builds
    Builds(BuildsArgs),
    /// List deployments
    Deployments(DeploymentsArgs),
    /// List processes
    Processes(ProcessesArgs),
    /// Print the encoded query string for the given filters, without any request
    Query(QueryArgs),
}

/// Filters and paging shared by every collection.
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Label selector, e.g. "env=prod,tier notin (db,cache),!legacy"
    #[arg(long, short = 'l')]
    pub selector: Option<String>,

    /// Created strictly before this RFC 3339 instant
    #[arg(long, value_parser = parse_timestamp)]
    pub created_before: Option<DateTime<FixedOffset>>,

    /// Created strictly after this RFC 3339 instant
    #[arg(long, value_parser = parse_timestamp)]
    pub created_after: Option<DateTime<FixedOffset>>,

    /// Updated strictly before this RFC 3339 instant
    #[arg(long, value_parser = parse_timestamp)]
    pub updated_before: Option<DateTime<FixedOffset>>,

    /// Updated strictly after this RFC 3339 instant
    #[arg(long, value_parser = parse_timestamp)]
    pub updated_after: Option<DateTime<FixedOffset>>,

    /// Page to fetch, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Sort field, prefix with '-' for descending
    #[arg(long)]
    pub order_by: Option<String>,
}

/// Output options for list commands.
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Follow pagination and print every result
    #[arg(long)]
    pub all: bool,

    /// Print raw JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BuildsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,

    /// STAGING, STAGED or FAILED
    #[arg(long, value_delimiter = ',')]
    pub states: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub app_guids: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub package_guids: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeploymentsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,

    #[arg(long, value_delimiter = ',')]
    pub app_guids: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub states: Vec<String>,

    /// ACTIVE or FINALIZED
    #[arg(long, value_delimiter = ',')]
    pub status_values: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub status_reasons: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ProcessesArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub output: OutputArgs,

    #[arg(long, value_delimiter = ',')]
    pub guids: Vec<String>,

    /// Process types, e.g. web,worker
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub app_guids: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub space_guids: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub organization_guids: Vec<String>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Exact-match filter NAME=V1,V2 (repeatable)
    #[arg(long = "eq", value_name = "NAME=V1,V2")]
    pub equal: Vec<String>,

    /// Exclusion filter NAME=V1,V2, sent as NAME[not] (repeatable)
    #[arg(long = "not", value_name = "NAME=V1,V2")]
    pub not_equal: Vec<String>,
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| format!("expected an RFC 3339 timestamp such as 2024-01-31T12:00:00Z: {}", e))
}
