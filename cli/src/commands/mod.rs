mod list;
mod query;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cf_client::{Client, ClientConfig, ListOptions};

use crate::argparse::{Cli, Commands, FilterArgs};
pub use list::{handle_builds_command, handle_deployments_command, handle_processes_command};
pub use query::handle_query_command;

pub async fn handle_command(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Query(args) => handle_query_command(args),
        Commands::Builds(args) => handle_builds_command(&connect(&cli)?, args).await,
        Commands::Deployments(args) => handle_deployments_command(&connect(&cli)?, args).await,
        Commands::Processes(args) => handle_processes_command(&connect(&cli)?, args).await,
    }
}

fn connect(cli: &Cli) -> Result<Client> {
    let config = resolve_config(
        cli.config.as_deref(),
        default_config_path().as_deref(),
        cli.api_url.as_deref(),
        cli.token.as_deref(),
    )?;
    tracing::debug!("Using API endpoint {}", config.endpoint());
    Client::new(&config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cfq").join("config.toml"))
}

/// Merge the config file (explicit, else the default one if present) with flag overrides.
fn resolve_config(
    explicit: Option<&Path>,
    fallback: Option<&Path>,
    api_url: Option<&str>,
    token: Option<&str>,
) -> Result<ClientConfig> {
    let loaded = match (explicit, fallback) {
        (Some(path), _) => Some(ClientConfig::load(path)?),
        (None, Some(path)) if path.exists() => Some(ClientConfig::load(path)?),
        _ => None,
    };

    let mut config = match (loaded, api_url) {
        (Some(mut config), Some(url)) => {
            config.api_url = url.to_string();
            config
        }
        (Some(config), None) => config,
        (None, Some(url)) => ClientConfig::new(url),
        (None, None) => bail!("No API endpoint configured. Pass --api-url, set CF_API_URL, or create a config file"),
    };

    if let Some(token) = token {
        config.token = Some(token.to_string());
    }
    config.validate()?;
    Ok(config)
}

/// Shared paging and filters from the command line.
pub fn list_options(filters: &FilterArgs) -> Result<ListOptions> {
    let mut opts = ListOptions {
        page: filters.page,
        per_page: filters.per_page,
        order_by: filters.order_by.clone(),
        ..Default::default()
    };

    if let Some(selector) = &filters.selector {
        opts.label_selector = selector
            .parse()
            .with_context(|| format!("Invalid label selector '{}'", selector))?;
    }
    if let Some(ts) = filters.created_before {
        opts.created_ats.before(ts);
    }
    if let Some(ts) = filters.created_after {
        opts.created_ats.after(ts);
    }
    if let Some(ts) = filters.updated_before {
        opts.updated_ats.before(ts);
    }
    if let Some(ts) = filters.updated_after {
        opts.updated_ats.after(ts);
    }
    Ok(opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_client::ListQuery;
    use chrono::DateTime;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_config_from_flags_only() {
        let config = resolve_config(None, None, Some("https://api.example.org"), Some("tok")).unwrap();
        assert_eq!(config.api_url, "https://api.example.org");
        assert_eq!(config.token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_resolve_config_requires_endpoint() {
        let missing = Path::new("/nonexistent/cfq/config.toml");
        let err = resolve_config(None, Some(missing), None, None).unwrap_err();
        assert!(err.to_string().contains("No API endpoint configured"));
    }

    #[test]
    fn test_resolve_config_flags_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"https://file.example.org\"\ntoken = \"file-token\"\nper_page = 10\n",
        )
        .unwrap();

        let from_file = resolve_config(None, Some(path.as_path()), None, None).unwrap();
        assert_eq!(from_file.api_url, "https://file.example.org");
        assert_eq!(from_file.token.as_deref(), Some("file-token"));

        let overridden =
            resolve_config(Some(path.as_path()), None, Some("https://flag.example.org"), Some("flag-token"))
                .unwrap();
        assert_eq!(overridden.api_url, "https://flag.example.org");
        assert_eq!(overridden.token.as_deref(), Some("flag-token"));
        assert_eq!(overridden.per_page, 10);
    }

    #[test]
    fn test_resolve_config_explicit_file_must_exist() {
        let missing = Path::new("/nonexistent/cfq.toml");
        assert!(resolve_config(Some(missing), None, Some("https://api.example.org"), None).is_err());
    }

    #[test]
    fn test_list_options_from_filters() {
        let filters = FilterArgs {
            selector: Some("env in (dev,prod),!legacy".to_string()),
            created_after: Some(DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap()),
            updated_before: Some(
                DateTime::parse_from_rfc3339("2024-02-01T08:00:00+01:00").unwrap(),
            ),
            per_page: Some(10),
            ..Default::default()
        };
        let values = list_options(&filters).unwrap().to_query_values().unwrap();
        let pairs: Vec<_> = values.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("per_page", "10"),
                ("label_selector", "env in (dev,prod),!legacy"),
                ("created_ats[gt]", "2024-01-01T00:00:00Z"),
                ("updated_ats[lt]", "2024-02-01T08:00:00+01:00"),
            ]
        );
    }

    #[test]
    fn test_list_options_rejects_bad_selector() {
        let filters = FilterArgs {
            selector: Some("env in (dev".to_string()),
            ..Default::default()
        };
        let err = list_options(&filters).unwrap_err();
        assert!(err.to_string().contains("Invalid label selector"));
    }
}
