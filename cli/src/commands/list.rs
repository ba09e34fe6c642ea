use anyhow::Result;
use cf_client::resource::{Build, Deployment, ListResponse, Process};
use cf_client::{BuildListOptions, Client, DeploymentListOptions, ProcessListOptions};
use tabular::{Row, Table};

use super::list_options;
use crate::argparse::{BuildsArgs, DeploymentsArgs, OutputArgs, ProcessesArgs};

fn print_table(header: &[&str], rows: Vec<Vec<String>>) {
    let layout = vec!["{:<}"; header.len()].join("  ");
    let mut table = Table::new(&layout).with_row(Row::from_cells(header.iter().cloned()));
    for cells in rows {
        let mut row = Row::new();
        for cell in cells {
            row = row.with_cell(cell);
        }
        table.add_row(row);
    }
    print!("{}", table);
}

fn unwrap_page<T>(page: ListResponse<T>) -> Vec<T> {
    if page.pagination.total_pages > 1 {
        tracing::info!(
            "Showing {} of {} results ({} pages); use --all to fetch everything",
            page.resources.len(),
            page.pagination.total_results,
            page.pagination.total_pages
        );
    }
    page.resources
}

fn print_json<T: serde::Serialize>(output: &OutputArgs, items: &[T]) -> Result<bool> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(items)?);
    }
    Ok(output.json)
}

pub async fn handle_builds_command(client: &Client, args: &BuildsArgs) -> Result<()> {
    let mut opts = BuildListOptions {
        list: list_options(&args.filters)?,
        ..Default::default()
    };
    opts.states.equal_to(args.states.iter().cloned());
    opts.app_guids.equal_to(args.app_guids.iter().cloned());
    opts.package_guids.equal_to(args.package_guids.iter().cloned());

    let builds: Vec<Build> = if args.output.all {
        client.builds().list_all(&opts).await?
    } else {
        unwrap_page(client.builds().list(&opts).await?)
    };

    if print_json(&args.output, &builds)? {
        return Ok(());
    }
    let rows = builds
        .iter()
        .map(|b| {
            vec![
                b.resource.guid.clone(),
                b.state.to_string(),
                b.relationships.app.guid().unwrap_or("-").to_string(),
                b.resource.created_at.to_rfc3339(),
            ]
        })
        .collect();
    print_table(&["GUID", "STATE", "APP", "CREATED"], rows);
    Ok(())
}

pub async fn handle_deployments_command(client: &Client, args: &DeploymentsArgs) -> Result<()> {
    let mut opts = DeploymentListOptions {
        list: list_options(&args.filters)?,
        ..Default::default()
    };
    opts.app_guids.equal_to(args.app_guids.iter().cloned());
    opts.states.equal_to(args.states.iter().cloned());
    opts.status_values.equal_to(args.status_values.iter().cloned());
    opts.status_reasons.equal_to(args.status_reasons.iter().cloned());

    let deployments: Vec<Deployment> = if args.output.all {
        client.deployments().list_all(&opts).await?
    } else {
        unwrap_page(client.deployments().list(&opts).await?)
    };

    if print_json(&args.output, &deployments)? {
        return Ok(());
    }
    let rows = deployments
        .iter()
        .map(|d| {
            vec![
                d.resource.guid.clone(),
                d.status.value.clone(),
                d.status.reason.clone(),
                d.relationships.app.guid().unwrap_or("-").to_string(),
                d.resource.created_at.to_rfc3339(),
            ]
        })
        .collect();
    print_table(&["GUID", "STATUS", "REASON", "APP", "CREATED"], rows);
    Ok(())
}

pub async fn handle_processes_command(client: &Client, args: &ProcessesArgs) -> Result<()> {
    let mut opts = ProcessListOptions {
        list: list_options(&args.filters)?,
        ..Default::default()
    };
    opts.guids.equal_to(args.guids.iter().cloned());
    opts.types.equal_to(args.types.iter().cloned());
    opts.app_guids.equal_to(args.app_guids.iter().cloned());
    opts.space_guids.equal_to(args.space_guids.iter().cloned());
    opts.organization_guids
        .equal_to(args.organization_guids.iter().cloned());

    let processes: Vec<Process> = if args.output.all {
        client.processes().list_all(&opts).await?
    } else {
        unwrap_page(client.processes().list(&opts).await?)
    };

    if print_json(&args.output, &processes)? {
        return Ok(());
    }
    let rows = processes
        .iter()
        .map(|p| {
            vec![
                p.resource.guid.clone(),
                p.process_type.clone(),
                p.instances.to_string(),
                format!("{}M", p.memory_in_mb),
                p.relationships.app.guid().unwrap_or("-").to_string(),
            ]
        })
        .collect();
    print_table(&["GUID", "TYPE", "INSTANCES", "MEMORY", "APP"], rows);
    Ok(())
}
