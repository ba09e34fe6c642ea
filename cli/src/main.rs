mod argparse;
mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;

use argparse::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    commands::handle_command(cli).await
}
