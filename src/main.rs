use anyhow::Result;
use clap::Parser;

use chessbot::cli::Cli;
use chessbot::{commands, logging, settings};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_level.as_deref());

    let config = settings::load_config(&cli)?;
    commands::run(cli.command, config)
}
