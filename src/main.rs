use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use kea_relay::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Start initializes tracing itself once the configured level is known
    let command = args.get_command();
    if !matches!(command, cli::Commands::Start) {
        init_tracing("warn", "text");
    }

    match command {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
        },
        cli::Commands::Version => {
            println!("Kea Relay v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
