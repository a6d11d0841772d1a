pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jobly")]
#[command(about = "Jobly CLI - operator tools for the Jobly API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply database migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Mint a signed API token")]
    Token(commands::token::TokenArgs),

    #[command(about = "Check the health of a running server")]
    Ping(commands::ping::PingArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Migrate => commands::migrate::handle().await,
        Commands::Token(args) => commands::token::handle(args),
        Commands::Ping(args) => commands::ping::handle(args).await,
    }
}
