mod common;
mod error;
mod list;
pub mod parser;
mod services;
mod tools;
mod ui;

use clap::Parser;
use error::CliError;
use parser::Cli;

use crate::config::AppConfig;
use crate::toolkit::HostPlatform;

// Helper function to parse args
pub fn parse_args() -> Cli {
    Cli::parse()
}

// Main CLI execution function, receives parsed args
pub async fn run(cli: Cli, config: &AppConfig) -> Result<(), CliError> {
    // Refuse unknown hosts outright; every recipe and shell line here
    // assumes a Unix userland on linux/macos.
    HostPlatform::detect()?;

    match &cli.command {
        parser::Commands::Eks(cmd) => cmd.run("eks", config).await,
        parser::Commands::Ecr(cmd) => cmd.run("ecr", config).await,
        parser::Commands::Ec2(cmd) => cmd.run("ec2", config).await,
        parser::Commands::Vpc(cmd) => cmd.run("vpc", config).await,
        parser::Commands::Rds(cmd) => cmd.run("rds", config).await,
        parser::Commands::Ecs(cmd) => cmd.run("ecs", config).await,
        parser::Commands::Apprunner(cmd) => cmd.run("apprunner", config).await,
        parser::Commands::S3(cmd) => cmd.run("s3", config).await,
        parser::Commands::Sts(cmd) => cmd.run("sts", config).await,
        parser::Commands::Tools(cmd) => cmd.run(config).await,
        parser::Commands::List(cmd) => cmd.run(),
    }
}
