use colored::*;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli_args = awskit::cli::parse_args();

    // Show INFO by default, or DEBUG/TRACE if -v/-vv is set
    let default_level = match cli_args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("AWSKIT_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Environment is read exactly once; handlers only ever see this value.
    let config = awskit::config::AppConfig::from_env();

    // Execute the command
    if let Err(e) = awskit::cli::run(cli_args, &config).await {
        // Print user-facing error message clearly
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(e.exit_code());
    }
}
