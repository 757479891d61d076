mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = match cli.command {
        Commands::ListDevices(args) => commands::list_devices::execute(args, &cli.global),
        Commands::Resolve(args) => commands::resolve::execute(args, &cli.global),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays parseable. RUST_LOG wins over --verbose.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    if let Err(e) = tracing_subscriber::fmt()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .try_init()
    {
        eprintln!("Failed to initialize tracing: {}", e);
    }
}
