//! CLI entry point - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together via bootstrap.
//! Command dispatch routes to handlers which delegate to the stack controller.

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use chatrig_cli::error::exit_code_for;
use chatrig_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let ctx = bootstrap(CliConfig {
        secrets: cli.secrets,
    })?;

    match command {
        Commands::Start { mode } => handlers::start::execute(&ctx, mode.into()).await,
        Commands::Stop => handlers::stop::execute(&ctx).await,
        Commands::Status { json } => handlers::status::execute(&ctx, json).await,
        Commands::Restart { mode } => handlers::restart::execute(&ctx, mode.into()).await,
        Commands::Open => handlers::open::execute(&ctx).await,
        Commands::Logs => handlers::logs::execute(&ctx).await,
        Commands::Paths => handlers::paths::execute(&ctx),
    }
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code_for(&err));
    }
}
