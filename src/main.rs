use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod config;
mod links;
mod metadata;
mod web;
use config::Config;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_logging();

    let config = Config::load_with(args.config.as_deref())?;
    let app_mgr = app::App::new(config)?;

    match args.command {
        cli::Command::Daemon {} => web::start_daemon(app_mgr),

        cli::Command::Meta { url } => {
            let meta = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(app_mgr.fetch_metadata(&url))?;

            println!("{}", serde_json::to_string_pretty(&meta)?);
            Ok(())
        }
    }
}
