use anyhow::Result;
use chartsnap::cli::{Cli, Commands};
use chartsnap::model::parse_chart_date;
use chartsnap::server::{build_router, AppState};
use chartsnap::store::FsDocumentStore;
use chartsnap::ChartService;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

/// Date format accepted by the `fetch` subcommand.
const CLI_DATE_FORMAT: &str = "%d%m%Y";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let output_dir = match &cli.output_dir {
        Some(dir) => dir.clone(),
        None => FsDocumentStore::default_dir()?,
    };
    let service = ChartService::new(cli.pipeline_config(), output_dir)?;

    match cli.command {
        Commands::Fetch { ref date, ref region } => {
            let date = parse_chart_date(date, CLI_DATE_FORMAT)?;
            let name = service.run_and_store(date, region).await?;
            info!(%name, "chart document written");
        }
        Commands::Serve { port } => {
            let state = AppState {
                service: Arc::new(service),
            };
            let app = build_router(state);
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
            info!("chartsnap listening on http://127.0.0.1:{port}");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
