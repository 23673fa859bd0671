//! Library service HTTP server.

use biblioteca::{
    Config, Library,
    engine::{clock::SystemClock, policy::LoanPolicy},
    http,
    runtime::handle::spawn_library,
};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

/// Library lending service
#[derive(Parser, Debug)]
#[command(name = "biblioteca-server")]
#[command(about = "In-memory library lending API with availability alerts")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    listen: String,

    /// Days a loan lasts before it is late
    #[arg(long, default_value = "30")]
    loan_days: i64,

    /// Maximum active loans per reader
    #[arg(long, default_value = "3")]
    max_loans: usize,

    /// Penalty days charged per late day
    #[arg(long, default_value = "2")]
    penalty_rate: u32,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,biblioteca=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .listen_addr(&args.listen)
        .loan_period_days(args.loan_days)
        .max_active_loans(args.max_loans)
        .penalty_per_late_day(args.penalty_rate)
        .build();

    tracing::info!("biblioteca v{}", biblioteca::VERSION);
    tracing::info!(?config.policy, "lending policy");

    if let Err(e) = run(config).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("server stopped");
}

async fn run(config: Config) -> std::io::Result<()> {
    let policy: LoanPolicy = config.policy.clone();
    let handle = spawn_library(Library::with_clock(policy, SystemClock), config.runtime.clone());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    let shutdown_handle = handle.clone();
    axum::serve(listener, http::router(handle))
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("received ctrl-c, shutting down");
            }
            let _ = shutdown_handle.shutdown().await;
        })
        .await
}
