use github_client::{GithubClient, GithubClientBuilder};
use log::{error, info};
use repo_stats::api::Result;
use repo_stats::StatsAggregator;

mod args;
mod server;

pub use args::Args;
pub use server::{router, AppState, SECURITY_HEADERS};

pub type Aggregator = StatsAggregator<GithubClient>;

pub fn build_aggregator(args: &Args) -> Result<Aggregator> {
    let mut client = GithubClientBuilder::default()
        .with_github_url(&args.api_url)
        .with_timeout(args.timeout())
        .try_with_user_agent(&args.user_agent)?;
    if let Some(token) = args.api_token.clone() {
        client = client.try_with_token(token)?;
    }
    let client = client.build()?;

    Ok(StatsAggregator::new(client, args.repo_slug()))
}

pub async fn serve(args: Args) -> anyhow::Result<()> {
    let aggregator = build_aggregator(&args)?;
    info!("Serving GitHub stats of {} on http://{}", aggregator.repo(), args.bind);
    if args.api_token.is_none() {
        info!("No API token configured, GitHub requests are unauthenticated.");
    }

    let app = router(AppState::new(aggregator, args.cache_max_age)?);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down."),
        Err(err) => error!("Failed to listen for shutdown signal: {}", err),
    }
}
