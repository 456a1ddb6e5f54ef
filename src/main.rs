use clap::Parser;
use lazycli_site::Args;

/// Backend of the LazyCLI website
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    lazycli_site::serve(args).await
}
