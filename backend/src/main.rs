use clap::Parser;
use server::config::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::start_server(Args::parse()).await
}
