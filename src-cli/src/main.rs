use clap::Parser;
use namescout_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    namescout_cli::run(Cli::parse()).await
}
