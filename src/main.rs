use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    podlej::run(podlej::Args::parse()).await
}
