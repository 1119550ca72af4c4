mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("client=info,reqwest=warn")
        .with_writer(std::io::stderr)
        .init();

    cli::run().await
}
