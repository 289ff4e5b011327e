use opentsdb_publisher::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::main().await
}
