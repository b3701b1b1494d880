#[tokio::main]
async fn main() -> anyhow::Result<()> {
    biogaze_lib::run().await
}
