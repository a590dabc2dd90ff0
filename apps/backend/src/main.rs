#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medterm_quiz_backend::run().await
}
