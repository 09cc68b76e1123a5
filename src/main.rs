#[tokio::main]
async fn main() -> std::io::Result<()> {
    agenda_backend::run().await
}
