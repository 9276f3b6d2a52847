#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    legal_docgen_server::run().await
}
