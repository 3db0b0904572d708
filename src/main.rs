#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    natal_report_server::run().await
}
