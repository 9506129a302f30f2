#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    appraisal_engagement_server::run().await
}
