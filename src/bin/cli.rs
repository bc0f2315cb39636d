use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    community_admin::cli::run().await
}
