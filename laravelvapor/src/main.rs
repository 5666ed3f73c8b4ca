use laravelvapor::LaravelVaporProvider;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries harness responses
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("LARAVEL_VAPOR_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tfplug::serve_stdio(LaravelVaporProvider::new()).await?;

    Ok(())
}
