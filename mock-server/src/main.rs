use helix_mock_server::MockCredentials;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let defaults = MockCredentials::default();
    let credentials = MockCredentials::new(
        std::env::var("HELIX_MOCK_KEY").unwrap_or(defaults.key),
        std::env::var("HELIX_MOCK_SECRET").unwrap_or(defaults.secret),
    );

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, key = %credentials.key, "helix mock server listening");
    helix_mock_server::run(listener, credentials).await
}
