use littlelemon_server::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env, logging)
    setup_environment();

    print_banner();

    tracing::info!("Little Lemon server starting...");

    // 2. Configuration
    let config = Config::from_env()?;

    // 3. Serve until Ctrl-C
    if let Err(e) = Server::new(config).run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
