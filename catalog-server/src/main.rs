use catalog_server::{setup_environment, Config, Server, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    setup_environment(&config);

    tracing::info!("Catalog server starting...");

    // 2. Initialize state (work dir, database, services)
    let state = ServerState::initialize(&config).await?;

    // 3. Run the HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
