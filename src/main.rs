use comanda::{Config, Server, ServerState, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment: .env first, so it can feed Config::from_env
    dotenv::dotenv().ok();

    // 2. Load configuration and set up logging
    let config = Config::from_env();
    init_logging(&config);

    tracing::info!("Comanda server starting...");

    // 3. Initialize server state (work dir, database)
    let state = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server until ctrl-c
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
