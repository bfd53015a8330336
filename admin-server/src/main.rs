use admin_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment and configuration
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. Logging (needs the config for level and log dir)
    setup_environment(&config);

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Pricebook admin server starting..."
    );

    // 3. State: work dir, database, sessions, bootstrap admin
    let state = ServerState::initialize(&config).await;

    // 4. Serve until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
