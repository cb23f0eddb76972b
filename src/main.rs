use gateway::{
    account::{Account, AccountEngine},
    api::Server,
    config::Config,
    store::NonceStore,
};
use tracing::info;

/// The main entry point for the gateway.
///
/// Initializes logging, loads the configuration, opens the nonce store,
/// builds the account and serves the JSON-RPC API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging using tracing_subscriber.
    tracing_subscriber::fmt::init();
    
    // Load the gateway configuration from the TOML file.
    let config = Config::load("config/default.toml")?;
    info!("Gateway starting with config: {:?}", config);
    
    // Consumed nonces must survive restarts
    let store = NonceStore::connect(&config.database.url).await?;
    
    // Build the account and load its persisted nonce counters
    let engine = AccountEngine::from_config(&config)?;
    let account = Account::open(engine, store).await?;
    info!(
        "Account {:?} ready, coordinator {:?}, nonce {}",
        config.account.address,
        config.account.coordinator,
        account.nonce().await
    );
    
    // Serve the JSON-RPC API until the process is stopped
    let server = Server::new(config, account);
    server.start().await?;
    
    Ok(())
}
