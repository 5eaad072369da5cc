use comanda_server::{print_banner, setup_environment, Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment first (dotenv, working directory, logging)
    setup_environment()?;

    print_banner();
    tracing::info!("Comanda server starting...");

    let config = Config::from_env();
    let server = Server::new(config);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
