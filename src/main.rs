use tokio::net::TcpListener;

use flatwiki::handlers;
use flatwiki::logger::Logger;
use flatwiki::{AppState, Config, WikiError};

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("flatwiki: logger already initialized: {}", e);
    }

    let config = Config::from_args()?;
    log::debug!("Loaded config: {:?}", config);

    let state = AppState::from_config(&config)?;
    let app = handlers::app(state);

    let addr = config.socket_addr();
    log::info!("Wiki listening on http://{}, pages in {:?}", addr, config.pages_dir);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(WikiError::from)
}
