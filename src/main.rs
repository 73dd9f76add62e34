use std::{path::PathBuf, sync::Arc};

use log::{info, warn};
use tokio::net::TcpListener;

use gitwiki::{logger::Logger, AppState, Config, WikiError};

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("gitwiki: logger already initialized: {}", e);
    }

    let mut config = Config::from_env();
    if let Some(root) = std::env::args().nth(1) {
        config.base_dir = Arc::new(PathBuf::from(root));
    }

    std::fs::create_dir_all(config.base_dir.as_ref())?;
    config.base_dir = Arc::new(std::fs::canonicalize(config.base_dir.as_ref())?);
    info!("Serving wiki from {:?}", config.base_dir);

    let state = AppState::from_config(&config);
    let vcs = state.wiki.vcs();
    if vcs.is_enabled() && !vcs.is_initialized() {
        if let Err(e) = vcs.initialize() {
            warn!("Could not initialize repository, commits will fail: {}", e);
        }
    }

    let addr = config.socket_addr();
    info!("Wiki listening on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, gitwiki::app(state)).await.map_err(WikiError::from)
}
