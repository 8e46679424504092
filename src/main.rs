use std::error::Error;

use api::core::app_state::AppConfig;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    api::telemetry::init()?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), ".env loaded"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, ".env could not be read"),
    }

    let config = AppConfig::from_env()?;
    api::start(config).await?;

    Ok(())
}
