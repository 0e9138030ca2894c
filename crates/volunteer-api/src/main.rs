//! Volunteering API Server Binary

use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use volunteer_api::{
    create_router, fixtures, AppState, ConfigError, MemoryStore, ServerConfig, Store,
    VerifierSource,
};
use volunteer_auth::{IdentityVerifier, JwtVerifier, JwtVerifierConfig, StaticVerifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = open_store(&config).await?;

    if config.seed_fixtures {
        if store.list_organisations().await?.is_empty() {
            fixtures::seed(store.as_ref()).await?;
        } else {
            warn!("Store already holds data, skipping fixtures");
        }
    }

    let verifier = build_verifier(&config.verifier)?;
    info!(
        verifier = verifier.description(),
        port = config.port,
        "Starting volunteering API server"
    );

    let state = Arc::new(AppState::new(store, verifier));
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Volunteering API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(feature = "postgres")]
async fn open_store(config: &ServerConfig) -> Result<Arc<dyn Store>, Box<dyn Error>> {
    match &config.database_url {
        Some(url) => {
            let store = volunteer_api::PostgresStore::new(url).await?;
            Ok(Arc::new(store))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_store(config: &ServerConfig) -> Result<Arc<dyn Store>, Box<dyn Error>> {
    if config.database_url.is_some() {
        warn!("DATABASE_URL is set but the postgres feature is disabled, using in-memory store");
    }
    Ok(Arc::new(MemoryStore::new()))
}

fn build_verifier(source: &VerifierSource) -> Result<Arc<dyn IdentityVerifier>, Box<dyn Error>> {
    match source {
        VerifierSource::Auth0 { domain, audience } => Ok(Arc::new(JwtVerifier::new(
            JwtVerifierConfig::auth0(domain, audience.clone()),
        ))),
        VerifierSource::DevTokens(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            let verifier = StaticVerifier::from_json(&json)?;
            warn!(
                tokens = verifier.len(),
                path = %path.display(),
                "Using static development tokens"
            );
            Ok(Arc::new(verifier))
        }
    }
}
