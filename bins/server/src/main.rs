//! Keel API Server
//!
//! Main entry point for the Keel posting service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keel_api::{AppState, create_router};
use keel_core::posting::PostingOrchestrator;
use keel_db::{
    AccountRepository, ApprovalRuleRepository, AuditRepository, CachedAccountStore,
    CompanyRepository, DocumentRepository, ExchangeRateRepository, JournalRepository,
    PeriodRepository, connect,
};
use keel_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keel=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Wire the posting orchestrator over the repositories
    let accounts = CachedAccountStore::new(
        AccountRepository::new(db.clone()),
        config.posting.account_cache_ttl_secs,
    );
    let audit = Arc::new(AuditRepository::new(db.clone()));
    let orchestrator = PostingOrchestrator::new(
        Arc::new(DocumentRepository::new(db.clone())),
        Arc::new(accounts),
        Arc::new(PeriodRepository::new(db.clone())),
        Arc::new(ExchangeRateRepository::new(db.clone())),
        Arc::new(ApprovalRuleRepository::new(db.clone())),
        Arc::new(CompanyRepository::new(db.clone())),
        Arc::new(JournalRepository::new(
            db.clone(),
            config.posting.journal_number_prefix.clone(),
        )),
        audit.clone(),
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        orchestrator: Arc::new(orchestrator),
        audit,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
