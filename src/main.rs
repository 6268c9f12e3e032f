//! Internal Transfers - ledger service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│  Store   │───▶│ Services │───▶│ Gateway  │
//! │  (YAML)  │    │(PG / RAM)│    │ (Engine) │    │  (HTTP)  │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Usage: `internal_transfers [--env <name>] [--port <port>]`

use std::sync::Arc;

use anyhow::Context;

use internal_transfers::GIT_HASH;
use internal_transfers::config::{AppConfig, StoreBackend};
use internal_transfers::db::Database;
use internal_transfers::gateway::{self, state::AppState};
use internal_transfers::store::{LedgerStore, MemoryLedgerStore, PgLedgerStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.server.port = port;
    }
    let _log_guard = internal_transfers::logging::init_logging(&app_config);

    println!("=== Internal Transfers ({}) ===", GIT_HASH);
    tracing::info!(
        env = %env,
        version = GIT_HASH,
        backend = ?app_config.store.backend,
        "starting ledger service"
    );

    // Pool lives here so it can be closed after the server drains
    let mut database: Option<Database> = None;
    let store: Arc<dyn LedgerStore> = match app_config.store.backend {
        StoreBackend::Postgres => {
            let db = Database::connect(&app_config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            if app_config.database.auto_migrate {
                db.init_schema()
                    .await
                    .context("failed to initialize ledger schema")?;
                println!("✅ PostgreSQL connected and schema initialized");
            } else {
                println!("✅ PostgreSQL connected");
            }
            let store = Arc::new(PgLedgerStore::new(db.pool().clone()));
            database = Some(db);
            store
        }
        StoreBackend::Memory => {
            println!("⚠️  In-memory store: balances are lost on restart");
            Arc::new(MemoryLedgerStore::new())
        }
    };

    let state = Arc::new(AppState::new(store));
    let result = gateway::run_server(
        &app_config.server.host,
        app_config.server.port,
        state,
    )
    .await;

    if let Some(db) = database {
        db.close().await;
    }
    result
}
