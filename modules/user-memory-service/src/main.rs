//! User Memory Service: long-term, per-user fact store exposed as agent tools.
//!
//! Tools: `store_user_info`, `get_user_info` (via /rpc/tools/call).
//! Default: http://0.0.0.0:8000/

mod config;
mod db;
mod operations;
mod routes;
mod schema;
mod tools;

use config::Config;
use routes::AppState;
use std::sync::Arc;
use std::time::Instant;
use tools::ToolRegistry;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Opening database at: {}", config.db_path);
    let database = match db::Db::open(&config.db_path, config.pool_size) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!("Failed to initialize database at {}: {}", config.db_path, e);
            std::process::exit(1);
        }
    };
    if let Ok(abs) = std::path::absolute(&config.db_path) {
        log::info!("Database location: {}", abs.display());
    }

    let state = Arc::new(AppState {
        tools: ToolRegistry::with_memory_tools(Arc::clone(&database)),
        db: database,
        start_time: Instant::now(),
    });

    let app = routes::router(state);

    let addr = config.bind_addr();
    log::info!("User Memory Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .await
        .expect("Server error");

    log::info!("User Memory Service stopped");
}
