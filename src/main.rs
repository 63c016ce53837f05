/*****************************************************************************************
 *
 *  hoplink - key -> URL redirect registry
 *  --------------------------------------
 *
 *  In-memory link store, single persistence worker, snapshot recovery at boot.
 *
 *****************************************************************************************/

use std::path::PathBuf;
use std::str::FromStr;

use axum::serve;
use tokio::net::TcpListener;
use tokio::time::Duration;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

use hoplink::app::build_app;
use hoplink::config::AppConfig;
use hoplink::persistence;
use hoplink::state::app::AppState;
use hoplink::state::links::LinkStore;

#[tokio::main]
async fn main() {
    //
    // ────────────────────────────────────────────────────────
    //  Locate config.json (EXE folder or project root)
    // ────────────────────────────────────────────────────────
    //
    let exe_path = std::env::current_exe().expect("Cannot get executable path");
    let exe_dir = exe_path.parent().expect("Cannot get executable directory");

    let mut config_path: PathBuf = exe_dir.join("config.json");

    if !config_path.exists() {
        let fallback = exe_dir.join("..").join("config.json");
        if fallback.exists() {
            config_path = fallback;
        } else {
            panic!(
                "config.json not found in:\n  {}\n  {}\nCopy config.json to one of these paths.",
                exe_dir.join("config.json").display(),
                fallback.display()
            );
        }
    }

    let cfg = AppConfig::load_from_file(&config_path);

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging
    // ────────────────────────────────────────────────────────
    //
    let level = LevelFilter::from_str(&cfg.log_level).unwrap_or(LevelFilter::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    tracing::info!("Starting hoplink");
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Recover the store from the last snapshot
    // ────────────────────────────────────────────────────────
    //
    // Must complete before anything can serve or write. A corrupt snapshot
    // aborts startup: running against a partially recovered store would
    // lose data silently.
    let store = LinkStore::new();
    let db_path = PathBuf::from(&cfg.db_path);

    match persistence::load_snapshot(&db_path, &store) {
        Ok(n) => tracing::info!("Recovered {} entries from {}", n, db_path.display()),
        Err(e) => {
            tracing::error!("Cannot recover link database from {}: {e}", db_path.display());
            std::process::exit(1);
        }
    }

    //
    // ────────────────────────────────────────────────────────
    //  Start the persistence worker
    // ────────────────────────────────────────────────────────
    //
    // Sole writer of the store and of the snapshot file from here on.
    let (queue, worker) = persistence::start_worker(
        store.clone(),
        db_path,
        Duration::from_secs(cfg.sync_interval),
    );

    //
    // ────────────────────────────────────────────────────────
    //  Build the app, bind and serve
    // ────────────────────────────────────────────────────────
    //
    let state = AppState {
        store,
        queue,
        config: cfg.clone(),
    };
    let app = build_app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The router held every queue handle; with serving done they are gone,
    // so the worker drains what it accepted and writes a final snapshot
    // before exiting. Wait for that before leaving main.
    if let Err(e) = worker.await {
        tracing::error!("Persistence worker failed to shut down cleanly: {e}");
    }
    tracing::info!("Snapshot flushed. Goodbye.");
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");

    tracing::warn!("CTRL+C received, draining writes and saving a final snapshot");
}
