use std::sync::Arc;

use tabserve::config::{Config, ServerState};
use tabserve::server::{bind_listener, spawn_signal_listener, ShutdownSignal};
use tabserve::{browser, logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // One connection is served at a time, so a single-threaded runtime is
    // all the server ever needs.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(ServerState::new(&cfg)?);
    let addr = cfg.socket_addr()?;

    // Bind before announcing anything: an occupied port must surface as a
    // fatal error, not after a misleading startup line.
    let listener = bind_listener(addr)?;

    let url = cfg.advertised_url();
    logger::log_server_start(&url);

    if cfg.browser.open {
        if let Err(e) = browser::open_tab(&url) {
            logger::log_browser_error(&e);
        }
    }

    let shutdown = ShutdownSignal::new();
    spawn_signal_listener(Arc::clone(&shutdown));

    server::run(listener, state, shutdown).await;

    // The loop has returned and dropped the listener with it; the port is
    // already free by the time the notice prints.
    logger::log_shutdown_begin();
    logger::log_server_stopped();
    Ok(())
}
