//! Shutdown coordination.
//!
//! A `ShutdownSignal` is a one-way latch: once requested it stays
//! requested, and every waiter past or future is released. The serve loop
//! polls it between connections; the signal task trips it from SIGINT or
//! SIGTERM.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub struct ShutdownSignal {
    notify: Notify,
    requested: AtomicBool,
}

impl ShutdownSignal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            notify: Notify::new(),
            requested: AtomicBool::new(false),
        })
    }

    /// Trip the latch and wake everyone waiting on it.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Wait until shutdown is requested. Returns immediately if it already
    /// was. The waiter is registered before the flag is checked, so a
    /// request landing between the two cannot be missed.
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_requested() {
            return;
        }
        notified.await;
    }
}

/// Spawn the task that turns process signals into a shutdown request.
#[cfg(unix)]
pub fn spawn_signal_listener(shutdown: Arc<ShutdownSignal>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");

        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
        shutdown.request();
    });
}

/// Windows fallback, Ctrl+C only.
#[cfg(not(unix))]
pub fn spawn_signal_listener(shutdown: Arc<ShutdownSignal>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.request();
        }
    });
}
