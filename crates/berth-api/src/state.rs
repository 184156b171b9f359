//! Application state

use berth_auth::TokenCodec;
use berth_db::Database;
use berth_notify::Notifier;
use std::sync::Arc;

/// Application state shared across handlers
///
/// Everything the handlers touch is injected here at startup; there is
/// no package-level mutable state. The codec key is read-only after
/// construction, so concurrent reads need no synchronization.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub codec: Arc<TokenCodec>,
    pub notifier: Arc<dyn Notifier>,
    pub pepper: String,
}

impl AppState {
    pub fn new(
        db: Database,
        codec: Arc<TokenCodec>,
        notifier: Arc<dyn Notifier>,
        pepper: String,
    ) -> Self {
        Self {
            db,
            codec,
            notifier,
            pepper,
        }
    }
}
