pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod net;
pub mod resolve;
pub mod subtitles;
pub mod walk;
pub mod web;

pub mod state {
    use crate::config::AppConfig;
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Shared application state handed to every request handler.
    ///
    /// Nothing in here is mutable; each request reads the filesystem and the
    /// network interfaces fresh.
    #[derive(Clone)]
    pub struct AppState {
        pub config: Arc<AppConfig>,
        /// Port the HTTP listener is actually bound to. May differ from the
        /// configured port when that one could not be bound.
        pub port: u16,
        /// Signalled by the shutdown endpoint; main races it against OS
        /// signals for graceful termination.
        pub shutdown: Arc<Notify>,
    }
}
