//! MedScore client core
//!
//! Platform-independent half of the document-verification client:
//! - `api` / `request`: typed backend client over an injectable transport
//! - `session`: persisted session store, bootstrap, sign-in and logout
//! - `route` / `guard`: route table and the pure access decision
//! - `upload`, `history`, `viewer`: per-view state machines
//! - `fetch`, `scope`: fetch-status cache and cancel-on-unmount scopes

// =========================================================
// Cross-platform logging macros
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod guard;
pub mod history;
pub mod request;
pub mod route;
pub mod scope;
pub mod session;
pub mod upload;
pub mod viewer;

pub use api::MedScoreApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientErrorStatus, ClientResult};
pub use medscore_shared as shared;
