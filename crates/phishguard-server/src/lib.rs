//! PhishGuard Server
//!
//! HTTP service in front of the phishing classifier. A browser extension
//! computes the 77 URL and page features and posts them here; the service
//! answers with a label, the phishing probability and, on `/analyze`, a risk
//! tier and a few human-readable flags.
//!
//! Routes:
//! - `GET /health`
//! - `POST /predict`
//! - `POST /analyze`
//! - `GET /metrics`

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::{CorsConfig, ServerConfig};
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
