// modeshift-api: Async Rust client for the vManage session API

pub mod auth;
pub mod client;
pub mod cookie;
pub mod error;
pub mod models;
pub mod transport;

mod devices;
mod templates;

pub use auth::Credential;
pub use client::ManagerClient;
pub use error::Error;
pub use models::{ModeChangeAck, ModeChangeRequest, RawDevice};
pub use transport::{TlsMode, TransportConfig};
