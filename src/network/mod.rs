pub mod backoff;
pub mod client;
pub mod error_handler;

pub use backoff::Backoff;
pub use client::NetworkClient;
