pub mod client;
pub mod handlers;

pub use client::ProxyClient;
pub use handlers::*;
