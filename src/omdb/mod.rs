pub mod client;
pub mod model;
pub mod source;

pub use client::OmdbClient;
pub use model::*;
pub use source::MovieSource;
