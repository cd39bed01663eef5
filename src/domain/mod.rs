pub mod errors;
pub mod json;
pub mod models;
pub mod service;

pub use errors::*;
pub use json::parse;
pub use models::*;
pub use service::BuildServerClient;
