pub mod credentials;
pub mod reqwest_client;

pub use credentials::*;
pub use reqwest_client::ReqwestHttpClient;
