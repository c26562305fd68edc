pub mod filters;
pub mod football_api;
pub mod http;

pub use filters::*;
pub use football_api::{FootballApi, FootballApiClient};
pub use http::HttpClient;
