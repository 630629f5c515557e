pub mod backend_api;
pub mod http;

#[cfg(test)]
pub mod mock;

pub use backend_api::BackendApi;
pub use http::HttpBackendApi;
