pub mod api;
pub mod error;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use api::ApiClient;
pub use error::ApiError;
pub use transport::{HttpTransport, Transport};
