pub mod api_client;
pub mod session;
pub mod transport;
