pub mod approval;
pub mod request;
pub mod service;
