pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod message;
pub mod route;
pub mod session;


pub use error::ClientError;
pub type Result<T> = std::result::Result<T, ClientError>;
