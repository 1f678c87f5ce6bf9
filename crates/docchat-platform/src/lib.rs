//! Browser adapters for the DocChat client.
//!
//! `api` speaks HTTP to the session service through `fetch()`; `browser`
//! maps routes onto the address bar.

pub mod api;
pub mod browser;


pub use api::{Endpoints, HttpSessionApi};
