//! Request handlers for the retention admin API.

mod admin;

pub use admin::*;
