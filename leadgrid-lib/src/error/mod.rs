//! Error types

mod action;
mod config;
mod filter;
mod schema;

pub use action::*;
pub use config::*;
pub use filter::*;
pub use schema::*;
