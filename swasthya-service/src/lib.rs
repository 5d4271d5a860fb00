//! SwasthyaLink gateway: health-assistant chat and family network API.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
