//! Artmint HTTP API
//!
//! Gallery demo, wallet token inventory, burn reward quotes and optional
//! server-side minting behind one actix-web service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
