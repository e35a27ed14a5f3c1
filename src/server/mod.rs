mod analyze;
mod client;
mod handlers;
mod models;
mod state;

pub use client::run_client;
pub use handlers::run_server;
