//! HTTP handlers

pub mod status;
pub mod webhook;

pub use status::status;
pub use webhook::handle_webhook;
