pub mod error;
pub mod filters;
pub mod reply;
pub mod server;
