pub mod core;
pub mod http;
pub mod session;
pub mod sso;
pub mod util;
