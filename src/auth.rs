//! Session state and the page/redirect scraping helpers used by the login flows.

pub mod csrf;
pub mod fragment;
pub mod secret;
pub mod session;

pub use csrf::*;
pub use fragment::*;
pub use secret::*;
pub use session::*;
