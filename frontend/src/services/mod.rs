pub mod api;
pub mod logging;
