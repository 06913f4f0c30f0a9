pub mod config;
pub mod constants;
pub mod coord;
pub mod viewport;
