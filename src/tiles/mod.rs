pub mod cache;
pub mod provider;
pub mod source;
pub mod tile;
pub mod worker;
