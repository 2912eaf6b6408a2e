mod config;
mod loader;
pub use config::*;
pub use loader::*;
pub mod errors;
pub mod transfer;
