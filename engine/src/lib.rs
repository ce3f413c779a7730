// Engine library root: the price pipeline behind the dashboard.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod render;
pub mod services;

pub use error::EngineError;
