pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod service;
pub mod shopping;
pub mod spoonacular;

pub use error::{LarderError, Result};
