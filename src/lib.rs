pub mod api;
pub mod config;
pub mod db;
pub mod enums;
pub mod error;
pub mod executors;
pub mod services;
pub mod store;

pub use config::Config;
pub use enums::{Frequency, RiskLevel, TxStatus};
pub use error::{AppError, Result};
