pub mod dca_service;
pub mod price_service;

pub use dca_service::DcaService;
pub use price_service::{PriceOracle, PriceService};
