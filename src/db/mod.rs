pub mod entity;

mod ledger_repository;
mod price_repository;

pub use ledger_repository::LedgerRepository;
pub use price_repository::PriceRepository;
