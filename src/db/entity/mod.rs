pub mod plan;
pub mod token_price;
pub mod transaction;
pub mod user;
