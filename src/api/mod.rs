use std::sync::Arc;

use uuid::Uuid;

pub mod dca;
pub mod price;

use crate::services::{DcaService, PriceService};

#[derive(Clone)]
pub struct AppState {
    pub dca_service: DcaService,
    pub price_service: Arc<PriceService>,
    /// The single user context the HTTP API operates under.
    pub default_user_id: Uuid,
}

impl AppState {
    pub fn new(
        dca_service: DcaService,
        price_service: Arc<PriceService>,
        default_user_id: Uuid,
    ) -> Self {
        Self {
            dca_service,
            price_service,
            default_user_id,
        }
    }
}
