use crate::services::market_service::MarketService;

#[derive(Clone)]
pub struct AppState {
    pub market: MarketService,
}
