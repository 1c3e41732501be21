use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::LeagueStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeagueStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn LeagueStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
