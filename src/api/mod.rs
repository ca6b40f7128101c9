pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::config::Config;
use crate::search::SearchService;
use crate::state::RecordRepository;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordRepository>,
    pub search: Arc<SearchService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordRepository>, config: Config) -> Self {
        let search = Arc::new(SearchService::new(store.clone(), config.search.clone()));
        Self {
            store,
            search,
            config: Arc::new(config),
        }
    }
}
