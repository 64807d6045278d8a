use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::services::RecommendationService;

/// Shared application state
///
/// Everything here is read-only after startup except the recommendation
/// service's internal index cache.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub recommender: Arc<RecommendationService>,
    pub min_vote_count: u64,
}

impl AppState {
    pub fn new(catalog: Catalog, recommendation_count: usize, min_vote_count: u64) -> Self {
        let catalog = Arc::new(catalog);
        let recommender = Arc::new(RecommendationService::new(
            catalog.clone(),
            recommendation_count,
        ));

        Self {
            catalog,
            recommender,
            min_vote_count,
        }
    }

    /// Creates the state from loaded configuration
    pub fn from_config(catalog: Catalog, config: &Config) -> Self {
        Self::new(catalog, config.recommendation_count, config.min_vote_count)
    }
}
