use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::catalog::{normalize_title, CatalogStore};
use crate::error::{AppError, AppResult};
use crate::models::Recommendation;

use super::ranker::rank;
use super::tfidf::TermWeightIndex;

struct IndexSnapshot {
    generation: u64,
    index: Arc<TermWeightIndex>,
}

/// Content-based recommendations from synopsis similarity
///
/// The term-weight index is built on first use and reused until the catalog
/// generation changes. Concurrent first callers wait on the same build.
pub struct RecommendationService {
    catalog: Arc<dyn CatalogStore>,
    count: usize,
    cache: Mutex<Option<IndexSnapshot>>,
}

impl RecommendationService {
    pub fn new(catalog: Arc<dyn CatalogStore>, count: usize) -> Self {
        Self {
            catalog,
            count,
            cache: Mutex::new(None),
        }
    }

    /// Index for the current catalog generation, building it if needed
    pub fn index(&self) -> Arc<TermWeightIndex> {
        let generation = self.catalog.generation();
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(snapshot) = cache.as_ref() {
            if snapshot.generation == generation {
                return Arc::clone(&snapshot.index);
            }
        }

        let started = Instant::now();
        let index = Arc::new(TermWeightIndex::build(&self.catalog.synopses()));
        tracing::info!(
            generation,
            films = index.len(),
            terms = index.vocabulary().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built similarity index"
        );

        *cache = Some(IndexSnapshot {
            generation,
            index: Arc::clone(&index),
        });
        index
    }

    /// Films whose synopses are closest to the one matching `raw_title`
    pub fn recommend(&self, raw_title: &str) -> AppResult<Recommendation> {
        let normalized = normalize_title(raw_title);
        if normalized.is_empty() {
            return Err(AppError::NotFound("Film title is empty".to_string()));
        }

        let position = self
            .catalog
            .resolve_by_normalized_title(&normalized)
            .ok_or_else(|| AppError::NotFound(format!("Film not found: {}", raw_title.trim())))?;

        let index = self.index();
        let ranked = rank(position, &index, self.count)?;

        let low_confidence = index.vector(position).map_or(true, |v| v.is_zero());
        if low_confidence {
            tracing::warn!(
                title = %raw_title.trim(),
                position,
                "Synopsis has no indexable terms, recommendations carry no similarity signal"
            );
        }

        let recommendations = ranked
            .iter()
            .filter_map(|candidate| self.catalog.display_title(candidate.position))
            .collect();

        Ok(Recommendation {
            matched_title: self.catalog.display_title(position).unwrap_or_default(),
            recommendations,
            low_confidence,
        })
    }
}
