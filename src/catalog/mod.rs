//! Film catalog
//!
//! The catalog is loaded once at startup and never mutated. Consumers that
//! only need synopses and titles (the recommendation engine) go through the
//! [`CatalogStore`] trait; analytics read the typed [`Film`] records directly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{Film, FilmId};

pub mod literal;
pub mod loader;
mod normalize;

pub use loader::{load_catalog, load_credits, load_movies};
pub use normalize::normalize_title;

/// Every catalog snapshot gets a fresh generation, so caches keyed on it
/// never outlive the data they were derived from.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Read-only view of the catalog used by the recommendation engine
///
/// Positions are indices into the catalog's ordered film list; `synopses` and
/// `identifiers` are aligned with them.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogStore: Send + Sync {
    /// Position of the first film whose normalized title equals `normalized`
    fn resolve_by_normalized_title(&self, normalized: &str) -> Option<usize>;

    /// Synopsis of every film, in catalog order
    fn synopses(&self) -> Vec<String>;

    /// Identifier of every film, in catalog order
    fn identifiers(&self) -> Vec<FilmId>;

    /// Display title of the film at `position`
    fn display_title(&self, position: usize) -> Option<String>;

    /// Snapshot generation, changes whenever the underlying data does
    fn generation(&self) -> u64;
}

/// In-memory catalog snapshot
#[derive(Debug)]
pub struct Catalog {
    films: Vec<Film>,
    title_index: HashMap<String, usize>,
    generation: u64,
}

impl Catalog {
    /// Creates a catalog from already sanitized films
    ///
    /// Duplicate normalized titles resolve to the first film in order. Films
    /// with an empty title are kept but cannot be looked up by title.
    pub fn new(films: Vec<Film>) -> Self {
        let mut title_index = HashMap::with_capacity(films.len());
        for (position, film) in films.iter().enumerate() {
            if film.normalized_title.is_empty() {
                continue;
            }
            title_index
                .entry(film.normalized_title.clone())
                .or_insert(position);
        }

        Self {
            films,
            title_index,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Film> {
        self.films.get(position)
    }

    /// Finds the first film matching a raw (un-normalized) title
    pub fn find_by_title(&self, raw_title: &str) -> Option<&Film> {
        self.resolve_by_normalized_title(&normalize_title(raw_title))
            .and_then(|position| self.films.get(position))
    }
}

impl CatalogStore for Catalog {
    fn resolve_by_normalized_title(&self, normalized: &str) -> Option<usize> {
        self.title_index.get(normalized).copied()
    }

    fn synopses(&self) -> Vec<String> {
        self.films.iter().map(|film| film.overview.clone()).collect()
    }

    fn identifiers(&self) -> Vec<FilmId> {
        self.films.iter().map(|film| film.id).collect()
    }

    fn display_title(&self, position: usize) -> Option<String> {
        self.films.get(position).map(|film| film.title.clone())
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Film::new(1, "Amélie", "A shy waitress in Paris"),
            Film::new(2, "Heat", "A thief and a detective"),
            Film::new(3, "HEAT", "A remake nobody asked for"),
            Film::new(4, "", "Untitled"),
        ])
    }

    #[test]
    fn test_resolve_is_case_and_accent_insensitive() {
        let catalog = sample_catalog();
        assert_eq!(catalog.find_by_title("amelie").map(|f| f.id), Some(FilmId(1)));
        assert_eq!(catalog.find_by_title("AMÉLIE").map(|f| f.id), Some(FilmId(1)));
    }

    #[test]
    fn test_resolve_transliterates_letters() {
        let catalog = Catalog::new(vec![Film::new(10, "Æon Flux", "A secret agent in a walled city")]);
        assert_eq!(catalog.find_by_title("aeon flux").map(|f| f.id), Some(FilmId(10)));
        assert_eq!(catalog.find_by_title("ÆON FLUX").map(|f| f.id), Some(FilmId(10)));
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first() {
        let catalog = sample_catalog();
        assert_eq!(catalog.resolve_by_normalized_title("heat"), Some(1));
    }

    #[test]
    fn test_empty_title_is_not_resolvable() {
        let catalog = sample_catalog();
        assert_eq!(catalog.resolve_by_normalized_title(""), None);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_synopses_and_identifiers_are_aligned() {
        let catalog = sample_catalog();
        let synopses = catalog.synopses();
        let ids = catalog.identifiers();
        assert_eq!(synopses.len(), ids.len());
        assert_eq!(ids[1], FilmId(2));
        assert_eq!(synopses[1], "A thief and a detective");
        assert_eq!(catalog.display_title(2).as_deref(), Some("HEAT"));
        assert_eq!(catalog.display_title(99), None);
    }

    #[test]
    fn test_each_snapshot_has_its_own_generation() {
        let first = sample_catalog();
        let second = sample_catalog();
        assert_ne!(first.generation(), second.generation());
    }
}
