use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stable catalog identifier of a film
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilmId(pub u64);

impl Display for FilmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A member of a film's cast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: String,
}

/// A member of a film's crew
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
    pub department: String,
}

impl CrewMember {
    /// Whether this crew member directed the film
    pub fn is_director(&self) -> bool {
        self.job.eq_ignore_ascii_case("director")
    }
}

/// A sanitized film record
///
/// Every field is filled in at ingestion: missing strings are empty, missing
/// or non-finite numbers are zero. Nothing downstream has to deal with gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    /// Lower-cased, accent-stripped title used as the lookup key
    pub normalized_title: String,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub popularity: f64,
    pub vote_count: u64,
    pub vote_average: f64,
    pub budget: f64,
    pub revenue: f64,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Film {
    /// Creates a film with only identity, title and synopsis set
    pub fn new(id: u64, title: impl Into<String>, overview: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: FilmId(id),
            normalized_title: crate::catalog::normalize_title(&title),
            title,
            overview: overview.into(),
            release_date: None,
            release_year: None,
            popularity: 0.0,
            vote_count: 0,
            vote_average: 0.0,
            budget: 0.0,
            revenue: 0.0,
            cast: Vec::new(),
            crew: Vec::new(),
        }
    }

    /// Revenue to budget ratio, zero when the budget is unknown
    pub fn return_ratio(&self) -> f64 {
        if self.budget > 0.0 {
            self.revenue / self.budget
        } else {
            0.0
        }
    }

    /// Absolute profit, never negative
    pub fn profit(&self) -> f64 {
        (self.revenue - self.budget).max(0.0)
    }

    pub fn has_actor(&self, normalized_name: &str) -> bool {
        self.cast
            .iter()
            .any(|member| crate::catalog::normalize_title(&member.name) == normalized_name)
    }

    pub fn has_director(&self, normalized_name: &str) -> bool {
        self.crew.iter().any(|member| {
            member.is_director() && crate::catalog::normalize_title(&member.name) == normalized_name
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_film_normalizes_title() {
        let film = Film::new(1, "Amélie", "A shy waitress");
        assert_eq!(film.normalized_title, "amelie");
        assert_eq!(film.id, FilmId(1));
    }

    #[test]
    fn test_return_ratio_with_zero_budget() {
        let mut film = Film::new(1, "Toy Story", "");
        film.revenue = 1000.0;
        assert_eq!(film.return_ratio(), 0.0);

        film.budget = 250.0;
        assert_eq!(film.return_ratio(), 4.0);
    }

    #[test]
    fn test_profit_never_negative() {
        let mut film = Film::new(1, "Flop", "");
        film.budget = 100.0;
        film.revenue = 40.0;
        assert_eq!(film.profit(), 0.0);
    }

    #[test]
    fn test_director_job_is_case_insensitive() {
        let mut film = Film::new(1, "Toy Story", "");
        film.crew.push(CrewMember {
            name: "John Lasseter".to_string(),
            job: "DIRECTOR".to_string(),
            department: "Directing".to_string(),
        });
        film.crew.push(CrewMember {
            name: "Joss Whedon".to_string(),
            job: "Screenplay".to_string(),
            department: "Writing".to_string(),
        });

        assert!(film.has_director("john lasseter"));
        assert!(!film.has_director("joss whedon"));
    }

    #[test]
    fn test_film_id_serializes_transparently() {
        let json = serde_json::to_string(&FilmId(862)).unwrap();
        assert_eq!(json, "862");
    }
}
