use chrono::NaiveDate;
use serde::Serialize;

mod film;

pub use film::{CastMember, CrewMember, Film, FilmId};

// ============================================================================
// Release-date counts
// ============================================================================

/// Number of films released in a given month (any year)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

/// Number of films released on a given day of the month
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayCount {
    pub day: u32,
    pub count: usize,
}

// ============================================================================
// Title lookups
// ============================================================================

/// Popularity score of a single title
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TitleScore {
    pub title: String,
    pub release_year: Option<i32>,
    pub score: f64,
}

/// Vote figures of a single title
///
/// The figures are withheld when the title has too few votes to be meaningful.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TitleVotes {
    pub title: String,
    pub meets_threshold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
}

// ============================================================================
// Cast & crew summaries
// ============================================================================

/// Aggregate financial return over every film an actor appears in
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActorSummary {
    pub actor: String,
    pub film_count: usize,
    pub total_return: f64,
    pub average_return: f64,
}

/// One film in a director's filmography
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DirectorFilm {
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub individual_return: f64,
    pub budget: f64,
    pub revenue: f64,
}

/// A director's filmography with per-film financials
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DirectorSummary {
    pub director: String,
    pub films: Vec<DirectorFilm>,
}

// ============================================================================
// Recommendations
// ============================================================================

/// Films with synopses most similar to the matched title
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    /// Display title of the film the query resolved to
    pub matched_title: String,
    /// Display titles, most similar first
    pub recommendations: Vec<String>,
    /// Set when the matched film has no scoreable terms in its synopsis, so
    /// the list carries no similarity signal
    pub low_confidence: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_votes_omits_figures_below_threshold() {
        let votes = TitleVotes {
            title: "Obscure".to_string(),
            meets_threshold: false,
            vote_count: None,
            vote_average: None,
        };

        let json = serde_json::to_value(&votes).unwrap();
        assert_eq!(json["meets_threshold"], false);
        assert!(json.get("vote_count").is_none());
        assert!(json.get("vote_average").is_none());
    }

    #[test]
    fn test_director_film_serializes_date_as_iso() {
        let film = DirectorFilm {
            title: "Toy Story".to_string(),
            release_date: NaiveDate::from_ymd_opt(1995, 10, 30),
            individual_return: 343_554_033.0,
            budget: 30_000_000.0,
            revenue: 373_554_033.0,
        };

        let json = serde_json::to_value(&film).unwrap();
        assert_eq!(json["release_date"], "1995-10-30");
    }
}
