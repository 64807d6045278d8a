//! CSV ingestion
//!
//! All type coercion happens here. Missing or unparseable numbers become
//! zero, missing strings become empty, and unparseable dates become `None`.
//! The cast/crew literals are parsed exactly once per row.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::{literal, normalize_title, Catalog};
use crate::models::{CastMember, CrewMember, Film, FilmId};

/// Raw row of the movies file, before sanitizing
#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    release_year: Option<String>,
    #[serde(default)]
    popularity: Option<String>,
    #[serde(default)]
    vote_count: Option<String>,
    #[serde(default)]
    vote_average: Option<String>,
    #[serde(default)]
    budget: Option<String>,
    #[serde(default)]
    revenue: Option<String>,
}

/// Raw row of the credits file
#[derive(Debug, Deserialize)]
struct CreditsRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    cast: Option<String>,
    #[serde(default)]
    crew: Option<String>,
}

/// Cast and crew of a single film
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

/// Loads both CSV files and joins credits onto films by identifier
pub fn load_catalog(
    movies_path: impl AsRef<Path>,
    credits_path: impl AsRef<Path>,
) -> anyhow::Result<Catalog> {
    let movies_path = movies_path.as_ref();
    let credits_path = credits_path.as_ref();

    let movies_file = File::open(movies_path)
        .with_context(|| format!("Failed to open movies file {}", movies_path.display()))?;
    let credits_file = File::open(credits_path)
        .with_context(|| format!("Failed to open credits file {}", credits_path.display()))?;

    let mut films = load_movies(movies_file)
        .with_context(|| format!("Failed to read movies file {}", movies_path.display()))?;
    let mut credits = load_credits(credits_file)
        .with_context(|| format!("Failed to read credits file {}", credits_path.display()))?;

    let mut with_credits = 0usize;
    for film in films.iter_mut() {
        if let Some(entry) = credits.remove(&film.id) {
            film.cast = entry.cast;
            film.crew = entry.crew;
            with_credits += 1;
        }
    }

    tracing::info!(
        films = films.len(),
        with_credits,
        orphan_credits = credits.len(),
        "Catalog loaded"
    );

    Ok(Catalog::new(films))
}

/// Reads the movies CSV into sanitized films, in file order
pub fn load_movies<R: Read>(reader: R) -> anyhow::Result<Vec<Film>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut films = Vec::new();

    for (line, row) in csv_reader.deserialize::<MovieRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed movies row {}", line + 1))?;

        let Some(id) = parse_id(row.id.as_deref()) else {
            tracing::warn!(row = line + 1, id = ?row.id, "Skipping movie with invalid id");
            continue;
        };

        films.push(sanitize_movie(id, row));
    }

    Ok(films)
}

/// Reads the credits CSV into cast/crew keyed by film identifier
///
/// A malformed cast or crew literal only empties that list.
pub fn load_credits<R: Read>(reader: R) -> anyhow::Result<HashMap<FilmId, Credits>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut credits = HashMap::new();

    for (line, row) in csv_reader.deserialize::<CreditsRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed credits row {}", line + 1))?;

        let Some(id) = parse_id(row.id.as_deref()) else {
            tracing::warn!(row = line + 1, id = ?row.id, "Skipping credits with invalid id");
            continue;
        };

        let cast = literal::parse_cast(row.cast.as_deref().unwrap_or_default()).unwrap_or_else(|e| {
            tracing::warn!(film_id = %id, error = %e, "Unparseable cast list");
            Vec::new()
        });
        let crew = literal::parse_crew(row.crew.as_deref().unwrap_or_default()).unwrap_or_else(|e| {
            tracing::warn!(film_id = %id, error = %e, "Unparseable crew list");
            Vec::new()
        });

        credits.entry(id).or_insert(Credits { cast, crew });
    }

    Ok(credits)
}

fn sanitize_movie(id: FilmId, row: MovieRow) -> Film {
    let title = row.title.unwrap_or_default();
    let release_date = row.release_date.as_deref().and_then(parse_date);
    let release_year = row
        .release_year
        .as_deref()
        .map(parse_number)
        .filter(|year| *year > 0.0)
        .map(|year| year as i32)
        .or_else(|| release_date.map(|date| date.year()));

    Film {
        id,
        normalized_title: normalize_title(&title),
        title,
        overview: row.overview.unwrap_or_default(),
        release_date,
        release_year,
        popularity: row.popularity.as_deref().map(parse_number).unwrap_or_default(),
        vote_count: row
            .vote_count
            .as_deref()
            .map(parse_number)
            .map(|count| count.max(0.0) as u64)
            .unwrap_or_default(),
        vote_average: row.vote_average.as_deref().map(parse_number).unwrap_or_default(),
        budget: row.budget.as_deref().map(parse_number).unwrap_or_default(),
        revenue: row.revenue.as_deref().map(parse_number).unwrap_or_default(),
        cast: Vec::new(),
        crew: Vec::new(),
    }
}

fn parse_id(raw: Option<&str>) -> Option<FilmId> {
    let raw = raw?.trim();
    raw.parse::<u64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as u64)
        })
        .map(FilmId)
}

/// Parses a number, mapping garbage and non-finite values to zero
fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
