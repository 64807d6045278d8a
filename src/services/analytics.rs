//! Release-date, popularity and cast/crew queries over the catalog

use chrono::Datelike;

use crate::catalog::{normalize_title, Catalog};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActorSummary, DayCount, DirectorFilm, DirectorSummary, Film, MonthCount, TitleScore, TitleVotes,
};

const SPANISH_MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Month number (1-12) for a Spanish or English month name
pub fn parse_month(raw: &str) -> Option<u32> {
    let normalized = normalize_title(raw);
    // "setiembre" is a common Spanish spelling
    if normalized == "setiembre" {
        return Some(9);
    }
    SPANISH_MONTHS
        .iter()
        .position(|m| *m == normalized)
        .or_else(|| ENGLISH_MONTHS.iter().position(|m| *m == normalized))
        .map(|index| index as u32 + 1)
}

/// Number of films released in the given month of any year
pub fn films_by_month(catalog: &Catalog, month: &str) -> AppResult<MonthCount> {
    let number = parse_month(month)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown month: {}", month.trim())))?;

    let count = catalog
        .films()
        .iter()
        .filter_map(|film| film.release_date)
        .filter(|date| date.month() == number)
        .count();

    Ok(MonthCount {
        month: normalize_title(month),
        count,
    })
}

/// Number of films released on the given day of any month
pub fn films_by_day(catalog: &Catalog, day: u32) -> AppResult<DayCount> {
    if !(1..=31).contains(&day) {
        return Err(AppError::InvalidInput(format!(
            "Day must be between 1 and 31, got {}",
            day
        )));
    }

    let count = catalog
        .films()
        .iter()
        .filter_map(|film| film.release_date)
        .filter(|date| date.day() == day)
        .count();

    Ok(DayCount { day, count })
}

pub fn score_by_title(catalog: &Catalog, title: &str) -> AppResult<TitleScore> {
    let film = find_film(catalog, title)?;
    Ok(TitleScore {
        title: film.title.clone(),
        release_year: film.release_year,
        score: film.popularity,
    })
}

/// Vote figures for a title, withheld below `min_votes`
pub fn votes_by_title(catalog: &Catalog, title: &str, min_votes: u64) -> AppResult<TitleVotes> {
    let film = find_film(catalog, title)?;
    let meets_threshold = film.vote_count >= min_votes;

    Ok(TitleVotes {
        title: film.title.clone(),
        meets_threshold,
        vote_count: meets_threshold.then_some(film.vote_count),
        vote_average: meets_threshold.then_some(film.vote_average),
    })
}

pub fn actor_summary(catalog: &Catalog, name: &str) -> AppResult<ActorSummary> {
    let normalized = normalized_name(name)?;
    let films: Vec<&Film> = catalog
        .films()
        .iter()
        .filter(|film| film.has_actor(&normalized))
        .collect();

    if films.is_empty() {
        return Err(AppError::NotFound(format!("Actor not found: {}", name.trim())));
    }

    let total_return: f64 = films.iter().map(|film| film.return_ratio()).sum();
    let film_count = films.len();

    Ok(ActorSummary {
        actor: name.trim().to_string(),
        film_count,
        total_return,
        average_return: total_return / film_count as f64,
    })
}

pub fn director_summary(catalog: &Catalog, name: &str) -> AppResult<DirectorSummary> {
    let normalized = normalized_name(name)?;
    let films: Vec<DirectorFilm> = catalog
        .films()
        .iter()
        .filter(|film| film.has_director(&normalized))
        .map(|film| DirectorFilm {
            title: if film.title.is_empty() {
                "Unknown".to_string()
            } else {
                film.title.clone()
            },
            release_date: film.release_date,
            individual_return: film.profit(),
            budget: film.budget,
            revenue: film.revenue,
        })
        .collect();

    if films.is_empty() {
        return Err(AppError::NotFound(format!("Director not found: {}", name.trim())));
    }

    Ok(DirectorSummary {
        director: name.trim().to_string(),
        films,
    })
}

fn find_film<'a>(catalog: &'a Catalog, title: &str) -> AppResult<&'a Film> {
    catalog
        .find_by_title(title)
        .ok_or_else(|| AppError::NotFound(format!("Film not found: {}", title.trim())))
}

fn normalized_name(name: &str) -> AppResult<String> {
    let normalized = normalize_title(name);
    if normalized.is_empty() {
        return Err(AppError::InvalidInput("Name must not be empty".to_string()));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CastMember, CrewMember};
    use chrono::NaiveDate;

    fn film(id: u64, title: &str, date: (i32, u32, u32)) -> Film {
        let mut film = Film::new(id, title, "");
        film.release_date = NaiveDate::from_ymd_opt(date.0, date.1, date.2);
        film.release_year = Some(date.0);
        film
    }

    fn cast(name: &str) -> CastMember {
        CastMember {
            name: name.to_string(),
            character: String::new(),
        }
    }

    fn crew(name: &str, job: &str) -> CrewMember {
        CrewMember {
            name: name.to_string(),
            job: job.to_string(),
            department: String::new(),
        }
    }

    fn catalog() -> Catalog {
        let mut toy_story = film(862, "Toy Story", (1995, 10, 30));
        toy_story.popularity = 21.9;
        toy_story.vote_count = 5415;
        toy_story.vote_average = 7.7;
        toy_story.budget = 30_000_000.0;
        toy_story.revenue = 373_554_033.0;
        toy_story.cast.push(cast("Tom Hanks"));
        toy_story.crew.push(crew("John Lasseter", "Director"));

        let mut toy_story_2 = film(863, "Toy Story 2", (1999, 10, 30));
        toy_story_2.vote_count = 1500;
        toy_story_2.budget = 90_000_000.0;
        toy_story_2.revenue = 497_366_869.0;
        toy_story_2.cast.push(cast("Tom Hanks"));
        toy_story_2.crew.push(crew("John Lasseter", "director"));

        let mut flop = film(999, "", (2001, 1, 5));
        flop.budget = 100.0;
        flop.revenue = 40.0;
        flop.cast.push(cast("Tom Hanks"));
        flop.crew.push(crew("John Lasseter", "Director"));
        flop.crew.push(crew("Ada Writer", "Screenplay"));

        let mut undated = Film::new(1000, "Undated", "");
        undated.cast.push(cast("Zoë Saldaña"));

        Catalog::new(vec![toy_story, toy_story_2, flop, undated])
    }

    #[test]
    fn test_month_accepts_spanish_and_english() {
        let catalog = catalog();
        assert_eq!(films_by_month(&catalog, "Octubre").unwrap().count, 2);
        assert_eq!(films_by_month(&catalog, "OCTOBER").unwrap().count, 2);
        assert_eq!(films_by_month(&catalog, "enero").unwrap().count, 1);
        assert_eq!(films_by_month(&catalog, "marzo").unwrap().count, 0);
    }

    #[test]
    fn test_unknown_month_is_invalid() {
        assert!(matches!(
            films_by_month(&catalog(), "smarch"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_day_bounds() {
        let catalog = catalog();
        assert_eq!(films_by_day(&catalog, 30).unwrap().count, 2);
        assert!(matches!(films_by_day(&catalog, 0), Err(AppError::InvalidInput(_))));
        assert!(matches!(films_by_day(&catalog, 32), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_score_by_title() {
        let score = score_by_title(&catalog(), "toy story").unwrap();
        assert_eq!(score.title, "Toy Story");
        assert_eq!(score.release_year, Some(1995));
        assert_eq!(score.score, 21.9);
        assert!(matches!(score_by_title(&catalog(), "nope"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_votes_respect_threshold() {
        let catalog = catalog();
        let popular = votes_by_title(&catalog, "Toy Story", 2000).unwrap();
        assert!(popular.meets_threshold);
        assert_eq!(popular.vote_count, Some(5415));
        assert_eq!(popular.vote_average, Some(7.7));

        let sparse = votes_by_title(&catalog, "Toy Story 2", 2000).unwrap();
        assert!(!sparse.meets_threshold);
        assert_eq!(sparse.vote_count, None);

        let lowered = votes_by_title(&catalog, "Toy Story 2", 1000).unwrap();
        assert!(lowered.meets_threshold);
    }

    #[test]
    fn test_actor_summary_sums_return_ratios() {
        let summary = actor_summary(&catalog(), "tom hanks").unwrap();
        assert_eq!(summary.film_count, 3);
        let expected = 373_554_033.0 / 30_000_000.0 + 497_366_869.0 / 90_000_000.0 + 0.4;
        assert!((summary.total_return - expected).abs() < 1e-9);
        assert!((summary.average_return - expected / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_actor_lookup_ignores_accents() {
        let summary = actor_summary(&catalog(), "Zoe Saldana").unwrap();
        assert_eq!(summary.film_count, 1);
        assert_eq!(summary.total_return, 0.0);
    }

    #[test]
    fn test_director_summary_lists_films() {
        let summary = director_summary(&catalog(), "John Lasseter").unwrap();
        assert_eq!(summary.films.len(), 3);
        assert_eq!(summary.films[0].individual_return, 343_554_033.0);
        assert_eq!(summary.films[2].title, "Unknown");
        assert_eq!(summary.films[2].individual_return, 0.0);
    }

    #[test]
    fn test_director_requires_director_job() {
        assert!(matches!(
            director_summary(&catalog(), "Ada Writer"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            director_summary(&catalog(), "  "),
            Err(AppError::InvalidInput(_))
        ));
    }
}
