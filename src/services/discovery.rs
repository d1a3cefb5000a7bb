use crate::{
    artifacts::MovieCatalog,
    error::{AppError, AppResult},
    models::Movie,
    services::{fuzzy, RESULT_LIMIT},
};

/// Minimum fuzzy score for an actor query to resolve to a known cast member
pub const ACTOR_MATCH_CUTOFF: u8 = 80;

/// Share of a genre's movies whose vote count sets the inclusion threshold
pub const GENRE_VOTE_QUANTILE: f64 = 0.70;

/// Sorts by `vote_average` descending, keeping catalog order on ties
fn top_rated(mut movies: Vec<&Movie>) -> Vec<String> {
    movies.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
    movies
        .into_iter()
        .take(RESULT_LIMIT)
        .map(|m| m.title.clone())
        .collect()
}

/// Linearly interpolated quantile of `values`, `None` when empty
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Best-rated movies featuring the cast member closest to `query`
pub fn movies_for_actor(catalog: &MovieCatalog, query: &str) -> AppResult<Vec<String>> {
    let best = fuzzy::extract_one(query, catalog.actor_names(), ACTOR_MATCH_CUTOFF).ok_or_else(
        || AppError::NotFound(format!("Actor '{}' not found. No close match.", query)),
    )?;

    let name_lower = best.choice.to_lowercase();
    let movies: Vec<&Movie> = catalog
        .movies()
        .iter()
        .filter(|m| m.has_cast_member(&name_lower))
        .collect();

    if movies.is_empty() {
        return Err(AppError::NotFound(format!(
            "Movies for actor '{}' not found.",
            best.choice
        )));
    }

    let matched_movies = movies.len();
    let titles = top_rated(movies);

    tracing::info!(
        query = %query,
        matched = %best.choice,
        score = best.score,
        matched_movies,
        results = titles.len(),
        "Actor movies computed"
    );

    Ok(titles)
}

/// Best-rated movies of a genre among those with enough votes
///
/// The genre name matches exactly, ignoring case. Only movies whose vote count
/// reaches the genre's 70th percentile are ranked.
pub fn movies_for_genre(catalog: &MovieCatalog, genre: &str) -> AppResult<Vec<String>> {
    let genre_lower = genre.trim().to_lowercase();
    let movies: Vec<&Movie> = catalog
        .movies()
        .iter()
        .filter(|m| m.has_genre(&genre_lower))
        .collect();

    let vote_counts: Vec<f64> = movies.iter().map(|m| m.vote_count).collect();
    let Some(min_votes) = quantile(&vote_counts, GENRE_VOTE_QUANTILE) else {
        return Err(AppError::NotFound(format!("Genre '{}' not found.", genre)));
    };

    let matched_movies = movies.len();
    let qualified: Vec<&Movie> = movies
        .into_iter()
        .filter(|m| m.vote_count >= min_votes)
        .collect();
    let titles = top_rated(qualified);

    tracing::info!(
        genre = %genre,
        matched_movies,
        min_votes,
        results = titles.len(),
        "Genre movies computed"
    );

    Ok(titles)
}
