use std::collections::HashSet;

use crate::{
    artifacts::{CollaborativeData, ContentModel},
    error::{AppError, AppResult},
    services::{fuzzy, RESULT_LIMIT},
};

/// Minimum fuzzy score for a title query to resolve to a known movie
pub const TITLE_MATCH_CUTOFF: u8 = 75;

/// Movies most similar in content to the best fuzzy match for `query`
///
/// The matched movie itself is never part of the result.
pub fn recommend_similar(content: &ContentModel, query: &str) -> AppResult<Vec<String>> {
    let best = fuzzy::extract_one(query, content.titles(), TITLE_MATCH_CUTOFF).ok_or_else(|| {
        AppError::NotFound(format!("Movie '{}' not found. No close match.", query))
    })?;

    let index = content
        .index_of(best.choice)
        .unwrap_or(best.index);

    let titles: Vec<String> = content
        .most_similar(index, RESULT_LIMIT)
        .into_iter()
        .map(str::to_string)
        .collect();

    tracing::info!(
        query = %query,
        matched = %best.choice,
        score = best.score,
        results = titles.len(),
        "Content recommendations computed"
    );

    Ok(titles)
}

/// Parses the raw `userId` query value
pub fn parse_user_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::InvalidInput("User ID must be an integer.".to_string()))
}

/// Highest-predicted movies the user has not rated yet
///
/// Candidates are every movie with at least one rating. Equal estimates keep
/// the order in which movies first appear in the ratings table. The top ids
/// are reported in movie table order, and ids with no title are dropped.
pub fn recommend_for_user(data: &CollaborativeData, user_id: i64) -> AppResult<Vec<String>> {
    if !data.ratings.has_user(user_id) {
        return Err(AppError::NotFound(format!("User ID {} not found.", user_id)));
    }

    let mut predictions: Vec<(i64, f64)> = data
        .ratings
        .unrated_by(user_id)
        .map(|movie_id| (movie_id, data.model.predict(user_id, movie_id)))
        .collect();
    predictions.sort_by(|a, b| b.1.total_cmp(&a.1));

    let top: HashSet<i64> = predictions
        .iter()
        .take(RESULT_LIMIT)
        .map(|(movie_id, _)| *movie_id)
        .collect();

    let titles: Vec<String> = data
        .titles_for(&top)
        .into_iter()
        .map(str::to_string)
        .collect();

    tracing::info!(
        user_id,
        candidates = predictions.len(),
        results = titles.len(),
        "Collaborative recommendations computed"
    );

    Ok(titles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{CollaborativeModel, CollaborativeMovie, FactorEntry, Rating};
    use std::collections::HashMap;

    fn content() -> ContentModel {
        let titles = ["The Dark Knight", "Batman Begins", "The Dark Knight Rises", "Toy Story", "Up", "Heat", "Ronin"];
        let n = titles.len();
        let mut similarity = vec![vec![0.0f32; n]; n];
        for (i, row) in similarity.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        similarity[0] = vec![1.0, 0.9, 0.95, 0.1, 0.05, 0.3, 0.2];
        ContentModel::new(titles.iter().map(|t| t.to_string()).collect(), similarity).unwrap()
    }

    #[test]
    fn test_recommend_similar_returns_top_five_without_self() {
        let titles = recommend_similar(&content(), "the dark knight").unwrap();
        assert_eq!(
            titles,
            vec!["The Dark Knight Rises", "Batman Begins", "Heat", "Ronin", "Toy Story"]
        );
        assert!(!titles.contains(&"The Dark Knight".to_string()));
    }

    #[test]
    fn test_recommend_similar_tolerates_typos() {
        let titles = recommend_similar(&content(), "batman begns").unwrap();
        assert_eq!(titles.len(), 5);
        assert!(!titles.contains(&"Batman Begins".to_string()));
    }

    #[test]
    fn test_recommend_similar_unknown_title() {
        let err = recommend_similar(&content(), "qwertyuiop").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
        assert_eq!(parse_user_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_user_id("abc"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_user_id("4.5"), Err(AppError::InvalidInput(_))));
    }

    fn collaborative() -> CollaborativeData {
        let item = |bias: f64| FactorEntry {
            bias,
            factors: vec![0.0],
        };
        let model = CollaborativeModel::new(
            3.0,
            (0.5, 5.0),
            HashMap::from([(1, FactorEntry { bias: 0.0, factors: vec![0.0] })]),
            HashMap::from([
                (10, item(0.1)),
                (20, item(0.9)),
                (30, item(0.5)),
                (40, item(0.5)),
                (50, item(-0.5)),
                (60, item(0.7)),
                (70, item(0.2)),
                (80, item(1.0)),
            ]),
        )
        .unwrap();

        let movies = [(10, "A"), (20, "B"), (30, "C"), (40, "D"), (50, "E"), (60, "F"), (70, "G")]
            .into_iter()
            .map(|(movie_id, title)| CollaborativeMovie {
                movie_id,
                title: title.to_string(),
            })
            .collect();

        let rating = |user_id, movie_id| Rating {
            user_id,
            movie_id,
            rating: 4.0,
        };
        let ratings = vec![
            rating(1, 20),
            rating(2, 10),
            rating(2, 30),
            rating(2, 40),
            rating(2, 50),
            rating(2, 60),
            rating(2, 70),
            rating(2, 80),
        ];

        CollaborativeData::new(model, movies, ratings)
    }

    #[test]
    fn test_recommend_for_user_picks_top_estimates() {
        let titles = recommend_for_user(&collaborative(), 1).unwrap();
        // top five are 80, 60, 30, 40, 70; 80 has no title, 10 and 50 miss the cut
        assert_eq!(titles, vec!["C", "D", "F", "G"]);
        assert!(!titles.contains(&"B".to_string()));
    }

    #[test]
    fn test_recommend_for_user_reports_movie_table_order() {
        let model = CollaborativeModel::new(
            3.0,
            (0.5, 5.0),
            HashMap::from([(1, FactorEntry { bias: 0.0, factors: vec![0.0] })]),
            HashMap::from([
                (10, FactorEntry { bias: 0.1, factors: vec![0.0] }),
                (20, FactorEntry { bias: 0.9, factors: vec![0.0] }),
            ]),
        )
        .unwrap();
        let movies = vec![
            CollaborativeMovie { movie_id: 10, title: "A".to_string() },
            CollaborativeMovie { movie_id: 20, title: "B".to_string() },
        ];
        let ratings = vec![
            Rating { user_id: 1, movie_id: 30, rating: 4.0 },
            Rating { user_id: 2, movie_id: 20, rating: 4.0 },
            Rating { user_id: 2, movie_id: 10, rating: 4.0 },
        ];
        let data = CollaborativeData::new(model, movies, ratings);

        // 20 is predicted higher but 10 comes first in the movie table
        assert_eq!(recommend_for_user(&data, 1).unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_recommend_for_user_unknown_user() {
        let err = recommend_for_user(&collaborative(), 999).unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("999")));
    }
}
