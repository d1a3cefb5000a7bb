use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Learned bias and latent factors for one user or item
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FactorEntry {
    pub bias: f64,
    pub factors: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct CollaborativeModelFile {
    global_mean: f64,
    rating_scale: (f64, f64),
    users: HashMap<i64, FactorEntry>,
    items: HashMap<i64, FactorEntry>,
}

/// Matrix-factorisation rating predictor
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "CollaborativeModelFile")]
pub struct CollaborativeModel {
    global_mean: f64,
    rating_scale: (f64, f64),
    users: HashMap<i64, FactorEntry>,
    items: HashMap<i64, FactorEntry>,
}

impl TryFrom<CollaborativeModelFile> for CollaborativeModel {
    type Error = String;

    fn try_from(file: CollaborativeModelFile) -> Result<Self, Self::Error> {
        Self::new(file.global_mean, file.rating_scale, file.users, file.items)
    }
}

impl CollaborativeModel {
    pub fn new(
        global_mean: f64,
        rating_scale: (f64, f64),
        users: HashMap<i64, FactorEntry>,
        items: HashMap<i64, FactorEntry>,
    ) -> Result<Self, String> {
        if rating_scale.0 > rating_scale.1 {
            return Err(format!(
                "rating scale lower bound {} exceeds upper bound {}",
                rating_scale.0, rating_scale.1
            ));
        }

        let mut dims = users.values().chain(items.values()).map(|e| e.factors.len());
        if let Some(first) = dims.next() {
            if dims.any(|d| d != first) {
                return Err("factor vectors must all have the same length".to_string());
            }
        }

        Ok(Self {
            global_mean,
            rating_scale,
            users,
            items,
        })
    }

    /// Estimated rating of `movie_id` by `user_id`, clipped to the rating scale
    ///
    /// Bias terms for an unknown user or item are dropped, and the factor
    /// product only applies when both are known.
    pub fn predict(&self, user_id: i64, movie_id: i64) -> f64 {
        let user = self.users.get(&user_id);
        let item = self.items.get(&movie_id);

        let mut est = self.global_mean;
        if let Some(u) = user {
            est += u.bias;
        }
        if let Some(i) = item {
            est += i.bias;
        }
        if let (Some(u), Some(i)) = (user, item) {
            est += u
                .factors
                .iter()
                .zip(&i.factors)
                .map(|(a, b)| a * b)
                .sum::<f64>();
        }

        est.clamp(self.rating_scale.0, self.rating_scale.1)
    }
}

/// One observed rating
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub user_id: i64,
    pub movie_id: i64,
    #[serde(default)]
    pub rating: f64,
}

/// Observed ratings indexed for the unrated-movie scan
#[derive(Debug, Clone, Default)]
pub struct RatingsTable {
    movie_ids: Vec<i64>,
    rated_by_user: HashMap<i64, HashSet<i64>>,
}

impl RatingsTable {
    pub fn new(ratings: Vec<Rating>) -> Self {
        let mut seen = HashSet::new();
        let mut movie_ids = Vec::new();
        let mut rated_by_user: HashMap<i64, HashSet<i64>> = HashMap::new();

        for rating in ratings {
            if seen.insert(rating.movie_id) {
                movie_ids.push(rating.movie_id);
            }
            rated_by_user
                .entry(rating.user_id)
                .or_default()
                .insert(rating.movie_id);
        }

        Self {
            movie_ids,
            rated_by_user,
        }
    }

    pub fn has_user(&self, user_id: i64) -> bool {
        self.rated_by_user.contains_key(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.rated_by_user.len()
    }

    /// Distinct rated movie ids in first-seen order
    pub fn movie_ids(&self) -> &[i64] {
        &self.movie_ids
    }

    /// Movies with at least one rating that `user_id` has not rated
    pub fn unrated_by(&self, user_id: i64) -> impl Iterator<Item = i64> + '_ {
        let rated = self.rated_by_user.get(&user_id);
        self.movie_ids
            .iter()
            .copied()
            .filter(move |id| rated.map_or(true, |r| !r.contains(id)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollaborativeMovie {
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub title: String,
}

/// Everything the collaborative endpoint reads
#[derive(Debug, Clone)]
pub struct CollaborativeData {
    pub model: CollaborativeModel,
    pub ratings: RatingsTable,
    movies: Vec<CollaborativeMovie>,
}

impl CollaborativeData {
    pub fn new(
        model: CollaborativeModel,
        movies: Vec<CollaborativeMovie>,
        ratings: Vec<Rating>,
    ) -> Self {
        Self {
            model,
            ratings: RatingsTable::new(ratings),
            movies,
        }
    }

    /// Titles of every movie row whose id is in `movie_ids`, in movie table order
    pub fn titles_for(&self, movie_ids: &HashSet<i64>) -> Vec<&str> {
        self.movies
            .iter()
            .filter(|m| movie_ids.contains(&m.movie_id))
            .map(|m| m.title.as_str())
            .collect()
    }
}
