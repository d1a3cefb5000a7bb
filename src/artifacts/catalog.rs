use std::collections::BTreeSet;

use crate::models::Movie;

/// The full movie table plus the actor-name list used for fuzzy matching
#[derive(Debug, Clone)]
pub struct MovieCatalog {
    movies: Vec<Movie>,
    actor_names: Vec<String>,
}

impl MovieCatalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        let actor_names = movies
            .iter()
            .flat_map(|movie| movie.cast.iter().map(|c| c.name.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            movies,
            actor_names,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Distinct cast names across the catalog, sorted
    pub fn actor_names(&self) -> &[String] {
        &self.actor_names
    }
}
