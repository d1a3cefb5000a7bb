pub mod discovery;
pub mod fuzzy;
pub mod posters;
pub mod providers;
pub mod recommendations;

/// Number of titles returned by every recommendation endpoint
pub const RESULT_LIMIT: usize = 5;
