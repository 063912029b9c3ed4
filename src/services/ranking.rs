use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::models::MovieSummary;

/// Group name for results without an original language
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// `vote_average * ln(vote_count + k)`
pub fn score(movie: &MovieSummary, k: f64) -> f64 {
    movie.vote_average * (movie.vote_count as f64 + k).ln()
}

/// Drops poster-less entries and duplicate ids, then orders by descending score.
///
/// The first occurrence of an id is kept. Equal scores are ordered by id.
pub fn rank(movies: Vec<MovieSummary>, k: f64) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<(f64, MovieSummary)> = movies
        .into_iter()
        .filter(MovieSummary::has_poster)
        .filter(|movie| seen.insert(movie.id))
        .map(|movie| (score(&movie, k), movie))
        .collect();

    ranked.sort_by(|(a_score, a), (b_score, b)| match b_score.total_cmp(a_score) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });

    ranked.into_iter().map(|(_, movie)| movie).collect()
}

/// Groups movies by original language, keeping their relative order
pub fn partition_by_language(movies: Vec<MovieSummary>) -> BTreeMap<String, Vec<MovieSummary>> {
    let mut groups: BTreeMap<String, Vec<MovieSummary>> = BTreeMap::new();
    for movie in movies {
        let language = movie
            .original_language
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());
        groups.entry(language).or_default().push(movie);
    }
    groups
}

/// Keeps movies whose original language is in `languages`. An empty list keeps everything.
pub fn filter_languages(movies: Vec<MovieSummary>, languages: &[String]) -> Vec<MovieSummary> {
    if languages.is_empty() {
        return movies;
    }
    movies
        .into_iter()
        .filter(|movie| {
            movie
                .original_language
                .as_deref()
                .is_some_and(|l| languages.iter().any(|wanted| wanted.eq_ignore_ascii_case(l)))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::MovieSummary;

    pub fn movie(id: u64, vote_average: f64, vote_count: u64, language: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            overview: None,
            poster_path: Some(format!("/poster{}.jpg", id)),
            backdrop_path: None,
            vote_average,
            vote_count,
            popularity: 0.0,
            original_language: Some(language.to_string()),
            release_date: None,
            genre_ids: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::movie;
    use super::*;

    #[test]
    fn test_score_formula() {
        let m = movie(1, 8.0, 99, "en");
        let expected = 8.0 * (100.0f64).ln();
        assert!((score(&m, 1.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_votes_score_zero_with_k_one() {
        assert_eq!(score(&movie(1, 9.5, 0, "en"), 1.0), 0.0);
    }

    #[test]
    fn test_rank_prefers_well_voted_titles() {
        // A 9.0 with 5 votes loses to a 7.5 with 20k votes.
        let ranked = rank(
            vec![movie(1, 9.0, 5, "en"), movie(2, 7.5, 20_000, "en")],
            1.0,
        );
        let ids: Vec<u64> = ranked.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_rank_drops_missing_posters() {
        let mut no_poster = movie(1, 9.0, 1000, "en");
        no_poster.poster_path = None;
        let mut blank_poster = movie(2, 9.0, 1000, "en");
        blank_poster.poster_path = Some(String::new());

        let ranked = rank(vec![no_poster, blank_poster, movie(3, 5.0, 10, "en")], 1.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 3);
    }

    #[test]
    fn test_rank_deduplicates_keeping_first() {
        let mut later = movie(7, 1.0, 1, "en");
        later.title = "duplicate".to_string();

        let ranked = rank(vec![movie(7, 8.0, 500, "en"), later], 1.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Movie 7");
    }

    #[test]
    fn test_rank_ties_ordered_by_id() {
        let ranked = rank(
            vec![movie(30, 7.0, 100, "en"), movie(10, 7.0, 100, "en")],
            1.0,
        );
        let ids: Vec<u64> = ranked.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![10, 30]);
    }

    #[test]
    fn test_partition_by_language() {
        let mut unlabeled = movie(4, 5.0, 10, "");
        unlabeled.original_language = None;

        let groups = partition_by_language(vec![
            movie(1, 5.0, 10, "hi"),
            movie(2, 5.0, 10, "en"),
            movie(3, 5.0, 10, "hi"),
            unlabeled,
        ]);

        assert_eq!(groups.len(), 3);
        let hindi: Vec<u64> = groups["hi"].iter().map(|m| m.id).collect();
        assert_eq!(hindi, vec![1, 3]);
        assert_eq!(groups[UNKNOWN_LANGUAGE][0].id, 4);
    }

    #[test]
    fn test_filter_languages() {
        let movies = vec![movie(1, 5.0, 10, "en"), movie(2, 5.0, 10, "ta")];

        assert_eq!(filter_languages(movies.clone(), &[]).len(), 2);

        let tamil = filter_languages(movies, &["TA".to_string()]);
        assert_eq!(tamil.len(), 1);
        assert_eq!(tamil[0].id, 2);
    }
}
