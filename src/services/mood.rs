//! Mood → genre lookup.
//!
//! Free text is matched against an ordered table: an exact mood name wins,
//! otherwise the first mood whose name or keyword appears anywhere in the text.

use serde::Serialize;

/// TMDB genre ids used when no mood matches (Drama)
pub const DEFAULT_GENRES: &[u32] = &[18];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mood {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub genres: &'static [u32],
}

const MOODS: &[Mood] = &[
    Mood {
        name: "happy",
        keywords: &["cheerful", "joy", "funny", "fun", "laugh", "excited"],
        genres: &[35, 10751, 12], // Comedy, Family, Adventure
    },
    Mood {
        name: "sad",
        keywords: &["down", "cry", "lonely", "heartbroken", "upset"],
        genres: &[18, 10749], // Drama, Romance
    },
    Mood {
        name: "romantic",
        keywords: &["love", "romance", "date night", "crush"],
        genres: &[10749, 18],
    },
    Mood {
        name: "horror",
        keywords: &["scared", "scary", "spooky", "creepy", "fear"],
        genres: &[27],
    },
    Mood {
        name: "action",
        keywords: &["energetic", "pumped", "fight", "adrenaline"],
        genres: &[28, 53], // Action, Thriller
    },
    Mood {
        name: "thriller",
        keywords: &["suspense", "mystery", "tense", "curious"],
        genres: &[53, 9648], // Thriller, Mystery
    },
    Mood {
        name: "adventure",
        keywords: &["explore", "travel", "epic", "fantasy", "magic"],
        genres: &[12, 14], // Adventure, Fantasy
    },
];

/// The full mood table, in match order
pub fn all() -> &'static [Mood] {
    MOODS
}

/// Finds the mood named by `text`, if any
pub fn detect(text: &str) -> Option<&'static Mood> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    MOODS.iter().find(|mood| mood.name == text).or_else(|| {
        MOODS.iter().find(|mood| {
            text.contains(mood.name) || mood.keywords.iter().any(|k| text.contains(k))
        })
    })
}

/// Genre ids for `text`, falling back to [`DEFAULT_GENRES`]
pub fn genres_for(text: &str) -> &'static [u32] {
    detect(text).map(|mood| mood.genres).unwrap_or(DEFAULT_GENRES)
}
