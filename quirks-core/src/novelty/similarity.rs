//! Similarity policies used to judge whether a candidate repeats the
//! previously accepted character

use std::collections::HashMap;

use crate::character::CharacterTraits;

/// Default score at or above which two characters count as repeats
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.55;

/// Dice scores live in `0.0..=1.0`; a threshold of 0 flags every candidate
/// and one above 1 flags none
pub fn is_valid_threshold(threshold: f64) -> bool {
    threshold.is_finite() && threshold > 0.0 && threshold <= 1.0
}

/// How a candidate is compared against the last accepted character
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimilarityPolicy {
    /// Roles are identical strings
    Exact,
    /// Last word of each role matches, ignoring case ("night baker" ~ "Baker")
    CoreNoun,
    /// Bigram Dice score of all three fields reaches `threshold` (inclusive)
    Fuzzy { threshold: f64 },
}

impl Default for SimilarityPolicy {
    fn default() -> Self {
        SimilarityPolicy::Fuzzy {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl SimilarityPolicy {
    /// Resolve a policy by its configuration name
    pub fn from_name(name: &str, threshold: f64) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "exact" => Some(SimilarityPolicy::Exact),
            "core_noun" | "core-noun" => Some(SimilarityPolicy::CoreNoun),
            "fuzzy" => Some(SimilarityPolicy::Fuzzy { threshold }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SimilarityPolicy::Exact => "exact",
            SimilarityPolicy::CoreNoun => "core_noun",
            SimilarityPolicy::Fuzzy { .. } => "fuzzy",
        }
    }

    pub fn too_similar(&self, candidate: &CharacterTraits, last: &CharacterTraits) -> bool {
        match self {
            SimilarityPolicy::Exact => candidate.role == last.role,
            SimilarityPolicy::CoreNoun => {
                let noun = core_noun(&candidate.role);
                !noun.is_empty() && noun == core_noun(&last.role)
            }
            SimilarityPolicy::Fuzzy { threshold } => {
                dice_coefficient(&candidate.combined(), &last.combined()) >= *threshold
            }
        }
    }
}

/// Final whitespace-delimited token of a role, lower-cased
pub fn core_noun(role: &str) -> String {
    role.split_whitespace()
        .last()
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Sørensen–Dice coefficient over character bigrams
///
/// Whitespace is ignored and comparison is case-insensitive. Returns a
/// score in `0.0..=1.0`; identical inputs score 1.0 and inputs shorter
/// than one bigram score 0.0 unless identical.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1]))
            && *count > 0
        {
            *count -= 1;
            intersection += 1;
        }
    }

    (2 * intersection) as f64 / ((a.len() - 1) + (b.len() - 1)) as f64
}

fn normalize(s: &str) -> Vec<char> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
