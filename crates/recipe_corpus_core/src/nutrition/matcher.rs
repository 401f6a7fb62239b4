//! Tiered title-to-index matching.
//!
//! # Responsibility
//! - Resolve a recipe title to one nutrition index entry.
//! - Report which tier produced the match and how confident it is.
//!
//! # Invariants
//! - Tiers run in order; the first tier that matches wins.
//! - A title that normalizes to an empty string never matches.
//! - Tier results are deterministic for a given index.

use crate::nutrition::index::{IndexEntry, NutritionIndex};
use crate::nutrition::normalize::normalize_name;
use std::fmt::{Display, Formatter};

/// Generic trailing phrases removed by the suffix-stripped tier.
pub const GENERIC_TITLE_SUFFIXES: &[&str] = &["recipe", "recipes", "casserole", "dish"];

const EXACT_CONFIDENCE: f64 = 1.0;
const SUFFIX_STRIPPED_CONFIDENCE: f64 = 0.9;
const SUBSTRING_CONFIDENCE_CEILING: f64 = 0.5;

/// Matching tier that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    Exact,
    SuffixStripped,
    Substring,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::SuffixStripped => "suffix_stripped",
            Self::Substring => "substring",
        }
    }
}

impl Display for MatchTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pluggable matching strategy.
///
/// `normalized_title` is already passed through `normalize_name` and is
/// never empty.
pub trait MatchStrategy {
    fn tier(&self) -> MatchTier;

    /// Returns the matched entry and a confidence in `(0, 1]`.
    fn find<'a>(
        &self,
        normalized_title: &str,
        index: &'a NutritionIndex,
    ) -> Option<(&'a IndexEntry, f64)>;
}

/// Tier 1: direct lookup of the normalized title.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactStrategy;

impl MatchStrategy for ExactStrategy {
    fn tier(&self) -> MatchTier {
        MatchTier::Exact
    }

    fn find<'a>(
        &self,
        normalized_title: &str,
        index: &'a NutritionIndex,
    ) -> Option<(&'a IndexEntry, f64)> {
        index
            .get(normalized_title)
            .map(|entry| (entry, EXACT_CONFIDENCE))
    }
}

/// Tier 2: strip generic trailing phrases, then look up directly.
#[derive(Debug, Clone)]
pub struct SuffixStrippedStrategy {
    suffixes: Vec<String>,
}

impl Default for SuffixStrippedStrategy {
    fn default() -> Self {
        Self::new(GENERIC_TITLE_SUFFIXES.iter().copied())
    }
}

impl SuffixStrippedStrategy {
    /// Builds a strategy from trailing phrases; phrases are normalized and
    /// blank ones ignored.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = suffixes
            .into_iter()
            .map(|suffix| normalize_name(suffix.as_ref()))
            .filter(|suffix| !suffix.is_empty())
            .collect();
        Self { suffixes }
    }

    /// Removes trailing generic phrases as whole words, repeatedly.
    ///
    /// Never strips the title down to nothing: `"dish"` stays `"dish"`.
    pub fn strip<'t>(&self, normalized_title: &'t str) -> &'t str {
        let mut current = normalized_title;
        loop {
            let next = self.suffixes.iter().find_map(|suffix| {
                current
                    .strip_suffix(suffix.as_str())
                    .and_then(|rest| rest.strip_suffix(' '))
                    .map(str::trim_end)
                    .filter(|rest| !rest.is_empty())
            });
            match next {
                Some(rest) => current = rest,
                None => return current,
            }
        }
    }
}

impl MatchStrategy for SuffixStrippedStrategy {
    fn tier(&self) -> MatchTier {
        MatchTier::SuffixStripped
    }

    fn find<'a>(
        &self,
        normalized_title: &str,
        index: &'a NutritionIndex,
    ) -> Option<(&'a IndexEntry, f64)> {
        let stripped = self.strip(normalized_title);
        if stripped == normalized_title {
            return None;
        }
        index
            .get(stripped)
            .map(|entry| (entry, SUFFIX_STRIPPED_CONFIDENCE))
    }
}

/// Tier 3: key contained in the title, or title contained in the key.
///
/// When several keys qualify the longest key wins; equal lengths fall back
/// to index insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringStrategy;

impl MatchStrategy for SubstringStrategy {
    fn tier(&self) -> MatchTier {
        MatchTier::Substring
    }

    fn find<'a>(
        &self,
        normalized_title: &str,
        index: &'a NutritionIndex,
    ) -> Option<(&'a IndexEntry, f64)> {
        let mut best: Option<&IndexEntry> = None;
        for entry in index.iter() {
            let key = entry.key.as_str();
            if !(normalized_title.contains(key) || key.contains(normalized_title)) {
                continue;
            }
            if best.map_or(true, |current| key.len() > current.key.len()) {
                best = Some(entry);
            }
        }

        best.map(|entry| {
            let shorter = entry.key.len().min(normalized_title.len()) as f64;
            let longer = entry.key.len().max(normalized_title.len()) as f64;
            (entry, SUBSTRING_CONFIDENCE_CEILING * shorter / longer)
        })
    }
}

/// Successful match with audit metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionMatch<'a> {
    pub entry: &'a IndexEntry,
    pub tier: MatchTier,
    pub confidence: f64,
    /// Title after normalization, as fed to the strategies.
    pub normalized_title: String,
}

/// Ordered list of match strategies.
pub struct NutritionMatcher {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl Default for NutritionMatcher {
    /// Exact, then suffix-stripped, then substring.
    fn default() -> Self {
        Self::new(vec![
            Box::new(ExactStrategy),
            Box::new(SuffixStrippedStrategy::default()),
            Box::new(SubstringStrategy),
        ])
    }
}

impl NutritionMatcher {
    pub fn new(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Matcher without the substring tier, for audits that reject fuzzy hits.
    pub fn strict() -> Self {
        Self::new(vec![
            Box::new(ExactStrategy),
            Box::new(SuffixStrippedStrategy::default()),
        ])
    }

    /// Tiers in the order they are attempted.
    pub fn tiers(&self) -> Vec<MatchTier> {
        self.strategies
            .iter()
            .map(|strategy| strategy.tier())
            .collect()
    }

    /// Resolves `title` against `index`; pure.
    pub fn match_title<'a>(
        &self,
        title: &str,
        index: &'a NutritionIndex,
    ) -> Option<NutritionMatch<'a>> {
        let normalized_title = normalize_name(title);
        if normalized_title.is_empty() {
            return None;
        }

        self.strategies.iter().find_map(|strategy| {
            strategy
                .find(&normalized_title, index)
                .map(|(entry, confidence)| NutritionMatch {
                    entry,
                    tier: strategy.tier(),
                    confidence,
                    normalized_title: normalized_title.clone(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchTier, NutritionMatcher, SuffixStrippedStrategy};
    use crate::data::nutrition_table::{NutritionTable, NutritionTableEntry};
    use crate::model::nutrition::NutritionFacts;
    use crate::nutrition::index::NutritionIndex;

    fn index_of(names: &[&str]) -> NutritionIndex {
        let entries = names
            .iter()
            .enumerate()
            .map(|(calories, name)| NutritionTableEntry {
                name: (*name).to_string(),
                per_serving: NutritionFacts {
                    calories: (calories as u64).into(),
                    fat_g: 0.into(),
                    protein_g: 0.into(),
                    carbs_g: 0.into(),
                    cholesterol_mg: 0.into(),
                    sodium_mg: 0.into(),
                },
            })
            .collect();
        NutritionIndex::build(&[NutritionTable::new("test", "test table", entries)])
    }

    #[test]
    fn strip_removes_whole_trailing_words_only() {
        let strategy = SuffixStrippedStrategy::default();
        assert_eq!(strategy.strip("caramel apples recipe"), "caramel apples");
        assert_eq!(strategy.strip("tuna casserole dish"), "tuna");
        assert_eq!(strategy.strip("radish"), "radish");
        assert_eq!(strategy.strip("dish"), "dish");
        assert_eq!(strategy.strip("side dish recipes"), "side");
    }

    #[test]
    fn exact_tier_wins_over_later_tiers() {
        let index = index_of(&["caramel apples"]);
        let matched = NutritionMatcher::default()
            .match_title("Caramel Apples", &index)
            .unwrap();
        assert_eq!(matched.tier, MatchTier::Exact);
        assert_eq!(matched.confidence, 1.0);
    }

    #[test]
    fn suffix_tier_resolves_generic_trailing_phrase() {
        let index = index_of(&["caramel apples"]);
        let matched = NutritionMatcher::default()
            .match_title("Caramel Apples Recipe", &index)
            .unwrap();
        assert_eq!(matched.tier, MatchTier::SuffixStripped);
        assert_eq!(matched.entry.key, "caramel apples");
    }

    #[test]
    fn substring_tier_prefers_longest_key_then_insertion_order() {
        let index = index_of(&["pie", "apple pie", "pumpkin pie"]);
        let matched = NutritionMatcher::default()
            .match_title("Grandma's Dutch Apple Pie", &index)
            .unwrap();
        assert_eq!(matched.tier, MatchTier::Substring);
        assert_eq!(matched.entry.key, "apple pie");

        let tied = index_of(&["lemon bars", "mocha bars"]);
        let matched = NutritionMatcher::default()
            .match_title("bars", &tied)
            .unwrap();
        assert_eq!(matched.entry.key, "lemon bars");
        assert!(matched.confidence < 0.5);
    }

    #[test]
    fn empty_title_and_strict_matcher_do_not_match() {
        let index = index_of(&["caramel apples"]);
        assert!(NutritionMatcher::default()
            .match_title("!!!", &index)
            .is_none());
        assert!(NutritionMatcher::strict()
            .match_title("Spiced Caramel Apples", &index)
            .is_none());
        assert_eq!(
            NutritionMatcher::strict().tiers(),
            vec![MatchTier::Exact, MatchTier::SuffixStripped]
        );
    }
}
