//! Skill keyword extraction against a fixed vocabulary

use crate::error::{Result, ResumeMatcherError};
use crate::processing::text_processor::TextProcessor;
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// The closed set of recognized skills, in display order.
pub const SKILL_VOCABULARY: [&str; 12] = [
    "python",
    "java",
    "c++",
    "sql",
    "machine learning",
    "data science",
    "communication",
    "teamwork",
    "leadership",
    "html",
    "css",
    "javascript",
];

/// A member of [`SKILL_VOCABULARY`]. Ordered by vocabulary position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Skill(usize);

impl Skill {
    /// Exact lookup of an already-lowercased token.
    pub fn lookup(token: &str) -> Option<Self> {
        SKILL_VOCABULARY
            .iter()
            .position(|skill| *skill == token)
            .map(Skill)
    }

    pub fn name(&self) -> &'static str {
        SKILL_VOCABULARY[self.0]
    }

    pub fn all() -> impl Iterator<Item = Skill> {
        (0..SKILL_VOCABULARY.len()).map(Skill)
    }

    /// Vocabulary entries that span several words.
    pub fn is_phrase(&self) -> bool {
        self.name().contains(' ')
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Skill {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Skill {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Skill::lookup(&name.to_lowercase())
            .ok_or_else(|| serde::de::Error::custom(format!("unknown skill: {}", name)))
    }
}

/// Set of skills; iterates in vocabulary order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<Skill>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill: Skill) -> bool {
        self.0.insert(skill)
    }

    pub fn contains(&self, skill: Skill) -> bool {
        self.0.contains(&skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Skill> + '_ {
        self.0.iter().copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|s| s.name()).collect()
    }

    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        self.0.intersection(&other.0).copied().collect()
    }

    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        self.0.difference(&other.0).copied().collect()
    }
}

impl FromIterator<Skill> for SkillSet {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        SkillSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = Skill;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Skill>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// Finds vocabulary skills in text.
///
/// By default every token is compared on its own, which means the
/// multi-word entries ("machine learning", "data science") can never
/// match. Phrase matching is an explicit opt-in that also scans the
/// whitespace-normalized text for whole vocabulary phrases.
pub struct SkillMatcher {
    processor: TextProcessor,
    phrase_matcher: Option<AhoCorasick>,
}

impl SkillMatcher {
    /// Single-token matcher.
    pub fn new(processor: TextProcessor) -> Self {
        Self {
            processor,
            phrase_matcher: None,
        }
    }

    /// Matcher that also recognizes multi-word vocabulary entries.
    pub fn with_phrase_matching(processor: TextProcessor) -> Result<Self> {
        let phrase_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(SKILL_VOCABULARY)
            .map_err(|e| {
                ResumeMatcherError::Configuration(format!("Failed to build phrase matcher: {}", e))
            })?;

        Ok(Self {
            processor,
            phrase_matcher: Some(phrase_matcher),
        })
    }

    pub fn phrase_matching(&self) -> bool {
        self.phrase_matcher.is_some()
    }

    pub fn processor(&self) -> &TextProcessor {
        &self.processor
    }

    /// Collect every vocabulary skill mentioned in `text`.
    pub fn extract_skills(&self, text: &str) -> SkillSet {
        let mut skills: SkillSet = self
            .processor
            .word_tokens(text)
            .iter()
            .filter_map(|token| Skill::lookup(token))
            .collect();

        if let Some(matcher) = &self.phrase_matcher {
            for skill in Self::find_phrases(matcher, text) {
                skills.insert(skill);
            }
        }

        skills
    }

    fn find_phrases(matcher: &AhoCorasick, text: &str) -> Vec<Skill> {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

        matcher
            .find_iter(&normalized)
            .filter(|m| {
                let before = normalized[..m.start()].chars().next_back();
                let after = normalized[m.end()..].chars().next();
                !before.map_or(false, Self::is_word_char) && !after.map_or(false, Self::is_word_char)
            })
            .map(|m| Skill(m.pattern().as_usize()))
            .collect()
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '+' || c == '#' || c == '_'
    }
}
