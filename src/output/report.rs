//! Report structures handed to the formatters

use crate::processing::analyzer::{AnalysisOutcome, ScoreOutcome};
use crate::processing::gap_analyzer::Suggestion;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Display-ready view of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Truncated extracted text of both documents
    pub previews: TextPreviews,

    /// Skills found in each document, in vocabulary order
    pub resume_skills: Vec<String>,
    pub job_skills: Vec<String>,

    /// Matched / missing overview
    pub overview: SkillOverview,

    /// TF-IDF match percentage, or why it could not be computed
    pub score: ScoreOutcome,

    pub suggestion: SuggestionView,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPreviews {
    pub resume: String,
    pub job: String,
    pub resume_extraction_failed: bool,
    pub job_extraction_failed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillOverview {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub matched_count: usize,
    pub missing_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionView {
    pub message: String,
    pub skills_to_add: Vec<String>,
    pub all_covered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub matcher_version: String,
    pub resume_file: String,
    pub job_file: String,
    pub processing_time_ms: u64,
    pub phrase_matching: bool,
}

impl AnalysisReport {
    pub fn from_outcome(outcome: &AnalysisOutcome, preview_chars: usize, phrase_matching: bool) -> Self {
        let to_strings = |names: Vec<&'static str>| -> Vec<String> {
            names.into_iter().map(String::from).collect()
        };

        let suggestion = outcome.result.suggestion();
        let suggestion = SuggestionView {
            message: suggestion.message().to_string(),
            skills_to_add: match &suggestion {
                Suggestion::AddSkills { skills } => to_strings(skills.names()),
                Suggestion::AllCovered => Vec::new(),
            },
            all_covered: matches!(suggestion, Suggestion::AllCovered),
        };

        Self {
            previews: TextPreviews {
                resume: truncate_text(outcome.resume_text.as_str(), preview_chars),
                job: truncate_text(outcome.job_text.as_str(), preview_chars),
                resume_extraction_failed: outcome.resume_text.is_failure(),
                job_extraction_failed: outcome.job_text.is_failure(),
            },
            resume_skills: to_strings(outcome.resume_skills.names()),
            job_skills: to_strings(outcome.job_skills.names()),
            overview: SkillOverview {
                matched_skills: to_strings(outcome.result.matched.names()),
                missing_skills: to_strings(outcome.result.missing.names()),
                matched_count: outcome.result.matched.len(),
                missing_count: outcome.result.missing.len(),
            },
            score: outcome.result.score.clone(),
            suggestion,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                matcher_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: outcome.resume_name.clone(),
                job_file: outcome.job_name.clone(),
                processing_time_ms: outcome.processing_time_ms,
                phrase_matching,
            },
        }
    }

    /// "NN.NN%" or the failure reason.
    pub fn score_label(&self) -> String {
        match &self.score {
            ScoreOutcome::Scored { percentage } => format!("{:.2}%", percentage),
            ScoreOutcome::Failed { reason } => format!("unavailable ({})", reason),
        }
    }
}

/// Truncate to at most `max_chars` characters, appending "..." when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
