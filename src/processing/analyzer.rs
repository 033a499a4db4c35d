//! Analysis engine running the full resume/job matching pipeline

use crate::config::AnalysisConfig;
use crate::error::{Result, ResumeMatcherError};
use crate::input::{Document, ExtractedText, InputManager};
use crate::processing::gap_analyzer::{GapAnalyzer, SkillGap, Suggestion};
use crate::processing::similarity::SimilarityScorer;
use crate::processing::skill_matcher::{SkillMatcher, SkillSet};
use crate::processing::text_processor::TextProcessor;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of the similarity stage. Scoring failures are kept distinct
/// from a real score instead of being coerced to a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored { percentage: f64 },
    Failed { reason: String },
}

impl ScoreOutcome {
    pub fn percentage(&self) -> Option<f64> {
        match self {
            ScoreOutcome::Scored { percentage } => Some(*percentage),
            ScoreOutcome::Failed { .. } => None,
        }
    }

    fn from_result(result: Result<f64>) -> Self {
        match result {
            Ok(percentage) => ScoreOutcome::Scored { percentage },
            Err(e) => ScoreOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: SkillSet,
    pub missing: SkillSet,
    pub score: ScoreOutcome,
}

impl MatchResult {
    pub fn suggestion(&self) -> Suggestion {
        SkillGap {
            matched: self.matched.clone(),
            missing: self.missing.clone(),
        }
        .suggestion()
    }
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub resume_name: String,
    pub job_name: String,
    pub resume_text: ExtractedText,
    pub job_text: ExtractedText,
    pub resume_skills: SkillSet,
    pub job_skills: SkillSet,
    pub result: MatchResult,
    pub processing_time_ms: u64,
}

/// Owns the tokenizer and skill matcher for the lifetime of the process
/// and runs one resume/job pair at a time.
pub struct AnalysisEngine {
    input: InputManager,
    skill_matcher: SkillMatcher,
    score_failed_extractions: bool,
}

impl AnalysisEngine {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let processor = TextProcessor::new();
        let skill_matcher = if config.phrase_matching {
            info!("Phrase matching enabled for multi-word skills");
            SkillMatcher::with_phrase_matching(processor)?
        } else {
            SkillMatcher::new(processor)
        };

        Ok(Self {
            input: InputManager::new(),
            skill_matcher,
            score_failed_extractions: config.score_failed_extractions,
        })
    }

    pub fn with_input_manager(mut self, input: InputManager) -> Self {
        self.input = input;
        self
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    /// Extract both uploads and run the rest of the pipeline on them.
    pub fn analyze_documents(&self, resume: &Document, job: &Document) -> AnalysisOutcome {
        let start = Instant::now();

        let resume_text = self.input.extract_text(resume);
        let job_text = self.input.extract_text(job);

        let mut outcome = self.analyze_texts(&resume.name, resume_text, &job.name, job_text);
        outcome.processing_time_ms = start.elapsed().as_millis() as u64;
        outcome
    }

    /// Run skill extraction, gap analysis and scoring on extracted text.
    pub fn analyze_texts(
        &self,
        resume_name: &str,
        resume_text: ExtractedText,
        job_name: &str,
        job_text: ExtractedText,
    ) -> AnalysisOutcome {
        let start = Instant::now();

        let resume_skills = self.skills_for(&resume_text);
        let job_skills = self.skills_for(&job_text);
        debug!(
            "Skills found: resume {:?}, job {:?}",
            resume_skills.names(),
            job_skills.names()
        );

        let gap = GapAnalyzer::analyze(&resume_skills, &job_skills);
        info!(
            "Skill gap: {} matched, {} missing",
            gap.matched.len(),
            gap.missing.len()
        );

        let score = ScoreOutcome::from_result(self.score(&resume_text, &job_text));
        match &score {
            ScoreOutcome::Scored { percentage } => info!("Match score: {:.2}%", percentage),
            ScoreOutcome::Failed { reason } => warn!("Scoring failed: {}", reason),
        }

        AnalysisOutcome {
            resume_name: resume_name.to_string(),
            job_name: job_name.to_string(),
            resume_text,
            job_text,
            resume_skills,
            job_skills,
            result: MatchResult {
                matched: gap.matched,
                missing: gap.missing,
                score,
            },
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn skills_for(&self, text: &ExtractedText) -> SkillSet {
        if text.is_failure() && !self.score_failed_extractions {
            return SkillSet::new();
        }
        self.skill_matcher.extract_skills(text.as_str())
    }

    fn score(&self, resume: &ExtractedText, job: &ExtractedText) -> Result<f64> {
        if !self.score_failed_extractions && (resume.is_failure() || job.is_failure()) {
            return Err(ResumeMatcherError::EmptyCorpus(
                "a document could not be extracted".to_string(),
            ));
        }

        SimilarityScorer::new(self.skill_matcher.processor()).score(resume.as_str(), job.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(&AnalysisConfig::default()).unwrap()
    }

    fn ok(text: &str) -> ExtractedText {
        ExtractedText::from_result(Ok(text.to_string()))
    }

    #[test]
    fn test_end_to_end_texts() {
        let outcome = engine().analyze_texts(
            "resume.txt",
            ok("I know Python and SQL and have leadership experience"),
            "job.txt",
            ok("Looking for Python, Java, and teamwork skills"),
        );

        assert_eq!(outcome.resume_skills.names(), vec!["python", "sql", "leadership"]);
        assert_eq!(outcome.job_skills.names(), vec!["python", "java", "teamwork"]);
        assert_eq!(outcome.result.matched.names(), vec!["python"]);
        assert_eq!(outcome.result.missing.names(), vec!["java", "teamwork"]);

        let score = outcome.result.score.percentage().unwrap();
        assert!(score > 0.0 && score < 100.0);
    }

    #[test]
    fn test_empty_texts_report_scoring_failure() {
        let outcome = engine().analyze_texts("a.txt", ok(""), "b.txt", ok(""));

        assert!(matches!(outcome.result.score, ScoreOutcome::Failed { .. }));
        assert_eq!(outcome.result.suggestion(), Suggestion::AllCovered);
    }

    #[test]
    fn test_failed_extraction_text_is_scored_by_default() {
        let failed = ExtractedText::from_result(Err(ResumeMatcherError::Extraction(
            "python parser crashed".to_string(),
        )));
        let outcome = engine().analyze_texts("r.pdf", failed, "j.txt", ok("python developer"));

        assert!(outcome.resume_text.is_failure());
        assert_eq!(outcome.resume_skills.names(), vec!["python"]);
        assert!(outcome.result.score.percentage().is_some());
    }

    #[test]
    fn test_failed_extraction_can_be_excluded() {
        let config = AnalysisConfig {
            score_failed_extractions: false,
            ..AnalysisConfig::default()
        };
        let engine = AnalysisEngine::new(&config).unwrap();
        let failed = ExtractedText::from_result(Err(ResumeMatcherError::Extraction(
            "python parser crashed".to_string(),
        )));

        let outcome = engine.analyze_texts("r.pdf", failed, "j.txt", ok("python developer"));

        assert!(outcome.resume_skills.is_empty());
        assert_eq!(outcome.result.missing.names(), vec!["python"]);
        assert!(matches!(outcome.result.score, ScoreOutcome::Failed { .. }));
    }

    #[test]
    fn test_analyze_documents_unsupported_format() {
        let resume = Document::new("resume.odt", b"python".to_vec());
        let job = Document::new("job.txt", b"python and java".to_vec());

        let outcome = engine().analyze_documents(&resume, &job);

        assert_eq!(outcome.resume_text.text, "❌ Unsupported file format");
        assert!(outcome.resume_skills.is_empty());
        assert_eq!(outcome.result.missing.names(), vec!["python", "java"]);
    }
}
