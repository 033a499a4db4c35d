//! Skill gap analysis between a resume and a job description

use crate::processing::skill_matcher::SkillSet;
use serde::{Deserialize, Serialize};

/// Matched and missing skills for one resume/job pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Skills present in both documents.
    pub matched: SkillSet,
    /// Skills the job description asks for that the resume lacks.
    pub missing: SkillSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    AddSkills { skills: SkillSet },
    AllCovered,
}

impl Suggestion {
    pub fn message(&self) -> &'static str {
        match self {
            Suggestion::AddSkills { .. } => {
                "You may want to add the following skills to your resume:"
            }
            Suggestion::AllCovered => "Your resume covers all key skills in the job description!",
        }
    }
}

pub struct GapAnalyzer;

impl GapAnalyzer {
    pub fn analyze(resume_skills: &SkillSet, job_skills: &SkillSet) -> SkillGap {
        SkillGap {
            matched: resume_skills.intersection(job_skills),
            missing: job_skills.difference(resume_skills),
        }
    }
}

impl SkillGap {
    pub fn suggestion(&self) -> Suggestion {
        if self.missing.is_empty() {
            Suggestion::AllCovered
        } else {
            Suggestion::AddSkills {
                skills: self.missing.clone(),
            }
        }
    }
}
