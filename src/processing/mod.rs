//! Text processing and analysis module

pub mod text_processor;
pub mod skill_matcher;
pub mod similarity;
pub mod gap_analyzer;
pub mod analyzer;
