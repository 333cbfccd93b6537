//! Screening module
//! Batch screening, bias probe, evaluation harness and their helpers

pub mod batch;
pub mod bias;
pub mod candidate;
pub mod evaluation;
pub mod generator;
pub mod labeling;
pub mod matcher;

pub use batch::{Screener, ScreeningRun, SkippedResume};
pub use candidate::{rank, ScoredCandidate};
pub use evaluation::{load_ground_truth, save_ground_truth, EvaluationOutcome, GroundTruth};
pub use matcher::{CandidateMatch, QuickMatch};
