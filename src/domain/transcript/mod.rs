//! Transcript module - append-only turns and the coach annotations over them.

mod annotation;
mod line;

pub use annotation::{CoachingIntervention, InterventionKind, RecordingSnippet, TranscriptRange};
pub use line::{Speaker, TranscriptLine};
