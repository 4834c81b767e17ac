// Data model and run orchestration for comment sentiment analysis

mod orchestrator;
mod types;

pub use orchestrator::{Analyzer, RunOutcome, RunPhase};
pub use types::{
    AnalysisReport, AnalysisResult, ChartImage, ChartKind, ChartSet, ClassifiedComment,
    RawComment, Sentiment, SentimentCounts,
};
