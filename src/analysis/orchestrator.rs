// One analysis run end to end:
// link -> video id -> comments -> labels -> tally -> three charts in parallel

use crate::analysis::types::{
    AnalysisReport, AnalysisResult, ChartImage, ChartKind, ChartSet, ClassifiedComment,
};
use crate::backend::AnalysisBackend;
use crate::error::{Result, SentimError};
use crate::session::DashboardSession;
use crate::video_id::extract_video_id;
use crate::youtube::{fetch_all_comments, CommentSource};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    ExtractingId,
    FetchingComments,
    ClassifyingSentiment,
    GeneratingCharts,
    Complete,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Idle => "idle",
            RunPhase::ExtractingId => "extracting id",
            RunPhase::FetchingComments => "fetching comments",
            RunPhase::ClassifyingSentiment => "classifying sentiment",
            RunPhase::GeneratingCharts => "generating charts",
            RunPhase::Complete => "complete",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a run driven through a [`DashboardSession`] ended
#[derive(Debug)]
pub enum RunOutcome {
    /// The report was published to the session
    Complete(Arc<AnalysisReport>),
    /// The run stopped and its message was published to the session
    Failed(SentimError),
    /// A newer run started; nothing from this run was published
    Superseded,
}

/// Drives analysis runs against a comment source and an analysis backend
pub struct Analyzer<S, B> {
    source: S,
    backend: B,
}

impl<S, B> Analyzer<S, B>
where
    S: CommentSource,
    B: AnalysisBackend,
{
    pub fn new(source: S, backend: B) -> Self {
        Self { source, backend }
    }

    /// Run one analysis without any session bookkeeping
    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport> {
        self.analyze_with(url, |_| true)
            .await?
            .ok_or_else(|| SentimError::Other(anyhow::anyhow!("analysis abandoned")))
    }

    /// Run one analysis and publish its outcome to `session`
    ///
    /// Prior session state is cleared before the first network call. If
    /// another run starts in the meantime this run stops at its next phase
    /// boundary and publishes nothing.
    pub async fn run(&self, url: &str, session: &DashboardSession) -> RunOutcome {
        let ticket = session.begin_run();

        match self
            .analyze_with(url, |phase| session.advance(&ticket, phase))
            .await
        {
            Ok(Some(report)) => {
                let report = Arc::new(report);
                if session.publish(&ticket, Arc::clone(&report)) {
                    RunOutcome::Complete(report)
                } else {
                    RunOutcome::Superseded
                }
            }
            Ok(None) => RunOutcome::Superseded,
            Err(err) => {
                if session.fail(&ticket, err.to_string()) {
                    RunOutcome::Failed(err)
                } else {
                    RunOutcome::Superseded
                }
            }
        }
    }

    /// `on_phase` is called at every phase boundary; returning `false`
    /// abandons the run and yields `Ok(None)`.
    async fn analyze_with<F>(&self, url: &str, mut on_phase: F) -> Result<Option<AnalysisReport>>
    where
        F: FnMut(RunPhase) -> bool,
    {
        let run_start = Instant::now();

        if !on_phase(RunPhase::ExtractingId) {
            return Ok(None);
        }
        let video_id = extract_video_id(url).ok_or(SentimError::InvalidVideoUrl)?;
        info!("Analysis started - video={}", video_id);

        if !on_phase(RunPhase::FetchingComments) {
            return Ok(None);
        }
        let raw = fetch_all_comments(&self.source, &video_id).await?;
        if raw.is_empty() {
            return Err(SentimError::NoComments);
        }

        if !on_phase(RunPhase::ClassifyingSentiment) {
            return Ok(None);
        }
        let classify_start = Instant::now();
        let labels = self.backend.classify(&raw).await?;
        if labels.len() != raw.len() {
            return Err(SentimError::upstream(
                "classification service",
                format!(
                    "returned {} labels for {} comments",
                    labels.len(),
                    raw.len()
                ),
            ));
        }
        info!(
            "Classification completed - comments={}, duration={:.2}s",
            raw.len(),
            classify_start.elapsed().as_secs_f32()
        );

        let classified: Vec<ClassifiedComment> = raw
            .into_iter()
            .zip(labels)
            .map(|(comment, sentiment)| ClassifiedComment { comment, sentiment })
            .collect();
        let result = AnalysisResult::new(classified);
        debug!("Sentiment counts - {:?}", result.stats());

        if !on_phase(RunPhase::GeneratingCharts) {
            return Ok(None);
        }
        let charts = self.generate_charts(&result).await;

        if !on_phase(RunPhase::Complete) {
            return Ok(None);
        }
        info!(
            "Analysis completed - video={}, comments={}, charts_missing={}, duration={:.2}s",
            video_id,
            result.total(),
            charts.missing().len(),
            run_start.elapsed().as_secs_f32()
        );

        Ok(Some(AnalysisReport {
            video_id,
            result,
            charts,
        }))
    }

    /// Request all three charts concurrently; a failed slot stays empty
    async fn generate_charts(&self, result: &AnalysisResult) -> ChartSet {
        let texts: Vec<String> = result
            .comments()
            .iter()
            .map(|c| c.comment.text.clone())
            .collect();

        let (pie, wordcloud, trend) = tokio::join!(
            self.backend.pie_chart(result.stats()),
            self.backend.wordcloud(&texts),
            self.backend.trend_graph(result.comments()),
        );

        ChartSet {
            pie: settle(ChartKind::Pie, pie),
            wordcloud: settle(ChartKind::WordCloud, wordcloud),
            trend: settle(ChartKind::Trend, trend),
        }
    }
}

fn settle(kind: ChartKind, outcome: Result<ChartImage>) -> Option<ChartImage> {
    match outcome {
        Ok(image) => {
            debug!("Chart ready - kind={}, bytes={}", kind, image.data.len());
            Some(image)
        }
        Err(e) => {
            warn!("Chart unavailable - kind={}, error={}", kind, e);
            None
        }
    }
}
