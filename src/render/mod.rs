//! Terminal and JSON presentation of an analysis report

use crate::analysis::{AnalysisReport, ChartKind, ChartSet, Sentiment};
use crate::error::{Result, SentimError};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Where each chart image was written; `None` for unavailable slots
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartPaths {
    pub pie: Option<PathBuf>,
    pub wordcloud: Option<PathBuf>,
    pub trend: Option<PathBuf>,
}

impl ChartPaths {
    pub fn get(&self, kind: ChartKind) -> Option<&PathBuf> {
        match kind {
            ChartKind::Pie => self.pie.as_ref(),
            ChartKind::WordCloud => self.wordcloud.as_ref(),
            ChartKind::Trend => self.trend.as_ref(),
        }
    }

    fn set(&mut self, kind: ChartKind, path: PathBuf) {
        match kind {
            ChartKind::Pie => self.pie = Some(path),
            ChartKind::WordCloud => self.wordcloud = Some(path),
            ChartKind::Trend => self.trend = Some(path),
        }
    }
}

/// Write every available chart into `dir` as `<kind>.<ext>`
pub fn write_charts(charts: &ChartSet, dir: &Path) -> Result<ChartPaths> {
    let mut paths = ChartPaths::default();
    if charts.missing().len() == ChartKind::ALL.len() {
        return Ok(paths);
    }

    std::fs::create_dir_all(dir).map_err(|e| SentimError::Io {
        source: e,
        context: format!("Failed to create chart directory: {}", dir.display()),
    })?;

    for kind in ChartKind::ALL {
        if let Some(image) = charts.get(kind) {
            let path = dir.join(format!("{}.{}", kind.name(), image.extension()));
            std::fs::write(&path, &image.data).map_err(|e| SentimError::Io {
                source: e,
                context: format!("Failed to write chart: {}", path.display()),
            })?;
            tracing::debug!("Wrote {} chart to {}", kind, path.display());
            paths.set(kind, path);
        }
    }

    Ok(paths)
}

/// Human-readable overview, chart list and (filtered) comments
pub fn render_text(report: &AnalysisReport, filter: Option<Sentiment>, paths: &ChartPaths) -> String {
    let result = &report.result;
    let stats = result.stats();
    let mut out = String::new();

    let _ = writeln!(out, "Video {} - {} comments", report.video_id, result.total());
    let _ = writeln!(out);
    let _ = writeln!(out, "Sentiment overview");
    for label in Sentiment::ALL {
        let _ = writeln!(
            out,
            "  {:<9} {:>5.1}%  ({} comments)",
            label.display_name(),
            stats.share(label),
            stats.get(label)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Charts");
    for kind in ChartKind::ALL {
        match paths.get(kind) {
            Some(path) => {
                let _ = writeln!(out, "  {:<10} {}", kind.name(), path.display());
            }
            None => {
                let _ = writeln!(out, "  {:<10} not available", kind.name());
            }
        }
    }

    let heading = match filter {
        Some(label) => format!("{} comments", label.display_name()),
        None => "All comments".to_string(),
    };
    let shown: Vec<_> = result.filtered(filter).collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "{} ({} results)", heading, shown.len());

    if shown.is_empty() {
        let _ = writeln!(out, "  No comments found for this filter.");
    }
    for c in shown {
        let _ = writeln!(
            out,
            "  [{:<8}] {} {} ({} likes)",
            c.sentiment.display_name(),
            c.comment.timestamp.format("%Y-%m-%d"),
            c.comment.author,
            c.comment.like_count
        );
        for line in c.comment.text.lines() {
            let _ = writeln!(out, "      {}", line);
        }
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    video_id: &'a str,
    comments: Vec<&'a crate::analysis::ClassifiedComment>,
    stats: &'a crate::analysis::SentimentCounts,
    total: usize,
    filter: Option<Sentiment>,
    charts: &'a ChartPaths,
}

/// JSON document with comments, stats, total and chart file paths
pub fn render_json(
    report: &AnalysisReport,
    filter: Option<Sentiment>,
    paths: &ChartPaths,
) -> Result<String> {
    let doc = JsonReport {
        video_id: &report.video_id,
        comments: report.result.filtered(filter).collect(),
        stats: report.result.stats(),
        total: report.result.total(),
        filter,
        charts: paths,
    };
    serde_json::to_string_pretty(&doc).map_err(|e| SentimError::Json {
        source: e,
        context: "Failed to serialize report".to_string(),
    })
}
