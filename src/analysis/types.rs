use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One top-level comment thread as delivered by the comment API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    #[serde(default)]
    pub like_count: u64,
}

/// Sentiment label assigned by the classification service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Wire label: "1", "0" or "-1"
    pub fn code(self) -> &'static str {
        match self {
            Sentiment::Positive => "1",
            Sentiment::Neutral => "0",
            Sentiment::Negative => "-1",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    fn from_code(value: i64) -> Option<Self> {
        match value {
            1 => Some(Sentiment::Positive),
            0 => Some(Sentiment::Neutral),
            -1 => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "positive" | "pos" => Ok(Sentiment::Positive),
            "0" | "neutral" | "neu" => Ok(Sentiment::Neutral),
            "-1" | "negative" | "neg" => Ok(Sentiment::Negative),
            other => Err(format!(
                "unknown sentiment '{}', expected positive, neutral or negative",
                other
            )),
        }
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// The classifier may answer with "1" or with 1
impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct LabelVisitor;

        impl<'de> Visitor<'de> for LabelVisitor {
            type Value = Sentiment;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a sentiment label: 1, 0 or -1")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Sentiment, E> {
                Sentiment::from_code(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Sentiment, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(Sentiment::from_code)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Sentiment, E> {
                if v.fract() == 0.0 {
                    if let Some(label) = Sentiment::from_code(v as i64) {
                        return Ok(label);
                    }
                }
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Sentiment, E> {
                v.trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(Sentiment::from_code)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(LabelVisitor)
    }
}

/// A comment together with its sentiment label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedComment {
    #[serde(flatten)]
    pub comment: RawComment,
    pub sentiment: Sentiment,
}

/// Per-label comment counts; every label is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "1")]
    pub positive: usize,
    #[serde(rename = "0")]
    pub neutral: usize,
    #[serde(rename = "-1")]
    pub negative: usize,
}

impl SentimentCounts {
    /// Tally labels across a classified sequence
    pub fn tally<'a, I>(comments: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassifiedComment>,
    {
        comments
            .into_iter()
            .fold(Self::default(), |mut counts, c| {
                *counts.slot_mut(c.sentiment) += 1;
                counts
            })
    }

    pub fn get(&self, label: Sentiment) -> usize {
        match label {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    fn slot_mut(&mut self, label: Sentiment) -> &mut usize {
        match label {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Neutral => &mut self.neutral,
            Sentiment::Negative => &mut self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Share of `label` in percent, 0.0 when there are no comments
    pub fn share(&self, label: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(label) as f64 / total as f64 * 100.0
        }
    }
}

/// Classified comments plus their tally
///
/// Only constructible from a classified sequence, so
/// `stats.total() == total == comments.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    comments: Vec<ClassifiedComment>,
    stats: SentimentCounts,
    total: usize,
}

impl AnalysisResult {
    pub fn new(comments: Vec<ClassifiedComment>) -> Self {
        let stats = SentimentCounts::tally(&comments);
        let total = comments.len();
        Self {
            comments,
            stats,
            total,
        }
    }

    pub fn comments(&self) -> &[ClassifiedComment] {
        &self.comments
    }

    pub fn stats(&self) -> &SentimentCounts {
        &self.stats
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Comments with the given label, or all of them when `filter` is `None`
    pub fn filtered(
        &self,
        filter: Option<Sentiment>,
    ) -> impl Iterator<Item = &ClassifiedComment> + '_ {
        self.comments
            .iter()
            .filter(move |c| filter.map_or(true, |label| c.sentiment == label))
    }
}

/// Image returned by the chart rendering service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub content_type: String,
    pub data: Bytes,
}

impl ChartImage {
    pub fn new(content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// File extension matching the content type, "png" when unknown
    pub fn extension(&self) -> &'static str {
        let mime = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/svg+xml" => "svg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

/// The three chart slots of a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Pie,
    WordCloud,
    Trend,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Pie, ChartKind::WordCloud, ChartKind::Trend];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::WordCloud => "wordcloud",
            ChartKind::Trend => "trend",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chart images of one run; a slot is `None` when its request failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSet {
    pub pie: Option<ChartImage>,
    pub wordcloud: Option<ChartImage>,
    pub trend: Option<ChartImage>,
}

impl ChartSet {
    pub fn get(&self, kind: ChartKind) -> Option<&ChartImage> {
        match kind {
            ChartKind::Pie => self.pie.as_ref(),
            ChartKind::WordCloud => self.wordcloud.as_ref(),
            ChartKind::Trend => self.trend.as_ref(),
        }
    }

    /// Slots that have no image
    pub fn missing(&self) -> Vec<ChartKind> {
        ChartKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Everything a completed run publishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub video_id: String,
    pub result: AnalysisResult,
    pub charts: ChartSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn classified(text: &str, sentiment: Sentiment) -> ClassifiedComment {
        ClassifiedComment {
            comment: RawComment {
                text: text.to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
                author: "viewer".to_string(),
                like_count: 2,
            },
            sentiment,
        }
    }

    #[test]
    fn test_tally_counts() {
        let labels = [
            Sentiment::Positive,
            Sentiment::Neutral,
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Positive,
        ];
        let comments: Vec<_> = labels.iter().map(|l| classified("c", *l)).collect();
        let result = AnalysisResult::new(comments);

        assert_eq!(
            *result.stats(),
            SentimentCounts {
                positive: 3,
                neutral: 2,
                negative: 1
            }
        );
        assert_eq!(result.total(), 6);
        assert_eq!(result.stats().total(), result.comments().len());
    }

    #[test]
    fn test_unseen_label_defaults_to_zero() {
        let comments = vec![
            classified("great", Sentiment::Positive),
            classified("awful", Sentiment::Negative),
        ];
        let result = AnalysisResult::new(comments);

        let json = serde_json::to_value(result.stats()).unwrap();
        assert_eq!(json, serde_json::json!({"1": 1, "0": 0, "-1": 1}));
    }

    #[test]
    fn test_sentiment_wire_forms() {
        let from_str: Sentiment = serde_json::from_str("\"-1\"").unwrap();
        let from_int: Sentiment = serde_json::from_str("-1").unwrap();
        let from_uint: Sentiment = serde_json::from_str("1").unwrap();
        assert_eq!(from_str, Sentiment::Negative);
        assert_eq!(from_int, Sentiment::Negative);
        assert_eq!(from_uint, Sentiment::Positive);

        assert!(serde_json::from_str::<Sentiment>("2").is_err());
        assert!(serde_json::from_str::<Sentiment>("\"happy\"").is_err());
        assert_eq!(serde_json::to_string(&Sentiment::Neutral).unwrap(), "\"0\"");
    }

    #[test]
    fn test_classified_comment_shape() {
        let json = serde_json::to_value(classified("nice video", Sentiment::Positive)).unwrap();
        assert_eq!(json["text"], "nice video");
        assert_eq!(json["likeCount"], 2);
        assert_eq!(json["sentiment"], "1");
        assert_eq!(json["timestamp"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_share_and_filter() {
        let result = AnalysisResult::new(vec![
            classified("a", Sentiment::Positive),
            classified("b", Sentiment::Negative),
            classified("c", Sentiment::Negative),
        ]);

        assert!((result.stats().share(Sentiment::Negative) - 66.666).abs() < 0.01);
        assert_eq!(SentimentCounts::default().share(Sentiment::Positive), 0.0);
        assert_eq!(result.filtered(Some(Sentiment::Negative)).count(), 2);
        assert_eq!(result.filtered(Some(Sentiment::Neutral)).count(), 0);
        assert_eq!(result.filtered(None).count(), 3);
    }

    #[test]
    fn test_parse_filter_labels() {
        assert_eq!("positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("NEG".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert_eq!("0".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert!("meh".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_chart_set_missing() {
        let charts = ChartSet {
            pie: Some(ChartImage::new("image/png", vec![1u8, 2, 3])),
            wordcloud: None,
            trend: Some(ChartImage::new("image/jpeg", vec![4u8])),
        };
        assert_eq!(charts.missing(), vec![ChartKind::WordCloud]);
        assert!(!charts.is_complete());
        assert_eq!(charts.trend.as_ref().unwrap().extension(), "jpg");
        assert_eq!(ChartSet::default().missing().len(), 3);
    }
}
