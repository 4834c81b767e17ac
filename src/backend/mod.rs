//! Clients for the sentiment classification and chart rendering service

use crate::analysis::{ChartImage, ClassifiedComment, RawComment, Sentiment, SentimentCounts};
use crate::config::Config;
use crate::error::{Result, SentimError};
use crate::http::{build_client, check_status, endpoint, transport_error};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const CLASSIFIER: &str = "classification service";
const CHARTS: &str = "chart service";

/// Analysis backend: one classifier endpoint and three chart endpoints
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Label every comment; the answer has the same length and order as the input
    async fn classify(&self, comments: &[RawComment]) -> Result<Vec<Sentiment>>;

    /// Pie chart of the label breakdown
    async fn pie_chart(&self, counts: &SentimentCounts) -> Result<ChartImage>;

    /// Word cloud of the raw comment texts
    async fn wordcloud(&self, texts: &[String]) -> Result<ChartImage>;

    /// Sentiment over time
    async fn trend_graph(&self, comments: &[ClassifiedComment]) -> Result<ChartImage>;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    comments: &'a [RawComment],
}

/// One element of the classifier's answer; only the label is used
#[derive(Debug, Deserialize)]
struct Prediction {
    sentiment: Sentiment,
}

#[derive(Serialize)]
struct PieChartRequest<'a> {
    sentiment_counts: &'a SentimentCounts,
}

#[derive(Serialize)]
struct WordcloudRequest<'a> {
    comments: &'a [String],
}

#[derive(Serialize)]
struct TrendGraphRequest<'a> {
    sentiment_data: &'a [ClassifiedComment],
}

/// HTTP implementation of [`AnalysisBackend`]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_client(config.request_timeout()?)?;
        Ok(Self::new(client, &config.backend.base_url))
    }

    async fn post_for_image<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<ChartImage> {
        let url = endpoint(&self.base_url, path);
        debug!("Requesting chart - endpoint={}", url);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(CHARTS, e))?;
        let resp = check_status(CHARTS, resp).await?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let data = resp.bytes().await.map_err(|e| transport_error(CHARTS, e))?;

        if data.is_empty() {
            return Err(SentimError::upstream(
                CHARTS,
                format!("{} returned an empty image", path),
            ));
        }

        Ok(ChartImage::new(content_type, data))
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn classify(&self, comments: &[RawComment]) -> Result<Vec<Sentiment>> {
        let url = endpoint(&self.base_url, "predict_with_timestamps");
        debug!("Requesting classification - endpoint={}, comments={}", url, comments.len());

        let resp = self
            .client
            .post(&url)
            .json(&PredictRequest { comments })
            .send()
            .await
            .map_err(|e| transport_error(CLASSIFIER, e))?;
        let resp = check_status(CLASSIFIER, resp).await?;

        let predictions: Vec<Prediction> =
            resp.json().await.map_err(|e| transport_error(CLASSIFIER, e))?;

        Ok(predictions.into_iter().map(|p| p.sentiment).collect())
    }

    async fn pie_chart(&self, counts: &SentimentCounts) -> Result<ChartImage> {
        self.post_for_image(
            "generate_chart",
            &PieChartRequest {
                sentiment_counts: counts,
            },
        )
        .await
    }

    async fn wordcloud(&self, texts: &[String]) -> Result<ChartImage> {
        self.post_for_image("generate_wordcloud", &WordcloudRequest { comments: texts })
            .await
    }

    async fn trend_graph(&self, comments: &[ClassifiedComment]) -> Result<ChartImage> {
        self.post_for_image(
            "generate_trend_graph",
            &TrendGraphRequest {
                sentiment_data: comments,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_ignores_extra_fields() {
        let body = r#"[
            {"comment": "love it", "sentiment": 1, "timestamp": "2024-01-01T00:00:00Z"},
            {"comment": "meh", "sentiment": "0", "timestamp": "2024-01-01T00:00:00Z"}
        ]"#;
        let predictions: Vec<Prediction> = serde_json::from_str(body).unwrap();
        let labels: Vec<_> = predictions.into_iter().map(|p| p.sentiment).collect();
        assert_eq!(labels, vec![Sentiment::Positive, Sentiment::Neutral]);
    }

    #[test]
    fn test_pie_chart_body_shape() {
        let counts = SentimentCounts {
            positive: 3,
            neutral: 0,
            negative: 1,
        };
        let body = serde_json::to_value(PieChartRequest {
            sentiment_counts: &counts,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"sentiment_counts": {"1": 3, "0": 0, "-1": 1}})
        );
    }
}
