//! Lexicon-based sentiment analyzer.
//!
//! Counts positive and negative keywords in the player's text. No signal
//! means neutral at confidence 0.5, the same floor the original
//! transformer-backed analyzer fell back to when its pipeline was down.

use async_trait::async_trait;
use deckhand_core::{ProviderError, Sentiment, SentimentProvider, SentimentReport};

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "awesome", "nice", "love", "win", "won", "thanks", "thank", "cool",
    "excellent", "fun", "perfect", "best", "amazing",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "hate", "lose", "lost", "losing", "awful", "stuck", "frustrated",
    "annoying", "worst", "broken", "unfair", "confused",
];

#[derive(Debug, Default)]
pub struct LexiconSentimentAnalyzer;

impl LexiconSentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SentimentProvider for LexiconSentimentAnalyzer {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn analyze(&self, text: &str) -> Result<SentimentReport, ProviderError> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Ok(SentimentReport {
                sentiment: Sentiment::Neutral,
                confidence: 0.5,
            });
        }

        let positive = words.iter().filter(|w| POSITIVE_WORDS.contains(&w.as_str())).count();
        let negative = words.iter().filter(|w| NEGATIVE_WORDS.contains(&w.as_str())).count();

        let (sentiment, hits) = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => (Sentiment::Positive, positive),
            std::cmp::Ordering::Less => (Sentiment::Negative, negative),
            std::cmp::Ordering::Equal => (Sentiment::Neutral, 0),
        };

        // More hits relative to text length means a stronger signal.
        let confidence = if hits == 0 {
            0.5
        } else {
            (0.5 + hits as f64 / words.len() as f64).clamp(0.5, 0.95)
        };

        Ok(SentimentReport { sentiment, confidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn positive_text_detected() {
        let analyzer = LexiconSentimentAnalyzer::new();
        let report = analyzer.analyze("That was a great game, thanks!").await.unwrap();
        assert_eq!(report.sentiment, Sentiment::Positive);
        assert!(report.confidence > 0.5);
    }

    #[tokio::test]
    async fn negative_text_detected() {
        let analyzer = LexiconSentimentAnalyzer::new();
        let report = analyzer
            .analyze("I keep losing and it's so frustrating")
            .await
            .unwrap();
        assert_eq!(report.sentiment, Sentiment::Negative);
        assert!(report.confidence > 0.5);
    }

    #[tokio::test]
    async fn no_signal_is_neutral_half_confidence() {
        let analyzer = LexiconSentimentAnalyzer::new();
        let report = analyzer.analyze("the turn ended").await.unwrap();
        assert_eq!(report.sentiment, Sentiment::Neutral);
        assert_eq!(report.confidence, 0.5);
    }

    #[tokio::test]
    async fn empty_text_is_neutral() {
        let analyzer = LexiconSentimentAnalyzer::new();
        let report = analyzer.analyze("   ").await.unwrap();
        assert_eq!(report.sentiment, Sentiment::Neutral);
        assert_eq!(report.confidence, 0.5);
    }

    #[tokio::test]
    async fn confidence_never_exceeds_cap() {
        let analyzer = LexiconSentimentAnalyzer::new();
        let report = analyzer.analyze("great great great").await.unwrap();
        assert!(report.confidence <= 0.95);
    }
}
