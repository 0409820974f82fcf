use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single message scraped from a channel preview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub url: String,
    pub date: DateTime<Utc>,
    /// `None` for media-only posts.
    pub content: Option<String>,
    pub outlinks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub subjectivity: f64,
    pub polarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Negative,
    Neutral,
    Positive,
}

impl Label {
    pub fn from_polarity(score: f64) -> Self {
        if score < 0.0 {
            Label::Negative
        } else if score == 0.0 {
            Label::Neutral
        } else {
            Label::Positive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Negative => "Negative",
            Label::Neutral => "Neutral",
            Label::Positive => "Positive",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post after cleaning and scoring. The raw text is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedPost {
    pub channel: String,
    pub url: String,
    pub date: DateTime<Utc>,
    pub outlinks: Vec<String>,
    pub clean_context: String,
    pub subjectivity: f64,
    pub polarity: f64,
    pub analysis: Label,
}

impl CleanedPost {
    pub fn new(channel: &str, post: Post, clean_context: String, scores: Scores) -> Self {
        Self {
            channel: channel.to_string(),
            url: post.url,
            date: post.date,
            outlinks: post.outlinks,
            clean_context,
            subjectivity: scores.subjectivity,
            polarity: scores.polarity,
            analysis: Label::from_polarity(scores.polarity),
        }
    }
}

/// Cash-tag occurrence counts. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionTally {
    counts: HashMap<String, usize>,
}

impl MentionTally {
    pub fn get(&self, token: &str) -> Option<usize> {
        self.counts.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(token, count)| (token.as_str(), *count))
    }

    /// Count descending, then token ascending.
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|(token, count)| (token.clone(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}

impl From<HashMap<String, usize>> for MentionTally {
    fn from(counts: HashMap<String, usize>) -> Self {
        Self { counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn label_follows_polarity_sign() {
        assert_eq!(Label::from_polarity(-0.01), Label::Negative);
        assert_eq!(Label::from_polarity(-1.0), Label::Negative);
        assert_eq!(Label::from_polarity(0.0), Label::Neutral);
        assert_eq!(Label::from_polarity(-0.0), Label::Neutral);
        assert_eq!(Label::from_polarity(0.5), Label::Positive);
        assert_eq!(Label::from_polarity(1.0), Label::Positive);
    }

    #[test]
    fn label_display_names() {
        assert_eq!(Label::Negative.to_string(), "Negative");
        assert_eq!(Label::Neutral.to_string(), "Neutral");
        assert_eq!(Label::Positive.to_string(), "Positive");
    }

    #[test]
    fn cleaned_post_derives_label() {
        let post = Post {
            url: "https://t.me/chan/1".to_string(),
            date: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            content: Some("raw".to_string()),
            outlinks: vec!["https://example.com".to_string()],
        };
        let scores = Scores {
            subjectivity: 0.4,
            polarity: -0.2,
        };

        let cleaned = CleanedPost::new("chan", post, "raw".to_string(), scores);

        assert_eq!(cleaned.channel, "chan");
        assert_eq!(cleaned.analysis, Label::Negative);
        assert_eq!(cleaned.outlinks, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn ranked_tally_orders_by_count_then_token() {
        let tally = MentionTally::from(HashMap::from([
            ("$TSLA".to_string(), 1),
            ("$AAPL".to_string(), 2),
            ("$BTC".to_string(), 1),
        ]));

        assert_eq!(
            tally.ranked(),
            vec![
                ("$AAPL".to_string(), 2),
                ("$BTC".to_string(), 1),
                ("$TSLA".to_string(), 1),
            ]
        );
        assert_eq!(tally.get("$AAPL"), Some(2));
        assert_eq!(tally.get("$ETH"), None);
    }
}
