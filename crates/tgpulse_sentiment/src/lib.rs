pub mod lexicon;

pub use lexicon::Lexicon;

use regex::Regex;
use std::sync::LazyLock;
use tgpulse_shared_models::Scores;
use thiserror::Error;

/// Polarity factor of a negated word ("not good").
const NEGATION: f64 = -0.5;
/// Polarity factor of a word followed by `!`.
const EXCLAMATION: f64 = 1.25;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?|!").expect("token pattern is valid"));

#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("Error decoding lexicon: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Error reading lexicon: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid lexicon entry {word:?}: {reason}")]
    InvalidEntry { word: String, reason: String },
}

/// Capability: score a piece of (already cleaned) text.
pub trait SentimentModel {
    fn score(&self, text: &str) -> Result<Scores, SentimentError>;
}

/// Averages the polarity and subjectivity of every lexicon word found in the
/// text. Modifiers ("very") scale the word that follows them, negations flip
/// and dampen it.
#[derive(Debug, Clone)]
pub struct LexiconModel {
    lexicon: Lexicon,
}

impl LexiconModel {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn embedded() -> Result<Self, SentimentError> {
        Ok(Self::new(Lexicon::embedded()?))
    }
}

fn is_negation(token: &str) -> bool {
    matches!(token, "not" | "no" | "never") || token.ends_with("n't")
}

impl SentimentModel for LexiconModel {
    fn score(&self, text: &str) -> Result<Scores, SentimentError> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut scored: Vec<(f64, f64)> = Vec::new();
        let mut negated = false;
        let mut intensity = 1.0;
        let mut previous_scored = false;

        for (i, token) in tokens.iter().enumerate() {
            if *token == "!" {
                if previous_scored {
                    if let Some(last) = scored.last_mut() {
                        last.0 *= EXCLAMATION;
                    }
                }
                previous_scored = false;
                continue;
            }
            if is_negation(token) {
                negated = true;
                previous_scored = false;
                continue;
            }

            let Some(entry) = self.lexicon.get(token) else {
                intensity = 1.0;
                previous_scored = false;
                continue;
            };

            let next_is_scored = tokens
                .get(i + 1)
                .is_some_and(|next| self.lexicon.get(next).is_some());
            if entry.intensity != 1.0 && next_is_scored {
                intensity *= entry.intensity;
                previous_scored = false;
                continue;
            }

            let mut polarity = entry.polarity * intensity;
            let subjectivity = (entry.subjectivity * intensity).min(1.0);
            if negated {
                polarity *= NEGATION;
                negated = false;
            }

            scored.push((polarity, subjectivity));
            intensity = 1.0;
            previous_scored = true;
        }

        if scored.is_empty() {
            return Ok(Scores::default());
        }

        let n = scored.len() as f64;
        let polarity = scored.iter().map(|(p, _)| p).sum::<f64>() / n;
        let subjectivity = scored.iter().map(|(_, s)| s).sum::<f64>() / n;

        Ok(Scores {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgpulse_shared_models::Label;

    fn model() -> LexiconModel {
        LexiconModel::embedded().expect("embedded lexicon is valid")
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn scores_single_word() {
        let scores = model().score("Good").unwrap();

        assert_close(scores.polarity, 0.7);
        assert_close(scores.subjectivity, 0.6);
    }

    #[test]
    fn text_without_lexicon_words_is_neutral() {
        let model = model();

        for text in ["", "   ", "the channel posted at 5", "$AAPL $TSLA"] {
            let scores = model.score(text).unwrap();
            assert_eq!(scores, Scores::default(), "text {text:?}");
            assert_eq!(Label::from_polarity(scores.polarity), Label::Neutral);
        }
    }

    #[test]
    fn negation_flips_and_dampens() {
        let model = model();

        assert_close(model.score("not good").unwrap().polarity, -0.35);
        assert_close(model.score("this isn't good").unwrap().polarity, -0.35);
        assert_close(model.score("not the best").unwrap().polarity, -0.5);
    }

    #[test]
    fn modifier_scales_next_word() {
        let scores = model().score("very good").unwrap();

        assert_close(scores.polarity, 0.91);
        assert_close(scores.subjectivity, 0.78);
    }

    #[test]
    fn modifier_alone_is_scored_as_a_word() {
        let scores = model().score("very").unwrap();

        assert_close(scores.polarity, 0.2);
        assert_close(scores.subjectivity, 0.3);
    }

    #[test]
    fn exclamation_amplifies_previous_word() {
        let scores = model().score("great!").unwrap();

        assert_close(scores.polarity, 1.0);
    }

    #[test]
    fn averages_all_scored_words() {
        let scores = model().score("This is terrible and bad").unwrap();

        assert_close(scores.polarity, -0.85);
        assert_close(scores.subjectivity, (1.0 + 0.67) / 2.0);
    }

    #[test]
    fn scores_stay_in_range() {
        let scores = model()
            .score("absolutely perfect! incredibly excellent! extremely awesome!")
            .unwrap();

        assert!(scores.polarity <= 1.0);
        assert!(scores.subjectivity <= 1.0);
    }
}
