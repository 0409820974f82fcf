use crate::SentimentError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const EMBEDDED: &str = include_str!("../assets/lexicon.json");

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub polarity: f64,
    pub subjectivity: f64,
    /// Multiplier applied to the following word when this one acts as a modifier.
    pub intensity: f64,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    word: String,
    polarity: f64,
    subjectivity: f64,
    #[serde(default = "unit_intensity")]
    intensity: f64,
}

fn unit_intensity() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashMap<String, Entry>,
}

impl Lexicon {
    pub fn embedded() -> Result<Self, SentimentError> {
        Self::from_json(EMBEDDED)
    }

    pub fn from_path(path: &Path) -> Result<Self, SentimentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, SentimentError> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;

        let mut words = HashMap::with_capacity(raw.len());
        for entry in raw {
            validate(&entry)?;
            words.insert(
                entry.word.to_lowercase(),
                Entry {
                    polarity: entry.polarity,
                    subjectivity: entry.subjectivity,
                    intensity: entry.intensity,
                },
            );
        }

        Ok(Self { words })
    }

    pub fn get(&self, word: &str) -> Option<&Entry> {
        self.words.get(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn validate(entry: &RawEntry) -> Result<(), SentimentError> {
    let invalid = |reason: &str| SentimentError::InvalidEntry {
        word: entry.word.clone(),
        reason: reason.to_string(),
    };

    if entry.word.trim().is_empty() {
        return Err(invalid("empty word"));
    }
    if !(-1.0..=1.0).contains(&entry.polarity) {
        return Err(invalid("polarity outside [-1, 1]"));
    }
    if !(0.0..=1.0).contains(&entry.subjectivity) {
        return Err(invalid("subjectivity outside [0, 1]"));
    }
    if !entry.intensity.is_finite() || entry.intensity <= 0.0 {
        return Err(invalid("intensity must be positive"));
    }

    Ok(())
}
