// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Word-level lexicon classifier.
//!
//! Emits the same raw label vocabulary as the transformer model (`joy`,
//! `sadness`, `anger`, `fear`, `love`, `surprise`, plus `neutral` when no cue
//! is found), so it can stand in for the model without touching the label table.

use affect_contracts::{ClassifierResult, EmotionClassifier, RawClassification};
use std::sync::Arc;
use tracing::info;

use super::ClassifierLoader;

const LEXICON: &[(&str, &[&str])] = &[
    (
        "joy",
        &[
            "happy", "joy", "joyful", "glad", "great", "wonderful", "excited", "delighted",
            "cheerful", "fun", "awesome", "amazing", "fantastic", "smile", "smiling", "proud",
        ],
    ),
    (
        "sadness",
        &[
            "sad", "unhappy", "cry", "crying", "cried", "tears", "lonely", "miss", "lost",
            "depressed", "heartbroken", "hopeless", "empty", "miserable", "grief", "hurt",
        ],
    ),
    (
        "anger",
        &[
            "angry", "mad", "furious", "hate", "annoyed", "irritated", "rage", "unfair",
            "frustrated", "livid", "resent", "outraged",
        ],
    ),
    (
        "fear",
        &[
            "afraid", "scared", "anxious", "worried", "nervous", "panic", "terrified", "fear",
            "stress", "stressed", "overwhelmed", "dread", "tense", "uneasy",
        ],
    ),
    (
        "love",
        &["love", "loving", "adore", "grateful", "thankful", "cherish", "blessed"],
    ),
    (
        "surprise",
        &["surprised", "shocked", "unexpected", "wow", "astonished", "stunned"],
    ),
];

const NEUTRAL_LABEL: &str = "neutral";
const NEUTRAL_CONFIDENCE: f64 = 0.5;
const MIN_CONFIDENCE: f64 = 0.4;
const CONFIDENCE_SPAN: f64 = 0.55;

#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub const fn new() -> Self {
        Self
    }

    fn tally(text: &str) -> [usize; LEXICON.len()] {
        let mut counts = [0usize; LEXICON.len()];
        let lowered = text.to_lowercase();
        for word in lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|w| !w.is_empty())
        {
            for (idx, (_, cues)) in LEXICON.iter().enumerate() {
                if cues.contains(&word) {
                    counts[idx] += 1;
                }
            }
        }
        counts
    }
}

impl EmotionClassifier for LexiconClassifier {
    /// Picks the label with the most cue words; earlier labels win ties.
    /// Confidence grows with the winner's share of all cues.
    fn classify(&self, text: &str) -> ClassifierResult<RawClassification> {
        let counts = Self::tally(text);
        let total: usize = counts.iter().sum();
        if total == 0 {
            return Ok(RawClassification::new(NEUTRAL_LABEL, NEUTRAL_CONFIDENCE));
        }

        let mut best = 0;
        for (idx, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = idx;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let share = counts[best] as f64 / total as f64;
        Ok(RawClassification::new(
            LEXICON[best].0,
            share.mul_add(CONFIDENCE_SPAN, MIN_CONFIDENCE),
        ))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

/// Loader for the built-in lexicon backend; never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconLoader;

impl ClassifierLoader for LexiconLoader {
    fn load(&self) -> ClassifierResult<Arc<dyn EmotionClassifier>> {
        info!("Using built-in lexicon emotion classifier");
        Ok(Arc::new(LexiconClassifier::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> RawClassification {
        LexiconClassifier::new().classify(text).unwrap()
    }

    #[test]
    fn no_cues_is_neutral() {
        let raw = classify("I went to the shop and bought bread");
        assert_eq!(raw.label, "neutral");
        assert_eq!(raw.confidence, 0.5);
        assert_eq!(classify("").label, "neutral");
    }

    #[test]
    fn single_category_is_confident() {
        let raw = classify("I'm so happy and excited today!");
        assert_eq!(raw.label, "joy");
        assert!((raw.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn mixed_cues_lower_confidence() {
        let raw = classify("scared and worried but also a little happy");
        assert_eq!(raw.label, "fear");
        assert!(raw.confidence < 0.95);
        assert!(raw.confidence > MIN_CONFIDENCE);
    }

    #[test]
    fn matches_whole_words_only() {
        // "made" must not count as "mad"
        assert_eq!(classify("I made dinner").label, "neutral");
    }

    #[test]
    fn ties_prefer_earlier_labels() {
        assert_eq!(classify("sad but happy").label, "joy");
    }

    #[test]
    fn confidence_is_in_unit_range() {
        for text in ["love love hate", "wow", "angry angry sad", "tears"] {
            let raw = classify(text);
            assert!((0.0..=1.0).contains(&raw.confidence), "{text}");
        }
    }

    #[test]
    fn loader_builds_lexicon_backend() {
        assert_eq!(LexiconLoader.load().unwrap().name(), "lexicon");
    }
}
