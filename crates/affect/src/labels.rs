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

use affect_contracts::Emotion;
use std::collections::HashMap;
use tracing::warn;

use crate::config::LabelConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelResolution {
    pub emotion: Emotion,
    /// False when the label was absent from the table and defaulted to neutral.
    pub known: bool,
}

/// Reduces the classifier's native vocabulary to the five canonical emotions.
#[derive(Debug, Clone)]
pub struct LabelMapper {
    table: HashMap<String, Emotion>,
}

impl LabelMapper {
    pub fn new(config: &LabelConfig) -> Self {
        Self {
            table: config.labels.clone(),
        }
    }

    pub fn resolve(&self, raw_label: &str) -> LabelResolution {
        let key = raw_label.trim().to_lowercase();
        match self.table.get(&key) {
            Some(&emotion) => LabelResolution {
                emotion,
                known: true,
            },
            None => LabelResolution {
                emotion: Emotion::Neutral,
                known: false,
            },
        }
    }

    /// Total mapping; unknown labels become neutral and are logged for drift monitoring.
    pub fn map(&self, raw_label: &str) -> Emotion {
        let resolution = self.resolve(raw_label);
        if !resolution.known {
            warn!(
                label = raw_label,
                "Unmapped emotion label '{}' - defaulting to neutral", raw_label
            );
        }
        resolution.emotion
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for LabelMapper {
    fn default() -> Self {
        Self::new(&crate::config::PipelineConfig::default().labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_documented_labels() {
        let mapper = LabelMapper::default();
        let expected = [
            (&["joy", "happiness", "happy", "love", "optimism"][..], Emotion::Happy),
            (
                &[
                    "sadness",
                    "sad",
                    "grief",
                    "disappointment",
                    "loneliness",
                    "down",
                    "depressed",
                    "depression",
                ][..],
                Emotion::Sad,
            ),
            (&["anger", "angry", "rage", "fury", "annoyance"][..], Emotion::Angry),
            (
                &[
                    "fear",
                    "anxious",
                    "anxiety",
                    "worry",
                    "nervous",
                    "nervousness",
                    "stress",
                    "stressed",
                ][..],
                Emotion::Anxious,
            ),
            (&["surprise", "neutral", "confusion"][..], Emotion::Neutral),
        ];
        for (labels, emotion) in expected {
            for label in labels {
                let resolution = mapper.resolve(label);
                assert_eq!(resolution.emotion, emotion, "label {label}");
                assert!(resolution.known, "label {label}");
            }
        }
    }

    #[test]
    fn unknown_labels_are_neutral_and_flagged() {
        let mapper = LabelMapper::default();
        for label in ["admiration", "label_7", ""] {
            let resolution = mapper.resolve(label);
            assert_eq!(resolution.emotion, Emotion::Neutral);
            assert!(!resolution.known);
            assert_eq!(mapper.map(label), Emotion::Neutral);
        }
    }

    #[test]
    fn explicit_neutral_labels_are_not_flagged() {
        let mapper = LabelMapper::default();
        assert!(mapper.resolve("surprise").known);
        assert!(mapper.resolve("confusion").known);
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let mapper = LabelMapper::default();
        assert_eq!(mapper.map("  JOY "), Emotion::Happy);
        assert_eq!(mapper.map("Sadness"), Emotion::Sad);
    }

    #[test]
    fn mapping_is_stable_across_calls() {
        let mapper = LabelMapper::default();
        assert_eq!(mapper.map("fear"), mapper.map("fear"));
    }
}
