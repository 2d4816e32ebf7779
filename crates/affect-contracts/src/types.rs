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

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::emotion::Emotion;

/// Confidence reported when an analysis degrades to the neutral default.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Top prediction of the underlying model, in the model's own label vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClassification {
    pub label: String,
    pub confidence: f64,
}

impl RawClassification {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub emotion: Emotion,
    pub sentiment_score: f64,
    pub confidence: f64,
}

impl AnalysisResult {
    pub const fn new(emotion: Emotion, sentiment_score: f64, confidence: f64) -> Self {
        Self {
            emotion,
            sentiment_score,
            confidence,
        }
    }

    /// Result handed back when classification fails for a single call.
    pub const fn neutral_fallback() -> Self {
        Self::new(Emotion::Neutral, 0.0, FALLBACK_CONFIDENCE)
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Tokenisation failed: {0}")]
    Tokenisation(String),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;

impl ClassifierError {
    pub fn model_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::ModelUnavailable(msg.into())
    }
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }
    pub fn tokenisation<S: Into<String>>(msg: S) -> Self {
        Self::Tokenisation(msg.into())
    }
    pub fn invalid_output<S: Into<String>>(msg: S) -> Self {
        Self::InvalidOutput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_neutral_with_half_confidence() {
        let fallback = AnalysisResult::neutral_fallback();
        assert_eq!(fallback.emotion, Emotion::Neutral);
        assert_eq!(fallback.sentiment_score, 0.0);
        assert_eq!(fallback.confidence, 0.5);
    }

    #[test]
    fn analysis_result_serialises_with_lowercase_emotion() {
        let result = AnalysisResult::new(Emotion::Sad, -0.63, 0.9);
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["emotion"], "sad");
        assert_eq!(value["confidence"], 0.9);
    }
}
