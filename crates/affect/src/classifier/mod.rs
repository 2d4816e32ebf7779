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

//! Classifier backends and the adapter that normalises their output.

pub mod lexicon;
#[cfg(feature = "onnx")]
pub mod onnx;

use affect_contracts::{ClassifierError, ClassifierResult, EmotionClassifier, RawClassification};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub use lexicon::{LexiconClassifier, LexiconLoader};
#[cfg(feature = "onnx")]
pub use onnx::{OnnxEmotionClassifier, OnnxLoader};

/// Builds the classifier backend. Invoked at most once per analyzer.
pub trait ClassifierLoader: Send + Sync {
    fn load(&self) -> ClassifierResult<Arc<dyn EmotionClassifier>>;
}

impl<F> ClassifierLoader for F
where
    F: Fn() -> ClassifierResult<Arc<dyn EmotionClassifier>> + Send + Sync,
{
    fn load(&self) -> ClassifierResult<Arc<dyn EmotionClassifier>> {
        self()
    }
}

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Wraps a backend with input truncation and output validation.
#[derive(Clone)]
pub struct ClassifierAdapter {
    backend: Arc<dyn EmotionClassifier>,
    max_length: usize,
}

impl ClassifierAdapter {
    pub fn new(backend: Arc<dyn EmotionClassifier>, max_length: usize) -> Self {
        Self {
            backend,
            max_length,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn truncate<'a>(&self, text: &'a str) -> &'a str {
        truncate_chars(text, self.max_length)
    }

    /// Classifies the truncated text. A panicking backend is reported as an
    /// inference error; the label comes back trimmed and lower-cased.
    pub fn classify(&self, text: &str) -> ClassifierResult<RawClassification> {
        let input = self.truncate(text);
        let raw = catch_unwind(AssertUnwindSafe(|| self.backend.classify(input)))
            .map_err(|payload| {
                ClassifierError::inference(format!(
                    "{} panicked: {}",
                    self.backend.name(),
                    panic_message(payload.as_ref())
                ))
            })??;

        if !raw.confidence.is_finite() || !(0.0..=1.0).contains(&raw.confidence) {
            return Err(ClassifierError::invalid_output(format!(
                "confidence {} outside [0, 1]",
                raw.confidence
            )));
        }
        Ok(RawClassification::new(
            raw.label.trim().to_lowercase(),
            raw.confidence,
        ))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
