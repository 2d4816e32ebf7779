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

//! Transformer emotion model exported to ONNX.
//!
//! The model directory must contain `model.onnx`, `tokenizer.json` and the
//! Hugging Face `config.json` carrying `id2label`.

use affect_contracts::{ClassifierError, ClassifierResult, EmotionClassifier, RawClassification};
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::Tokenizer;
use tracing::{debug, info, instrument};

use super::ClassifierLoader;

pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

pub struct OnnxEmotionClassifier {
    session: Session,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    max_tokens: usize,
}

impl OnnxEmotionClassifier {
    #[instrument(skip_all, fields(model_dir = %model_dir.display()))]
    pub fn from_dir(model_dir: &Path, max_tokens: usize) -> ClassifierResult<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        for path in [&model_path, &tokenizer_path] {
            if !path.exists() {
                return Err(ClassifierError::model_unavailable(format!(
                    "{} not found",
                    path.display()
                )));
            }
        }

        let labels = load_labels(&model_dir.join(CONFIG_FILE))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            ClassifierError::model_unavailable(format!(
                "failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            ))
        })?;

        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.commit_from_file(&model_path))
            .map_err(|e| {
                ClassifierError::model_unavailable(format!(
                    "failed to load model {}: {e}",
                    model_path.display()
                ))
            })?;

        info!(
            "Loaded ONNX emotion model with {} labels from {}",
            labels.len(),
            model_dir.display()
        );
        Ok(Self {
            session,
            tokenizer,
            labels,
            max_tokens,
        })
    }

    fn encode(&self, text: &str) -> ClassifierResult<(Array2<i64>, Array2<i64>)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::tokenisation(e.to_string()))?;

        let len = encoding.get_ids().len().min(self.max_tokens).max(1);
        let ids: Vec<i64> = encoding
            .get_ids()
            .iter()
            .take(len)
            .map(|&id| i64::from(id))
            .chain(std::iter::repeat(0))
            .take(len)
            .collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .take(len)
            .map(|&m| i64::from(m))
            .chain(std::iter::repeat(1))
            .take(len)
            .collect();

        let to_array = |values: Vec<i64>| {
            Array2::from_shape_vec((1, len), values)
                .map_err(|e| ClassifierError::tokenisation(e.to_string()))
        };
        Ok((to_array(ids)?, to_array(mask)?))
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&self, text: &str) -> ClassifierResult<RawClassification> {
        let (input_ids, attention_mask) = self.encode(text)?;

        let inputs = ort::inputs![
            "input_ids" => input_ids,
            "attention_mask" => attention_mask,
        ]
        .map_err(|e| ClassifierError::inference(e.to_string()))?;
        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| ClassifierError::inference(e.to_string()))?;
        let logits = outputs["logits"]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::invalid_output(e.to_string()))?;

        let row: Vec<f32> = logits.iter().copied().collect();
        let (idx, confidence) = softmax_argmax(&row)
            .ok_or_else(|| ClassifierError::invalid_output("model produced no logits"))?;
        let label = self
            .labels
            .get(idx)
            .cloned()
            .ok_or_else(|| ClassifierError::invalid_output(format!("no label for class {idx}")))?;

        debug!(label = %label, confidence, "ONNX classification");
        Ok(RawClassification::new(label, f64::from(confidence)))
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Loads [`OnnxEmotionClassifier`] from a model directory on first use.
#[derive(Debug, Clone)]
pub struct OnnxLoader {
    model_dir: PathBuf,
    max_tokens: usize,
}

impl OnnxLoader {
    pub fn new<P: Into<PathBuf>>(model_dir: P, max_tokens: usize) -> Self {
        Self {
            model_dir: model_dir.into(),
            max_tokens,
        }
    }
}

impl ClassifierLoader for OnnxLoader {
    fn load(&self) -> ClassifierResult<Arc<dyn EmotionClassifier>> {
        Ok(Arc::new(OnnxEmotionClassifier::from_dir(
            &self.model_dir,
            self.max_tokens,
        )?))
    }
}

fn load_labels(path: &Path) -> ClassifierResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let config: ModelConfig = serde_json::from_str(&content).map_err(|e| {
        ClassifierError::model_unavailable(format!("failed to parse {}: {e}", path.display()))
    })?;
    labels_from_map(config.id2label)
}

fn labels_from_map(id2label: HashMap<String, String>) -> ClassifierResult<Vec<String>> {
    let mut labels = vec![String::new(); id2label.len()];
    for (id, label) in id2label {
        let idx: usize = id.parse().map_err(|_| {
            ClassifierError::model_unavailable(format!("invalid label id '{id}' in id2label"))
        })?;
        let slot = labels.get_mut(idx).ok_or_else(|| {
            ClassifierError::model_unavailable(format!("label id {idx} out of range"))
        })?;
        *slot = label.to_lowercase();
    }
    Ok(labels)
}

/// Index and probability of the most likely class.
fn softmax_argmax(logits: &[f32]) -> Option<(usize, f32)> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return None;
    }
    let exp: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, &p)| (idx, p / sum))
}
