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

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod error;
pub mod keywords;
pub mod labels;
pub mod metrics;
pub mod overrides;
pub mod responses;
pub mod scoring;
pub mod wellness;

pub use affect_contracts::{
    AnalysisResult, ClassifierError, ClassifierResult, Emotion, EmotionClassifier,
    RawClassification,
};
pub use analyzer::{AnalysisWithResponse, EmotionAnalyzer};
pub use classifier::{ClassifierAdapter, ClassifierLoader, LexiconClassifier, LexiconLoader};
#[cfg(feature = "onnx")]
pub use classifier::{OnnxEmotionClassifier, OnnxLoader};
pub use config::PipelineConfig;
pub use error::{AnalyzerError, ConfigError, Result};
pub use labels::LabelMapper;
pub use metrics::MetricsSnapshot;
pub use overrides::{OverrideEngine, OverrideRule};
pub use responses::ResponseGenerator;
pub use scoring::SentimentScorer;
pub use wellness::{TipCategory, WellnessLibrary, WellnessTip};
