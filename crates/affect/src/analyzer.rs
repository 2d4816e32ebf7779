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

//! Analysis facade: classifier, label mapping, overrides and scoring behind one call.
//!
//! The classifier is built lazily on first use and shared by every later
//! call. A failed initialisation is remembered and returned to every caller;
//! it is never retried by the same analyzer. Failures of individual
//! classifications degrade to [`AnalysisResult::neutral_fallback`].

use affect_contracts::{AnalysisResult, Emotion};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info, instrument, warn};

use crate::classifier::{ClassifierAdapter, ClassifierLoader, LexiconLoader};
use crate::config::PipelineConfig;
use crate::error::{AnalyzerError, Result};
use crate::labels::LabelMapper;
use crate::metrics::{MetricsSnapshot, PipelineMetrics};
use crate::overrides::OverrideEngine;
use crate::responses::ResponseGenerator;
use crate::scoring::SentimentScorer;
use crate::wellness::{WellnessLibrary, WellnessTip};

/// An analysis together with the reply generated for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisWithResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub response: String,
}

pub struct EmotionAnalyzer {
    loader: Box<dyn ClassifierLoader>,
    adapter: OnceCell<std::result::Result<ClassifierAdapter, String>>,
    max_length: usize,
    mapper: LabelMapper,
    overrides: OverrideEngine,
    scorer: SentimentScorer,
    responses: ResponseGenerator,
    wellness: WellnessLibrary,
    metrics: PipelineMetrics,
}

impl EmotionAnalyzer {
    pub fn new<L>(config: &PipelineConfig, loader: L) -> Self
    where
        L: ClassifierLoader + 'static,
    {
        Self {
            loader: Box::new(loader),
            adapter: OnceCell::new(),
            max_length: config.settings.classifier.max_length,
            mapper: LabelMapper::new(&config.labels),
            overrides: OverrideEngine::from_config(config),
            scorer: SentimentScorer::new(config.settings.sentiment),
            responses: ResponseGenerator::from_config(&config.responses),
            wellness: WellnessLibrary::new(config.wellness.clone()),
            metrics: PipelineMetrics::default(),
        }
    }

    pub fn with_lexicon(config: &PipelineConfig) -> Self {
        Self::new(config, LexiconLoader)
    }

    /// Builds the classifier if that has not happened yet. Safe to call from
    /// several threads; the loader runs once.
    pub fn initialise(&self) -> Result<()> {
        self.adapter().map(|_| ())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.adapter.get(), Some(Ok(_)))
    }

    pub fn backend_name(&self) -> Option<&str> {
        match self.adapter.get() {
            Some(Ok(adapter)) => Some(adapter.backend_name()),
            _ => None,
        }
    }

    fn adapter(&self) -> Result<&ClassifierAdapter> {
        self.adapter
            .get_or_init(|| {
                let loaded = catch_unwind(AssertUnwindSafe(|| self.loader.load()));
                match loaded {
                    Ok(Ok(backend)) => {
                        info!("Emotion classifier '{}' initialised", backend.name());
                        Ok(ClassifierAdapter::new(backend, self.max_length))
                    }
                    Ok(Err(e)) => {
                        error!("Failed to initialise emotion classifier: {}", e);
                        Err(e.to_string())
                    }
                    Err(_) => {
                        error!("Emotion classifier loader panicked");
                        Err("classifier loader panicked".to_string())
                    }
                }
            })
            .as_ref()
            .map_err(|e| AnalyzerError::ClassifierUnavailable(e.clone()))
    }

    /// Runs classifier, label mapping, overrides and scoring in that order.
    ///
    /// Errors only when the classifier cannot be initialised. Any failure of
    /// the classification itself yields the neutral fallback.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let adapter = self.adapter()?;
        self.metrics.record_analysis();

        let text = adapter.truncate(text);
        let raw = match adapter.classify(text) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Emotion classification failed, using neutral fallback");
                self.metrics.record_degraded();
                return Ok(AnalysisResult::neutral_fallback());
            }
        };

        let resolution = self.mapper.resolve(&raw.label);
        if !resolution.known {
            warn!(
                label = %raw.label,
                "Unmapped emotion label '{}' - defaulting to neutral", raw.label
            );
            self.metrics.record_unmapped_label();
        }

        let outcome = self
            .overrides
            .apply(text, resolution.emotion, raw.confidence);
        if outcome.rule.is_some() {
            self.metrics.record_override();
        }

        let score = self.scorer.score(outcome.emotion, raw.confidence);
        debug!(
            raw_label = %raw.label,
            emotion = %outcome.emotion,
            score,
            confidence = raw.confidence,
            "Analysis complete"
        );
        Ok(AnalysisResult::new(outcome.emotion, score, raw.confidence))
    }

    pub fn respond(&self, emotion: Emotion, score: f64) -> String {
        self.responses.respond(emotion, score)
    }

    /// Reply for a stored emotion label; unrecognised labels get a neutral reply.
    pub fn respond_label(&self, label: &str, score: f64) -> String {
        self.responses.respond_label(label, score)
    }

    pub fn analyze_with_response(&self, text: &str) -> Result<AnalysisWithResponse> {
        let analysis = self.analyze(text)?;
        let response = self.respond(analysis.emotion, analysis.sentiment_score);
        Ok(AnalysisWithResponse { analysis, response })
    }

    pub fn wellness_tips(&self, emotion: Emotion) -> &[WellnessTip] {
        self.wellness.tips_for(emotion)
    }

    pub fn responses(&self) -> &ResponseGenerator {
        &self.responses
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl std::fmt::Debug for EmotionAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionAnalyzer")
            .field("backend", &self.backend_name())
            .field("max_length", &self.max_length)
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}
