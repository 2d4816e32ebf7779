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
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use crate::config::{PipelineConfig, ResponseConfig};

const LAST_RESORT_REPLY: &str = "Thank you for sharing. I'm here to listen.";

/// Picks a supportive reply for an analysed emotion and appends the safety
/// note for strongly negative scores.
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    templates: HashMap<Emotion, Vec<String>>,
    safety_threshold: f64,
    safety_suffix: String,
}

impl ResponseGenerator {
    pub fn from_config(config: &ResponseConfig) -> Self {
        let templates = config
            .templates
            .iter()
            .map(|(emotion, list)| {
                let list: Vec<String> = list
                    .iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                (*emotion, list)
            })
            .collect();
        Self {
            templates,
            safety_threshold: config.safety_threshold,
            safety_suffix: config.safety_suffix.trim().to_string(),
        }
    }

    pub fn safety_suffix(&self) -> &str {
        &self.safety_suffix
    }

    /// True when `score` is at or below the safety threshold.
    pub fn needs_safety_note(&self, score: f64) -> bool {
        score <= self.safety_threshold
    }

    pub fn respond(&self, emotion: Emotion, score: f64) -> String {
        self.respond_with_rng(emotion, score, &mut rand::thread_rng())
    }

    pub fn respond_with_rng<R: Rng + ?Sized>(
        &self,
        emotion: Emotion,
        score: f64,
        rng: &mut R,
    ) -> String {
        let base = self
            .templates_for(emotion)
            .choose(rng)
            .map_or(LAST_RESORT_REPLY, String::as_str);

        if self.needs_safety_note(score) {
            format!("{base}\n\n{}", self.safety_suffix)
        } else {
            base.to_string()
        }
    }

    /// Like [`respond`](Self::respond) but for a stored label; unrecognised labels use the neutral set.
    pub fn respond_label(&self, label: &str, score: f64) -> String {
        self.respond(Emotion::from_label_lenient(label), score)
    }

    fn templates_for(&self, emotion: Emotion) -> &[String] {
        self.templates
            .get(&emotion)
            .filter(|list| !list.is_empty())
            .or_else(|| self.templates.get(&Emotion::Neutral))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default().responses)
    }
}
