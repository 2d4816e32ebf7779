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

use crate::config::SentimentBases;

#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentScorer {
    bases: SentimentBases,
}

impl SentimentScorer {
    pub const fn new(bases: SentimentBases) -> Self {
        Self { bases }
    }

    /// `base(emotion) * confidence` clamped to [-1, 1]. Out-of-range confidence
    /// is multiplied as given; NaN scores 0.
    pub fn score(&self, emotion: Emotion, confidence: f64) -> f64 {
        let raw = self.bases.base(emotion) * confidence;
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(-1.0, 1.0)
    }
}
