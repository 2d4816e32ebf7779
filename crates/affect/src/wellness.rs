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
use serde::{Deserialize, Serialize};

use crate::config::WellnessConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    BreathingExercises,
    Activities,
    Affirmations,
    Resources,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessTip {
    pub title: String,
    pub description: String,
    pub category: TipCategory,
}

pub struct WellnessLibrary {
    tips: WellnessConfig,
}

impl WellnessLibrary {
    pub fn new(tips: WellnessConfig) -> Self {
        Self { tips }
    }

    /// Tips for `emotion`, or the neutral set when none are configured.
    pub fn tips_for(&self, emotion: Emotion) -> &[WellnessTip] {
        self.tips
            .get(&emotion)
            .filter(|tips| !tips.is_empty())
            .or_else(|| self.tips.get(&Emotion::Neutral))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn tips_for_label(&self, label: &str) -> &[WellnessTip] {
        self.tips_for(Emotion::from_label_lenient(label))
    }

    pub fn tips_in_category(&self, emotion: Emotion, category: TipCategory) -> Vec<&WellnessTip> {
        self.tips_for(emotion)
            .iter()
            .filter(|tip| tip.category == category)
            .collect()
    }
}
