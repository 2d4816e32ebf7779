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

use crate::config::KeywordConfig;

/// Number of phrases from each list found in a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub sad: usize,
    pub angry: usize,
    pub anxious: usize,
    pub happy: usize,
}

impl KeywordHits {
    /// Hits for the list belonging to `emotion`. Neutral has no list.
    pub const fn count(&self, emotion: Emotion) -> usize {
        match emotion {
            Emotion::Sad => self.sad,
            Emotion::Angry => self.angry,
            Emotion::Anxious => self.anxious,
            Emotion::Happy => self.happy,
            Emotion::Neutral => 0,
        }
    }

    pub const fn total(&self) -> usize {
        self.sad + self.angry + self.anxious + self.happy
    }
}

#[derive(Debug, Clone)]
pub struct KeywordSet {
    sad: Vec<String>,
    angry: Vec<String>,
    anxious: Vec<String>,
    happy: Vec<String>,
}

impl KeywordSet {
    pub fn new(config: &KeywordConfig) -> Self {
        Self {
            sad: config.sad.clone(),
            angry: config.angry.clone(),
            anxious: config.anxious.clone(),
            happy: config.happy.clone(),
        }
    }

    /// Lower-cases `text` once and counts, per list, the phrases occurring in it.
    /// A phrase present in two lists counts towards both.
    pub fn count_hits(&self, text: &str) -> KeywordHits {
        let lowered = text.to_lowercase();
        KeywordHits {
            sad: count_present(&self.sad, &lowered),
            angry: count_present(&self.angry, &lowered),
            anxious: count_present(&self.anxious, &lowered),
            happy: count_present(&self.happy, &lowered),
        }
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(&crate::config::PipelineConfig::default().keywords)
    }
}

fn count_present(phrases: &[String], lowered: &str) -> usize {
    phrases
        .iter()
        .filter(|phrase| lowered.contains(phrase.as_str()))
        .count()
}
