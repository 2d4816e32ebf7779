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

//! Aggregate statistics over a user's mood history.

use affect_contracts::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entries compared on each side of the trend window.
pub const TREND_WINDOW: usize = 10;
/// Fewer recent entries than this and no trend is reported.
pub const MIN_TREND_ENTRIES: usize = 5;
/// Average difference needed to call a trend improving or declining.
pub const TREND_DELTA: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub emotion: Emotion,
    pub sentiment_score: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
    NewUser,
    NoData,
}

impl Trend {
    /// Compares the mean of the newest scores with the mean of the window before it.
    /// `scores` must be ordered newest first.
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::NoData;
        }
        let recent = &scores[..scores.len().min(TREND_WINDOW)];
        let previous = scores
            .get(TREND_WINDOW..scores.len().min(2 * TREND_WINDOW))
            .unwrap_or_default();

        if recent.len() < MIN_TREND_ENTRIES {
            return Self::InsufficientData;
        }
        if previous.is_empty() {
            return Self::NewUser;
        }

        let diff = mean(recent) - mean(previous);
        if diff > TREND_DELTA {
            Self::Improving
        } else if diff < -TREND_DELTA {
            Self::Declining
        } else {
            Self::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodStats {
    pub total_entries: usize,
    pub emotion_breakdown: BTreeMap<Emotion, usize>,
    pub average_sentiment: f64,
    pub recent_trend: Trend,
}

impl MoodStats {
    pub fn empty() -> Self {
        Self {
            total_entries: 0,
            emotion_breakdown: BTreeMap::new(),
            average_sentiment: 0.0,
            recent_trend: Trend::NoData,
        }
    }

    pub fn compute(records: &[MoodRecord]) -> Self {
        if records.is_empty() {
            return Self::empty();
        }

        let mut emotion_breakdown = BTreeMap::new();
        for record in records {
            *emotion_breakdown.entry(record.emotion).or_insert(0) += 1;
        }

        let mut ordered: Vec<&MoodRecord> = records.iter().collect();
        ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let scores: Vec<f64> = ordered.iter().map(|r| r.sentiment_score).collect();

        Self {
            total_entries: records.len(),
            emotion_breakdown,
            average_sentiment: round2(mean(&scores)),
            recent_trend: Trend::from_scores(&scores),
        }
    }

    /// Most frequent emotion; ties resolve to the first in canonical order.
    pub fn dominant_emotion(&self) -> Option<Emotion> {
        let mut best: Option<(Emotion, usize)> = None;
        for (&emotion, &count) in &self.emotion_breakdown {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((emotion, count));
            }
        }
        best.map(|(emotion, _)| emotion)
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
