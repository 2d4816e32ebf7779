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
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The five canonical emotion categories used by every downstream stage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Anxious,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown emotion: {0}")]
pub struct ParseEmotionError(pub String);

impl Emotion {
    pub const ALL: [Self; 5] = [
        Self::Happy,
        Self::Sad,
        Self::Angry,
        Self::Anxious,
        Self::Neutral,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Anxious => "anxious",
            Self::Neutral => "neutral",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Anxious => "Anxious",
            Self::Neutral => "Neutral",
        }
    }

    /// Parses a stored emotion string, treating anything unrecognised as neutral.
    pub fn from_label_lenient(label: &str) -> Self {
        label.parse().unwrap_or(Self::Neutral)
    }

    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Sad | Self::Angry | Self::Anxious)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = ParseEmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Self::Happy),
            "sad" => Ok(Self::Sad),
            "angry" => Ok(Self::Angry),
            "anxious" => Ok(Self::Anxious),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseEmotionError(s.to_string())),
        }
    }
}
