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

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

fn default_reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub reminder_enabled: bool,
    #[serde(default = "default_reminder_time")]
    pub reminder_time: NaiveTime,
    #[serde(default)]
    pub notification_enabled: bool,
    #[serde(default)]
    pub preferred_theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            reminder_enabled: false,
            reminder_time: default_reminder_time(),
            notification_enabled: false,
            preferred_theme: Theme::Auto,
        }
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PreferencesUpdate {
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<NaiveTime>,
    pub notification_enabled: Option<bool>,
    pub preferred_theme: Option<Theme>,
}

impl Preferences {
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(v) = update.reminder_enabled {
            self.reminder_enabled = v;
        }
        if let Some(v) = update.reminder_time {
            self.reminder_time = v;
        }
        if let Some(v) = update.notification_enabled {
            self.notification_enabled = v;
        }
        if let Some(v) = update.preferred_theme {
            self.preferred_theme = v;
        }
    }
}
