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

//! Pure computations over journal records owned by the caller: mood
//! statistics, gratitude streaks, goals, check-in calendars, pagination and
//! display helpers. Nothing here performs I/O.

pub mod checkin;
pub mod display;
pub mod error;
pub mod goals;
pub mod pagination;
pub mod preferences;
pub mod stats;
pub mod streak;
pub mod validation;

pub use checkin::{find_for_date, CalendarWindow, CheckIn};
pub use display::{emotion_color, time_ago, time_ago_compact, truncate_text};
pub use error::{JournalError, Result};
pub use goals::{Goal, GoalProgress, GoalStatus, GoalType};
pub use pagination::{Page, PageRequest, PageWindow};
pub use preferences::{Preferences, PreferencesUpdate, Theme};
pub use stats::{MoodRecord, MoodStats, Trend};
pub use streak::{current_streak, GratitudeStats};
