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
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::display::emotion_color;
use crate::error::{JournalError, Result};
use crate::validation::validate_checkin_note;

/// Days covered by the calendar when no start date is given.
pub const DEFAULT_CALENDAR_DAYS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub date: NaiveDate,
    pub emotion: Emotion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CheckIn {
    pub fn new(date: NaiveDate, emotion: Emotion, note: Option<&str>) -> Result<Self> {
        Ok(Self {
            date,
            emotion,
            note: validate_checkin_note(note)?,
        })
    }

    pub const fn color(&self) -> &'static str {
        emotion_color(self.emotion)
    }
}

/// The check-in already recorded for `date`, if any. A user has at most one per day.
pub fn find_for_date(checkins: &[CheckIn], date: NaiveDate) -> Option<&CheckIn> {
    checkins.iter().find(|c| c.date == date)
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| JournalError::invalid_date(value))
}

/// Inclusive date range for the check-in calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CalendarWindow {
    /// `end` defaults to `today`, `start` to thirty days before `end`.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self> {
        let end = end.unwrap_or(today);
        let start = start.unwrap_or_else(|| {
            end.checked_sub_days(Days::new(DEFAULT_CALENDAR_DAYS))
                .unwrap_or(NaiveDate::MIN)
        });
        if start > end {
            return Err(JournalError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Like [`resolve`](Self::resolve) for optional `YYYY-MM-DD` strings.
    pub fn parse(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<Self> {
        let start = start.map(parse_date).transpose()?;
        let end = end.map(parse_date).transpose()?;
        Self::resolve(start, end, today)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }

    /// Check-ins inside the window, oldest first.
    pub fn select<'a>(&self, checkins: &'a [CheckIn]) -> Vec<&'a CheckIn> {
        let mut selected: Vec<&CheckIn> = checkins
            .iter()
            .filter(|c| self.contains(c.date))
            .collect();
        selected.sort_by_key(|c| c.date);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn default_window_is_thirty_days_back() {
        let window = CalendarWindow::resolve(None, None, date(3, 31)).unwrap();
        assert_eq!(window.start, date(3, 1));
        assert_eq!(window.end, date(3, 31));
    }

    #[test]
    fn start_defaults_relative_to_end() {
        let window = CalendarWindow::resolve(None, Some(date(2, 10)), date(3, 31)).unwrap();
        assert_eq!(window.start, date(1, 11));
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert_eq!(
            CalendarWindow::resolve(Some(date(3, 2)), Some(date(3, 1)), date(3, 31)),
            Err(JournalError::InvalidRange {
                start: date(3, 2),
                end: date(3, 1)
            })
        );
    }

    #[test]
    fn parses_iso_dates() {
        let window =
            CalendarWindow::parse(Some("2024-03-01"), Some("2024-03-05"), date(4, 1)).unwrap();
        assert!(window.contains(date(3, 5)));
        assert!(!window.contains(date(3, 6)));
        assert_eq!(
            CalendarWindow::parse(Some("03/01/2024"), None, date(4, 1)),
            Err(JournalError::InvalidDate("03/01/2024".into()))
        );
    }

    #[test]
    fn selects_and_orders_checkins() {
        let checkins = vec![
            CheckIn::new(date(3, 4), Emotion::Sad, None).unwrap(),
            CheckIn::new(date(2, 1), Emotion::Happy, None).unwrap(),
            CheckIn::new(date(3, 2), Emotion::Happy, Some("sunny")).unwrap(),
        ];
        let window =
            CalendarWindow::resolve(Some(date(3, 1)), Some(date(3, 31)), date(3, 31)).unwrap();
        let dates: Vec<NaiveDate> = window.select(&checkins).iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![date(3, 2), date(3, 4)]);
    }

    #[test]
    fn finds_existing_checkin_for_day() {
        let checkins =
            vec![CheckIn::new(date(3, 4), Emotion::Anxious, Some("<b>exam</b>")).unwrap()];
        let found = find_for_date(&checkins, date(3, 4)).unwrap();
        assert_eq!(found.note.as_deref(), Some("exam"));
        assert_eq!(found.color(), "#f59e0b");
        assert!(find_for_date(&checkins, date(3, 5)).is_none());
    }
}
