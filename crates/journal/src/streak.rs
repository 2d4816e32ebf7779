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

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GratitudeStats {
    pub total_entries: usize,
    pub current_streak: u32,
}

impl GratitudeStats {
    pub fn compute(timestamps: &[DateTime<Utc>], today: NaiveDate) -> Self {
        Self {
            total_entries: timestamps.len(),
            current_streak: current_streak(timestamps.iter().map(DateTime::date_naive), today),
        }
    }
}

/// Consecutive days with at least one entry, counting back from `today`.
/// Zero when `today` itself has no entry.
pub fn current_streak<I>(days: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: HashSet<NaiveDate> = days.into_iter().collect();
    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn no_entry_today_means_no_streak() {
        assert_eq!(current_streak([day(9), day(8)], day(10)), 0);
        assert_eq!(current_streak([], day(10)), 0);
    }

    #[test]
    fn counts_back_until_a_gap() {
        let days = [day(10), day(9), day(8), day(6), day(5)];
        assert_eq!(current_streak(days, day(10)), 3);
    }

    #[test]
    fn several_entries_per_day_count_once() {
        let days = [day(10), day(10), day(9), day(9), day(9)];
        assert_eq!(current_streak(days, day(10)), 2);
    }

    #[test]
    fn streak_crosses_month_boundaries() {
        let days = [day(1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()];
        assert_eq!(current_streak(days, day(1)), 2);
    }

    #[test]
    fn stats_use_utc_dates() {
        let timestamps = [
            Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 9, 0, 1, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap(),
        ];
        let stats = GratitudeStats::compute(&timestamps, day(10));
        assert_eq!(
            stats,
            GratitudeStats {
                total_entries: 3,
                current_streak: 2
            }
        );
    }
}
