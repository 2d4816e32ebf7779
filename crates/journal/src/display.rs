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
use chrono::{DateTime, Utc};

pub const DEFAULT_TRUNCATE_LENGTH: usize = 100;

pub const fn emotion_color(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Happy => "#10b981",
        Emotion::Sad => "#3b82f6",
        Emotion::Angry => "#ef4444",
        Emotion::Anxious => "#f59e0b",
        Emotion::Neutral => "#6b7280",
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// "Just now", "5 minutes ago", "1 week ago" and so on. Future timestamps read as "Just now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    let days = diff.num_days();
    if diff.num_minutes() < 1 {
        "Just now".to_string()
    } else if diff.num_hours() < 1 {
        plural(diff.num_minutes(), "minute")
    } else if days < 1 {
        plural(diff.num_hours(), "hour")
    } else if days < 7 {
        plural(days, "day")
    } else if days < 30 {
        plural(days / 7, "week")
    } else if days < 365 {
        plural(days / 30, "month")
    } else {
        plural(days / 365, "year")
    }
}

/// Short form used in lists: "Just now", "12m ago", "3h ago", "9d ago".
pub fn time_ago_compact(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    if diff.num_hours() < 1 {
        match diff.num_minutes() {
            m if m > 0 => format!("{m}m ago"),
            _ => "Just now".to_string(),
        }
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else {
        format!("{}d ago", diff.num_days())
    }
}

/// Shortens `text` to at most `max` characters, ending with "..." when cut.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn humanises_elapsed_time() {
        let cases = [
            (Duration::seconds(30), "Just now"),
            (Duration::minutes(1), "1 minute ago"),
            (Duration::minutes(59), "59 minutes ago"),
            (Duration::hours(1), "1 hour ago"),
            (Duration::hours(23), "23 hours ago"),
            (Duration::days(1), "1 day ago"),
            (Duration::days(6), "6 days ago"),
            (Duration::days(7), "1 week ago"),
            (Duration::days(29), "4 weeks ago"),
            (Duration::days(30), "1 month ago"),
            (Duration::days(364), "12 months ago"),
            (Duration::days(365), "1 year ago"),
            (Duration::days(800), "2 years ago"),
        ];
        for (elapsed, expected) in cases {
            assert_eq!(time_ago(now() - elapsed, now()), expected);
        }
        assert_eq!(time_ago(now() + Duration::hours(2), now()), "Just now");
    }

    #[test]
    fn compact_form() {
        assert_eq!(time_ago_compact(now() - Duration::seconds(20), now()), "Just now");
        assert_eq!(time_ago_compact(now() - Duration::minutes(12), now()), "12m ago");
        assert_eq!(time_ago_compact(now() - Duration::hours(3), now()), "3h ago");
        assert_eq!(time_ago_compact(now() - Duration::days(9), now()), "9d ago");
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_text("a much longer sentence", 10), "a much ...");
        assert_eq!(truncate_text("ünïcödé text", 8), "ünïcö...");
        assert_eq!(truncate_text("abcdef", 2), "...");
    }

    #[test]
    fn colours_cover_every_emotion() {
        assert_eq!(emotion_color(Emotion::Happy), "#10b981");
        assert_eq!(emotion_color(Emotion::Neutral), "#6b7280");
        for emotion in Emotion::ALL {
            assert!(emotion_color(emotion).starts_with('#'));
        }
    }
}
