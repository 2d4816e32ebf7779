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

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::error::{JournalError, Result};
use crate::stats::round2;
use crate::validation::{validate_goal_description, validate_goal_title};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    DailyCheckin,
    MoodImprovement,
    Gratitude,
    #[default]
    Custom,
}

impl GoalType {
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DailyCheckin => "Daily Check-in",
            Self::MoodImprovement => "Mood Improvement",
            Self::Gratitude => "Gratitude Journaling",
            Self::Custom => "Custom Goal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub goal_type: GoalType,
    pub target_value: u32,
    #[serde(default)]
    pub current_value: u32,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

impl Goal {
    /// Validates the title and optional description and returns a fresh goal.
    pub fn new(
        title: &str,
        description: &str,
        goal_type: GoalType,
        target_value: u32,
        start_date: NaiveDate,
        target_date: NaiveDate,
    ) -> Result<Self> {
        let title = validate_goal_title(title)?;
        let description = if description.trim().is_empty() {
            String::new()
        } else {
            validate_goal_description(description)?
        };
        if target_date < start_date {
            return Err(JournalError::InvalidRange {
                start: start_date,
                end: target_date,
            });
        }
        Ok(Self {
            title,
            description,
            goal_type,
            target_value,
            current_value: 0,
            start_date,
            target_date,
            completed: false,
        })
    }

    /// Percentage towards the target, capped at 100 and rounded to two places.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_value == 0 {
            return 0.0;
        }
        let progress = f64::from(self.current_value) / f64::from(self.target_value) * 100.0;
        round2(progress.min(100.0))
    }

    /// Negative once the target date has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.days_remaining(today) < 0
    }

    pub fn record_progress(&mut self, amount: u32) {
        self.current_value = self.current_value.saturating_add(amount);
    }

    pub fn complete(&mut self) {
        self.completed = true;
        self.current_value = self.target_value;
        info!(title = %self.title, "Goal marked as completed");
    }

    pub fn progress(&self, today: NaiveDate) -> GoalProgress {
        GoalProgress {
            progress_percentage: self.progress_percentage(),
            days_remaining: self.days_remaining(today),
            is_overdue: self.is_overdue(today),
        }
    }
}

/// Derived fields shown alongside a goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub progress_percentage: f64,
    pub days_remaining: i64,
    pub is_overdue: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    All,
    Active,
    Completed,
    Overdue,
}

impl GoalStatus {
    pub fn matches(self, goal: &Goal, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Completed => goal.completed,
            Self::Active => !goal.completed && goal.target_date >= today,
            Self::Overdue => !goal.completed && goal.target_date < today,
        }
    }

    pub fn filter<'a>(self, goals: &'a [Goal], today: NaiveDate) -> Vec<&'a Goal> {
        goals.iter().filter(|g| self.matches(g, today)).collect()
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        })
    }
}

impl FromStr for GoalStatus {
    type Err = std::convert::Infallible;

    /// Unrecognised filters fall back to `All`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            "overdue" => Self::Overdue,
            _ => Self::All,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn goal(target: u32, current: u32, target_date: NaiveDate) -> Goal {
        let mut goal = Goal::new(
            "Check in daily",
            "",
            GoalType::DailyCheckin,
            target,
            date(1, 1),
            target_date,
        )
        .unwrap();
        goal.current_value = current;
        goal
    }

    #[test]
    fn progress_is_capped_and_rounded() {
        assert_eq!(goal(3, 1, date(2, 1)).progress_percentage(), 33.33);
        assert_eq!(goal(10, 25, date(2, 1)).progress_percentage(), 100.0);
        assert_eq!(goal(0, 5, date(2, 1)).progress_percentage(), 0.0);
    }

    #[test]
    fn days_remaining_and_overdue() {
        let g = goal(30, 4, date(2, 1));
        assert_eq!(g.days_remaining(date(1, 20)), 12);
        assert!(!g.is_overdue(date(2, 1)));
        assert_eq!(g.days_remaining(date(2, 3)), -2);
        assert!(g.is_overdue(date(2, 3)));
    }

    #[test]
    fn completing_fills_progress_and_clears_overdue() {
        let mut g = goal(30, 4, date(2, 1));
        g.complete();
        assert_eq!(g.current_value, 30);
        assert_eq!(g.progress_percentage(), 100.0);
        assert!(!g.is_overdue(date(3, 1)));
    }

    #[test]
    fn status_filters() {
        let today = date(1, 15);
        let mut done = goal(5, 5, date(1, 10));
        done.complete();
        let goals = vec![goal(5, 1, date(1, 20)), goal(5, 1, date(1, 10)), done];

        assert_eq!(GoalStatus::All.filter(&goals, today).len(), 3);
        assert_eq!(GoalStatus::Active.filter(&goals, today)[0].target_date, date(1, 20));
        assert_eq!(GoalStatus::Overdue.filter(&goals, today)[0].target_date, date(1, 10));
        assert!(GoalStatus::Completed.filter(&goals, today)[0].completed);
    }

    #[test]
    fn active_includes_goals_due_today() {
        assert!(GoalStatus::Active.matches(&goal(5, 0, date(1, 15)), date(1, 15)));
    }

    #[test]
    fn status_parsing_defaults_to_all() {
        assert_eq!("Overdue".parse::<GoalStatus>(), Ok(GoalStatus::Overdue));
        assert_eq!("whatever".parse::<GoalStatus>(), Ok(GoalStatus::All));
    }

    #[test]
    fn rejects_invalid_goals() {
        assert!(matches!(
            Goal::new("ok", "", GoalType::Custom, 1, date(1, 1), date(1, 2)),
            Err(JournalError::TooShort { .. })
        ));
        assert!(matches!(
            Goal::new("Run", "too short", GoalType::Custom, 1, date(1, 1), date(1, 2)),
            Err(JournalError::TooShort { .. })
        ));
        assert!(matches!(
            Goal::new("Run more", "", GoalType::Custom, 1, date(2, 1), date(1, 2)),
            Err(JournalError::InvalidRange { .. })
        ));
    }

    #[test]
    fn goal_type_serialises_snake_case() {
        assert_eq!(
            serde_json::to_value(GoalType::MoodImprovement).unwrap(),
            "mood_improvement"
        );
        assert_eq!(GoalType::Gratitude.display_name(), "Gratitude Journaling");
    }
}
