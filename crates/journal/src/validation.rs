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

//! Input limits and sanitisation for user-authored text.
//!
//! Lengths are counted in characters after markup is stripped and the text
//! is trimmed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

use crate::error::{JournalError, Result};

pub const MIN_MOOD_TEXT_LENGTH: usize = 5;
pub const MAX_MOOD_TEXT_LENGTH: usize = 1000;
pub const MIN_GRATITUDE_TEXT_LENGTH: usize = 5;
pub const MAX_GRATITUDE_TEXT_LENGTH: usize = 500;
pub const MIN_GOAL_TITLE_LENGTH: usize = 3;
pub const MAX_GOAL_TITLE_LENGTH: usize = 200;
pub const MIN_GOAL_DESCRIPTION_LENGTH: usize = 10;
pub const MAX_GOAL_DESCRIPTION_LENGTH: usize = 1000;
pub const MAX_CHECKIN_NOTE_LENGTH: usize = 500;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Removes anything that looks like a markup tag, keeping the inner text.
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    TAG_RE.replace_all(text, "")
}

fn clean(text: &str) -> String {
    strip_tags(text).trim().to_string()
}

fn check_length(field: &'static str, text: String, min: usize, max: usize) -> Result<String> {
    let actual = text.chars().count();
    if actual == 0 && min > 0 {
        return Err(JournalError::Empty { field });
    }
    if actual < min {
        return Err(JournalError::TooShort { field, min, actual });
    }
    if actual > max {
        return Err(JournalError::TooLong { field, max, actual });
    }
    Ok(text)
}

/// Sanitised mood entry text ready for analysis.
pub fn validate_mood_text(text: &str) -> Result<String> {
    check_length("text", clean(text), MIN_MOOD_TEXT_LENGTH, MAX_MOOD_TEXT_LENGTH)
}

pub fn validate_gratitude_text(text: &str) -> Result<String> {
    check_length(
        "gratitude text",
        clean(text),
        MIN_GRATITUDE_TEXT_LENGTH,
        MAX_GRATITUDE_TEXT_LENGTH,
    )
}

pub fn validate_goal_title(title: &str) -> Result<String> {
    check_length(
        "goal title",
        clean(title),
        MIN_GOAL_TITLE_LENGTH,
        MAX_GOAL_TITLE_LENGTH,
    )
}

pub fn validate_goal_description(description: &str) -> Result<String> {
    check_length(
        "goal description",
        clean(description),
        MIN_GOAL_DESCRIPTION_LENGTH,
        MAX_GOAL_DESCRIPTION_LENGTH,
    )
}

/// Notes are optional; blank input becomes `None`.
pub fn validate_checkin_note(note: Option<&str>) -> Result<Option<String>> {
    match note.map(clean) {
        None => Ok(None),
        Some(n) if n.is_empty() => Ok(None),
        Some(n) => check_length("note", n, 0, MAX_CHECKIN_NOTE_LENGTH).map(Some),
    }
}
