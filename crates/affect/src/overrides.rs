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

//! Keyword-driven corrections applied to the mapped emotion.
//!
//! Rules form an ordered decision table. They are evaluated top to bottom and
//! the first rule that produces an emotion wins; if none fires the mapped
//! emotion passes through unchanged. The default table is:
//!
//! | order | rule               | fires when                                             | result   |
//! |-------|--------------------|--------------------------------------------------------|----------|
//! | A     | `sad_rescue`       | sad hits > 0 and mapped is happy                       | sad      |
//! | B     | `angry_rescue`     | angry hits > 0 and mapped is not angry or sad          | angry    |
//! | C     | `anxious_rescue`   | anxious hits > 0 and mapped is not anxious or sad      | anxious  |
//! | D     | `low_confidence`   | confidence below threshold and one list has a majority | majority |

use affect_contracts::Emotion;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::keywords::{KeywordHits, KeywordSet};

/// Everything a rule may inspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideContext {
    pub hits: KeywordHits,
    pub mapped: Emotion,
    pub confidence: f64,
}

pub trait OverrideRule: Send + Sync {
    fn name(&self) -> &str;

    /// The corrected emotion, or `None` to defer to the next rule.
    fn apply(&self, ctx: &OverrideContext) -> Option<Emotion>;
}

/// Which mapped emotions a rescue rule is allowed to replace.
#[derive(Debug, Clone)]
pub enum MappedFilter {
    Only(Vec<Emotion>),
    Except(Vec<Emotion>),
}

impl MappedFilter {
    fn admits(&self, mapped: Emotion) -> bool {
        match self {
            Self::Only(set) => set.contains(&mapped),
            Self::Except(set) => !set.contains(&mapped),
        }
    }
}

/// Forces `target` when its keyword list matched and the mapped emotion passes the filter.
#[derive(Debug, Clone)]
pub struct KeywordRescue {
    name: String,
    target: Emotion,
    filter: MappedFilter,
}

impl KeywordRescue {
    pub fn new<S: Into<String>>(name: S, target: Emotion, filter: MappedFilter) -> Self {
        Self {
            name: name.into(),
            target,
            filter,
        }
    }
}

impl OverrideRule for KeywordRescue {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, ctx: &OverrideContext) -> Option<Emotion> {
        (ctx.hits.count(self.target) > 0 && self.filter.admits(ctx.mapped)).then_some(self.target)
    }
}

/// Majority vote over the negative keyword lists when the model is unsure.
/// Ties never override.
#[derive(Debug, Clone, Copy)]
pub struct LowConfidenceVote {
    threshold: f64,
}

impl LowConfidenceVote {
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl OverrideRule for LowConfidenceVote {
    fn name(&self) -> &str {
        "low_confidence"
    }

    fn apply(&self, ctx: &OverrideContext) -> Option<Emotion> {
        if ctx.confidence.is_nan() || ctx.confidence >= self.threshold {
            return None;
        }
        let KeywordHits {
            sad,
            angry,
            anxious,
            happy,
        } = ctx.hits;
        if sad > angry && sad > anxious && sad > happy {
            Some(Emotion::Sad)
        } else if angry > sad && angry > anxious {
            Some(Emotion::Angry)
        } else if anxious > sad && anxious > angry {
            Some(Emotion::Anxious)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideOutcome {
    pub emotion: Emotion,
    /// Name of the rule that fired, if any.
    pub rule: Option<String>,
}

pub struct OverrideEngine {
    keywords: KeywordSet,
    rules: Vec<Box<dyn OverrideRule>>,
}

impl OverrideEngine {
    pub fn new(keywords: KeywordSet, rules: Vec<Box<dyn OverrideRule>>) -> Self {
        Self { keywords, rules }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            KeywordSet::new(&config.keywords),
            default_rules(config.settings.overrides.low_confidence_threshold),
        )
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn apply(&self, text: &str, mapped: Emotion, confidence: f64) -> OverrideOutcome {
        let ctx = OverrideContext {
            hits: self.keywords.count_hits(text),
            mapped,
            confidence,
        };
        for rule in &self.rules {
            if let Some(emotion) = rule.apply(&ctx) {
                debug!(
                    rule = rule.name(),
                    from = %mapped,
                    to = %emotion,
                    "Override rule fired"
                );
                return OverrideOutcome {
                    emotion,
                    rule: Some(rule.name().to_string()),
                };
            }
        }
        OverrideOutcome {
            emotion: mapped,
            rule: None,
        }
    }

    pub fn resolve(&self, text: &str, mapped: Emotion, confidence: f64) -> Emotion {
        self.apply(text, mapped, confidence).emotion
    }
}

impl Default for OverrideEngine {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

pub fn default_rules(low_confidence_threshold: f64) -> Vec<Box<dyn OverrideRule>> {
    vec![
        Box::new(KeywordRescue::new(
            "sad_rescue",
            Emotion::Sad,
            MappedFilter::Only(vec![Emotion::Happy]),
        )),
        Box::new(KeywordRescue::new(
            "angry_rescue",
            Emotion::Angry,
            MappedFilter::Except(vec![Emotion::Angry, Emotion::Sad]),
        )),
        Box::new(KeywordRescue::new(
            "anxious_rescue",
            Emotion::Anxious,
            MappedFilter::Except(vec![Emotion::Anxious, Emotion::Sad]),
        )),
        Box::new(LowConfidenceVote::new(low_confidence_threshold)),
    ]
}
