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
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::wellness::WellnessTip;

pub const PIPELINE_FILE: &str = "pipeline.yml";
pub const LABELS_FILE: &str = "labels.yml";
pub const KEYWORDS_FILE: &str = "keywords.yml";
pub const RESPONSES_FILE: &str = "responses.yml";
pub const WELLNESS_FILE: &str = "wellness_tips.yml";

const EMBEDDED_PIPELINE: &str = include_str!("../defaults/pipeline.yml");
const EMBEDDED_LABELS: &str = include_str!("../defaults/labels.yml");
const EMBEDDED_KEYWORDS: &str = include_str!("../defaults/keywords.yml");
const EMBEDDED_RESPONSES: &str = include_str!("../defaults/responses.yml");
const EMBEDDED_WELLNESS: &str = include_str!("../defaults/wellness_tips.yml");

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverrideSettings {
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,
}

impl Default for OverrideSettings {
    fn default() -> Self {
        Self {
            low_confidence_threshold: default_low_confidence_threshold(),
        }
    }
}

/// Base polarity per emotion, scaled by model confidence when scoring.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SentimentBases {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub anxious: f64,
    pub neutral: f64,
}

impl SentimentBases {
    pub const fn base(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Happy => self.happy,
            Emotion::Sad => self.sad,
            Emotion::Angry => self.angry,
            Emotion::Anxious => self.anxious,
            Emotion::Neutral => self.neutral,
        }
    }
}

impl Default for SentimentBases {
    fn default() -> Self {
        Self {
            happy: 0.8,
            sad: -0.7,
            angry: -0.8,
            anxious: -0.5,
            neutral: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSettings {
    #[serde(default)]
    pub classifier: ClassifierSettings,
    #[serde(default)]
    pub overrides: OverrideSettings,
    #[serde(default)]
    pub sentiment: SentimentBases,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelConfig {
    pub labels: HashMap<String, Emotion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    #[serde(default)]
    pub sad: Vec<String>,
    #[serde(default)]
    pub angry: Vec<String>,
    #[serde(default)]
    pub anxious: Vec<String>,
    #[serde(default)]
    pub happy: Vec<String>,
}

impl KeywordConfig {
    fn normalise(&mut self) {
        for list in [
            &mut self.sad,
            &mut self.angry,
            &mut self.anxious,
            &mut self.happy,
        ] {
            *list = list
                .iter()
                .map(|phrase| phrase.trim().to_lowercase())
                .filter(|phrase| !phrase.is_empty())
                .collect();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseConfig {
    #[serde(default = "default_safety_threshold")]
    pub safety_threshold: f64,
    pub safety_suffix: String,
    pub templates: HashMap<Emotion, Vec<String>>,
}

pub type WellnessConfig = HashMap<Emotion, Vec<WellnessTip>>;

/// Static data behind the analysis pipeline, loaded once at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub settings: PipelineSettings,
    pub labels: LabelConfig,
    pub keywords: KeywordConfig,
    pub responses: ResponseConfig,
    pub wellness: WellnessConfig,
}

impl PipelineConfig {
    /// Reads each section from `dir`. Missing files fall back to the built-in
    /// section; unreadable or malformed files are errors.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self {
            settings: load_section(dir, PIPELINE_FILE, EMBEDDED_PIPELINE)?,
            labels: load_section(dir, LABELS_FILE, EMBEDDED_LABELS)?,
            keywords: load_section(dir, KEYWORDS_FILE, EMBEDDED_KEYWORDS)?,
            responses: load_section(dir, RESPONSES_FILE, EMBEDDED_RESPONSES)?,
            wellness: load_section(dir, WELLNESS_FILE, EMBEDDED_WELLNESS)?,
        };
        config.finalise()?;
        info!(
            "Loaded pipeline config from {} with {} labels, {} keyword phrases, {} templates",
            dir.display(),
            config.labels.labels.len(),
            config.keyword_count(),
            config.template_count()
        );
        Ok(config)
    }

    pub fn embedded() -> Result<Self, ConfigError> {
        let mut config = Self {
            settings: parse_embedded(PIPELINE_FILE, EMBEDDED_PIPELINE)?,
            labels: parse_embedded(LABELS_FILE, EMBEDDED_LABELS)?,
            keywords: parse_embedded(KEYWORDS_FILE, EMBEDDED_KEYWORDS)?,
            responses: parse_embedded(RESPONSES_FILE, EMBEDDED_RESPONSES)?,
            wellness: parse_embedded(WELLNESS_FILE, EMBEDDED_WELLNESS)?,
        };
        config.finalise()?;
        Ok(config)
    }

    pub fn default_config_dir() -> PathBuf {
        PathBuf::from("config/affect")
    }

    pub fn load_or_default(dir: Option<&Path>) -> Self {
        let dir = dir.map_or_else(Self::default_config_dir, Path::to_path_buf);
        match Self::load_from_dir(&dir) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load pipeline config from {}: {}. Using built-in defaults.",
                    dir.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn finalise(&mut self) -> Result<(), ConfigError> {
        self.keywords.normalise();
        self.labels.labels = self
            .labels
            .labels
            .drain()
            .map(|(label, emotion)| (label.trim().to_lowercase(), emotion))
            .collect();
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.classifier.max_length == 0 {
            return Err(ConfigError::invalid("classifier.max_length must be positive"));
        }
        let threshold = self.settings.overrides.low_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::invalid(format!(
                "overrides.low_confidence_threshold must be within [0, 1], got {threshold}"
            )));
        }
        if !(-1.0..=1.0).contains(&self.responses.safety_threshold) {
            return Err(ConfigError::invalid(format!(
                "safety_threshold must be within [-1, 1], got {}",
                self.responses.safety_threshold
            )));
        }
        if self.responses.safety_suffix.trim().is_empty() {
            return Err(ConfigError::invalid("safety_suffix must not be empty"));
        }
        for emotion in Emotion::ALL {
            let has_template = self
                .responses
                .templates
                .get(&emotion)
                .is_some_and(|templates| templates.iter().any(|t| !t.trim().is_empty()));
            if !has_template {
                return Err(ConfigError::invalid(format!(
                    "no response template configured for '{emotion}'"
                )));
            }
        }
        Ok(())
    }

    fn keyword_count(&self) -> usize {
        self.keywords.sad.len()
            + self.keywords.angry.len()
            + self.keywords.anxious.len()
            + self.keywords.happy.len()
    }

    fn template_count(&self) -> usize {
        self.responses.templates.values().map(Vec::len).sum()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::embedded().expect("built-in pipeline configuration is valid")
    }
}

fn load_section<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    embedded: &str,
) -> Result<T, ConfigError> {
    let path = dir.join(file);
    match std::fs::read_to_string(&path) {
        Ok(content) => serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} not found in {}, using built-in section.", file, dir.display());
            parse_embedded(file, embedded)
        }
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn parse_embedded<T: DeserializeOwned>(file: &str, content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
        path: format!("<built-in>/{file}"),
        source,
    })
}

fn default_max_length() -> usize {
    512
}
fn default_low_confidence_threshold() -> f64 {
    0.6
}
fn default_safety_threshold() -> f64 {
    -0.6
}
