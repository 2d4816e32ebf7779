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

use affect::{
    AnalysisResult, AnalyzerError, ClassifierError, ClassifierResult, Emotion, EmotionAnalyzer,
    EmotionClassifier, PipelineConfig, RawClassification,
};
use anyhow::Result;
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

struct Fixed {
    label: &'static str,
    confidence: f64,
}

impl EmotionClassifier for Fixed {
    fn classify(&self, _text: &str) -> ClassifierResult<RawClassification> {
        Ok(RawClassification::new(self.label, self.confidence))
    }
    fn name(&self) -> &str {
        "fixed"
    }
}

struct Failing;

impl EmotionClassifier for Failing {
    fn classify(&self, _text: &str) -> ClassifierResult<RawClassification> {
        Err(ClassifierError::inference("CUDA out of memory"))
    }
    fn name(&self) -> &str {
        "failing"
    }
}

struct Panicking;

impl EmotionClassifier for Panicking {
    fn classify(&self, _text: &str) -> ClassifierResult<RawClassification> {
        panic!("index out of bounds")
    }
    fn name(&self) -> &str {
        "panicking"
    }
}

fn fixed(config: &PipelineConfig, label: &'static str, confidence: f64) -> EmotionAnalyzer {
    EmotionAnalyzer::new(config, move || -> ClassifierResult<Arc<dyn EmotionClassifier>> {
        Ok(Arc::new(Fixed { label, confidence }))
    })
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn override_corrects_happy_bias() -> Result<()> {
    let analyzer = fixed(&PipelineConfig::default(), "joy", 0.9);
    let result = analyzer.analyze("I'm feeling really down today")?;
    assert_eq!(result.emotion, Emotion::Sad);
    assert!(approx(result.sentiment_score, -0.63));
    assert!(approx(result.confidence, 0.9));
    assert_eq!(analyzer.metrics().overrides_fired, 1);
    Ok(())
}

#[test]
fn mapped_label_without_override() -> Result<()> {
    let analyzer = fixed(&PipelineConfig::default(), "Joy", 1.0);
    let result = analyzer.analyze("a perfectly ordinary day")?;
    assert_eq!(result, AnalysisResult::new(Emotion::Happy, 0.8, 1.0));
    Ok(())
}

#[test]
fn classifier_error_degrades_to_neutral() -> Result<()> {
    let analyzer = EmotionAnalyzer::new(
        &PipelineConfig::default(),
        || -> ClassifierResult<Arc<dyn EmotionClassifier>> { Ok(Arc::new(Failing)) },
    );
    let result = analyzer.analyze("anything at all")?;
    assert_eq!(result, AnalysisResult::neutral_fallback());
    assert_eq!(analyzer.metrics().degraded, 1);
    Ok(())
}

#[test]
fn classifier_panic_degrades_to_neutral() -> Result<()> {
    let analyzer = EmotionAnalyzer::new(
        &PipelineConfig::default(),
        || -> ClassifierResult<Arc<dyn EmotionClassifier>> { Ok(Arc::new(Panicking)) },
    );
    for _ in 0..3 {
        assert_eq!(
            analyzer.analyze("I am so angry")?,
            AnalysisResult::neutral_fallback()
        );
    }
    assert!(analyzer.is_ready());
    Ok(())
}

#[test]
fn out_of_range_confidence_degrades_to_neutral() -> Result<()> {
    let analyzer = fixed(&PipelineConfig::default(), "joy", 1.7);
    assert_eq!(
        analyzer.analyze("great day")?,
        AnalysisResult::neutral_fallback()
    );
    Ok(())
}

#[test]
fn unmapped_label_is_neutral() -> Result<()> {
    let analyzer = fixed(&PipelineConfig::default(), "admiration", 0.95);
    let result = analyzer.analyze("a perfectly ordinary day")?;
    assert_eq!(result.emotion, Emotion::Neutral);
    assert_eq!(result.sentiment_score, 0.0);
    assert_eq!(analyzer.metrics().unmapped_labels, 1);
    Ok(())
}

#[test]
fn unmapped_label_can_still_be_overridden() -> Result<()> {
    let analyzer = fixed(&PipelineConfig::default(), "admiration", 0.95);
    let result = analyzer.analyze("I am so angry and furious")?;
    assert_eq!(result.emotion, Emotion::Angry);
    assert!(approx(result.sentiment_score, -0.76));
    Ok(())
}

#[test]
fn overrides_only_see_truncated_text() -> Result<()> {
    let mut config = PipelineConfig::default();
    config.settings.classifier.max_length = 12;
    let analyzer = fixed(&config, "joy", 0.9);
    // the sad cue sits past the cut
    let result = analyzer.analyze("Nice weather, but I feel sad")?;
    assert_eq!(result.emotion, Emotion::Happy);
    Ok(())
}

#[test]
fn loader_runs_once_across_threads() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let analyzer = Arc::new(EmotionAnalyzer::new(
        &PipelineConfig::default(),
        move || -> ClassifierResult<Arc<dyn EmotionClassifier>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Fixed {
                label: "fear",
                confidence: 0.8,
            }))
        },
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            thread::spawn(move || analyzer.analyze("exam tomorrow"))
        })
        .collect();
    for handle in handles {
        let result = handle.join().expect("worker panicked")?;
        assert_eq!(result.emotion, Emotion::Anxious);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(analyzer.metrics().analyses, 8);
    Ok(())
}

#[test]
fn init_failure_is_cached_not_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let analyzer = EmotionAnalyzer::new(
        &PipelineConfig::default(),
        move || -> ClassifierResult<Arc<dyn EmotionClassifier>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ClassifierError::model_unavailable("weights missing"))
        },
    );

    for _ in 0..3 {
        match analyzer.analyze("hello") {
            Err(AnalyzerError::ClassifierUnavailable(msg)) => {
                assert!(msg.contains("weights missing"));
            }
            other => panic!("expected init failure, got {other:?}"),
        }
    }
    assert!(analyzer.initialise().is_err());
    assert!(!analyzer.is_ready());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(analyzer.metrics().analyses, 0);
}

#[test]
fn loader_panic_is_an_init_failure() {
    let analyzer = EmotionAnalyzer::new(
        &PipelineConfig::default(),
        || -> ClassifierResult<Arc<dyn EmotionClassifier>> { panic!("corrupt model") },
    );
    assert!(matches!(
        analyzer.analyze("hello"),
        Err(AnalyzerError::ClassifierUnavailable(_))
    ));
}

#[test]
fn strong_negative_reply_carries_safety_note() -> Result<()> {
    let analyzer = fixed(&PipelineConfig::default(), "anger", 1.0);
    let reply = analyzer.analyze_with_response("everything is unfair")?;
    assert!(approx(reply.analysis.sentiment_score, -0.8));
    assert!(reply.response.ends_with(analyzer.responses().safety_suffix()));
    Ok(())
}

#[test]
fn mild_negative_reply_has_no_safety_note() -> Result<()> {
    let analyzer = fixed(&PipelineConfig::default(), "fear", 1.0);
    let reply = analyzer.analyze_with_response("a little uncertain")?;
    assert_eq!(reply.analysis.emotion, Emotion::Anxious);
    assert!(!reply.response.contains(analyzer.responses().safety_suffix()));
    Ok(())
}

#[test]
fn config_directory_changes_pipeline() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("keywords.yml"), "sad: [gloomy]\n")?;
    std::fs::write(
        dir.path().join("labels.yml"),
        "labels:\n  positive: happy\n  negative: sad\n",
    )?;
    let config = PipelineConfig::load_from_dir(dir.path())?;

    let analyzer = fixed(&config, "POSITIVE", 0.9);
    assert_eq!(analyzer.analyze("a gloomy morning")?.emotion, Emotion::Sad);
    // default cue lists are replaced, not merged
    assert_eq!(analyzer.analyze("feeling down")?.emotion, Emotion::Happy);
    Ok(())
}

static LEXICON: Lazy<EmotionAnalyzer> =
    Lazy::new(|| EmotionAnalyzer::with_lexicon(&PipelineConfig::default()));

proptest! {
    #[test]
    fn analyze_is_total_and_bounded(text in "\\PC{0,300}") {
        let result = LEXICON.analyze(&text).unwrap();
        prop_assert!(Emotion::ALL.contains(&result.emotion));
        prop_assert!((-1.0..=1.0).contains(&result.sentiment_score));
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn safety_note_depends_only_on_score(score in -1.0f64..=1.0, idx in 0usize..5) {
        let responses = LEXICON.responses();
        let reply = LEXICON.respond(Emotion::ALL[idx], score);
        let has_note = reply.ends_with(responses.safety_suffix());
        prop_assert_eq!(has_note, score <= -0.6);
    }
}
