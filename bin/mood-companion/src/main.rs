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

use affect::{AnalysisWithResponse, Emotion, EmotionAnalyzer, PipelineConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug, Clone)]
#[command(name = "mood-companion", about = "Emotion analysis for journal entries")]
struct Cli {
    /// Directory holding the pipeline YAML files.
    #[arg(long, global = true, env = "MOOD_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Directory with model.onnx, tokenizer.json and config.json.
    #[cfg(feature = "onnx")]
    #[arg(long, global = true, env = "MOOD_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Analyse each TEXT, or each stdin line when none is given.
    Analyze { text: Vec<String> },
    /// Print the wellness tips for an emotion.
    Tips { emotion: Emotion },
}

#[derive(Serialize)]
struct AnalyzeLine<'a> {
    #[serde(flatten)]
    result: &'a AnalysisWithResponse,
    input_length: usize,
}

#[derive(Serialize)]
struct RejectedLine<'a> {
    error: String,
    input: &'a str,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = PipelineConfig::load_or_default(cli.config_dir.as_deref());
    match &cli.cmd {
        Command::Analyze { text } => {
            let analyzer = build_analyzer(&cli, &config);
            analyzer
                .initialise()
                .context("emotion classifier could not be initialised")?;
            run_analyze(&analyzer, text)
        }
        Command::Tips { emotion } => print_tips(&EmotionAnalyzer::with_lexicon(&config), *emotion),
    }
}

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(feature = "onnx")]
fn build_analyzer(cli: &Cli, config: &PipelineConfig) -> EmotionAnalyzer {
    match &cli.model_dir {
        Some(dir) => {
            info!("Using ONNX emotion model from {}", dir.display());
            EmotionAnalyzer::new(
                config,
                affect::OnnxLoader::new(dir.clone(), config.settings.classifier.max_length),
            )
        }
        None => EmotionAnalyzer::with_lexicon(config),
    }
}

#[cfg(not(feature = "onnx"))]
fn build_analyzer(_cli: &Cli, config: &PipelineConfig) -> EmotionAnalyzer {
    EmotionAnalyzer::with_lexicon(config)
}

fn run_analyze(analyzer: &EmotionAnalyzer, texts: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if texts.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            analyze_one(analyzer, &line, &mut out)?;
        }
    } else {
        for text in texts {
            analyze_one(analyzer, text, &mut out)?;
        }
    }

    let metrics = analyzer.metrics();
    info!(
        analyses = metrics.analyses,
        degraded = metrics.degraded,
        unmapped_labels = metrics.unmapped_labels,
        overrides_fired = metrics.overrides_fired,
        "Analysis run finished"
    );
    Ok(())
}

fn analyze_one<W: Write>(analyzer: &EmotionAnalyzer, input: &str, out: &mut W) -> Result<()> {
    let text = match journal::validation::validate_mood_text(input) {
        Ok(text) => text,
        Err(e) => {
            warn!("Skipping entry: {}", e);
            let rejected = RejectedLine {
                error: e.to_string(),
                input,
            };
            serde_json::to_writer(&mut *out, &rejected)?;
            writeln!(out)?;
            return Ok(());
        }
    };

    let result = analyzer.analyze_with_response(&text)?;
    let line = AnalyzeLine {
        result: &result,
        input_length: text.chars().count(),
    };
    serde_json::to_writer(&mut *out, &line)?;
    writeln!(out)?;
    Ok(())
}

fn print_tips(analyzer: &EmotionAnalyzer, emotion: Emotion) -> Result<()> {
    let tips = analyzer.wellness_tips(emotion);
    if tips.is_empty() {
        warn!("No wellness tips configured for {}", emotion);
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, tips)?;
    writeln!(out)?;
    Ok(())
}
