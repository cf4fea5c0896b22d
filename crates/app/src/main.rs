//! Scribe - write text in a learned handwriting style
//!
//! Usage: `scribe <training-export.json> [text...]`
//!
//! Text comes from the arguments or, when none are given, from stdin. It may
//! be a styled response document (`{"text": ..., "style": {...}}`). Strokes
//! are printed to stdout as one renderer message per line; logs go to stderr.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use fastrand::Rng;
use futures_util::StreamExt;
use handwriting::{
    parse_styled_response, HandwritingModel, PlaybackOptions, StreamingWriter, TrainingExport,
};
use scribe_ipc::RendererMessage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::ScribeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(export_path) = args.next() else {
        bail!("usage: scribe <training-export.json> [text...]");
    };
    let text_args: Vec<String> = args.collect();

    let config = ScribeConfig::from_env();
    info!("Starting Scribe with {:?} pacing", config.pacing);

    let model = load_model(Path::new(&export_path), &config)?;
    if !model.is_trained() {
        warn!("No handwriting samples in {}, nothing will be written", export_path);
    }

    let raw = if text_args.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read text from stdin")?;
        buf
    } else {
        text_args.join(" ")
    };
    let styled = parse_styled_response(raw.trim_end_matches(['\n', '\r']));
    if let Some(mood) = styled.variation.mood {
        info!("Writing in a {} mood", mood);
    }

    let mut options = PlaybackOptions::from_config(&config.engine).with_variation(styled.variation);
    options.stroke_delay = config.stroke_delay();
    let rng = config.seed.map_or_else(Rng::new, Rng::with_seed);

    let mut writer = StreamingWriter::new(&model, 0.0, 0.0, &options, rng)?;
    writer.push_text(&styled.text);

    let handle = writer.handle();
    let ctrl_c = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut stdout = std::io::stdout();
    let mut index = 0;
    {
        let mut strokes = std::pin::pin!(writer.strokes());
        while let Some(stroke) = strokes.next().await {
            writeln!(stdout, "{}", stroke.to_message(index).to_json()?)?;
            stdout.flush()?;
            index += 1;
        }
    }

    let done = if handle.is_cancelled() {
        RendererMessage::PlaybackCancelled { stroke_count: index }
    } else {
        RendererMessage::PlaybackFinished { stroke_count: index }
    };
    writeln!(stdout, "{}", done.to_json()?)?;
    info!("Wrote {} strokes", index);

    Ok(())
}

/// Load a training export, retraining the profile when it carries none
fn load_model(path: &Path, config: &ScribeConfig) -> Result<HandwritingModel> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read training export {}", path.display()))?;
    let export = TrainingExport::from_json(&json)
        .with_context(|| format!("Failed to parse training export {}", path.display()))?;

    if export.profile.is_some() {
        return Ok(export.into_model());
    }

    let samples = export.samples();
    if !samples.has_handwriting_samples() {
        return Ok(HandwritingModel::new(samples, None));
    }
    info!("Training export has no profile, deriving one");
    Ok(HandwritingModel::trained(samples, &config.engine.analysis))
}
