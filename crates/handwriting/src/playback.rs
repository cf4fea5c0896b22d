//! Paced, incremental stroke playback
//!
//! [`StreamingWriter`] turns text into strokes one character at a time, so
//! text that is still arriving (for example a streamed AI response) can be
//! drawn as it comes in, cut off mid-word. Strokes are pulled as an async
//! [`Stream`]; the writer sleeps for the configured stroke delay before
//! yielding each one, which is its only suspension point.
//!
//! The writer holds a snapshot of the model taken at construction. Retraining
//! elsewhere while a playback is running does not affect it.
//!
//! Cancellation is cooperative: [`PlaybackHandle::cancel`] ends the stream at
//! the next pacing point.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fastrand::Rng;
use futures_util::stream::{self, Stream};
use scribe_config::{EngineConfig, LayoutConfig, DEFAULT_STROKE_DELAY_MS};
use tracing::{debug, info};

use crate::model::HandwritingModel;
use crate::synth::{
    strokes_width, synthesize_character, validate_layout, StrokeRole, SynthesisError,
    SynthesizedStroke,
};
use crate::types::SampleStore;
use crate::variation::{apply_style_variation, EffectiveProfile, StyleVariation};

/// Settings for one playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    pub layout: LayoutConfig,
    /// Pause before each stroke is yielded
    pub stroke_delay: Duration,
    pub variation: StyleVariation,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            stroke_delay: Duration::from_millis(DEFAULT_STROKE_DELAY_MS),
            variation: StyleVariation::default(),
        }
    }
}

impl PlaybackOptions {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            layout: config.layout,
            stroke_delay: config.playback.stroke_delay(),
            variation: StyleVariation::default(),
        }
    }

    pub fn with_variation(mut self, variation: StyleVariation) -> Self {
        self.variation = variation;
        self
    }
}

/// Shared cancellation flag for a running playback
#[derive(Debug, Clone, Default)]
pub struct PlaybackHandle {
    cancelled: Arc<AtomicBool>,
}

impl PlaybackHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Incremental, paced text-to-stroke writer
pub struct StreamingWriter {
    samples: Arc<SampleStore>,
    /// None when the model is untrained; text is then dropped
    profile: Option<EffectiveProfile>,
    layout: LayoutConfig,
    stroke_delay: Duration,
    rng: Rng,
    origin_x: f32,
    cursor_x: f32,
    cursor_y: f32,
    pending_text: VecDeque<char>,
    queued: VecDeque<SynthesizedStroke>,
    emitted: usize,
    handle: PlaybackHandle,
}

impl std::fmt::Debug for StreamingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingWriter")
            .field("trained", &self.profile.is_some())
            .field("cursor", &(self.cursor_x, self.cursor_y))
            .field("pending_chars", &self.pending_text.len())
            .field("queued_strokes", &self.queued.len())
            .field("emitted", &self.emitted)
            .field("cancelled", &self.handle.is_cancelled())
            .finish()
    }
}

impl StreamingWriter {
    /// Start a writer with its cursor at `(x, y)`
    pub fn new(
        model: &HandwritingModel,
        x: f32,
        y: f32,
        options: &PlaybackOptions,
        rng: Rng,
    ) -> Result<Self, SynthesisError> {
        validate_layout(&options.layout)?;

        let profile = model
            .profile()
            .filter(|_| model.is_trained())
            .map(|base| apply_style_variation(base, &options.variation));
        if profile.is_none() {
            debug!("StreamingWriter::new: model is not trained, playback will be empty");
        }

        Ok(Self {
            samples: model.shared_samples(),
            profile,
            layout: options.layout,
            stroke_delay: options.stroke_delay,
            rng,
            origin_x: x,
            cursor_x: x,
            cursor_y: y,
            pending_text: VecDeque::new(),
            queued: VecDeque::new(),
            emitted: 0,
            handle: PlaybackHandle::default(),
        })
    }

    /// Queue more text; the cursor carries on from where the last chunk ended
    pub fn push_text(&mut self, chunk: &str) {
        if self.profile.is_none() {
            return;
        }
        self.pending_text.extend(chunk.chars());
    }

    pub fn cursor(&self) -> (f32, f32) {
        (self.cursor_x, self.cursor_y)
    }

    /// Number of strokes yielded so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn handle(&self) -> PlaybackHandle {
        self.handle.clone()
    }

    /// True when every pushed character has been yielded as strokes
    pub fn is_idle(&self) -> bool {
        self.pending_text.is_empty() && self.queued.is_empty()
    }

    /// Wait out the stroke delay and return the next stroke
    ///
    /// Returns None once the pushed text is exhausted or the playback was
    /// cancelled. More text can be pushed after None to continue.
    pub async fn next_stroke(&mut self) -> Option<SynthesizedStroke> {
        loop {
            if self.handle.is_cancelled() {
                return None;
            }

            if let Some(stroke) = self.queued.pop_front() {
                tokio::time::sleep(self.stroke_delay).await;
                if self.handle.is_cancelled() {
                    debug!("StreamingWriter: cancelled after {} strokes", self.emitted);
                    return None;
                }
                self.emitted += 1;
                return Some(stroke);
            }

            let ch = self.pending_text.pop_front()?;
            self.layout_char(ch);
        }
    }

    /// Strokes for the text pushed so far, as a stream
    pub fn strokes(&mut self) -> impl Stream<Item = SynthesizedStroke> + '_ {
        stream::unfold(self, |writer| async move {
            let stroke = writer.next_stroke().await?;
            Some((stroke, writer))
        })
    }

    /// Owned form of [`StreamingWriter::strokes`]
    pub fn into_strokes(self) -> impl Stream<Item = SynthesizedStroke> + Send + 'static {
        stream::unfold(self, |mut writer| async move {
            let stroke = writer.next_stroke().await?;
            Some((stroke, writer))
        })
    }

    /// Hand every pending stroke to `callback` in order, returning how many
    /// were delivered
    pub async fn drain_into<F, Fut>(&mut self, mut callback: F) -> usize
    where
        F: FnMut(SynthesizedStroke) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut delivered = 0;
        while let Some(stroke) = self.next_stroke().await {
            callback(stroke).await;
            delivered += 1;
        }
        delivered
    }

    fn layout_char(&mut self, ch: char) {
        let Some(profile) = self.profile else {
            return;
        };

        match ch {
            ' ' => self.cursor_x += profile.spacing * self.layout.stream_space_factor,
            '\n' => {
                self.cursor_x = self.origin_x;
                self.cursor_y += self.layout.line_height;
            }
            '\r' => {}
            _ => {
                let strokes = synthesize_character(
                    ch,
                    self.cursor_x,
                    self.cursor_y,
                    &self.samples,
                    &profile,
                    &mut self.rng,
                );
                self.cursor_x += if strokes.is_empty() {
                    self.layout.missing_glyph_width
                } else {
                    strokes_width(&strokes) + profile.spacing * self.layout.letter_spacing_factor
                };
                self.queued.extend(strokes.into_iter().map(|stroke| SynthesizedStroke {
                    stroke,
                    role: StrokeRole::Glyph(ch),
                }));
            }
        }
    }
}

/// Write `text` out stroke by stroke, awaiting `callback` for each
///
/// Resolves once every stroke has been delivered, returning the count. An
/// untrained model resolves immediately with 0.
pub async fn stream_writeback<F, Fut>(
    model: &HandwritingModel,
    text: &str,
    x: f32,
    y: f32,
    options: &PlaybackOptions,
    rng: Rng,
    callback: F,
) -> Result<usize, SynthesisError>
where
    F: FnMut(SynthesizedStroke) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut writer = StreamingWriter::new(model, x, y, options, rng)?;
    writer.push_text(text);
    let count = writer.drain_into(callback).await;
    info!("stream_writeback: emitted {} strokes", count);
    Ok(count)
}
