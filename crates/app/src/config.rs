//! Application configuration and pacing mode selection

use std::time::Duration;

use scribe_config::EngineConfig;
use tracing::warn;

/// How strokes are released to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacingMode {
    /// Wait the configured stroke delay before each stroke (default)
    #[default]
    Paced,
    /// Emit every stroke as soon as it is synthesized
    Immediate,
}

impl PacingMode {
    /// Parse from environment variable SCRIBE_PACING
    pub fn from_env() -> Self {
        Self::parse(std::env::var("SCRIBE_PACING").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("immediate") => Self::Immediate,
            Some("paced") | None => Self::Paced,
            Some(other) => {
                warn!("PacingMode: unknown SCRIBE_PACING={:?}, using paced", other);
                Self::Paced
            }
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct ScribeConfig {
    pub engine: EngineConfig,
    pub pacing: PacingMode,
    /// Fixed seed from SCRIBE_SEED for reproducible output
    pub seed: Option<u64>,
}

impl ScribeConfig {
    pub fn from_env() -> Self {
        let seed = std::env::var("SCRIBE_SEED").ok().and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("ScribeConfig: ignoring unparsable SCRIBE_SEED={:?}", raw);
                None
            }
        });

        Self {
            engine: EngineConfig::from_env(),
            pacing: PacingMode::from_env(),
            seed,
        }
    }

    pub fn stroke_delay(&self) -> Duration {
        match self.pacing {
            PacingMode::Paced => self.engine.playback.stroke_delay(),
            PacingMode::Immediate => Duration::ZERO,
        }
    }
}
