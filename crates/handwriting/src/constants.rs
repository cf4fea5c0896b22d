/// Lowest pressure a synthesized point may carry.
pub const MIN_SYNTH_PRESSURE: f32 = 0.1;

/// Pressure assumed for imported points that carry none.
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// Highest pressure a synthesized point may carry.
pub const MAX_SYNTH_PRESSURE: f32 = 1.0;

/// Largest slant offset (degrees) accepted from an untrusted style directive.
pub const MAX_VARIATION_SLANT: f32 = 30.0;

/// Spacing factor range accepted from an untrusted style directive.
pub const MIN_VARIATION_SPACING: f32 = 0.25;
pub const MAX_VARIATION_SPACING: f32 = 4.0;

/// Schema version written into training exports.
pub const TRAINING_EXPORT_VERSION: u32 = 1;
