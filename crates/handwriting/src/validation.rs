use crate::types::Point;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Non-finite coordinate: x={x}, y={y}")]
    NonFiniteCoordinate { x: f32, y: f32 },
    #[error("Non-finite timestamp: {0}")]
    NonFiniteTimestamp(f64),
    #[error("Pressure out of range: {0} (expected 0.0-1.0)")]
    PressureOutOfRange(f32),
}

/// Validate a captured point before it enters a sample
pub fn validate_point(point: &Point) -> Result<(), ValidationError> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return Err(ValidationError::NonFiniteCoordinate {
            x: point.x,
            y: point.y,
        });
    }

    if !point.timestamp.is_finite() {
        return Err(ValidationError::NonFiniteTimestamp(point.timestamp));
    }

    // NaN fails the range check as well
    if !(0.0..=1.0).contains(&point.pressure) {
        return Err(ValidationError::PressureOutOfRange(point.pressure));
    }

    Ok(())
}

/// Clamp a possibly-bogus unit value into 0.0-1.0, mapping NaN to `fallback`
pub fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        assert!(validate_point(&Point::new(1.0, 2.0, 0.5, 10.0)).is_ok());
        assert!(validate_point(&Point::new(1.0, 2.0, 0.0, 10.0)).is_ok());
        assert!(validate_point(&Point::new(1.0, 2.0, 1.0, 10.0)).is_ok());
    }

    #[test]
    fn test_invalid_points() {
        assert!(matches!(
            validate_point(&Point::new(f32::NAN, 2.0, 0.5, 0.0)),
            Err(ValidationError::NonFiniteCoordinate { .. })
        ));
        assert_eq!(
            validate_point(&Point::new(1.0, 2.0, 1.5, 0.0)),
            Err(ValidationError::PressureOutOfRange(1.5))
        );
        assert!(matches!(
            validate_point(&Point::new(1.0, 2.0, f32::NAN, 0.0)),
            Err(ValidationError::PressureOutOfRange(_))
        ));
        assert!(matches!(
            validate_point(&Point::new(1.0, 2.0, 0.5, f64::INFINITY)),
            Err(ValidationError::NonFiniteTimestamp(_))
        ));
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(1.7, 0.0), 1.0);
        assert_eq!(clamp_unit(-0.2, 0.0), 0.0);
        assert_eq!(clamp_unit(f32::NAN, 0.3), 0.3);
    }
}
