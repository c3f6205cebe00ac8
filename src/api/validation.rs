use crate::core::Point;
use crate::error::{SimError, SimResult};

pub(super) fn validate_pointer(x: f64, y: f64) -> SimResult<Point> {
    if !x.is_finite() || !y.is_finite() {
        return Err(SimError::InvalidData(
            "pointer coordinates must be finite".to_owned(),
        ));
    }
    Ok(Point::new(x, y))
}

pub(super) fn validate_movement_delta(x: f64, y: f64) -> SimResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(SimError::InvalidData(
            "movement delta must be finite".to_owned(),
        ));
    }
    Ok(())
}
