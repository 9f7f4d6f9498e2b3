use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("Cylinder radius must be positive and finite, got {radius}")]
    DegenerateRadius { radius: f64 },
    #[error("Linear distance must be finite, got {distance}")]
    NonFiniteDistance { distance: f64 },
}

/// Converts a linear displacement into the angle (degrees) it sweeps on a cylinder of `radius`.
///
/// The displacement is treated as a chord. Anything longer than a diameter wraps around:
/// every whole diameter counts as half a turn and the remainder is converted as a chord.
/// The sign of `distance` is ignored, callers apply direction.
pub fn angle_from_linear_distance(distance: f64, radius: f64) -> Result<f64, GeometryError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(GeometryError::DegenerateRadius { radius });
    }
    if !distance.is_finite() {
        return Err(GeometryError::NonFiniteDistance { distance });
    }

    let distance = distance.abs();
    let diameter = 2.0 * radius;
    let whole_turns = (distance / diameter).floor();
    let remainder = distance.rem_euclid(diameter);

    // law of cosines for an isosceles triangle with legs `radius`
    let cos = 1.0 - (remainder * remainder) / (2.0 * radius * radius);

    Ok(whole_turns * 180.0 + cos.clamp(-1.0, 1.0).acos().to_degrees())
}
