use crate::config::WheelConfig;
use crate::render::Transition;
use crate::rotation::RotationState;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapMode {
    Animated,
    /// Programmatic settles (e.g. `set_index`) land without a transition.
    Immediate,
}

/// Where a settle ends up and how the host should get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub angle: f64,
    pub index: usize,
    pub transition: Transition,
}

/// Settles `angle`: in-bounds angles round to the nearest item, anything outside
/// `[lower, upper]` is pulled back to the bound over the longer transition.
pub fn resolve(state: &RotationState, angle: f64, mode: SnapMode, config: &WheelConfig) -> Snap {
    let corrected = state.correct_angle(angle);

    let (angle, transition) = if corrected == angle {
        let duration = match mode {
            SnapMode::Animated => config.snap_transition,
            SnapMode::Immediate => Duration::ZERO,
        };
        (
            state.angle_of(state.index_from_angle(angle)),
            Transition::Linear(duration),
        )
    } else {
        (corrected, Transition::Linear(config.bound_transition))
    };

    Snap {
        angle,
        index: state.index_from_angle(angle),
        transition,
    }
}
