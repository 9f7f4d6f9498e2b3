//! Post-release deceleration.
//!
//! A release velocity becomes an [`InertiaPlan`] (how far and for how long the wheel
//! keeps turning), and the plan becomes an [`Animation`] that the host steps once per
//! display frame.

use crate::config::WheelConfig;
use crate::geometry::{self, GeometryError};
use crate::rotation::RotationState;

/// Quartic ease-out from `start` to `start + delta` over `total` steps.
pub fn ease_out_quart(step: f64, start: f64, delta: f64, total: f64) -> f64 {
    let t = step / total - 1.0;
    -delta * (t * t * t * t - 1.0) + start
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaPlan {
    pub start_angle: f64,
    /// Physics delta before elastic clamping.
    pub raw_delta: f64,
    /// Physics delta after elastic clamping.
    pub delta: f64,
    pub duration_ms: f64,
    /// Item the glide is retargeted to land on.
    pub target_index: usize,
    pub target_angle: f64,
}

impl InertiaPlan {
    /// Plans the glide for a release at `velocity` px/ms.
    ///
    /// Returns `None` when there is nothing to animate: no velocity, or a glide that
    /// the elastic bounds cut down to nothing.
    pub fn from_release(
        velocity: f64,
        state: &RotationState,
        config: &WheelConfig,
    ) -> Result<Option<Self>, GeometryError> {
        if velocity == 0.0 || !velocity.is_finite() {
            return Ok(None);
        }

        let layout = state.layout();
        let start_angle = state.angle();

        // finger down turns the wheel back, finger up turns it forward
        let dir = if velocity > 0.0 { -1.0 } else { 1.0 };
        let mut duration_ms = (velocity / (dir * config.deceleration)).abs();
        let glide = velocity * duration_ms / config.glide_damping;

        let raw_delta = geometry::angle_from_linear_distance(glide, layout.radius)? * dir;
        let mut delta = raw_delta;

        if start_angle + delta < layout.elastic_lower {
            delta = layout.elastic_lower - start_angle;
            duration_ms *= (delta / raw_delta) * config.overscroll_damping;
        }
        if start_angle + delta > layout.elastic_upper {
            delta = layout.elastic_upper - start_angle;
            duration_ms *= (delta / raw_delta) * config.overscroll_damping;
        }

        if delta == 0.0 {
            return Ok(None);
        }

        let target_index = state.index_from_angle(start_angle + delta);
        let target_angle = state.angle_of(target_index);

        Ok(Some(Self {
            start_angle,
            raw_delta,
            delta,
            duration_ms,
            target_index,
            target_angle,
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// Angle to draw; more frames follow.
    Running(f64),
    /// Angle to draw; this was the last frame.
    Finished(f64),
    /// The curve produced an unusable angle. Nothing should be drawn.
    Aborted,
}

/// A frame-stepped eased rotation from `start_angle` to `start_angle + delta`.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    start_angle: f64,
    delta: f64,
    total_steps: f64,
    current_step: u32,
    cancelled: bool,
    finished: bool,
}

impl Animation {
    pub fn new(start_angle: f64, delta: f64, total_steps: f64) -> Self {
        Self {
            start_angle,
            delta,
            total_steps,
            current_step: 0,
            cancelled: false,
            finished: false,
        }
    }

    /// Glide to the plan's target item over the plan's duration.
    pub fn from_plan(plan: &InertiaPlan, frame_interval_ms: f64) -> Self {
        Self::new(
            plan.start_angle,
            plan.target_angle - plan.start_angle,
            plan.duration_ms / frame_interval_ms,
        )
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn total_steps(&self) -> f64 {
        self.total_steps
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled && !self.finished
    }

    /// Computes the next frame. The animation ends once the step counter passes
    /// `total_steps - 1` or the angle leaves `[elastic_lower, elastic_upper]`.
    ///
    /// Returns `None` once cancelled or finished.
    pub fn step(&mut self, elastic_lower: f64, elastic_upper: f64) -> Option<Frame> {
        if !self.is_active() {
            return None;
        }

        let angle = ease_out_quart(
            self.current_step as f64,
            self.start_angle,
            self.delta,
            self.total_steps,
        );
        if !angle.is_finite() {
            self.cancel();
            return Some(Frame::Aborted);
        }

        self.current_step += 1;
        if self.current_step as f64 > self.total_steps - 1.0
            || angle < elastic_lower
            || angle > elastic_upper
        {
            self.finished = true;
            Some(Frame::Finished(angle))
        } else {
            Some(Frame::Running(angle))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Layout;

    fn state_at(angle: f64) -> RotationState {
        let layout = Layout::measure(200.0, &[78.0; 5], &WheelConfig::default()).unwrap();
        RotationState::with_angle(layout, angle)
    }

    #[test]
    fn test_ease_out_quart_endpoints() {
        assert_eq!(ease_out_quart(0.0, 10.0, 100.0, 20.0), 10.0);
        assert_eq!(ease_out_quart(20.0, 10.0, 100.0, 20.0), 110.0);
        // ease-out covers most of the distance early
        assert!(ease_out_quart(5.0, 0.0, 100.0, 20.0) > 60.0);
    }

    #[test]
    fn test_no_velocity_means_no_plan() {
        let config = WheelConfig::default();
        let state = state_at(0.0);
        assert_eq!(InertiaPlan::from_release(0.0, &state, &config), Ok(None));
        assert_eq!(
            InertiaPlan::from_release(f64::NAN, &state, &config),
            Ok(None)
        );
    }

    #[test]
    fn test_upward_flick_glides_forward_to_nearest_item() {
        let config = WheelConfig::default();
        let plan = InertiaPlan::from_release(-0.96, &state_at(0.0), &config)
            .unwrap()
            .unwrap();

        // 0.96 px/ms decays in 960ms; glide = 0.96 * 960 / 6 = 153.6px
        assert!((plan.duration_ms - 960.0).abs() < 1e-9);
        let expected = geometry::angle_from_linear_distance(153.6, 100.0).unwrap();
        assert!((plan.raw_delta - expected).abs() < 1e-9);
        assert!(plan.raw_delta > 100.0 && plan.raw_delta < 101.0);
        assert_eq!(plan.delta, plan.raw_delta);
        assert_eq!(plan.target_index, 3);
        assert_eq!(plan.target_angle, 108.0);
    }

    #[test]
    fn test_downward_flick_turns_backward() {
        let config = WheelConfig::default();
        let plan = InertiaPlan::from_release(0.5, &state_at(144.0), &config)
            .unwrap()
            .unwrap();
        assert!(plan.delta < 0.0);
        assert!(plan.target_angle < 144.0);
    }

    #[test]
    fn test_overscroll_rescales_delta_and_duration_together() {
        let config = WheelConfig::default();
        let plan = InertiaPlan::from_release(-3.0, &state_at(0.0), &config)
            .unwrap()
            .unwrap();

        // glide of 1500px wraps seven diameters plus a 60° chord
        assert!((plan.raw_delta - 1320.0).abs() < 1e-6);
        assert_eq!(plan.delta, 154.0);
        let scale = plan.delta / plan.raw_delta;
        assert!((plan.duration_ms - 3000.0 * scale * 0.6).abs() < 1e-6);
        assert_eq!(plan.target_index, 4);
        assert_eq!(plan.target_angle, 144.0);
    }

    #[test]
    fn test_overscroll_below_lower_bound() {
        let config = WheelConfig::default();
        let plan = InertiaPlan::from_release(3.0, &state_at(36.0), &config)
            .unwrap()
            .unwrap();
        assert_eq!(plan.delta, -46.0);
        assert_eq!(plan.target_index, 0);
    }

    #[test]
    fn test_glide_from_elastic_bound_has_nothing_to_do() {
        let config = WheelConfig::default();
        assert_eq!(
            InertiaPlan::from_release(-1.0, &state_at(154.0), &config),
            Ok(None)
        );
    }

    #[test]
    fn test_animation_runs_to_completion() {
        let mut animation = Animation::new(0.0, 108.0, 20.0);
        let mut frames = Vec::new();
        while let Some(frame) = animation.step(-10.0, 154.0) {
            frames.push(frame);
        }

        assert_eq!(frames.len(), 20);
        assert_eq!(frames[0], Frame::Running(0.0));
        assert!(matches!(frames[19], Frame::Finished(_)));
        assert!(!animation.is_active());
        assert_eq!(animation.step(-10.0, 154.0), None);
    }

    #[test]
    fn test_cancel_stops_frames() {
        let mut animation = Animation::new(0.0, 108.0, 20.0);
        for _ in 0..5 {
            assert!(matches!(
                animation.step(-10.0, 154.0),
                Some(Frame::Running(_))
            ));
        }
        assert_eq!(animation.current_step(), 5);

        animation.cancel();

        assert!(animation.is_cancelled());
        assert_eq!(animation.step(-10.0, 154.0), None);
        assert_eq!(animation.current_step(), 5);
    }

    #[test]
    fn test_leaving_elastic_range_finishes_early() {
        let mut animation = Animation::new(150.0, 40.0, 20.0);
        let _ = animation.step(-10.0, 154.0);
        assert!(matches!(
            animation.step(-10.0, 154.0),
            Some(Frame::Finished(_))
        ));
    }

    #[test]
    fn test_degenerate_curve_aborts() {
        let mut animation = Animation::new(0.0, 36.0, 0.0);
        assert_eq!(animation.step(-10.0, 154.0), Some(Frame::Aborted));
        assert!(animation.is_cancelled());
        assert_eq!(animation.step(-10.0, 154.0), None);
    }

    #[test]
    fn test_from_plan_retargets_onto_item() {
        let config = WheelConfig::default();
        let plan = InertiaPlan::from_release(-0.96, &state_at(0.0), &config)
            .unwrap()
            .unwrap();
        let animation = Animation::from_plan(&plan, config.frame_interval_ms());

        assert_eq!(animation.delta(), 108.0);
        assert!((animation.total_steps() - 960.0 / (1000.0 / 60.0)).abs() < 1e-9);
    }
}
