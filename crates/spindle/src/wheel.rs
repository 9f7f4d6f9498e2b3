use crate::config::{ConfigError, WheelConfig};
use crate::events::{EventKind, Handler, ListenerId, Listeners, WheelEvent};
use crate::geometry;
use crate::gesture::{GestureSample, GestureSession, PointerEvent, PointerPhase};
use crate::inertia::{Animation, Frame, InertiaPlan};
use crate::render::{Renderer, Surface, Transition};
use crate::rotation::{Item, Layout, LayoutError, RotationState};
use crate::snap::{self, SnapMode};
use std::time::Instant;
use strum::Display as StrumDisplay;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WheelError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Wheel has been destroyed")]
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Idle,
    Dragging,
    Settling,
}

#[derive(Debug, Clone, PartialEq)]
enum Activity {
    Idle,
    Dragging(GestureSession),
    Settling(Animation),
}

/// A rotating picker wheel.
///
/// The host forwards pointer events to [`Wheel::handle_pointer`] and calls
/// [`Wheel::tick`] once per display frame while [`Wheel::is_animating`] holds.
/// At most one of a drag session or an inertia animation is alive at any time.
pub struct Wheel<S: Surface, R: Renderer> {
    surface: S,
    renderer: R,
    config: WheelConfig,
    rotation: RotationState,
    activity: Activity,
    listeners: Listeners,
    epoch: Instant,
    destroyed: bool,
}

impl<S: Surface, R: Renderer> Wheel<S, R> {
    pub fn new(surface: S, mut renderer: R, config: WheelConfig) -> Result<Self, WheelError> {
        config.validate()?;

        let layout = Layout::measure(surface.height(), &surface.item_heights(), &config)?;
        let rotation = RotationState::new(layout);
        rotation.write_layout(&mut renderer);

        let initial_index = config.initial_index;
        let mut wheel = Self {
            surface,
            renderer,
            config,
            rotation,
            activity: Activity::Idle,
            listeners: Listeners::default(),
            epoch: Instant::now(),
            destroyed: false,
        };
        wheel.set_index(initial_index);

        log::debug!(
            "wheel ready: {} items, {}° per item",
            layout.item_count,
            layout.item_step
        );
        Ok(wheel)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }

        let epoch = self.epoch;
        let Some(sample) = event.sample(|| epoch.elapsed().as_secs_f64() * 1000.0) else {
            match event.phase {
                PointerPhase::Up | PointerPhase::Cancel => self.release_in_place(),
                _ => log::trace!("{} event without a touch point, ignored", event.phase),
            }
            return;
        };

        match event.phase {
            PointerPhase::Down => self.begin_drag(sample),
            PointerPhase::Move => self.drag_to(sample),
            PointerPhase::Up | PointerPhase::Cancel => self.release(sample),
        }
    }

    /// Advances a running inertia animation by one frame. Returns whether another
    /// frame is wanted.
    pub fn tick(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let Activity::Settling(animation) = &mut self.activity else {
            return false;
        };

        let layout = *self.rotation.layout();
        match animation.step(layout.elastic_lower, layout.elastic_upper) {
            Some(Frame::Running(angle)) => {
                log::trace!("inertia frame {}: {angle}", animation.current_step());
                self.rotation.set_angle(angle, &mut self.renderer);
                true
            }
            Some(Frame::Finished(angle)) => {
                self.rotation.set_angle(angle, &mut self.renderer);
                self.settle(SnapMode::Animated);
                false
            }
            Some(Frame::Aborted) => {
                log::warn!(
                    "inertia produced an unusable angle at step {}, snapping",
                    animation.current_step()
                );
                self.settle(SnapMode::Immediate);
                false
            }
            None => {
                self.activity = Activity::Idle;
                false
            }
        }
    }

    /// Re-reads the items from the surface. Keeps the nearest item selected unless
    /// `index` names another one.
    pub fn relayout(&mut self, index: Option<usize>) -> Result<(), WheelError> {
        if self.destroyed {
            return Err(WheelError::Destroyed);
        }
        // a failed measurement leaves any drag or animation running
        let layout = Layout::measure(
            self.surface.height(),
            &self.surface.item_heights(),
            &self.config,
        )?;
        self.stop();

        self.rotation = RotationState::with_angle(layout, self.rotation.angle());
        self.rotation.write_layout(&mut self.renderer);
        log::debug!("relayout: {} items", layout.item_count);

        match index {
            Some(index) => self.set_index(index),
            None => self.settle(SnapMode::Animated),
        }
        Ok(())
    }

    /// Jumps to `index` without animation. Out-of-range indices select the nearest end.
    pub fn set_index(&mut self, index: usize) {
        if self.destroyed {
            return;
        }
        self.stop();

        let clamped = self.rotation.clamp_index(index);
        if clamped != index {
            log::warn!(
                "index {index} is out of range for {} items, using {clamped}",
                self.rotation.len()
            );
        }
        self.settle_at(self.rotation.angle_of(clamped), SnapMode::Immediate);
    }

    pub fn index(&self) -> usize {
        self.rotation.index_from_angle(self.rotation.angle())
    }

    pub fn on(&mut self, kind: EventKind, handler: Handler) -> ListenerId {
        self.listeners.subscribe(kind, handler)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Detaches the wheel. No angle writes or notifications happen afterwards.
    pub fn destroy(&mut self) {
        self.stop();
        self.listeners.clear();
        self.destroyed = true;
        log::debug!("wheel destroyed");
    }

    /// Replaces the tuning. Takes effect at the next [`relayout`](Self::relayout).
    pub fn reconfigure(&mut self, config: WheelConfig) -> Result<(), WheelError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_animating(&self) -> bool {
        matches!(&self.activity, Activity::Settling(a) if a.is_active())
    }

    pub fn phase(&self) -> Phase {
        match self.activity {
            Activity::Idle => Phase::Idle,
            Activity::Dragging(_) => Phase::Dragging,
            Activity::Settling(_) => Phase::Settling,
        }
    }

    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }

    pub fn layout(&self) -> &Layout {
        self.rotation.layout()
    }

    pub fn items(&self) -> &[Item] {
        self.rotation.items()
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn animation(&self) -> Option<&Animation> {
        match &self.activity {
            Activity::Settling(animation) => Some(animation),
            _ => None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn begin_drag(&mut self, sample: GestureSample) {
        self.stop();
        self.renderer.set_list_transition(Transition::None);

        let session = GestureSession::begin(sample, self.rotation.angle());
        log::debug!("drag start at y={} angle={}", sample.position, session.start_angle);
        self.activity = Activity::Dragging(session);
    }

    fn drag_to(&mut self, sample: GestureSample) {
        let Activity::Dragging(session) = self.activity else {
            return;
        };

        let drag_range = session.displacement(sample) / self.config.drag_resistance;
        let drag_angle =
            match geometry::angle_from_linear_distance(drag_range, self.rotation.layout().radius) {
                Ok(a) => a,
                Err(e) => {
                    log::warn!("ignoring drag sample: {}", e);
                    return;
                }
            };

        let angle = if drag_range > 0.0 {
            session.start_angle - drag_angle
        } else {
            session.start_angle + drag_angle
        };
        self.rotation
            .set_angle(self.rotation.clamp_elastic(angle), &mut self.renderer);
        self.activity =
            Activity::Dragging(session.advance(sample, self.config.velocity_window_ms));
    }

    fn release(&mut self, sample: GestureSample) {
        let Activity::Dragging(session) = self.activity else {
            return;
        };
        self.activity = Activity::Idle;

        let velocity = session.release_velocity(sample);
        log::debug!("release at y={} velocity={velocity}px/ms", sample.position);

        match InertiaPlan::from_release(velocity, &self.rotation, &self.config) {
            Ok(Some(plan)) => {
                log::debug!(
                    "inertia: {:.1}° over {:.0}ms towards item {}",
                    plan.delta,
                    plan.duration_ms,
                    plan.target_index
                );
                self.activity = Activity::Settling(Animation::from_plan(
                    &plan,
                    self.config.frame_interval_ms(),
                ));
            }
            Ok(None) => self.settle(SnapMode::Animated),
            Err(e) => {
                log::warn!("inertia unavailable: {}", e);
                self.settle(SnapMode::Animated);
            }
        }
    }

    /// Ends a drag whose release carried no position: no velocity, settle where it is.
    fn release_in_place(&mut self) {
        if !matches!(self.activity, Activity::Dragging(_)) {
            return;
        }
        log::debug!("release without a touch point at angle {}", self.rotation.angle());
        self.activity = Activity::Idle;
        self.settle(SnapMode::Animated);
    }

    /// Drops any session or animation without settling.
    fn stop(&mut self) {
        if let Activity::Settling(animation) = &mut self.activity {
            log::debug!(
                "cancelling inertia at step {}/{:.1}",
                animation.current_step(),
                animation.total_steps()
            );
            animation.cancel();
        }
        self.activity = Activity::Idle;
    }

    fn settle(&mut self, mode: SnapMode) {
        self.settle_at(self.rotation.angle(), mode);
    }

    fn settle_at(&mut self, angle: f64, mode: SnapMode) {
        self.activity = Activity::Idle;

        let snap = snap::resolve(&self.rotation, angle, mode, &self.config);
        log::debug!("settle on item {} ({}°)", snap.index, snap.angle);

        self.renderer.set_list_transition(snap.transition);
        self.rotation.set_angle(snap.angle, &mut self.renderer);
        self.listeners
            .emit(&WheelEvent::Change { index: snap.index });
    }
}

impl<S: Surface, R: Renderer> std::fmt::Debug for Wheel<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wheel")
            .field("angle", &self.rotation.angle())
            .field("phase", &self.phase())
            .field("items", &self.rotation.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
