use strum::Display as StrumDisplay;

/// A single normalized pointer reading: vertical page position (px) and time (ms).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    pub position: f64,
    pub timestamp: f64,
}

impl GestureSample {
    pub fn new(position: f64, timestamp: f64) -> Self {
        Self {
            position,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerSource {
    /// Page-y of every changed touch point, in delivery order.
    Touch(Vec<f64>),
    Mouse { page_y: f64 },
}

/// A raw touch or pointer event as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub source: PointerSource,
    /// Milliseconds. Hosts that cannot stamp events leave this empty.
    pub timestamp: Option<f64>,
}

impl PointerEvent {
    pub fn mouse(phase: PointerPhase, page_y: f64, timestamp: f64) -> Self {
        Self {
            phase,
            source: PointerSource::Mouse { page_y },
            timestamp: Some(timestamp),
        }
    }

    pub fn touch(phase: PointerPhase, page_y: f64, timestamp: f64) -> Self {
        Self {
            phase,
            source: PointerSource::Touch(vec![page_y]),
            timestamp: Some(timestamp),
        }
    }

    /// Normalizes the event into a sample. Touch events read their first changed touch;
    /// a touch event without any changed touch carries no position and yields `None`.
    pub fn sample(&self, now: impl FnOnce() -> f64) -> Option<GestureSample> {
        let position = match &self.source {
            PointerSource::Touch(points) => *points.first()?,
            PointerSource::Mouse { page_y } => *page_y,
        };
        let timestamp = self
            .timestamp
            .filter(|t| t.is_finite())
            .unwrap_or_else(now);

        Some(GestureSample::new(position, timestamp))
    }
}

/// State of one drag, from pointer down until it resolves into inertia or a snap.
///
/// Sessions are values: each accepted sample produces a new session instead of
/// mutating shared tracking state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub start: GestureSample,
    pub start_angle: f64,
    /// Baseline for the release velocity. Reset on start and after any pause longer
    /// than the velocity window.
    pub baseline: GestureSample,
}

impl GestureSession {
    pub fn begin(sample: GestureSample, start_angle: f64) -> Self {
        Self {
            start: sample,
            start_angle,
            baseline: sample,
        }
    }

    pub fn advance(self, sample: GestureSample, window_ms: f64) -> Self {
        if sample.timestamp - self.baseline.timestamp > window_ms {
            Self {
                baseline: sample,
                ..self
            }
        } else {
            self
        }
    }

    /// Signed finger travel since the session started, px.
    pub fn displacement(&self, sample: GestureSample) -> f64 {
        sample.position - self.start.position
    }

    /// Release velocity in px/ms measured against the current baseline.
    ///
    /// A zero (or backwards) time delta has no defined velocity and reports `0.0`.
    pub fn release_velocity(&self, release: GestureSample) -> f64 {
        let elapsed = release.timestamp - self.baseline.timestamp;
        if elapsed <= 0.0 {
            log::trace!("degenerate release: {elapsed}ms since baseline, treating as still");
            return 0.0;
        }

        let velocity = (release.position - self.baseline.position) / elapsed;
        if velocity.is_finite() { velocity } else { 0.0 }
    }
}
