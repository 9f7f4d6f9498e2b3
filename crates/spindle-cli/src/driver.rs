use crate::console::ConsoleRenderer;
use crate::script::Command;
use spindle::render::FixedSurface;
use spindle::{EventKind, PointerEvent, PointerSource, Wheel, WheelConfig, WheelError, WheelEvent};
use std::cell::RefCell;
use std::rc::Rc;

/// Upper bound on frames for a single `settle`.
const MAX_SETTLE_FRAMES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Feeds script commands into a headless wheel.
#[derive(Debug)]
pub struct Driver {
    wheel: Wheel<FixedSurface, ConsoleRenderer>,
    changes: Rc<RefCell<Vec<usize>>>,
}

impl Driver {
    pub fn new(surface: FixedSurface, config: WheelConfig) -> Result<Self, WheelError> {
        let mut wheel = Wheel::new(surface, ConsoleRenderer::default(), config)?;
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        wheel.on(
            EventKind::Change,
            Rc::new(move |event: &WheelEvent| {
                let WheelEvent::Change { index } = event;
                sink.borrow_mut().push(*index);
            }),
        );
        Ok(Self { wheel, changes })
    }

    pub fn apply(&mut self, command: &Command) -> Result<Flow, WheelError> {
        match *command {
            Command::Pointer { phase, y, t } => {
                self.wheel.handle_pointer(PointerEvent {
                    phase,
                    source: PointerSource::Mouse { page_y: y },
                    timestamp: t,
                });
            }
            Command::Frames(n) => {
                for _ in 0..n {
                    if !self.wheel.tick() {
                        break;
                    }
                }
            }
            Command::Settle => {
                self.settle();
            }
            Command::Index(index) => self.wheel.set_index(index),
            Command::Relayout(index) => self.wheel.relayout(index)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub fn tick(&mut self) -> bool {
        self.wheel.tick()
    }

    /// Runs the current animation to its end. Returns the number of frames drawn.
    pub fn settle(&mut self) -> usize {
        let mut frames = 0;
        while self.wheel.is_animating() && frames < MAX_SETTLE_FRAMES {
            frames += 1;
            if !self.wheel.tick() {
                break;
            }
        }
        if self.wheel.is_animating() {
            log::warn!("animation still running after {} frames", frames);
        }
        frames
    }

    /// Applies new tuning and re-lays the wheel out around the current item.
    pub fn reload(&mut self, config: WheelConfig) -> Result<(), WheelError> {
        self.wheel.reconfigure(config)?;
        self.wheel.relayout(None)
    }

    /// Change notifications received since the last call.
    pub fn take_changes(&self) -> Vec<usize> {
        std::mem::take(&mut *self.changes.borrow_mut())
    }

    pub fn wheel(&self) -> &Wheel<FixedSurface, ConsoleRenderer> {
        &self.wheel
    }
}
