//! Gesture physics for a cylindrical picker wheel.
//!
//! Items sit on the inside of a virtual cylinder. Vertical drags rotate it, a release
//! keeps it turning with decaying speed, and it always comes to rest on exactly one
//! item. The host supplies geometry through [`Surface`], draws through [`Renderer`],
//! and drives frames by calling [`Wheel::tick`].

pub mod config;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod inertia;
pub mod render;
pub mod rotation;
pub mod snap;
pub mod wheel;

pub use config::WheelConfig;
pub use events::{EventKind, ListenerId, WheelEvent};
pub use gesture::{PointerEvent, PointerPhase, PointerSource};
pub use render::{Renderer, Surface, Transition};
pub use rotation::Visibility;
pub use wheel::{Phase, Wheel, WheelError};
