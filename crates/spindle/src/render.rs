use crate::rotation::Visibility;
use derive_more::Display;
use std::fmt;
use std::time::Duration;

/// Read side of the host: where item geometry comes from.
pub trait Surface {
    /// Height of the visible container, px.
    fn height(&self) -> f64;
    /// Heights of the item elements, in display order.
    fn item_heights(&self) -> Vec<f64>;
}

/// Write side of the host. The engine never touches a UI tree directly.
pub trait Renderer {
    fn set_list_transform(&mut self, transform: ListTransform);
    fn set_list_transition(&mut self, transition: Transition);
    fn set_item_transform(&mut self, index: usize, transform: ItemTransform);
    fn set_item_class(&mut self, index: usize, visibility: Visibility);
}

#[derive(Debug, Clone, Copy, PartialEq, Display)]
#[display("perspective({perspective}px) rotateY(0) rotateX({angle}deg)")]
pub struct ListTransform {
    pub perspective: f64,
    pub angle: f64,
}

/// Places one item on the cylinder wall. Written once per layout.
#[derive(Debug, Clone, Copy, PartialEq, Display)]
#[display("translateZ({radius}px) rotateX({}deg)", -angle)]
pub struct ItemTransform {
    pub radius: f64,
    pub angle: f64,
}

impl ItemTransform {
    pub fn origin(&self) -> String {
        format!("center center -{}px", self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    None,
    Linear(Duration),
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Linear(d) => write!(f, "{}ms linear", d.as_millis()),
        }
    }
}

/// A surface with fixed geometry, for headless hosts and tests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixedSurface {
    pub height: f64,
    pub item_heights: Vec<f64>,
}

impl FixedSurface {
    pub fn uniform(height: f64, item_count: usize, item_height: f64) -> Self {
        Self {
            height,
            item_heights: vec![item_height; item_count],
        }
    }
}

impl Surface for FixedSurface {
    fn height(&self) -> f64 {
        self.height
    }

    fn item_heights(&self) -> Vec<f64> {
        self.item_heights.clone()
    }
}

/// Keeps every write it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub list_transforms: Vec<ListTransform>,
    pub list_transitions: Vec<Transition>,
    pub item_transforms: Vec<Option<ItemTransform>>,
    pub item_classes: Vec<Visibility>,
}

impl RecordingRenderer {
    pub fn last_angle(&self) -> Option<f64> {
        self.list_transforms.last().map(|t| t.angle)
    }

    pub fn last_transition(&self) -> Option<Transition> {
        self.list_transitions.last().copied()
    }

    fn slot<T: Default + Clone>(items: &mut Vec<T>, index: usize) -> &mut T {
        if items.len() <= index {
            items.resize(index + 1, T::default());
        }
        &mut items[index]
    }
}

impl Renderer for RecordingRenderer {
    fn set_list_transform(&mut self, transform: ListTransform) {
        self.list_transforms.push(transform);
    }

    fn set_list_transition(&mut self, transition: Transition) {
        self.list_transitions.push(transition);
    }

    fn set_item_transform(&mut self, index: usize, transform: ItemTransform) {
        *Self::slot(&mut self.item_transforms, index) = Some(transform);
    }

    fn set_item_class(&mut self, index: usize, visibility: Visibility) {
        *Self::slot(&mut self.item_classes, index) = visibility;
    }
}
