use crate::config::WheelConfig;
use crate::geometry::{self, GeometryError};
use crate::render::{ItemTransform, ListTransform, Renderer};
use strum::{AsRefStr, Display as StrumDisplay};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
    #[strum(serialize = "highlight")]
    Highlighted,
}

impl Visibility {
    /// Classifies an item by its angular distance from the current angle.
    pub fn classify(distance: f64, highlight_range: f64, visible_range: f64) -> Self {
        let distance = distance.abs();
        if distance < highlight_range {
            Self::Highlighted
        } else if distance < visible_range {
            Self::Visible
        } else {
            Self::Hidden
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub index: usize,
    pub angle: f64,
    pub visibility: Visibility,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LayoutError {
    #[error("Container has no items")]
    NoItems,
    #[error("Container height must be positive, got {height}")]
    ZeroHeight { height: f64 },
    #[error("Item height {item_height}px is too small to give a whole degree per item")]
    DegenerateStep { item_height: f64 },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Angular geometry of a wheel, derived from the container once per layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub radius: f64,
    pub item_step: f64,
    pub highlight_range: f64,
    pub visible_range: f64,
    pub lower: f64,
    pub upper: f64,
    pub elastic_lower: f64,
    pub elastic_upper: f64,
    pub perspective: f64,
    pub item_count: usize,
}

impl Layout {
    pub fn measure(
        height: f64,
        item_heights: &[f64],
        config: &WheelConfig,
    ) -> Result<Self, LayoutError> {
        if !height.is_finite() || height <= 0.0 {
            return Err(LayoutError::ZeroHeight { height });
        }
        let first = *item_heights.first().ok_or(LayoutError::NoItems)?;
        let item_height = if first.is_finite() && first > 0.0 {
            first
        } else {
            config.default_item_height
        };

        let radius = height / 2.0;
        // whole degrees, so every item sits on an integral angle
        let item_step =
            geometry::angle_from_linear_distance(item_height * config.item_chord_ratio, radius)?
                .trunc();
        if item_step <= 0.0 {
            return Err(LayoutError::DegenerateStep { item_height });
        }

        let item_count = item_heights.len();
        let upper = item_step * (item_count - 1) as f64;

        Ok(Self {
            radius,
            item_step,
            highlight_range: item_step / 2.0,
            visible_range: config.visible_range,
            lower: 0.0,
            upper,
            elastic_lower: -config.max_exceed,
            elastic_upper: upper + config.max_exceed,
            perspective: config.perspective,
            item_count,
        })
    }
}

/// Current angle of the wheel plus the items it carries.
///
/// All angle changes go through [`RotationState::set_angle`] so item visibility never
/// disagrees with what was last drawn.
#[derive(Debug, Clone)]
pub struct RotationState {
    layout: Layout,
    angle: f64,
    items: Vec<Item>,
}

impl RotationState {
    pub fn new(layout: Layout) -> Self {
        Self::with_angle(layout, layout.lower)
    }

    /// Builds items for `layout` at `angle`. Nothing is drawn until the next
    /// [`set_angle`](Self::set_angle).
    pub fn with_angle(layout: Layout, angle: f64) -> Self {
        let items = (0..layout.item_count)
            .map(|index| {
                let item_angle = layout.item_step * index as f64;
                Item {
                    index,
                    angle: item_angle,
                    visibility: Visibility::classify(
                        item_angle - angle,
                        layout.highlight_range,
                        layout.visible_range,
                    ),
                }
            })
            .collect();

        Self {
            layout,
            angle,
            items,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Positions every item on the cylinder wall.
    pub fn write_layout(&self, renderer: &mut impl Renderer) {
        for item in &self.items {
            renderer.set_item_transform(
                item.index,
                ItemTransform {
                    radius: self.layout.radius,
                    angle: item.angle,
                },
            );
            renderer.set_item_class(item.index, item.visibility);
        }
    }

    pub fn set_angle(&mut self, angle: f64, renderer: &mut impl Renderer) {
        self.angle = angle;

        renderer.set_list_transform(ListTransform {
            perspective: self.layout.perspective,
            angle,
        });

        let Layout {
            highlight_range,
            visible_range,
            ..
        } = self.layout;
        for item in &mut self.items {
            item.visibility =
                Visibility::classify(item.angle - angle, highlight_range, visible_range);
            renderer.set_item_class(item.index, item.visibility);
        }
    }

    /// Clamps into `[lower, upper]`. Used when settling, never mid-drag.
    pub fn correct_angle(&self, angle: f64) -> f64 {
        if angle < self.layout.lower {
            self.layout.lower
        } else if angle > self.layout.upper {
            self.layout.upper
        } else {
            angle
        }
    }

    pub fn clamp_elastic(&self, angle: f64) -> f64 {
        angle.clamp(self.layout.elastic_lower, self.layout.elastic_upper)
    }

    /// Nearest item to `angle`, limited to existing items.
    pub fn index_from_angle(&self, angle: f64) -> usize {
        let nearest = (angle / self.layout.item_step).round();
        if nearest.is_nan() || nearest <= 0.0 {
            0
        } else {
            (nearest as usize).min(self.len().saturating_sub(1))
        }
    }

    pub fn angle_of(&self, index: usize) -> f64 {
        self.layout.item_step * index as f64
    }

    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.len().saturating_sub(1))
    }
}
