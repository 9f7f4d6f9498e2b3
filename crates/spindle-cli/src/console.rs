use spindle::Renderer;
use spindle::Transition;
use spindle::Visibility;
use spindle::render::{ItemTransform, ListTransform};

/// Logs every write the wheel makes instead of drawing it.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    frames: usize,
    classes: Vec<Visibility>,
}

impl ConsoleRenderer {
    /// Number of list transforms written so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.classes
            .iter()
            .position(|v| *v == Visibility::Highlighted)
    }
}

impl Renderer for ConsoleRenderer {
    fn set_list_transform(&mut self, transform: ListTransform) {
        self.frames += 1;
        log::debug!("list: {}", transform);
    }

    fn set_list_transition(&mut self, transition: Transition) {
        log::debug!("transition: '{}'", transition);
    }

    fn set_item_transform(&mut self, index: usize, transform: ItemTransform) {
        log::trace!(
            "item {}: origin '{}' transform '{}'",
            index,
            transform.origin(),
            transform
        );
    }

    fn set_item_class(&mut self, index: usize, visibility: Visibility) {
        if self.classes.len() <= index {
            self.classes.resize(index + 1, Visibility::Hidden);
        }
        if self.classes[index] != visibility {
            log::trace!("item {}: class {}", index, visibility.as_ref());
        }
        self.classes[index] = visibility;
    }
}
