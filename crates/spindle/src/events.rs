use derive_more::{Display, From, Into};
use std::rc::Rc;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventKind {
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelEvent {
    /// The wheel settled on `index`.
    Change { index: usize },
}

impl WheelEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Change { .. } => EventKind::Change,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct ListenerId(u64);

pub type Handler = Rc<dyn Fn(&WheelEvent)>;

struct Subscription {
    id: ListenerId,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl Listeners {
    /// Registers `handler` for `kind`. Registering the same handler twice is a no-op
    /// that hands back the original id.
    pub fn subscribe(&mut self, kind: EventKind, handler: Handler) -> ListenerId {
        if let Some(existing) = self
            .subscriptions
            .iter()
            .find(|s| s.kind == kind && Rc::ptr_eq(&s.handler, &handler))
        {
            return existing.id;
        }

        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, handler });
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn emit(&self, event: &WheelEvent) {
        let kind = event.kind();
        self.subscriptions
            .iter()
            .filter(|s| s.kind == kind)
            .for_each(|s| (s.handler)(event));
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("next_id", &self.next_id)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
