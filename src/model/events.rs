use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::Vector2D;

use super::boxes::DiagramBox;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned on subscription; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Emitted synchronously by [`DiagramBox::move_to`] when the position changes.
#[derive(Debug, Clone)]
pub struct TranslationEvent {
    pub target: DiagramBox,
    pub old_position: Vector2D,
    pub new_position: Vector2D,
}

impl TranslationEvent {
    pub fn delta(&self) -> Vector2D {
        self.new_position - self.old_position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorEnd {
    Start,
    End,
}

/// Emitted by a connector whenever one of its boxes moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorChange {
    pub moved: ConnectorEnd,
}

type Callback<E> = Rc<dyn Fn(&E)>;

/// Ordered list of callbacks, invoked in registration order.
///
/// Dispatch works on a snapshot of the list, so callbacks may subscribe,
/// unsubscribe or trigger further dispatches on the same list. A callback
/// added mid-dispatch is first called on the next dispatch; one removed
/// mid-dispatch still runs for the current one.
pub(crate) struct Listeners<E> {
    entries: RefCell<Vec<(ListenerId, Callback<E>)>>,
}

impl<E> Listeners<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, callback: impl Fn(&E) + 'static) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        self.entries.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}
