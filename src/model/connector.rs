use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::geometry::Vector2D;

use super::anchor::Anchor;
use super::boxes::DiagramBox;
use super::events::{ConnectorChange, ConnectorEnd, ListenerId, Listeners};

/// Straight line between two boxes, each end resolved through its anchor.
///
/// Endpoints are computed on every read, so they always reflect the current
/// box positions. The connector subscribes to both boxes on construction and
/// re-emits their moves as [`ConnectorChange`] events; the subscriptions are
/// dropped with the connector.
pub struct Connector {
    start_box: DiagramBox,
    start_anchor: Anchor,
    end_box: DiagramBox,
    end_anchor: Anchor,
    listeners: Rc<Listeners<ConnectorChange>>,
    subscriptions: [ListenerId; 2],
}

impl Connector {
    pub fn new(
        start_box: DiagramBox,
        start_anchor: Anchor,
        end_box: DiagramBox,
        end_anchor: Anchor,
    ) -> Self {
        let listeners = Rc::new(Listeners::new());
        let subscriptions = [
            relay(&start_box, &listeners, ConnectorEnd::Start),
            relay(&end_box, &listeners, ConnectorEnd::End),
        ];
        log::debug!(
            "connector {:?} -> {:?} between boxes at {} and {}",
            start_anchor,
            end_anchor,
            start_box.position(),
            end_box.position()
        );
        Self {
            start_box,
            start_anchor,
            end_box,
            end_anchor,
            listeners,
            subscriptions,
        }
    }

    pub fn start_box(&self) -> &DiagramBox {
        &self.start_box
    }

    pub fn end_box(&self) -> &DiagramBox {
        &self.end_box
    }

    pub fn start_anchor(&self) -> &Anchor {
        &self.start_anchor
    }

    pub fn end_anchor(&self) -> &Anchor {
        &self.end_anchor
    }

    pub fn start_point(&self) -> Result<Vector2D> {
        self.start_anchor.point_from_to(
            &self.start_box,
            self.end_anchor.reference_point_for(&self.end_box),
        )
    }

    pub fn end_point(&self) -> Result<Vector2D> {
        self.end_anchor.point_from_to(
            &self.end_box,
            self.start_anchor.reference_point_for(&self.start_box),
        )
    }

    pub fn add_change_listener(&self, listener: impl Fn(&ConnectorChange) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

fn relay(
    source: &DiagramBox,
    listeners: &Rc<Listeners<ConnectorChange>>,
    moved: ConnectorEnd,
) -> ListenerId {
    let listeners = Rc::downgrade(listeners);
    source.add_position_listener(move |_| {
        if let Some(listeners) = listeners.upgrade() {
            listeners.emit(&ConnectorChange { moved });
        }
    })
}

impl Drop for Connector {
    fn drop(&mut self) {
        let [start, end] = self.subscriptions;
        self.start_box.remove_position_listener(start);
        self.end_box.remove_position_listener(end);
    }
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("start_box", &self.start_box)
            .field("start_anchor", &self.start_anchor)
            .field("end_box", &self.end_box)
            .field("end_anchor", &self.end_anchor)
            .field("listeners", &self.listeners)
            .finish()
    }
}
