//! Movable boxes, the anchors that pick connection points on them and the
//! connectors that join two boxes.

mod anchor;
mod boxes;
mod connector;
mod events;

pub use anchor::Anchor;
pub use boxes::{DiagramBox, Edge, FIXED_ANCHOR_FRACTIONS};
pub use connector::Connector;
pub use events::{ConnectorChange, ConnectorEnd, ListenerId, TranslationEvent};
