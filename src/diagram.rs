use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::DiagramConfig;
use crate::geometry::Vector2D;
use crate::model::{Anchor, Connector, DiagramBox, ListenerId};

/// A set of labelled boxes and the connectors between them.
///
/// Every box added here is watched: when it moves, each other box that now
/// overlaps it is pushed out of the way with [`DiagramBox::hit_delta`], and
/// those pushes cascade through the same path. Resolution is pairwise, one
/// moved box against each other box in insertion order.
pub struct Diagram {
    config: DiagramConfig,
    members: Rc<RefCell<Vec<DiagramBox>>>,
    labels: Vec<String>,
    subscriptions: Vec<Option<ListenerId>>,
    connectors: Vec<Connector>,
    cascade_depth: Rc<Cell<usize>>,
}

impl Diagram {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            config,
            members: Rc::new(RefCell::new(Vec::new())),
            labels: Vec::new(),
            subscriptions: Vec::new(),
            connectors: Vec::new(),
            cascade_depth: Rc::new(Cell::new(0)),
        }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Adds a box of the configured default size.
    pub fn add_box_at(&mut self, label: impl Into<String>, position: Vector2D) -> DiagramBox {
        let (width, height) = (self.config.box_width, self.config.box_height);
        self.add_box(label, width, height, position)
    }

    pub fn add_box(
        &mut self,
        label: impl Into<String>,
        width: f64,
        height: f64,
        position: Vector2D,
    ) -> DiagramBox {
        let handle = DiagramBox::new(width, height, position);
        let subscription = self
            .config
            .resolve_collisions
            .then(|| self.watch(&handle));
        self.members.borrow_mut().push(handle.clone());
        self.labels.push(label.into());
        self.subscriptions.push(subscription);
        handle
    }

    fn watch(&self, handle: &DiagramBox) -> ListenerId {
        let members: Weak<RefCell<Vec<DiagramBox>>> = Rc::downgrade(&self.members);
        let depth = Rc::clone(&self.cascade_depth);
        let limit = self.config.max_cascade_depth;
        handle.add_position_listener(move |event| {
            if let Some(members) = members.upgrade() {
                push_away_from(&members, &event.target, &depth, limit);
            }
        })
    }

    /// Joins two boxes, each end snapping to the nearest of its box's fixed
    /// anchors.
    pub fn connect(&mut self, from: &DiagramBox, to: &DiagramBox) -> &Connector {
        let (start, end) = (from.nearest_fixed_anchor(), to.nearest_fixed_anchor());
        self.connect_with(from, to, start, end)
    }

    pub fn connect_with(
        &mut self,
        from: &DiagramBox,
        to: &DiagramBox,
        start_anchor: Anchor,
        end_anchor: Anchor,
    ) -> &Connector {
        self.connectors
            .push(from.straight_connector_to(to, start_anchor, end_anchor));
        &self.connectors[self.connectors.len() - 1]
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels need not be unique; lookup returns the first box added under
    /// `label`. [`Scene::apply`](crate::parser::Scene::apply) rejects
    /// duplicates before they get here.
    pub fn get(&self, label: &str) -> Option<DiagramBox> {
        let index = self.labels.iter().position(|existing| existing == label)?;
        self.members.borrow().get(index).cloned()
    }

    pub fn label_of(&self, handle: &DiagramBox) -> Option<&str> {
        let index = self
            .members
            .borrow()
            .iter()
            .position(|member| member.ptr_eq(handle))?;
        self.labels.get(index).map(String::as_str)
    }

    /// Boxes with their labels, in insertion order.
    pub fn boxes(&self) -> Vec<(&str, DiagramBox)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.members.borrow().iter().cloned())
            .collect()
    }

    /// Pushes every box overlapping `moved` out of its way, as a move of
    /// `moved` would.
    pub fn resolve_collisions_with(&self, moved: &DiagramBox) {
        push_away_from(
            &self.members,
            moved,
            &self.cascade_depth,
            self.config.max_cascade_depth,
        );
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl Drop for Diagram {
    fn drop(&mut self) {
        let members = self.members.borrow();
        for (member, subscription) in members.iter().zip(&self.subscriptions) {
            if let Some(id) = subscription {
                member.remove_position_listener(*id);
            }
        }
    }
}

fn push_away_from(
    members: &RefCell<Vec<DiagramBox>>,
    moved: &DiagramBox,
    depth: &Cell<usize>,
    limit: usize,
) {
    if depth.get() >= limit {
        log::warn!(
            "collision cascade reached depth {limit}; box at {} left unresolved",
            moved.position()
        );
        return;
    }

    depth.set(depth.get() + 1);
    // Snapshot so nested responses can read the member list.
    let snapshot = members.borrow().clone();
    for other in snapshot.iter().filter(|other| !other.ptr_eq(moved)) {
        if let Some(delta) = other.hit_delta(moved) {
            log::debug!(
                "pushing box at {} by {delta} (depth {})",
                other.position(),
                depth.get()
            );
            other.move_by(delta);
        }
    }
    depth.set(depth.get() - 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vector;
    use crate::model::ConnectorEnd;

    fn small_config(max_cascade_depth: usize) -> DiagramConfig {
        DiagramConfig {
            box_width: 10.0,
            box_height: 10.0,
            resolve_collisions: true,
            max_cascade_depth,
        }
    }

    #[test]
    fn moving_into_a_box_pushes_it_away() {
        let mut diagram = Diagram::new(small_config(16));
        let a = diagram.add_box_at("a", vector(0.0, 0.0));
        let b = diagram.add_box_at("b", vector(20.0, 0.0));

        a.move_by(vector(15.0, 0.0));

        assert_eq!(a.position(), vector(15.0, 0.0));
        assert_eq!(b.position(), vector(25.0, 0.0));
        assert_eq!(a.hit_delta(&b), None);
    }

    #[test]
    fn touching_boxes_stay_put() {
        let mut diagram = Diagram::new(small_config(16));
        let a = diagram.add_box_at("a", vector(0.0, 0.0));
        let b = diagram.add_box_at("b", vector(20.0, 0.0));

        a.move_to(vector(10.0, 0.0));

        assert_eq!(b.position(), vector(20.0, 0.0));
    }

    #[test]
    fn pushes_cascade_along_a_row() {
        let mut diagram = Diagram::new(small_config(16));
        let row: Vec<DiagramBox> = (0..4)
            .map(|i| diagram.add_box_at(format!("b{i}"), vector(10.0 * i as f64, 0.0)))
            .collect();

        row[0].move_by(vector(5.0, 0.0));

        let xs: Vec<f64> = row.iter().map(|b| b.left()).collect();
        assert_eq!(xs, vec![5.0, 15.0, 25.0, 35.0]);
    }

    #[test]
    fn cascade_stops_at_depth_limit() {
        let mut diagram = Diagram::new(small_config(1));
        let row: Vec<DiagramBox> = (0..3)
            .map(|i| diagram.add_box_at(format!("b{i}"), vector(10.0 * i as f64, 0.0)))
            .collect();

        row[0].move_by(vector(5.0, 0.0));

        assert_eq!(row[1].left(), 15.0);
        assert_eq!(row[2].left(), 20.0);
        assert!(row[2].hit_delta(&row[1]).is_some());
    }

    #[test]
    fn collisions_can_be_disabled() {
        let mut config = small_config(16);
        config.resolve_collisions = false;
        let mut diagram = Diagram::new(config);
        let a = diagram.add_box_at("a", vector(0.0, 0.0));
        let b = diagram.add_box_at("b", vector(20.0, 0.0));

        a.move_to(vector(18.0, 0.0));

        assert_eq!(b.position(), vector(20.0, 0.0));
        assert_eq!(a.position_listener_count(), 0);

        diagram.resolve_collisions_with(&a);
        assert_eq!(b.position(), vector(28.0, 0.0));
    }

    #[test]
    fn pushed_boxes_notify_their_connectors() {
        let mut diagram = Diagram::new(small_config(16));
        let a = diagram.add_box_at("a", vector(0.0, 0.0));
        let b = diagram.add_box_at("b", vector(20.0, 0.0));
        let c = diagram.add_box_at("c", vector(20.0, 40.0));
        let changes = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&changes);
        diagram
            .connect(&c, &b)
            .add_change_listener(move |change| log.borrow_mut().push(change.moved));

        a.move_by(vector(15.0, 0.0));

        assert_eq!(*changes.borrow(), vec![ConnectorEnd::End]);
        let connector = &diagram.connectors()[0];
        assert_eq!(connector.start_point().unwrap(), c.top_center());
        assert_eq!(connector.end_point().unwrap(), b.bottom_center());
    }

    #[test]
    fn lookup_by_label() {
        let mut diagram = Diagram::default();
        let a = diagram.add_box_at("a", vector(0.0, 0.0));
        let b = diagram.add_box("b", 30.0, 20.0, vector(300.0, 0.0));

        assert_eq!(diagram.len(), 2);
        assert!(diagram.get("a").unwrap().ptr_eq(&a));
        assert_eq!(diagram.label_of(&b), Some("b"));
        assert!(diagram.get("missing").is_none());
        assert_eq!(a.size(), vector(120.0, 100.0));
        let labels: Vec<&str> = diagram.boxes().into_iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn lookup_returns_first_box_for_a_repeated_label() {
        let mut diagram = Diagram::default();
        let first = diagram.add_box_at("twin", vector(0.0, 0.0));
        let second = diagram.add_box_at("twin", vector(500.0, 0.0));

        assert_eq!(diagram.len(), 2);
        assert!(diagram.get("twin").unwrap().ptr_eq(&first));
        assert_eq!(diagram.label_of(&second), Some("twin"));
    }

    #[test]
    fn dropping_the_diagram_releases_boxes() {
        let mut diagram = Diagram::new(small_config(16));
        let a = diagram.add_box_at("a", vector(0.0, 0.0));
        let b = diagram.add_box_at("b", vector(20.0, 0.0));
        diagram.connect(&a, &b);
        assert_eq!(a.position_listener_count(), 2);

        drop(diagram);

        assert_eq!(a.position_listener_count(), 0);
        assert_eq!(b.position_listener_count(), 0);
        a.move_to(vector(15.0, 0.0));
        assert_eq!(b.position(), vector(20.0, 0.0));
    }
}
