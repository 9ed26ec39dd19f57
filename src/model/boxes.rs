use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::geometry::{Fraction, Line, LineSegment, Vector2D, vector};

use super::anchor::Anchor;
use super::connector::Connector;
use super::events::{ListenerId, Listeners, TranslationEvent};

/// Fractions used for the fixed anchors of every box, per edge.
pub const FIXED_ANCHOR_FRACTIONS: [Fraction; 3] = [
    Fraction::new_unchecked(0.2),
    Fraction::HALF,
    Fraction::new_unchecked(0.8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Clockwise, starting at the top edge.
    pub const CLOCKWISE: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned rectangle whose top-left corner can be moved.
///
/// `DiagramBox` is a shared handle: clones refer to the same box, and
/// [`DiagramBox::ptr_eq`] tells handles of the same box apart from boxes
/// that merely share geometry. Width and height are fixed at construction
/// and must be strictly positive.
#[derive(Clone)]
pub struct DiagramBox {
    inner: Rc<BoxInner>,
}

struct BoxInner {
    width: f64,
    height: f64,
    position: Cell<Vector2D>,
    listeners: Listeners<TranslationEvent>,
}

impl DiagramBox {
    pub fn new(width: f64, height: f64, position: Vector2D) -> Self {
        debug_assert!(
            width > 0.0 && height > 0.0,
            "box size must be positive, got {width}x{height}"
        );
        Self {
            inner: Rc::new(BoxInner {
                width,
                height,
                position: Cell::new(position),
                listeners: Listeners::new(),
            }),
        }
    }

    pub fn ptr_eq(&self, other: &DiagramBox) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn width(&self) -> f64 {
        self.inner.width
    }

    pub fn height(&self) -> f64 {
        self.inner.height
    }

    pub fn size(&self) -> Vector2D {
        vector(self.width(), self.height())
    }

    pub fn position(&self) -> Vector2D {
        self.inner.position.get()
    }

    // Edges, corners and centers

    pub fn top(&self) -> f64 {
        self.position().y
    }

    pub fn bottom(&self) -> f64 {
        self.position().y + self.height()
    }

    pub fn left(&self) -> f64 {
        self.position().x
    }

    pub fn right(&self) -> f64 {
        self.position().x + self.width()
    }

    pub fn top_left(&self) -> Vector2D {
        self.position()
    }

    pub fn top_center(&self) -> Vector2D {
        vector(self.left() + self.width() / 2.0, self.top())
    }

    pub fn top_right(&self) -> Vector2D {
        vector(self.right(), self.top())
    }

    pub fn bottom_left(&self) -> Vector2D {
        vector(self.left(), self.bottom())
    }

    pub fn bottom_center(&self) -> Vector2D {
        vector(self.left() + self.width() / 2.0, self.bottom())
    }

    pub fn bottom_right(&self) -> Vector2D {
        vector(self.right(), self.bottom())
    }

    pub fn left_center(&self) -> Vector2D {
        vector(self.left(), self.top() + self.height() / 2.0)
    }

    pub fn right_center(&self) -> Vector2D {
        vector(self.right(), self.top() + self.height() / 2.0)
    }

    pub fn center(&self) -> Vector2D {
        vector(
            self.left() + self.width() / 2.0,
            self.top() + self.height() / 2.0,
        )
    }

    /// Which edge `point` lies beyond, judged by the two diagonals.
    ///
    /// A point exactly on a diagonal counts as not below it, so the corner
    /// rays resolve to top (above the top-left and top-right corners),
    /// right (beyond the bottom-right corner) and left (beyond the
    /// bottom-left corner); the center itself resolves to top.
    pub fn edge_heading(&self, point: Vector2D) -> Result<Edge> {
        let first_diagonal = Line::between(self.top_left(), self.bottom_right())?;
        let second_diagonal = Line::between(self.bottom_left(), self.top_right())?;
        let below_first = first_diagonal.y_for(point.x)? < point.y;
        let below_second = second_diagonal.y_for(point.x)? < point.y;

        Ok(match (below_first, below_second) {
            (true, true) => Edge::Bottom,
            (true, false) => Edge::Left,
            (false, true) => Edge::Right,
            (false, false) => Edge::Top,
        })
    }

    pub fn edge_line(&self, edge: Edge) -> Line {
        match edge {
            Edge::Top => Line::horizontal(self.top()),
            Edge::Bottom => Line::horizontal(self.bottom()),
            Edge::Left => Line::vertical(self.left()),
            Edge::Right => Line::vertical(self.right()),
        }
    }

    /// Edge segments wind clockwise; fraction 0 is where the winding enters
    /// the edge.
    pub fn segment_for_edge(&self, edge: Edge) -> LineSegment {
        match edge {
            Edge::Top => LineSegment::new(self.top_left(), self.top_right()),
            Edge::Right => LineSegment::new(self.top_right(), self.bottom_right()),
            Edge::Bottom => LineSegment::new(self.bottom_right(), self.bottom_left()),
            Edge::Left => LineSegment::new(self.bottom_left(), self.top_left()),
        }
    }

    pub fn point_at_edge_fraction(&self, edge: Edge, fraction: Fraction) -> Vector2D {
        self.segment_for_edge(edge).point_at_fraction(fraction)
    }

    // Anchors

    /// The 12 fixed anchors: fraction-major over [`FIXED_ANCHOR_FRACTIONS`],
    /// edges in [`Edge::CLOCKWISE`] order within each fraction. Nearest-of-set
    /// resolution breaks ties by this order.
    pub fn all_anchors(&self) -> Vec<Anchor> {
        FIXED_ANCHOR_FRACTIONS
            .iter()
            .flat_map(|&fraction| {
                Edge::CLOCKWISE
                    .into_iter()
                    .map(move |edge| Anchor::Fixed { edge, fraction })
            })
            .collect()
    }

    pub fn nearest_fixed_anchor(&self) -> Anchor {
        Anchor::NearestOf(self.all_anchors())
    }

    pub fn top_edge_anchor_at_fraction(&self, fraction: f64) -> Result<Anchor> {
        Anchor::point_at_edge(Edge::Top, fraction)
    }

    pub fn bottom_edge_anchor_at_fraction(&self, fraction: f64) -> Result<Anchor> {
        Anchor::point_at_edge(Edge::Bottom, fraction)
    }

    pub fn left_edge_anchor_at_fraction(&self, fraction: f64) -> Result<Anchor> {
        Anchor::point_at_edge(Edge::Left, fraction)
    }

    pub fn right_edge_anchor_at_fraction(&self, fraction: f64) -> Result<Anchor> {
        Anchor::point_at_edge(Edge::Right, fraction)
    }

    pub fn straight_connector_to(
        &self,
        other: &DiagramBox,
        start_anchor: Anchor,
        end_anchor: Anchor,
    ) -> Connector {
        Connector::new(self.clone(), start_anchor, other.clone(), end_anchor)
    }

    // Movement

    pub fn move_by(&self, delta: Vector2D) {
        self.move_to(self.position() + delta);
    }

    /// Moves the top-left corner and notifies every position listener before
    /// returning. Moving to the current position is a silent no-op.
    pub fn move_to(&self, new_position: Vector2D) {
        let old_position = self.position();
        if old_position == new_position {
            return;
        }

        self.inner.position.set(new_position);
        log::trace!("box moved {old_position} -> {new_position}");
        self.inner.listeners.emit(&TranslationEvent {
            target: self.clone(),
            old_position,
            new_position,
        });
    }

    pub fn add_position_listener(
        &self,
        listener: impl Fn(&TranslationEvent) + 'static,
    ) -> ListenerId {
        self.inner.listeners.add(listener)
    }

    pub fn remove_position_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    pub fn position_listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    // Overlap

    /// Displacement that moves `self` out of `other` along the axis of least
    /// overlap, or `None` when the boxes do not overlap. Boxes that only
    /// share an edge do not overlap. Equal overlaps resolve vertically.
    pub fn hit_delta(&self, other: &DiagramBox) -> Option<Vector2D> {
        let overlap_x = (self.right() - other.left()).min(other.right() - self.left());
        let overlap_y = (self.bottom() - other.top()).min(other.bottom() - self.top());

        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return None;
        }

        if overlap_x < overlap_y {
            let push = if self.center().x < other.center().x {
                -overlap_x
            } else {
                overlap_x
            };
            Some(vector(push, 0.0))
        } else {
            let push = if self.center().y < other.center().y {
                -overlap_y
            } else {
                overlap_y
            };
            Some(vector(0.0, push))
        }
    }
}

impl fmt::Debug for DiagramBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramBox")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("position", &self.position())
            .field("listeners", &self.inner.listeners)
            .finish()
    }
}
