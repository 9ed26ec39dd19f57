use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::diagram::Diagram;
use crate::error::GeometryError;
use crate::geometry::{Fraction, Vector2D, vector};
use crate::model::{Anchor, DiagramBox, Edge};

static BOX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^box\s+(\S+)\s+at\s+(\S+)\s+(\S+)(?:\s+size\s+(\S+)\s+(\S+))?$").unwrap()
});
static CONNECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^connect\s+(\S+)\s+(\S+)(?:\s+(\S+)\s+(\S+))?$").unwrap());
static MOVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^move\s+(\S+)\s+(by|to)\s+(\S+)\s+(\S+)$").unwrap());
static EDGE_ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(top|bottom|left|right)@(\S+)$").unwrap());
static ANY_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^any\((.*)\)$").unwrap());

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {source}")]
    Geometry {
        line: usize,
        #[source]
        source: GeometryError,
    },

    #[error("line {line}: box size must be positive, got {width}x{height}")]
    InvalidSize { line: usize, width: f64, height: f64 },

    #[error("line {line}: unknown box '{id}'")]
    UnknownBox { line: usize, id: String },

    #[error("line {line}: box '{id}' is already defined")]
    DuplicateBox { line: usize, id: String },
}

/// How a `connect` statement picks the anchor at one end.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorChoice {
    Nearest,
    /// Nearest of the box's twelve fixed anchors.
    NearestFixed,
    Edge(Edge, Fraction),
    /// Nearest of the listed edge points.
    Any(Vec<(Edge, Fraction)>),
}

impl AnchorChoice {
    pub fn resolve(&self, target: &DiagramBox) -> Anchor {
        match self {
            Self::Nearest => Anchor::Nearest,
            Self::NearestFixed => target.nearest_fixed_anchor(),
            Self::Edge(edge, fraction) => Anchor::Fixed {
                edge: *edge,
                fraction: *fraction,
            },
            Self::Any(points) => Anchor::NearestOf(
                points
                    .iter()
                    .map(|&(edge, fraction)| Anchor::Fixed { edge, fraction })
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    By(Vector2D),
    To(Vector2D),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Box {
        id: String,
        position: Vector2D,
        size: Option<Vector2D>,
    },
    Connect {
        from: String,
        to: String,
        start: AnchorChoice,
        end: AnchorChoice,
    },
    Move {
        id: String,
        motion: Motion,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// 1-based source line.
    pub line: usize,
    pub command: Command,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub statements: Vec<Statement>,
}

pub fn parse_scene(input: &str) -> Result<Scene, SceneError> {
    let mut statements = Vec::new();
    for (idx, raw_line) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("%%") {
            continue;
        }
        statements.push(Statement {
            line,
            command: parse_command(trimmed, line)?,
        });
    }
    Ok(Scene { statements })
}

fn parse_command(text: &str, line: usize) -> Result<Command, SceneError> {
    if let Some(caps) = BOX_RE.captures(text) {
        let position = vector(number(&caps[2], line)?, number(&caps[3], line)?);
        let size = match (caps.get(4), caps.get(5)) {
            (Some(w), Some(h)) => {
                let (width, height) = (number(w.as_str(), line)?, number(h.as_str(), line)?);
                if width <= 0.0 || height <= 0.0 {
                    return Err(SceneError::InvalidSize {
                        line,
                        width,
                        height,
                    });
                }
                Some(vector(width, height))
            }
            _ => None,
        };
        return Ok(Command::Box {
            id: caps[1].to_string(),
            position,
            size,
        });
    }

    if let Some(caps) = CONNECT_RE.captures(text) {
        let (start, end) = match (caps.get(3), caps.get(4)) {
            (Some(start), Some(end)) => (
                parse_anchor(start.as_str(), line)?,
                parse_anchor(end.as_str(), line)?,
            ),
            _ => (AnchorChoice::NearestFixed, AnchorChoice::NearestFixed),
        };
        return Ok(Command::Connect {
            from: caps[1].to_string(),
            to: caps[2].to_string(),
            start,
            end,
        });
    }

    if let Some(caps) = MOVE_RE.captures(text) {
        let amount = vector(number(&caps[3], line)?, number(&caps[4], line)?);
        let motion = if &caps[2] == "by" {
            Motion::By(amount)
        } else {
            Motion::To(amount)
        };
        return Ok(Command::Move {
            id: caps[1].to_string(),
            motion,
        });
    }

    let keyword = text.split_whitespace().next().unwrap_or_default();
    let message = match keyword {
        "box" => "expected `box <id> at <x> <y> [size <w> <h>]`".to_string(),
        "connect" => "expected `connect <from> <to> [<start-anchor> <end-anchor>]`".to_string(),
        "move" => "expected `move <id> by|to <x> <y>`".to_string(),
        other => format!("unknown statement '{other}'"),
    };
    Err(SceneError::Syntax { line, message })
}

fn parse_anchor(token: &str, line: usize) -> Result<AnchorChoice, SceneError> {
    match token {
        "nearest" => return Ok(AnchorChoice::Nearest),
        "fixed" => return Ok(AnchorChoice::NearestFixed),
        _ => {}
    }

    if let Some(caps) = ANY_ANCHOR_RE.captures(token) {
        let points = caps[1]
            .split(',')
            .map(|part| parse_edge_point(part.trim(), line))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(AnchorChoice::Any(points));
    }

    let (edge, fraction) = parse_edge_point(token, line)?;
    Ok(AnchorChoice::Edge(edge, fraction))
}

fn parse_edge_point(token: &str, line: usize) -> Result<(Edge, Fraction), SceneError> {
    let caps = EDGE_ANCHOR_RE
        .captures(token)
        .ok_or_else(|| SceneError::Syntax {
            line,
            message: format!(
                "unknown anchor '{token}' (expected nearest, fixed, <edge>@<fraction> or any(...))"
            ),
        })?;
    let edge = Edge::from_token(&caps[1]).ok_or_else(|| SceneError::Syntax {
        line,
        message: format!("unknown edge '{}'", &caps[1]),
    })?;
    let fraction =
        Fraction::new(number(&caps[2], line)?).map_err(|source| SceneError::Geometry { line, source })?;
    Ok((edge, fraction))
}

fn number(token: &str, line: usize) -> Result<f64, SceneError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SceneError::Syntax {
            line,
            message: format!("expected a number, got '{token}'"),
        })
}

impl Scene {
    /// Replays the statements against `diagram` in source order.
    pub fn apply(&self, diagram: &mut Diagram) -> Result<(), SceneError> {
        for Statement { line, command } in &self.statements {
            let line = *line;
            match command {
                Command::Box { id, position, size } => {
                    if diagram.get(id).is_some() {
                        return Err(SceneError::DuplicateBox {
                            line,
                            id: id.clone(),
                        });
                    }
                    match size {
                        Some(size) => diagram.add_box(id.clone(), size.x, size.y, *position),
                        None => diagram.add_box_at(id.clone(), *position),
                    };
                }
                Command::Connect {
                    from,
                    to,
                    start,
                    end,
                } => {
                    let from_box = lookup(diagram, from, line)?;
                    let to_box = lookup(diagram, to, line)?;
                    let (start_anchor, end_anchor) = (start.resolve(&from_box), end.resolve(&to_box));
                    diagram.connect_with(&from_box, &to_box, start_anchor, end_anchor);
                }
                Command::Move { id, motion } => {
                    let target = lookup(diagram, id, line)?;
                    match *motion {
                        Motion::By(delta) => target.move_by(delta),
                        Motion::To(position) => target.move_to(position),
                    }
                }
            }
        }
        Ok(())
    }
}

fn lookup(diagram: &Diagram, id: &str, line: usize) -> Result<DiagramBox, SceneError> {
    diagram.get(id).ok_or_else(|| SceneError::UnknownBox {
        line,
        id: id.to_string(),
    })
}
