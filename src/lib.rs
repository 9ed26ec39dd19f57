#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, DiagramConfig, RenderConfig};
pub use diagram::Diagram;
pub use error::GeometryError;
pub use geometry::{Fraction, Line, LineSegment, Vector2D, vector};
pub use model::{Anchor, Connector, ConnectorChange, ConnectorEnd, DiagramBox, Edge};
pub use parser::{Scene, SceneError, parse_scene};
pub use render::render_svg;
pub use theme::Theme;
