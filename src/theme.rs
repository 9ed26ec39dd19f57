use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub box_fill: String,
    pub box_stroke: String,
    pub box_stroke_width: f32,
    pub box_corner_radius: f32,
    pub text_color: String,
    pub line_color: String,
    pub line_width: f32,
    pub background: String,
}

impl Theme {
    /// Black outlines on white, as boxes are drawn in the plain sketch view.
    pub fn classic() -> Self {
        Self {
            font_family: "'trebuchet ms', verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            box_fill: "#FFFFFF".to_string(),
            box_stroke: "#000000".to_string(),
            box_stroke_width: 1.0,
            box_corner_radius: 0.0,
            text_color: "#000000".to_string(),
            line_color: "#000000".to_string(),
            line_width: 1.0,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            box_fill: "#F8FAFF".to_string(),
            box_stroke: "#C7D2E5".to_string(),
            box_stroke_width: 1.4,
            box_corner_radius: 10.0,
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            line_width: 1.4,
            background: "#FFFFFF".to_string(),
        }
    }
}
