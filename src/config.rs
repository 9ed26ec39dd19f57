use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Size of boxes created without an explicit size.
    pub box_width: f64,
    pub box_height: f64,
    /// Push overlapping boxes apart whenever a box moves.
    pub resolve_collisions: bool,
    /// How many collision responses may nest inside one another before the
    /// diagram stops reacting. A response moves a box, which can trigger
    /// further responses, so without a bound a tight arrangement can recurse
    /// indefinitely.
    pub max_cascade_depth: usize,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            box_width: 120.0,
            box_height: 100.0,
            resolve_collisions: true,
            max_cascade_depth: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub arrowheads: bool,
    pub labels: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            background: "#FFFFFF".to_string(),
            arrowheads: true,
            labels: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub diagram: DiagramConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            diagram: DiagramConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    box_fill: Option<String>,
    box_stroke: Option<String>,
    box_stroke_width: Option<f32>,
    box_corner_radius: Option<f32>,
    text_color: Option<String>,
    line_color: Option<String>,
    line_width: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagramConfigFile {
    box_width: Option<f64>,
    box_height: Option<f64>,
    resolve_collisions: Option<bool>,
    max_cascade_depth: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
    arrowheads: Option<bool>,
    labels: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    diagram: Option<DiagramConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let parsed: ConfigFile = if is_json5 {
        json5::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    apply_config_file(Config::default(), parsed)
}

/// Parses config from an in-memory JSON string, as `load_config` does for
/// `.json` files.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    apply_config_file(Config::default(), parsed)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> anyhow::Result<Config> {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.box_fill {
            config.theme.box_fill = v;
        }
        if let Some(v) = vars.box_stroke {
            config.theme.box_stroke = v;
        }
        if let Some(v) = vars.box_stroke_width {
            config.theme.box_stroke_width = v;
        }
        if let Some(v) = vars.box_corner_radius {
            config.theme.box_corner_radius = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(diagram) = parsed.diagram {
        if let Some(v) = diagram.box_width {
            config.diagram.box_width = v;
        }
        if let Some(v) = diagram.box_height {
            config.diagram.box_height = v;
        }
        if let Some(v) = diagram.resolve_collisions {
            config.diagram.resolve_collisions = v;
        }
        if let Some(v) = diagram.max_cascade_depth {
            config.diagram.max_cascade_depth = v;
        }
    }

    let (width, height) = (config.diagram.box_width, config.diagram.box_height);
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        anyhow::bail!("diagram box size must be positive, got {width}x{height}");
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.arrowheads {
            config.render.arrowheads = v;
        }
        if let Some(v) = render.labels {
            config.render.labels = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.diagram.box_width, 120.0);
        assert_eq!(config.diagram.box_height, 100.0);
        assert_eq!(config.diagram.max_cascade_depth, 16);
        assert!(config.diagram.resolve_collisions);
        assert_eq!(config.render.width, 900.0);
        assert_eq!(config.render.height, 600.0);
    }

    #[test]
    fn overrides_only_given_fields() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "lineColor": "#ff0000", "background": "#101010" },
                "diagram": { "boxWidth": 80, "maxCascadeDepth": 3 },
                "render": { "arrowheads": false }
            }"##,
        )
        .unwrap();

        assert_eq!(config.theme.line_color, "#ff0000");
        assert_eq!(config.theme.box_fill, Theme::modern().box_fill);
        assert_eq!(config.render.background, "#101010");
        assert_eq!(config.diagram.box_width, 80.0);
        assert_eq!(config.diagram.box_height, 100.0);
        assert_eq!(config.diagram.max_cascade_depth, 3);
        assert!(!config.render.arrowheads);
        assert!(config.render.labels);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_config("{ \"diagram\": ").is_err());
    }

    #[test]
    fn rejects_non_positive_box_size() {
        for body in [
            r#"{ "diagram": { "boxWidth": 0 } }"#,
            r#"{ "diagram": { "boxHeight": -5 } }"#,
        ] {
            let err = parse_config(body).unwrap_err();
            assert!(
                err.to_string().starts_with("diagram box size must be positive"),
                "{body}: {err}"
            );
        }
        assert_eq!(
            parse_config(r#"{ "diagram": { "boxWidth": 0 } }"#)
                .unwrap_err()
                .to_string(),
            "diagram box size must be positive, got 0x100"
        );
    }

    #[test]
    fn reads_json5_files() {
        let dir = std::env::temp_dir().join(format!("boxlink-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json5");
        std::fs::write(
            &path,
            "{\n  // trailing commas and comments are fine here\n  diagram: { boxHeight: 40, },\n}\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(config.diagram.box_height, 40.0);
    }
}
