use crate::config::RenderConfig;
use crate::diagram::Diagram;
use crate::model::Connector;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(diagram: &Diagram, theme: &Theme, config: &RenderConfig) -> String {
    let mut svg = String::new();
    let width = config.width;
    let height = config.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&config.background)
    ));

    if config.arrowheads {
        svg.push_str("<defs>");
        svg.push_str(&format!(
            "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
            theme.line_color
        ));
        svg.push_str("</defs>");
    }

    for (label, handle) in diagram.boxes() {
        let position = handle.position();
        svg.push_str(&format!(
            "<g class=\"box\" transform=\"translate({:.2},{:.2})\">",
            position.x, position.y
        ));
        svg.push_str(&format!(
            "<rect width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            handle.width(),
            handle.height(),
            theme.box_corner_radius,
            theme.box_corner_radius,
            theme.box_fill,
            theme.box_stroke,
            theme.box_stroke_width
        ));
        if config.labels {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                handle.width() / 2.0,
                handle.height() / 2.0,
                escape_xml(&theme.font_family),
                theme.font_size,
                theme.text_color,
                escape_xml(label)
            ));
        }
        svg.push_str("</g>");
    }

    for connector in diagram.connectors() {
        if let Some(line) = connector_line(connector, theme, config) {
            svg.push_str(&line);
        }
    }

    svg.push_str("</svg>");
    svg
}

fn connector_line(connector: &Connector, theme: &Theme, config: &RenderConfig) -> Option<String> {
    let endpoints = connector
        .start_point()
        .and_then(|start| Ok((start, connector.end_point()?)));
    let (start, end) = match endpoints {
        Ok((start, end)) => (start.round(), end.round()),
        Err(err) => {
            log::warn!("skipping connector {connector:?}: {err}");
            return None;
        }
    };
    let marker = if config.arrowheads {
        " marker-end=\"url(#arrow)\""
    } else {
        ""
    };
    Some(format!(
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"{marker}/>",
        start.x, start.y, end.x, end.y, theme.line_color, theme.line_width
    ))
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
