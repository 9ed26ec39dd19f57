use crate::config::{load_config, Config};
use crate::diagram::Diagram;
use crate::parser::parse_scene;
use crate::render::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::cmp::max;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "boxlink", version, about = "Render box-and-connector scene scripts to SVG or PNG")]
pub struct Args {
    /// Input scene script, Markdown file with ```boxlink blocks, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON or JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width, overriding the config file
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height, overriding the config file
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Enable debug mode. Raises the log level to at least `Debug` and adds
    /// timestamps and source locations.
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Log level. Logs go to stderr so SVG on stdout stays clean.
    #[arg(long, default_value_t = LevelFilter::Warn)]
    pub log_level: LevelFilter,

    /// Disable colored output in the logs.
    #[arg(long, default_value_t = false)]
    pub no_colors: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let scripts = if is_markdown {
        extract_scene_blocks(&input)
    } else {
        vec![input]
    };

    if scripts.is_empty() {
        return Err(anyhow::anyhow!("No boxlink scenes found in input"));
    }

    if scripts.len() == 1 {
        let svg = render_script(&scripts[0], &config)?;
        return match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref()),
            OutputFormat::Png => {
                let output = ensure_output(&args.output, "png")?;
                write_png(&svg, &output, &config)
            }
        };
    }

    // Markdown input with several scenes
    let outputs = resolve_multi_outputs(args.output.as_deref(), args.output_format, scripts.len())?;
    for (idx, (script, output)) in scripts.iter().zip(&outputs).enumerate() {
        let svg = render_script(script, &config).with_context(|| format!("scene {}", idx + 1))?;
        match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, Some(output))?,
            OutputFormat::Png => write_png(&svg, output, &config)?,
        }
        log::info!("wrote {}", output.display());
    }

    Ok(())
}

fn init_logging(args: &Args) {
    let log_level = if args.debug {
        max(LevelFilter::Debug, args.log_level)
    } else {
        args.log_level
    };

    let mut config_builder = simplelog::ConfigBuilder::new();
    if args.debug {
        config_builder.set_time_level(LevelFilter::Error);
        config_builder.set_time_format_rfc3339();
        config_builder.set_target_level(LevelFilter::Error);
        config_builder.set_location_level(LevelFilter::Error);
    } else {
        config_builder.set_time_level(LevelFilter::Off);
        config_builder.set_thread_level(LevelFilter::Off);
        config_builder.set_target_level(LevelFilter::Off);
        config_builder.set_location_level(LevelFilter::Off);
    }

    let color_choice = if args.no_colors {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // A second init (tests, embedding) keeps the first logger.
    let _ = TermLogger::init(
        log_level,
        config_builder.build(),
        TerminalMode::Stderr,
        color_choice,
    );
}

fn render_script(script: &str, config: &Config) -> Result<String> {
    let scene = parse_scene(script)?;
    let mut diagram = Diagram::new(config.diagram.clone());
    scene.apply(&mut diagram)?;
    log::debug!(
        "scene with {} boxes and {} connectors",
        diagram.len(),
        diagram.connectors().len()
    );
    Ok(render_svg(&diagram, &config.theme, &config.render))
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext, "md" | "markdown"))
            .unwrap_or(false);
        return Ok((content, is_md));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn extract_scene_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut fence: Option<&str> = None;
    let mut current = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim();
        match fence {
            None => fence = detect_scene_fence(trimmed),
            Some(open) if is_fence_end(trimmed, open) => {
                fence = None;
                blocks.push(current.join("\n"));
                current.clear();
            }
            Some(_) => current.push(line),
        }
    }

    blocks
}

fn detect_scene_fence(line: &str) -> Option<&'static str> {
    ["```", "~~~"].into_iter().find(|&fence| {
        let marker = if fence == "```" { '`' } else { '~' };
        line.starts_with(fence) && line.trim_start_matches(marker).trim().starts_with("boxlink")
    })
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    line.strip_prefix(fence)
        .is_some_and(|rest| rest.trim().is_empty())
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        return Ok((1..=count)
            .map(|n| base.join(format!("scene-{n}.{ext}")))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("scene");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((1..=count)
        .map(|n| parent.join(format!("{stem}-{n}.{ext}")))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_scene_blocks() {
        let input = r#"
text
``` boxlink
box a at 0 0
```
```rust
fn main() {}
```
more
~~~boxlink
box b at 10 10
move b by 1 1
~~~
"#;
        let blocks = extract_scene_blocks(input);
        assert_eq!(blocks, vec!["box a at 0 0", "box b at 10 10\nmove b by 1 1"]);
    }

    #[test]
    fn unterminated_block_is_dropped() {
        assert!(extract_scene_blocks("```boxlink\nbox a at 0 0\n").is_empty());
    }

    #[test]
    fn numbers_outputs_after_the_given_stem() {
        let outputs =
            resolve_multi_outputs(Some(Path::new("out/figure.svg")), OutputFormat::Png, 2).unwrap();
        assert_eq!(
            outputs,
            vec![PathBuf::from("out/figure-1.png"), PathBuf::from("out/figure-2.png")]
        );

        let dir = std::env::temp_dir();
        let outputs = resolve_multi_outputs(Some(&dir), OutputFormat::Svg, 1).unwrap();
        assert_eq!(outputs, vec![dir.join("scene-1.svg")]);

        assert!(resolve_multi_outputs(None, OutputFormat::Svg, 2).is_err());
    }

    #[test]
    fn renders_a_script() {
        let config = Config::default();
        let svg = render_script("box a at 10 10\nbox b at 300 10\nconnect a b\n", &config).unwrap();
        assert_eq!(svg.matches("<line").count(), 1);

        let err = render_script("connect a b\n", &config).unwrap_err();
        assert_eq!(err.to_string(), "line 1: unknown box 'a'");
    }

    #[test]
    fn debug_raises_log_level() {
        let args = Args::parse_from(["boxlink", "--debug", "--log-level", "error", "-w", "640"]);
        assert!(args.debug);
        assert_eq!(args.log_level, LevelFilter::Error);
        assert_eq!(args.width, Some(640.0));
        assert_eq!(args.height, None);
    }
}
