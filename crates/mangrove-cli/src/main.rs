use std::io::Read;
use std::str::FromStr;

use mangrove::render::{
    DeterministicTextMeasurer, SceneOptions, SvgRenderOptions, build_scene, render_scene_svg,
};
use mangrove::{
    MapTree, demo_tree, parse_map_json, parse_map_xml, to_json_string, to_json_string_pretty,
};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Map(mangrove::Error),
    Render(mangrove_render::Error),
    Json(serde_json::Error),
    Raster(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Map(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Raster(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<mangrove::Error> for CliError {
    fn from(value: mangrove::Error) -> Self {
        Self::Map(value)
    }
}

impl From<mangrove_render::Error> for CliError {
    fn from(value: mangrove_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Pdf,
    Json,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    demo: bool,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "mangrove-cli\n\
\n\
USAGE:\n\
  mangrove-cli [parse] [--pretty] [--demo] [<path>|-]\n\
  mangrove-cli layout [--pretty] [--demo] [<path>|-]\n\
  mangrove-cli render [--format svg|png|pdf|json] [--scale <n>] [--background <css-color>] [--out <path>] [--pretty] [--demo] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input starting with '<' is parsed as FreeMind XML, anything else as map JSON.\n\
  - --demo uses the built-in sample map instead of reading input.\n\
  - parse prints the persisted JSON model; layout prints the placed scene.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/PDF output defaults to writing next to the input file (or ./out.png, ./out.pdf for stdin).\n\
  - PNG renders at 2x by default over an opaque background for sharpness.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Parse,
        render_format: RenderFormat::Svg,
        render_scale: 2.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--demo" => args.demo = true,
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_tree(args: &Args) -> Result<MapTree, CliError> {
    if args.demo {
        return Ok(demo_tree());
    }
    let text = read_input(args.input.as_deref())?;
    if text.trim_start().starts_with('<') {
        Ok(parse_map_xml(&text)?)
    } else {
        Ok(parse_map_json(&text)?)
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        use std::io::Write;
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn render_svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, CliError> {
    let mut opt = usvg::Options::default();
    // Keep output stable-ish across environments while still using system fonts.
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|_| CliError::Raster("failed to parse SVG for PNG rendering"))?;

    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px)
        .ok_or(CliError::Raster("failed to allocate pixmap for PNG rendering"))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|_| CliError::Raster("failed to encode PNG"))
}

fn render_svg_to_pdf(svg: &str) -> Result<Vec<u8>, CliError> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt)
        .map_err(|_| CliError::Raster("failed to parse SVG for PDF rendering"))?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| CliError::Raster("failed to convert SVG to PDF"))
}

fn run(args: Args) -> Result<(), CliError> {
    let tree = load_tree(&args)?;

    match args.command {
        Command::Parse => {
            let json = if args.pretty {
                to_json_string_pretty(&tree)?
            } else {
                to_json_string(&tree)?
            };
            println!("{json}");
            Ok(())
        }
        Command::Layout => {
            let scene = build_scene(
                &tree,
                &DeterministicTextMeasurer::default(),
                &SceneOptions::default(),
            )?;
            if args.pretty {
                serde_json::to_writer_pretty(std::io::stdout().lock(), &scene)?;
            } else {
                serde_json::to_writer(std::io::stdout().lock(), &scene)?;
            }
            println!();
            Ok(())
        }
        Command::Render => {
            // Raster and document output composite over an opaque page; plain
            // SVG stays transparent unless a background was asked for.
            let scene_svg = |background: Option<String>| -> Result<String, CliError> {
                let scene = build_scene(
                    &tree,
                    &DeterministicTextMeasurer::default(),
                    &SceneOptions::default(),
                )?;
                Ok(render_scene_svg(
                    &scene,
                    &SvgRenderOptions {
                        background,
                        ..Default::default()
                    },
                ))
            };
            let raster_background = args
                .background
                .clone()
                .or_else(|| Some("#f8fafc".to_string()));

            match args.render_format {
                RenderFormat::Json => {
                    let json = if args.pretty {
                        to_json_string_pretty(&tree)?
                    } else {
                        to_json_string(&tree)?
                    };
                    write_text(&json, args.out.as_deref())
                }
                RenderFormat::Svg => {
                    let svg = scene_svg(args.background.clone())?;
                    write_text(&svg, args.out.as_deref())
                }
                RenderFormat::Png => {
                    let bytes = render_svg_to_png(&scene_svg(raster_background)?, args.render_scale)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    write_bytes(&bytes, &out)
                }
                RenderFormat::Pdf => {
                    let bytes = render_svg_to_pdf(&scene_svg(raster_background)?)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_out_path(args.input.as_deref(), "pdf")
                            .to_string_lossy()
                            .to_string()
                    });
                    write_bytes(&bytes, &out)
                }
            }
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
