#![deny(unsafe_code)]
//! CLI binary for tidefield.
//!
//! Subcommands:
//! - `render`: mount the field headless, run N frames, write a PNG
//! - `params`: print the effective parameters and their schema
//! - `themes`: list the themes and their palettes

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use std::path::{Path, PathBuf};
use std::process;
use tidefield_core::{
    FieldConfig, FieldError, FieldMount, FixedRateScheduler, FrameLoop, HostContext, HostEvent,
    Surface, Theme,
};
use tidefield_render::RasterRenderer;

#[derive(Parser)]
#[command(name = "tidefield", about = "Animated particle-field renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where the field configuration comes from.
#[derive(clap::Args)]
struct ConfigArgs {
    /// Full configuration document (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Flat parameter overrides as a JSON object, applied after --config.
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Subcommand)]
enum Command {
    /// Animate the field for N frames and write a PNG snapshot of the last one.
    Render {
        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 640)]
        width: u32,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 360)]
        height: u32,

        /// Number of frames to animate (at least 1).
        #[arg(short, long, default_value_t = 120)]
        frames: u64,

        /// Frame rate used to derive frame timestamps.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// PRNG seed for the particle layout.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Theme (dark, light).
        #[arg(short, long, default_value = "dark")]
        theme: String,

        /// Pointer position in surface pixels, e.g. `320,180`.
        #[arg(long, value_delimiter = ',')]
        pointer: Option<Vec<f32>>,

        /// Output file path.
        #[arg(short, long, default_value = "tidefield.png")]
        output: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the effective field parameters and their schema.
    Params {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List available themes and their colors.
    Themes,
}

fn load_config(args: &ConfigArgs) -> Result<FieldConfig, CliError> {
    let base = match &args.config {
        Some(path) => read_config(path)?,
        None => FieldConfig::default(),
    };
    let overrides: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    Ok(base.with_overrides(&overrides)?)
}

fn read_config(path: &Path) -> Result<FieldConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    FieldConfig::from_json_str(&text)
        .map_err(|e| CliError::Input(format!("{}: {e}", path.display())))
}

fn pointer_event(pointer: Option<&[f32]>) -> Result<Option<HostEvent>, CliError> {
    match pointer {
        None => Ok(None),
        Some(&[client_x, client_y]) => Ok(Some(HostEvent::PointerMove { client_x, client_y })),
        Some(other) => Err(CliError::Input(format!(
            "--pointer takes two values, got {}",
            other.len()
        ))),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Themes => {
            if cli.json {
                let themes: Vec<_> = Theme::all()
                    .iter()
                    .map(|t| {
                        let p = t.palette();
                        serde_json::json!({
                            "name": t.name(),
                            "deep": p.deep,
                            "peak": p.peak,
                            "fog": p.fog,
                            "background": p.background,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&themes)?);
            } else {
                println!("Themes:");
                for t in Theme::all() {
                    let p = t.palette();
                    println!(
                        "  {:<6} deep {}  peak {}  fog {}  background {}",
                        t.name(),
                        p.deep.to_hex(),
                        p.peak.to_hex(),
                        p.fog.to_hex(),
                        p.background.to_hex()
                    );
                }
            }
        }
        Command::Params { config } => {
            let config = load_config(&config)?;
            let info = serde_json::json!({
                "params": config.params(),
                "schema": FieldConfig::param_schema(),
            });
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&info["params"])?);
            }
        }
        Command::Render {
            width,
            height,
            frames,
            fps,
            seed,
            theme,
            pointer,
            output,
            config,
        } => {
            if frames == 0 {
                return Err(CliError::Input("--frames must be at least 1".into()));
            }
            let config = load_config(&config)?;
            let theme: Theme = theme
                .parse()
                .map_err(|e: FieldError| CliError::Input(e.to_string()))?;
            let surface =
                Surface::new(width, height).map_err(|e| CliError::Input(e.to_string()))?;
            let pointer = pointer_event(pointer.as_deref())?;

            let host = HostContext::new(theme);
            let mount = FieldMount::mount(Some(surface), config, seed, host, RasterRenderer::new)?;
            let Some(mut mount) = mount else {
                return Err(CliError::Input("no surface to mount on".into()));
            };
            if let Some(event) = pointer {
                mount.host().events.push(event);
            }

            let scheduler = FixedRateScheduler::new(fps)?.with_limit(frames);
            let rendered = FrameLoop::for_mount(&mount, scheduler).run(&mut mount)?;
            tidefield_render::snapshot::write_png(mount.renderer(), &output)?;
            let points = mount.renderer().points_drawn();
            let teardown = mount.unmount();
            log::debug!("teardown: {teardown:?}");

            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "height": height,
                    "frames": rendered,
                    "seed": seed,
                    "theme": theme.name(),
                    "points_drawn": points,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {rendered} frames ({width}x{height}, {theme}, seed {seed}, {points} points) -> {}",
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn config_args(config: Option<PathBuf>, params: &str) -> ConfigArgs {
        ConfigArgs {
            config,
            params: params.to_string(),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults_parse() {
        let cli = Cli::try_parse_from(["tidefield", "render"]).unwrap();
        let Command::Render {
            width,
            height,
            frames,
            theme,
            pointer,
            ..
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!((width, height, frames), (640, 360, 120));
        assert_eq!(theme, "dark");
        assert!(pointer.is_none());
    }

    #[test]
    fn pointer_parses_as_pair() {
        let cli = Cli::try_parse_from(["tidefield", "render", "--pointer", "10,20.5"]).unwrap();
        let Command::Render { pointer, .. } = cli.command else {
            panic!("expected render");
        };
        let event = pointer_event(pointer.as_deref()).unwrap();
        assert_eq!(
            event,
            Some(HostEvent::PointerMove {
                client_x: 10.0,
                client_y: 20.5
            })
        );
    }

    #[test]
    fn pointer_with_wrong_arity_is_input_error() {
        let err = pointer_event(Some(&[1.0, 2.0, 3.0][..])).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn zero_frames_is_input_error() {
        let cli = Cli::try_parse_from([
            "tidefield",
            "render",
            "--frames",
            "0",
            "--output",
            "/nonexistent/tidefield.png",
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("--frames"));
    }

    #[test]
    fn bad_theme_and_empty_surface_are_input_errors() {
        for args in [
            ["tidefield", "render", "--theme", "sepia"],
            ["tidefield", "render", "--width", "0"],
        ] {
            let err = run(Cli::try_parse_from(args).unwrap()).unwrap_err();
            assert_eq!(err.exit_code(), 12, "{args:?}");
        }
    }

    #[test]
    fn oversized_particle_count_is_field_error() {
        let params = format!(r#"{{"particle_count": {}}}"#, u64::MAX);
        let err = load_config(&config_args(None, &params)).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn params_overlay_defaults() {
        let config = load_config(&config_args(None, r#"{"particle_count": 500}"#)).unwrap();
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.spread, FieldConfig::default().spread);
    }

    #[test]
    fn bad_params_json_is_input_error() {
        let err = load_config(&config_args(None, "{oops")).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn unknown_param_is_field_error() {
        let err = load_config(&config_args(None, r#"{"gravity": 1}"#)).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = load_config(&config_args(
            Some(PathBuf::from("/nonexistent/tidefield.json")),
            "{}",
        ))
        .unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }
}
