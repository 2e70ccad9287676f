use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use parallax_core::config::{LoadConfig, ProcessConfig};
use parallax_core::frame::TemplatePoint;
use parallax_core::io::image_io::{save_color_image, save_png};
use parallax_core::session::Session;
use tracing::debug;

use super::config::RunConfig;
use crate::summary::print_run_summary;

#[derive(Args)]
pub struct RunArgs {
    /// Frame source: SER file or image directory
    pub source: PathBuf,

    /// Run config file (TOML); overrides the parameter flags below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of frames to load
    #[arg(long, default_value = "90")]
    pub max_frames: usize,

    /// Integer downscale factor applied to every frame
    #[arg(long, default_value = "2")]
    pub scale: u32,

    /// Resize frames to this width before processing (0 = keep)
    #[arg(long, default_value = "0")]
    pub width: u32,

    /// Resize frames to this height before processing (0 = keep)
    #[arg(long, default_value = "0")]
    pub height: u32,

    /// Rotate frames about their center by this many degrees
    #[arg(long, default_value = "0")]
    pub rotation: i32,

    /// Template origin as "x,y"; repeat to track several templates
    #[arg(long = "template", value_parser = parse_template_point)]
    pub templates: Vec<TemplatePoint>,

    /// Template side length in pixels
    #[arg(long, default_value = "32")]
    pub template_size: usize,

    /// Search window side length in pixels
    #[arg(long, default_value = "160")]
    pub search_window: usize,

    /// Depth map output path
    #[arg(long, default_value = "depth_map.png")]
    pub depth_output: PathBuf,

    /// Synthetic aperture image output path
    #[arg(long, default_value = "synthetic.png")]
    pub synthetic_output: PathBuf,

    /// Save the focal template patch to this path
    #[arg(long)]
    pub patch_output: Option<PathBuf>,

    /// Save template 0's displacement series to this CSV path
    #[arg(long)]
    pub shifts_output: Option<PathBuf>,
}

fn parse_template_point(s: &str) -> std::result::Result<TemplatePoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{s}\""))?;
    let x = x.trim().parse().map_err(|_| format!("invalid x in \"{s}\""))?;
    let y = y.trim().parse().map_err(|_| format!("invalid y in \"{s}\""))?;
    Ok(TemplatePoint::new(x, y))
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid run config")?
    } else {
        build_config_from_args(args)
    };

    print_run_summary(&args.source, &config);

    let mut session = Session::new();

    let spinner = phase_spinner("Loading frames")?;
    let started = Instant::now();
    let load_result = session.load_path(&args.source, &config.load);
    spinner.finish_and_clear();
    if load_result.is_err() {
        bail!("{}", session.status_message());
    }
    println!(
        "{} ({:.1}s)",
        session.status_message(),
        started.elapsed().as_secs_f64()
    );

    let spinner = phase_spinner("Tracking, depth map, synthesis")?;
    let started = Instant::now();
    let process_result = session.process(&config.process);
    spinner.finish_and_clear();
    if process_result.is_err() {
        bail!("{}", session.status_message());
    }
    println!(
        "{} ({:.1}s)",
        session.status_message(),
        started.elapsed().as_secs_f64()
    );

    save_outputs(&session, args)?;
    print_motion_stats(&session);

    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        load: LoadConfig {
            max_frames: args.max_frames,
            scale_factor: args.scale,
            override_width: args.width,
            override_height: args.height,
            rotation_degrees: args.rotation,
        },
        process: ProcessConfig {
            template_points: args.templates.clone(),
            template_size: args.template_size,
            search_window_size: args.search_window,
        },
    }
}

fn phase_spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}

fn save_outputs(session: &Session, args: &RunArgs) -> Result<()> {
    if let Some(depth_map) = session.depth_map() {
        save_color_image(depth_map, &args.depth_output)?;
        println!("Saved depth map to {}", args.depth_output.display());
    }

    if let Some(synthetic) = session.synthetic_image() {
        save_color_image(synthetic, &args.synthetic_output)?;
        println!("Saved synthetic image to {}", args.synthetic_output.display());
    }

    if let Some(ref path) = args.patch_output {
        if let Some(patch) = session.focal_template_patch() {
            save_png(patch, path)?;
            println!("Saved focal template patch to {}", path.display());
        }
    }

    if let Some(ref path) = args.shifts_output {
        let mut csv = String::from("frame,dx,dy\n");
        for (i, shift) in session.primary_displacements().iter().enumerate() {
            csv.push_str(&format!("{},{},{}\n", i, shift.dx, shift.dy));
        }
        std::fs::write(path, csv)
            .with_context(|| format!("Failed to write shifts to {}", path.display()))?;
        println!("Saved displacement series to {}", path.display());
    }

    debug!("Outputs saved");
    Ok(())
}

/// Motion summary for template 0, the series the display layer plots.
fn print_motion_stats(session: &Session) {
    let shifts = session.primary_displacements();
    if shifts.is_empty() {
        return;
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for shift in shifts {
        min_x = min_x.min(shift.dx);
        max_x = max_x.max(shift.dx);
        min_y = min_y.min(shift.dy);
        max_y = max_y.max(shift.dy);
    }

    println!();
    println!("Motion of template 1 across {} frames:", shifts.len());
    println!(
        "  X range: {:.1} to {:.1} ({:.1} total)",
        min_x,
        max_x,
        max_x - min_x
    );
    println!(
        "  Y range: {:.1} to {:.1} ({:.1} total)",
        min_y,
        max_y,
        max_y - min_y
    );

    if !session.parallaxes().is_empty() {
        let rendered: Vec<String> = session
            .parallaxes()
            .iter()
            .map(|p| format!("{:.1}", p))
            .collect();
        println!("  Parallax per template: [{}]", rendered.join(", "));
    }
}
