//! Drilling program generator for hole circles
//!
//! Holes are evenly spaced around a circle centered on the work origin. Each hole is reached with a polar rapid
//! (`@` radius, `^` angle), so the controller has to support polar coordinates.
use anyhow::{Context, Result};
use hole_circle::{
    create_program, init_logging, session, Form, HoleCircle, PreviewCanvas, RawFields,
    ToolpathParameters, ToolpathUi, UnitSystem, ValidationError,
};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;
use tracing::warn;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "hole_circle",
    about = "Generates a drilling program for holes evenly spaced on a circle"
)]
struct Opt {
    /// Spindle RPM
    #[structopt(long)]
    spindle: String,

    /// Number of holes
    #[structopt(short, long)]
    num_holes: String,

    /// Radius of the hole circle
    #[structopt(short, long)]
    radius: String,

    /// Angle of the first hole, in degrees counter-clockwise from +X. Must be below 360
    #[structopt(long, default_value = "0", allow_hyphen_values = true)]
    first_angle: String,

    /// Height for rapid moves between holes
    #[structopt(long)]
    safe_z: String,

    /// Height to rapid down to before drilling
    #[structopt(long)]
    start_height: String,

    /// Depth to drill to, below Z zero
    #[structopt(long)]
    depth: String,

    /// Drilling feed rate
    #[structopt(long)]
    drill_feed: String,

    /// Comment for the first line of the program
    #[structopt(short, long, default_value = "")]
    comment: String,

    /// Dimensions are in inches. Only changes the unit note, the program is always written in G21
    #[structopt(long)]
    inch: bool,

    /// Output file for the resulting G code. Leave unset to only validate and preview.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Write an SVG preview of the hole pattern
    #[structopt(long, parse(from_os_str))]
    preview: Option<PathBuf>,

    /// Width and height of the SVG preview, in pixels
    #[structopt(long, default_value = "400")]
    preview_size: f64,
}

impl Opt {
    fn unit_system(&self) -> UnitSystem {
        if self.inch {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        }
    }

    fn raw_fields(&self) -> RawFields {
        RawFields {
            spindle_rpm: self.spindle.clone(),
            num_holes: self.num_holes.clone(),
            radius: self.radius.clone(),
            first_angle: self.first_angle.clone(),
            safe_height: self.safe_z.clone(),
            start_height: self.start_height.clone(),
            drill_depth: self.depth.clone(),
            drill_feed: self.drill_feed.clone(),
            comment: self.comment.clone(),
            unit_system: self.unit_system(),
        }
    }
}

/// Terminal front end: validation results and the preview go to stdout.
struct CliUi {
    form: Form,
    canvas: PreviewCanvas,
    preview_path: Option<PathBuf>,
}

impl CliUi {
    fn write_preview(&self, pattern: &HoleCircle, path: &Path) -> std::io::Result<()> {
        let mut file = BufWriter::new(
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?,
        );
        self.canvas.write_svg(&mut file, pattern)?;
        file.flush()
    }
}

impl ToolpathUi for CliUi {
    fn get_parameters(&mut self) -> Result<ToolpathParameters, ValidationError> {
        let result = self.form.get_parameters();
        if let Err(ValidationError::Unparseable { .. }) = &result {
            println!("Entries cannot be blank");
        }
        if let Some(report) = self.form.report() {
            for (field, ok) in report.checks() {
                let mark = if ok { "[x]" } else { "[ ]" };
                println!("{mark} {field} ({})", field.rule());
            }
        }
        result
    }

    fn show_preview(&mut self, pattern: &HoleCircle) {
        self.form.show_preview(pattern);
        println!("Hole       Angle           X           Y");
        for hole in pattern.holes() {
            println!(
                "{:>4} {:>11.3} {:>11.3} {:>11.3}",
                hole.index + 1,
                hole.angle_deg,
                hole.x(),
                // Back to machine Y, which points up
                0.0 - hole.y()
            );
        }
        if let Some(path) = &self.preview_path {
            if let Err(e) = self.write_preview(pattern, path) {
                warn!(path = %path.display(), "Could not write preview: {e}");
            }
        }
    }

    fn choose_destination(&mut self) -> Option<PathBuf> {
        self.form.choose_destination()
    }
}

fn help_text() {
    println!(
        "Before cut:
        - Set X and Y home to the center of the hole circle
        - Set Z home to the top of the stock"
    )
}

fn main() -> Result<()> {
    init_logging()?;
    let opt = Opt::from_args();
    println!("{}", opt.unit_system().note());
    help_text();

    let mut ui = CliUi {
        form: Form::new(opt.raw_fields(), opt.output.clone()),
        canvas: PreviewCanvas::new(opt.preview_size, opt.preview_size),
        preview_path: opt.preview.clone(),
    };

    if opt.output.is_none() {
        session::validate(&mut ui).context("Invalid hole circle parameters")?;
        return Ok(());
    }

    match create_program(&mut ui).context("Failed to create drilling program")? {
        Some(path) => println!("Wrote {}", path.display()),
        None => println!("Program creation aborted"),
    }

    Ok(())
}
