//! Hole circle drilling programs.
//!
//! Given the number of holes, the circle radius and the angle of the first hole, this crate lays the holes
//! out evenly around the circle for preview, and writes a line-numbered program that drills each one using
//! polar rapids.
pub mod error;
pub mod geometry;
pub mod params;
pub mod preview;
pub mod program;
pub mod session;

pub use error::{ToolpathError, ValidationError};
pub use geometry::{HoleCircle, HolePosition};
pub use params::{validate, Field, FieldReport, RawFields, ToolpathParameters, UnitSystem};
pub use preview::PreviewCanvas;
pub use program::{emit, save, ProgramLine, ToolpathProgram};
pub use session::{create_program, Form, ToolpathUi};

/// Format a program or field value.
/// Values are printed in their shortest exact form, and whole numbers keep a trailing `.0` (`Z1.0`, not `Z1`).
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Install the log subscriber. Filtering follows `RUST_LOG`, at INFO unless told otherwise.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1.0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-0.0), "-0.0");
        assert_eq!(format_number(270.0), "270.0");
        assert_eq!(format_number(51.429), "51.429");
        assert_eq!(format_number(-33.333), "-33.333");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }
}
