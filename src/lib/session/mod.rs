//! Glue between a parameter-entry front end and the toolpath generator.
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::{ToolpathError, ValidationError};
use crate::geometry::HoleCircle;
use crate::params::{self, FieldReport, RawFields, ToolpathParameters};
use crate::program;

/// What the generator needs from a front end.
pub trait ToolpathUi {
    /// Current parameters, validated
    fn get_parameters(&mut self) -> Result<ToolpathParameters, ValidationError>;

    /// Redraw the preview for a newly validated pattern
    fn show_preview(&mut self, pattern: &HoleCircle);

    /// Where to save the program. `None` means the user backed out.
    fn choose_destination(&mut self) -> Option<PathBuf>;
}

/// Validate the current parameters, and update the preview if they are good.
pub fn validate(ui: &mut dyn ToolpathUi) -> Result<ToolpathParameters, ValidationError> {
    let params = ui.get_parameters()?;
    ui.show_preview(&params.pattern());
    Ok(params)
}

/// Validate, ask for a destination, and write the program there.
///
/// Returns the path written, or `None` if no destination was chosen.
pub fn create_program(ui: &mut dyn ToolpathUi) -> Result<Option<PathBuf>, ToolpathError> {
    let params =
        validate(ui).inspect_err(|e| warn!("There are errors in input fields: {e}"))?;
    let path = match ui.choose_destination() {
        Some(path) => path,
        None => {
            info!("Program creation aborted");
            return Ok(None);
        }
    };
    program::save(&params, &path)?;
    Ok(Some(path))
}

/// An in-memory front end: the raw form contents, an optional destination, and whatever was last shown.
#[derive(Debug, Clone, Default)]
pub struct Form {
    pub fields: RawFields,
    pub destination: Option<PathBuf>,
    report: Option<FieldReport>,
    preview: Option<HoleCircle>,
}

impl Form {
    pub fn new(fields: RawFields, destination: Option<PathBuf>) -> Self {
        Form {
            fields,
            destination,
            report: None,
            preview: None,
        }
    }

    /// Per-field outcome of the last validation. Fields are all unchecked if something failed to parse.
    pub fn report(&self) -> Option<&FieldReport> {
        self.report.as_ref()
    }

    /// The pattern last pushed to the preview
    pub fn preview(&self) -> Option<&HoleCircle> {
        self.preview.as_ref()
    }
}

impl ToolpathUi for Form {
    fn get_parameters(&mut self) -> Result<ToolpathParameters, ValidationError> {
        let result = params::validate(&self.fields);
        self.report = Some(match &result {
            Ok(_) => FieldReport::new(true),
            Err(ValidationError::Rejected { report }) => report.clone(),
            Err(ValidationError::Unparseable { .. }) => FieldReport::new(false),
        });
        result
    }

    fn show_preview(&mut self, pattern: &HoleCircle) {
        self.preview = Some(*pattern);
    }

    fn choose_destination(&mut self) -> Option<PathBuf> {
        self.destination.clone()
    }
}
