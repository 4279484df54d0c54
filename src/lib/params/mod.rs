//! Drilling parameters, and validation of the raw text a user typed for them.

use std::fmt;
use tracing::debug;

use crate::error::ValidationError;
use crate::format_number;
use crate::geometry::HoleCircle;

/// The numeric input fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SpindleRpm,
    NumHoles,
    Radius,
    FirstAngle,
    SafeHeight,
    StartHeight,
    DrillDepth,
    DrillFeed,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::SpindleRpm,
        Field::NumHoles,
        Field::Radius,
        Field::FirstAngle,
        Field::SafeHeight,
        Field::StartHeight,
        Field::DrillDepth,
        Field::DrillFeed,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The rule a value has to satisfy, for user feedback
    pub fn rule(self) -> &'static str {
        match self {
            Field::SpindleRpm | Field::NumHoles => "integer > 0",
            Field::FirstAngle => "< 360.0",
            _ => "> 0.0",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::SpindleRpm => "spindle rpm",
            Field::NumHoles => "number of holes",
            Field::Radius => "radius",
            Field::FirstAngle => "first angle",
            Field::SafeHeight => "safe height",
            Field::StartHeight => "start height",
            Field::DrillDepth => "drill depth",
            Field::DrillFeed => "drill feed",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// The note shown next to the inputs. This is the only thing the unit selection changes: the emitted
    /// program is always in G21 and no dimensions are converted.
    pub fn note(&self) -> String {
        format!("**NOTE - All units are in {self}")
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "METRIC"),
            UnitSystem::Imperial => write!(f, "IMPERIAL"),
        }
    }
}

/// A validated parameter set. The only way to get one is through `validate`, so every value here has
/// passed its rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolpathParameters {
    spindle_rpm: u32,
    num_holes: u32,
    radius: f64,
    first_angle: f64,
    safe_height: f64,
    start_height: f64,
    drill_depth: f64,
    drill_feed: f64,
    unit_system: UnitSystem,
    comment: String,
}

impl ToolpathParameters {
    pub fn spindle_rpm(&self) -> u32 {
        self.spindle_rpm
    }

    pub fn num_holes(&self) -> u32 {
        self.num_holes
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn first_angle(&self) -> f64 {
        self.first_angle
    }

    pub fn safe_height(&self) -> f64 {
        self.safe_height
    }

    pub fn start_height(&self) -> f64 {
        self.start_height
    }

    pub fn drill_depth(&self) -> f64 {
        self.drill_depth
    }

    pub fn drill_feed(&self) -> f64 {
        self.drill_feed
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The hole pattern these parameters describe
    pub fn pattern(&self) -> HoleCircle {
        HoleCircle::new(self.num_holes, self.first_angle, self.radius)
    }
}

/// The form contents as typed, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawFields {
    pub spindle_rpm: String,
    pub num_holes: String,
    pub radius: String,
    pub first_angle: String,
    pub safe_height: String,
    pub start_height: String,
    pub drill_depth: String,
    pub drill_feed: String,
    pub comment: String,
    pub unit_system: UnitSystem,
}

impl RawFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::SpindleRpm => &self.spindle_rpm,
            Field::NumHoles => &self.num_holes,
            Field::Radius => &self.radius,
            Field::FirstAngle => &self.first_angle,
            Field::SafeHeight => &self.safe_height,
            Field::StartHeight => &self.start_height,
            Field::DrillDepth => &self.drill_depth,
            Field::DrillFeed => &self.drill_feed,
        }
    }
}

impl From<&ToolpathParameters> for RawFields {
    fn from(p: &ToolpathParameters) -> Self {
        RawFields {
            spindle_rpm: p.spindle_rpm.to_string(),
            num_holes: p.num_holes.to_string(),
            radius: format_number(p.radius),
            first_angle: format_number(p.first_angle),
            safe_height: format_number(p.safe_height),
            start_height: format_number(p.start_height),
            drill_depth: format_number(p.drill_depth),
            drill_feed: format_number(p.drill_feed),
            comment: p.comment.clone(),
            unit_system: p.unit_system,
        }
    }
}

/// Pass/fail for each numeric field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    passed: [bool; 8],
}

impl FieldReport {
    /// A report with every field set to `passed`
    pub fn new(passed: bool) -> Self {
        FieldReport {
            passed: [passed; 8],
        }
    }

    fn record(&mut self, field: Field, ok: bool) {
        self.passed[field.index()] = ok;
    }

    pub fn passed(&self, field: Field) -> bool {
        self.passed[field.index()]
    }

    pub fn is_valid(&self) -> bool {
        self.passed.iter().all(|ok| *ok)
    }

    pub fn failed(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(move |f| !self.passed(*f))
    }

    pub fn checks(&self) -> impl Iterator<Item = (Field, bool)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.passed(f)))
    }
}

fn parse_int(raw: &RawFields, field: Field) -> Result<i64, ValidationError> {
    let text = raw.get(field);
    text.trim()
        .parse()
        .map_err(|_| ValidationError::Unparseable {
            field,
            value: text.to_string(),
        })
}

fn parse_real(raw: &RawFields, field: Field) -> Result<f64, ValidationError> {
    let text = raw.get(field);
    text.trim()
        .parse()
        .map_err(|_| ValidationError::Unparseable {
            field,
            value: text.to_string(),
        })
}

/// A strictly positive integer that fits the parameter type
fn positive_u32(v: i64) -> Option<u32> {
    u32::try_from(v).ok().filter(|v| *v > 0)
}

fn positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Parse and check every field of `raw`.
///
/// All fields are parsed before any rule is applied, and the first one that does not parse aborts validation.
/// After that every rule is checked, so a `Rejected` error lists every out-of-range field at once.
pub fn validate(raw: &RawFields) -> Result<ToolpathParameters, ValidationError> {
    let rpm = parse_int(raw, Field::SpindleRpm)?;
    let num_holes = parse_int(raw, Field::NumHoles)?;
    let radius = parse_real(raw, Field::Radius)?;
    let first_angle = parse_real(raw, Field::FirstAngle)?;
    let safe_height = parse_real(raw, Field::SafeHeight)?;
    let start_height = parse_real(raw, Field::StartHeight)?;
    let drill_depth = parse_real(raw, Field::DrillDepth)?;
    let drill_feed = parse_real(raw, Field::DrillFeed)?;

    let spindle_rpm = positive_u32(rpm);
    let num_holes = positive_u32(num_holes);

    let mut report = FieldReport::new(true);
    report.record(Field::SpindleRpm, spindle_rpm.is_some());
    report.record(Field::NumHoles, num_holes.is_some());
    report.record(Field::Radius, positive_finite(radius));
    // No lower bound: negative starting angles are allowed
    report.record(Field::FirstAngle, first_angle.is_finite() && first_angle < 360.0);
    report.record(Field::SafeHeight, positive_finite(safe_height));
    report.record(Field::StartHeight, positive_finite(start_height));
    report.record(Field::DrillDepth, positive_finite(drill_depth));
    report.record(Field::DrillFeed, positive_finite(drill_feed));

    match (spindle_rpm, num_holes) {
        (Some(spindle_rpm), Some(num_holes)) if report.is_valid() => Ok(ToolpathParameters {
            spindle_rpm,
            num_holes,
            radius,
            first_angle,
            safe_height,
            start_height,
            drill_depth,
            drill_feed,
            unit_system: raw.unit_system,
            comment: raw.comment.clone(),
        }),
        _ => {
            for field in report.failed() {
                debug!(%field, value = raw.get(field), rule = field.rule(), "field rejected");
            }
            Err(ValidationError::Rejected { report })
        }
    }
}
