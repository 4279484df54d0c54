//! Line-numbered drilling program for a hole circle.
//!
//! The program uses a fixed template: a preamble that sets up the machine and starts the spindle, one
//! four-line drilling block per hole (rapid to the hole in polar form, rapid down to the start height, feed
//! to depth, rapid out), and a closing move home. Every numbered line takes the next value of a single
//! counter that starts at 5 and steps by 5.
use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufWriter, Result, Write};
use std::path::Path;
use tracing::info;

use crate::geometry::round3;
use crate::params::ToolpathParameters;
use crate::format_number;

/// Unit code written in the preamble. The imperial setting only changes the unit note shown to the user, so
/// this is used for both unit systems.
pub const UNIT_CODE: &str = "G21";

const FIRST_LINE_NUMBER: u64 = 5;
const LINE_NUMBER_STEP: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLine {
    pub line_number: u64,
    pub text: String,
}

impl fmt::Display for ProgramLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{} {}", self.line_number, self.text)
    }
}

/// A complete drilling program, bracketed by `%` markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolpathProgram {
    comment: String,
    lines: Vec<ProgramLine>,
}

impl ToolpathProgram {
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The numbered lines, in order. The `%` markers and the comment are not included.
    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    pub fn write_to(&self, file: &mut dyn Write) -> Result<()> {
        write!(file, "{self}")
    }
}

impl fmt::Display for ToolpathProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "%")?;
        writeln!(f, "({})", self.comment)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "%")
    }
}

struct ProgramBuilder {
    next_number: u64,
    lines: Vec<ProgramLine>,
}

impl ProgramBuilder {
    fn new() -> Self {
        ProgramBuilder {
            next_number: FIRST_LINE_NUMBER,
            lines: Vec::new(),
        }
    }

    fn next_line(&mut self, text: String) {
        self.lines.push(ProgramLine {
            line_number: self.next_number,
            text,
        });
        self.next_number += LINE_NUMBER_STEP;
    }
}

fn preamble(p: &ToolpathParameters, prog: &mut ProgramBuilder) {
    prog.next_line(format!("{UNIT_CODE} G40 G49 G64 P0.03"));
    prog.next_line("G17".to_string());
    prog.next_line(format!("G0 Z{}", format_number(p.safe_height())));
    prog.next_line("G0 X0.0 Y0.0".to_string());
    prog.next_line(format!("S{} M3", p.spindle_rpm()));
}

/// Drill one hole. The rapid to the hole is given in polar form, `@` radius and `^` angle, which the
/// controller resolves around the origin.
fn drill_hole(p: &ToolpathParameters, prog: &mut ProgramBuilder, angle: f64) {
    prog.next_line(format!(
        "G0 @{} ^{}",
        format_number(p.radius()),
        format_number(angle)
    ));
    prog.next_line(format!("Z{}", format_number(p.start_height())));
    prog.next_line(format!(
        "G1 Z-{} F{}",
        format_number(p.drill_depth()),
        format_number(p.drill_feed())
    ));
    prog.next_line(format!("G0 Z{}", format_number(p.safe_height())));
}

fn trailer(prog: &mut ProgramBuilder) {
    prog.next_line("G0 x0.0 Y0.0".to_string());
    prog.next_line("M2".to_string());
}

/// Build the drilling program for `p`
pub fn emit(p: &ToolpathParameters) -> ToolpathProgram {
    let mut prog = ProgramBuilder::new();
    preamble(p, &mut prog);

    let pattern = p.pattern();
    for i in 0..pattern.num_holes() {
        drill_hole(p, &mut prog, round3(pattern.angle(i)));
    }

    trailer(&mut prog);

    ToolpathProgram {
        comment: p.comment().to_string(),
        lines: prog.lines,
    }
}

/// Write the drilling program for `p` to `path`, replacing anything already there.
pub fn save(p: &ToolpathParameters, path: &Path) -> Result<()> {
    let program = emit(p);
    let mut file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?,
    );
    program.write_to(&mut file)?;
    file.flush()?;

    info!(
        path = %path.display(),
        holes = p.num_holes(),
        lines = program.lines().len(),
        "drilling program written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tests::example_fields;
    use crate::params::{validate, UnitSystem};

    const EXAMPLE_PROGRAM: &str = "%
(test)
N5 G21 G40 G49 G64 P0.03
N10 G17
N15 G0 Z1.0
N20 G0 X0.0 Y0.0
N25 S1000 M3
N30 G0 @2.0 ^0.0
N35 Z0.5
N40 G1 Z-0.25 F10.0
N45 G0 Z1.0
N50 G0 @2.0 ^90.0
N55 Z0.5
N60 G1 Z-0.25 F10.0
N65 G0 Z1.0
N70 G0 @2.0 ^180.0
N75 Z0.5
N80 G1 Z-0.25 F10.0
N85 G0 Z1.0
N90 G0 @2.0 ^270.0
N95 Z0.5
N100 G1 Z-0.25 F10.0
N105 G0 Z1.0
N110 G0 x0.0 Y0.0
N115 M2
%
";

    #[test]
    fn test_example_program() {
        let p = validate(&example_fields()).unwrap();
        let program = emit(&p);
        assert_eq!(program.to_string(), EXAMPLE_PROGRAM);

        let mut out = Vec::new();
        program.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), EXAMPLE_PROGRAM);
    }

    #[test]
    fn test_line_numbers_flat() {
        let mut raw = example_fields();
        raw.num_holes = "9".into();
        let program = emit(&validate(&raw).unwrap());
        let lines = program.lines();
        // Preamble, four lines per hole, and the closing move and end
        assert_eq!(lines.len(), 5 + 4 * 9 + 2);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.line_number, 5 + 5 * i as u64);
        }
        assert_eq!(lines.last().unwrap().text, "M2");
    }

    #[test]
    fn test_single_hole() {
        let mut raw = example_fields();
        raw.num_holes = "1".into();
        raw.first_angle = "45.5".into();
        let program = emit(&validate(&raw).unwrap());
        let polar: Vec<&str> = program
            .lines()
            .iter()
            .filter(|l| l.text.starts_with("G0 @"))
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(polar, vec!["G0 @2.0 ^45.5"]);
        assert_eq!(
            program
                .lines()
                .iter()
                .filter(|l| l.text.starts_with("G1 "))
                .count(),
            1
        );
    }

    #[test]
    fn test_angles_rounded_not_normalized() {
        let mut raw = example_fields();
        raw.num_holes = "3".into();
        raw.first_angle = "300".into();
        let program = emit(&validate(&raw).unwrap());
        let polar: Vec<&str> = program
            .lines()
            .iter()
            .filter(|l| l.text.starts_with("G0 @"))
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(
            polar,
            vec!["G0 @2.0 ^300.0", "G0 @2.0 ^420.0", "G0 @2.0 ^540.0"]
        );

        raw.num_holes = "7".into();
        raw.first_angle = "0".into();
        let program = emit(&validate(&raw).unwrap());
        // 360 / 7 = 51.428571...
        assert_eq!(program.lines()[5].text, "G0 @2.0 ^0.0");
        assert_eq!(program.lines()[9].text, "G0 @2.0 ^51.429");
    }

    #[test]
    fn test_imperial_still_metric_code() {
        let mut raw = example_fields();
        raw.unit_system = UnitSystem::Imperial;
        let program = emit(&validate(&raw).unwrap());
        assert_eq!(program.lines()[0].text, "G21 G40 G49 G64 P0.03");
    }

    #[test]
    fn test_comment_line() {
        let mut raw = example_fields();
        raw.comment = "bolt circle, flange".into();
        let program = emit(&validate(&raw).unwrap());
        assert_eq!(program.comment(), "bolt circle, flange");
        assert!(program
            .to_string()
            .starts_with("%\n(bolt circle, flange)\nN5 "));
    }

    fn polar_moves(first_angle: &str) -> Vec<String> {
        let mut raw = example_fields();
        raw.num_holes = "1".into();
        raw.first_angle = first_angle.into();
        emit(&validate(&raw).unwrap())
            .lines()
            .iter()
            .filter(|l| l.text.starts_with("G0 @"))
            .map(|l| l.text.clone())
            .collect()
    }

    #[test]
    fn test_angle_rounding_matches_decimal_value() {
        assert_eq!(polar_moves("0.0045"), vec!["G0 @2.0 ^0.004"]);
        assert_eq!(polar_moves("12.3125"), vec!["G0 @2.0 ^12.312"]);
        assert_eq!(polar_moves("0.3125"), vec!["G0 @2.0 ^0.312"]);
    }

    #[test]
    fn test_line_numbers_past_u32() {
        let mut prog = ProgramBuilder {
            next_number: u32::MAX as u64 - 2,
            lines: Vec::new(),
        };
        prog.next_line("G17".to_string());
        prog.next_line("M2".to_string());
        assert_eq!(prog.lines[1].line_number, u32::MAX as u64 + 3);
    }
}
