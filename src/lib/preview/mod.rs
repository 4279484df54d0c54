//! Preview of a hole circle, drawn into a fixed-size viewport.
use nalgebra::geometry::Point2;
use std::io::{Result, Write};

use crate::geometry::{HoleCircle, HolePosition};

/// Space left between the drawn circle and the edge of the viewport
const MARGIN: f64 = 20.0;
/// Radius of the marker drawn at each hole
pub const HOLE_MARKER_RADIUS: f64 = 8.0;

/// A `width` x `height` drawing area with the origin in the top-left corner and Y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewCanvas {
    width: f64,
    height: f64,
}

impl PreviewCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        PreviewCanvas { width, height }
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the drawn hole circle. Whatever the part radius, the pattern fills the viewport.
    pub fn radius(&self) -> f64 {
        (self.width.min(self.height) - MARGIN) / 2.0
    }

    /// Hole positions in canvas coordinates
    pub fn place(&self, pattern: &HoleCircle) -> Vec<HolePosition> {
        let center = self.center();
        pattern
            .with_radius(self.radius())
            .holes()
            .map(|h| HolePosition {
                position: center + h.position.coords,
                ..h
            })
            .collect()
    }

    /// Render the preview as an SVG document: background, main circle, crosshair, then one marker per hole.
    pub fn write_svg(&self, file: &mut dyn Write, pattern: &HoleCircle) -> Result<()> {
        let (w, h) = (self.width, self.height);
        let center = self.center();
        writeln!(
            file,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        writeln!(
            file,
            r#"  <rect x="0" y="0" width="{w}" height="{h}" fill="rgb(200,200,200)"/>"#
        )?;
        writeln!(
            file,
            r#"  <circle class="main" cx="{}" cy="{}" r="{}" fill="none" stroke="black" stroke-width="1"/>"#,
            center.x,
            center.y,
            self.radius()
        )?;
        // Crosshair through the center
        writeln!(
            file,
            r#"  <line x1="{}" y1="0" x2="{}" y2="{h}" stroke="black" stroke-width="1"/>"#,
            center.x, center.x
        )?;
        writeln!(
            file,
            r#"  <line x1="0" y1="{}" x2="{w}" y2="{}" stroke="black" stroke-width="1"/>"#,
            center.y, center.y
        )?;
        for hole in self.place(pattern) {
            writeln!(
                file,
                r#"  <circle class="hole" cx="{}" cy="{}" r="{HOLE_MARKER_RADIUS}" fill="none" stroke="black" stroke-width="2"/>"#,
                hole.x(),
                hole.y()
            )?;
        }
        writeln!(file, "</svg>")
    }
}

impl Default for PreviewCanvas {
    fn default() -> Self {
        PreviewCanvas::new(400.0, 400.0)
    }
}
