//! SVG overlay of refinement regions.
//!
//! Collects regions as a [`RegionSink`] during planning and renders them on
//! top of the buffered grid:
//! - Occupied (wall or buffer) and free cells
//! - Every trial region, translucent
//! - The approved regions, outlined
//! - Optional start pose marker
//!
//! Grid rows grow downward, the same as SVG, so no axis flip is needed.

use std::fmt::Write;
use std::path::Path;

use crate::core::Pose2D;
use crate::grid::BufferedGrid;
use crate::motion::BoundingRegion;
use crate::refine::{RegionSink, RegionTag};

/// SVG color scheme for visualization
#[derive(Clone, Debug)]
pub struct SvgColorScheme {
    /// Occupied cell color
    pub occupied: &'static str,
    /// Free cell color
    pub free: &'static str,
    /// Trial region fill
    pub trial: &'static str,
    /// Approved region stroke
    pub approved: &'static str,
    /// Start pose marker
    pub start: &'static str,
}

impl Default for SvgColorScheme {
    fn default() -> Self {
        Self {
            occupied: "#333333",
            free: "#FFFFFF",
            trial: "#AA2222",
            approved: "#2222AA",
            start: "#22AA22",
        }
    }
}

/// Configuration for SVG rendering
#[derive(Clone, Debug)]
pub struct SvgConfig {
    /// Pixels per physical unit
    pub scale: f32,
    /// Region outline width
    pub stroke_width: f32,
    /// Start marker radius in pixels
    pub marker_radius: f32,
    /// Color scheme
    pub colors: SvgColorScheme,
    /// Padding around the map in pixels
    pub padding: f32,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            scale: 20.0,
            stroke_width: 1.5,
            marker_radius: 4.0,
            colors: SvgColorScheme::default(),
            padding: 20.0,
        }
    }
}

/// Region recorder and SVG renderer
#[derive(Clone, Debug, Default)]
pub struct SvgOverlay {
    config: SvgConfig,
    title: Option<String>,
    start: Option<Pose2D>,
    trials: Vec<BoundingRegion>,
    approved: Vec<BoundingRegion>,
}

impl SvgOverlay {
    /// Create an empty overlay
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Set a title to display
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark the start pose
    pub fn set_start(&mut self, pose: Pose2D) {
        self.start = Some(pose);
    }

    /// Recorded trial regions
    pub fn trial_regions(&self) -> &[BoundingRegion] {
        &self.trials
    }

    /// Recorded approved regions
    pub fn approved_regions(&self) -> &[BoundingRegion] {
        &self.approved
    }

    /// Render to SVG string
    pub fn render(&self, grid: &BufferedGrid, cell_size: f32) -> Result<String, std::fmt::Error> {
        let mut svg = String::new();
        self.write_svg(&mut svg, grid, cell_size)?;
        Ok(svg)
    }

    /// Render and save to a file
    pub fn save(&self, grid: &BufferedGrid, cell_size: f32, path: &Path) -> std::io::Result<()> {
        let svg = self.render(grid, cell_size).map_err(std::io::Error::other)?;
        std::fs::write(path, svg)
    }

    fn write_svg(&self, svg: &mut String, grid: &BufferedGrid, cell_size: f32) -> std::fmt::Result {
        let cell_px = cell_size * self.config.scale;
        let map_w = grid.width() as f32 * cell_px;
        let map_h = grid.height() as f32 * cell_px;
        let padding = self.config.padding;
        let title_height = if self.title.is_some() { 30.0 } else { 0.0 };
        let width = map_w + 2.0 * padding;
        let height = map_h + 2.0 * padding + title_height;

        writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
            width, height, width, height
        )?;
        writeln!(svg, r##"  <rect width="100%" height="100%" fill="#F8F8F8"/>"##)?;

        if let Some(ref title) = self.title {
            writeln!(
                svg,
                r##"  <text x="{:.0}" y="22" font-family="sans-serif" font-size="16" font-weight="bold" text-anchor="middle" fill="#333">{}</text>"##,
                width / 2.0,
                escape_xml(title)
            )?;
        }

        writeln!(
            svg,
            r#"  <g transform="translate({:.0}, {:.0})">"#,
            padding,
            padding + title_height
        )?;
        self.write_grid(svg, grid, cell_px)?;
        self.write_regions(svg, "trial-regions", &self.trials, true)?;
        self.write_regions(svg, "approved-regions", &self.approved, false)?;
        self.write_start(svg)?;
        writeln!(svg, "  </g>")?;
        writeln!(svg, "</svg>")
    }

    fn write_grid(&self, svg: &mut String, grid: &BufferedGrid, cell_px: f32) -> std::fmt::Result {
        writeln!(svg, r#"    <g id="grid">"#)?;
        writeln!(
            svg,
            r#"      <rect width="{:.1}" height="{:.1}" fill="{}"/>"#,
            grid.width() as f32 * cell_px,
            grid.height() as f32 * cell_px,
            self.config.colors.free
        )?;

        for (idx, &occupied) in grid.cells().iter().enumerate() {
            if !occupied {
                continue;
            }
            let x = (idx % grid.width()) as f32 * cell_px;
            let y = (idx / grid.width()) as f32 * cell_px;
            writeln!(
                svg,
                r#"      <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                x, y, cell_px, cell_px, self.config.colors.occupied
            )?;
        }
        writeln!(svg, "    </g>")
    }

    fn write_regions(
        &self,
        svg: &mut String,
        id: &str,
        regions: &[BoundingRegion],
        filled: bool,
    ) -> std::fmt::Result {
        if regions.is_empty() {
            return Ok(());
        }
        let scale = self.config.scale;
        let (fill, stroke, opacity) = if filled {
            (self.config.colors.trial, self.config.colors.trial, 0.25)
        } else {
            ("none", self.config.colors.approved, 1.0)
        };

        writeln!(svg, r#"    <g id="{}">"#, id)?;
        for region in regions {
            // Point regions still get a visible box
            let w = (region.width() * scale).max(1.0);
            let h = (region.height() * scale).max(1.0);
            writeln!(
                svg,
                r#"      <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
                region.min_x * scale,
                region.min_y * scale,
                w,
                h,
                fill,
                stroke,
                self.config.stroke_width,
                opacity
            )?;
        }
        writeln!(svg, "    </g>")
    }

    fn write_start(&self, svg: &mut String) -> std::fmt::Result {
        let Some(pose) = self.start else {
            return Ok(());
        };
        let scale = self.config.scale;
        let (px, py) = (pose.x * scale, pose.y * scale);
        let arrow = self.config.marker_radius * 2.0;
        let rad = pose.heading.to_radians();

        writeln!(
            svg,
            r#"    <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" stroke="white" stroke-width="1"/>"#,
            px, py, self.config.marker_radius, self.config.colors.start
        )?;
        writeln!(
            svg,
            r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1.5"/>"#,
            px,
            py,
            px + arrow * rad.cos(),
            py + arrow * rad.sin(),
            self.config.colors.start
        )
    }
}

/// Escape text for use inside an SVG element
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl RegionSink for SvgOverlay {
    fn record(&mut self, tag: RegionTag, region: &BoundingRegion) {
        match tag {
            RegionTag::Trial { .. } => self.trials.push(*region),
            RegionTag::Final { .. } => self.approved.push(*region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridCoord;
    use crate::grid::{NavigationFields, OccupancyGrid};

    fn trial(index: usize) -> RegionTag {
        RegionTag::Trial { attempt: 1, index }
    }

    #[test]
    fn test_records_by_tag() {
        let mut overlay = SvgOverlay::new(SvgConfig::default());
        let region = BoundingRegion::point(Pose2D::new(1.0, 1.0, 0.0));
        overlay.record(trial(0), &region);
        overlay.record(trial(1), &region);
        overlay.record(RegionTag::Final { index: 0 }, &region);
        assert_eq!(overlay.trial_regions().len(), 2);
        assert_eq!(overlay.approved_regions().len(), 1);
    }

    #[test]
    fn test_render_contains_layers() {
        let mut grid = OccupancyGrid::open(4, 3).unwrap();
        grid.set_wall(GridCoord::new(3, 1), true);
        let fields = NavigationFields::build(&grid, GridCoord::new(0, 0), 0.0).unwrap();

        let mut overlay = SvgOverlay::new(SvgConfig::default()).with_title("corridor");
        overlay.set_start(Pose2D::new(0.5, 0.5, 0.0));
        let mut region = BoundingRegion::point(Pose2D::new(0.5, 0.5, 0.0));
        region.include(Pose2D::new(2.0, 0.7, 0.0));
        overlay.record(trial(0), &region);
        overlay.record(RegionTag::Final { index: 0 }, &region);

        let svg = overlay.render(&fields.buffered, 1.0).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"id="trial-regions""#));
        assert!(svg.contains(r#"id="approved-regions""#));
        assert!(svg.contains("corridor"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let grid = OccupancyGrid::open(2, 2).unwrap();
        let fields = NavigationFields::build(&grid, GridCoord::new(0, 0), 0.0).unwrap();
        let overlay = SvgOverlay::new(SvgConfig::default()).with_title(r#"a<b & "c""#);

        let svg = overlay.render(&fields.buffered, 1.0).unwrap();
        assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(!svg.contains("a<b"));
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }
}
