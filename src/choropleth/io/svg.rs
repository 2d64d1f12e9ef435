use std::{io::Write, path::Path};

use anyhow::{anyhow, Result};
use geo::{BoundingRect, Coord};
use serde_json::Value;

use crate::{
    choropleth::{Choropleth, ColorScale, Region},
    geom::union_bounds,
    io::svg::{multipolygon_to_path, write_svg_footer, write_svg_header, write_svg_styles, xml_escape, SvgStringWriter, SvgWriter},
};

const MARGIN: f64 = 10.0;
const LEGEND_HEIGHT: f64 = 36.0;
const LEGEND_STOPS: usize = 10;

impl Choropleth<'_> {
    /// Small wrapper with defaults.
    pub fn to_svg(&self, path: &Path) -> Result<()> {
        self.to_svg_with_width(path, 1200)
    }

    /// Render the map as a static SVG file `width` pixels wide.
    pub fn to_svg_with_width(&self, path: &Path, width: u32) -> Result<()> {
        let mut writer = SvgWriter::new(path)?;
        self.write_svg(&mut writer, width as f64)?;
        writer.flush()?;
        Ok(())
    }

    /// Render the map as an SVG string.
    pub fn to_svg_string(&self, width: u32) -> Result<String> {
        let mut writer = SvgStringWriter::new();
        self.write_svg(&mut writer, width as f64)?;
        writer.into_string()
    }

    /// Equirectangular drawing, x compressed by cos(center latitude).
    /// Regions without a value are outlined but not filled.
    fn write_svg<W: Write>(&self, writer: &mut W, width: f64) -> Result<()> {
        let bounds = union_bounds(self.regions.iter().filter_map(|region| region.shape.bounding_rect()))
            .ok_or_else(|| anyhow!("[choropleth::to_svg] No regions to draw."))?;

        let kx = bounds.center().y.to_radians().cos();
        let span = (bounds.width() * kx).max(bounds.height()).max(f64::EPSILON);
        let scale = (width - 2.0 * MARGIN) / span;
        let map_height = bounds.height() * scale + 2.0 * MARGIN;
        let height = if self.scale.is_some() { map_height + LEGEND_HEIGHT } else { map_height };

        // --- Map lon/lat -> SVG coords (Y down) ---
        let (min_x, max_y) = (bounds.min().x, bounds.max().y);
        let project = move |coord: &Coord<f64>| -> (f64, f64) {
            (MARGIN + (coord.x - min_x) * kx * scale, MARGIN + (max_y - coord.y) * scale)
        };

        write_svg_header(writer, width, height, &bounds)?;
        write_svg_styles(writer, self.opacity)?;

        for region in &self.regions {
            let d = multipolygon_to_path(region.shape, &project);
            let title = xml_escape(&hover_text(region));
            match region.fill {
                Some(fill) => writeln!(writer, r#"<path class="region" d="{d}" fill="{fill}"><title>{title}</title></path>"#)?,
                None => writeln!(writer, r#"<path class="region nodata" d="{d}"><title>{title}</title></path>"#)?,
            }
        }

        if let Some(color_scale) = self.scale {
            self.write_legend(writer, &color_scale, width, map_height)?;
        }

        write_svg_footer(writer)
    }

    /// Horizontal color bar under the map, labelled with the domain.
    fn write_legend<W: Write>(&self, writer: &mut W, color_scale: &ColorScale, width: f64, top: f64) -> Result<()> {
        writeln!(writer, r#"<defs><linearGradient id="ramp">"#)?;
        for i in 0..=LEGEND_STOPS {
            let t = i as f64 / LEGEND_STOPS as f64;
            writeln!(writer, r#"  <stop offset="{t:.2}" stop-color="{}"/>"#, ColorScale::color_at(t))?;
        }
        writeln!(writer, r#"</linearGradient></defs>"#)?;

        let bar_width = width - 2.0 * MARGIN;
        writeln!(writer, r#"<rect x="{MARGIN}" y="{:.3}" width="{bar_width:.3}" height="10" fill="url(#ramp)"/>"#, top + 2.0)?;

        let y = top + 26.0;
        let field = xml_escape(self.field.name());
        writeln!(writer, r#"<text class="legend" x="{MARGIN}" y="{y:.3}">{}</text>"#, color_scale.min)?;
        writeln!(writer, r#"<text class="legend" x="{:.3}" y="{y:.3}" text-anchor="middle">{field}</text>"#, width / 2.0)?;
        writeln!(writer, r#"<text class="legend" x="{:.3}" y="{y:.3}" text-anchor="end">{}</text>"#, width - MARGIN, color_scale.max)?;
        Ok(())
    }
}

/// One "name: value" line per hover attribute.
fn hover_text(region: &Region) -> String {
    region.hover.iter()
        .map(|(name, value)| match value {
            Value::String(s) => format!("{name}: {s}"),
            Value::Null => format!("{name}: n/a"),
            other => format!("{name}: {other}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
