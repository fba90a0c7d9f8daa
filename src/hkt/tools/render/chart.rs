use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::hkt::tools::error::{Result, ToolError};
use crate::hkt::tools::render::{ChartRenderer, ChartSpec};

const FONT: &str = "sans-serif";
/// Width of one bar, in slot units.
const BAR_WIDTH: f64 = 0.35;
/// Horizontal and vertical advance between slanted label glyphs, in pixels.
const GLYPH_STEP: i32 = 6;

/// Draws side-by-side bar charts into a PNG with plotters.
#[derive(Debug, Clone, Copy)]
pub struct PlottersChartRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersChartRenderer {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

impl ChartRenderer for PlottersChartRenderer {
    fn extension(&self) -> &str {
        "png"
    }

    fn render_chart(&self, spec: &ChartSpec) -> Result<Vec<u8>> {
        let mut pixels = vec![0u8; self.width as usize * self.height as usize * 3];
        self.draw(spec, &mut pixels)
            .map_err(|err| ToolError::Render(format!("chart: {err}")))?;

        let image = RgbImage::from_raw(self.width, self.height, pixels)
            .ok_or_else(|| ToolError::Render("chart: pixel buffer has the wrong size".into()))?;
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|err| ToolError::Render(format!("chart encoding: {err}")))?;
        Ok(png.into_inner())
    }
}

impl PlottersChartRenderer {
    fn draw(
        &self,
        spec: &ChartSpec,
        pixels: &mut [u8],
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root =
            BitMapBackend::with_buffer(pixels, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let slots = spec.labels.len().max(1) as f64;
        let y_max = f64::from(spec.max_value()) * 1.15 + 1.0;
        let series_count = spec.series.len().max(1) as f64;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (FONT, 22))
            .margin(15)
            .x_label_area_size(120)
            .y_label_area_size(55)
            .build_cartesian_2d(-0.5f64..slots - 0.5, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_: &f64| String::new())
            .y_desc(spec.y_label.as_str())
            .y_label_formatter(&|value: &f64| format!("{value:.0}"))
            .draw()?;

        for (series_idx, series) in spec.series.iter().enumerate() {
            let offset = (series_idx as f64 - (series_count - 1.0) / 2.0) * BAR_WIDTH;
            let color = RGBColor(series.color.0, series.color.1, series.color.2);

            chart
                .draw_series(series.values.iter().enumerate().map(|(slot, value)| {
                    let center = slot as f64 + offset;
                    Rectangle::new(
                        [
                            (center - BAR_WIDTH / 2.0, 0.0),
                            (center + BAR_WIDTH / 2.0, f64::from(*value)),
                        ],
                        color.filled(),
                    )
                }))?
                .label(series.name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

            let annotation_style = TextStyle::from((FONT, 13).into_font())
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart.draw_series(series.annotations.iter().zip(&series.values).enumerate().map(
                |(slot, (text, value))| {
                    Text::new(
                        text.clone(),
                        (slot as f64 + offset, f64::from(*value)),
                        annotation_style.clone(),
                    )
                },
            ))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;

        let glyph_style = TextStyle::from((FONT, 13).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        for (slot, label) in spec.labels.iter().enumerate() {
            let (x, y) = chart.backend_coord(&(slot as f64, 0.0));
            for (glyph, position) in slanted_glyphs(label, (x, y + 8)) {
                root.draw(&Text::new(glyph, position, glyph_style.clone()))?;
            }
        }

        root.present()?;
        Ok(())
    }
}

/// Places the glyphs of `label` on a 45 degree line rising to the right, the
/// last glyph at `end`. Plotters only rotates text in quarter turns.
fn slanted_glyphs(label: &str, end: (i32, i32)) -> Vec<(String, (i32, i32))> {
    let count = label.chars().count() as i32;
    label
        .chars()
        .enumerate()
        .map(|(idx, glyph)| {
            let back = (count - 1 - idx as i32) * GLYPH_STEP;
            (glyph.to_string(), (end.0 - back, end.1 + back))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hkt::tools::render::ChartSeries;

    #[test]
    fn renders_a_png_of_the_configured_size() {
        let labels: Vec<String> = (0..10).map(|slot| format!("slot {slot}")).collect();
        let spec = ChartSpec {
            title: "Distribution".into(),
            y_label: "Number of children".into(),
            labels,
            series: vec![
                ChartSeries::new("At home", (0, 128, 0), vec![1, 0, 2, 0, 0, 3, 0, 0, 1, 0]),
                ChartSeries::new("In KITA", (255, 0, 0), vec![3, 4, 2, 4, 4, 1, 4, 4, 3, 4]),
            ],
        };
        let renderer = PlottersChartRenderer {
            width: 640,
            height: 400,
        };

        let png = renderer.render_chart(&spec).expect("chart rendered");

        assert_eq!(&png[..4], b"\x89PNG");
        let decoded = image::load_from_memory(&png).expect("png decoded");
        assert_eq!((decoded.width(), decoded.height()), (640, 400));
    }

    #[test]
    fn slot_labels_end_at_the_tick_and_slope_down_to_the_left() {
        let glyphs = slanted_glyphs("Mon", (100, 50));

        assert_eq!(
            glyphs,
            vec![
                ("M".to_string(), (100 - 2 * GLYPH_STEP, 50 + 2 * GLYPH_STEP)),
                ("o".to_string(), (100 - GLYPH_STEP, 50 + GLYPH_STEP)),
                ("n".to_string(), (100, 50)),
            ]
        );
    }
}
