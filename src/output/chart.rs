//! Horizontal bar chart of candidate scores, rendered to PNG with plotters

use crate::error::{Result, ScreenerError};
use crate::screening::candidate::ScoredCandidate;
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::OnceLock;

const FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const FONT_FAMILY: &str = "sans-serif";

const WIDTH: u32 = 960;
const FRAME_HEIGHT: u32 = 140;
const ROW_HEIGHT: u32 = 32;
const LABEL_CHAR_WIDTH: u32 = 8;
const MAX_LABEL_CHARS: usize = 32;

pub const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);
const THRESHOLD_COLOR: RGBColor = RGBColor(220, 53, 69);
const TEXT_COLOR: RGBColor = RGBColor(33, 37, 41);

/// One bar per candidate, first candidate at the top.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    /// Drawn as a vertical marker when set
    pub threshold_percent: Option<f64>,
}

impl BarChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: "Match Score (%)".to_string(),
            threshold_percent: None,
        }
    }

    pub fn with_threshold(mut self, threshold_percent: f64) -> Self {
        self.threshold_percent = Some(threshold_percent);
        self
    }

    /// Render and write the chart, replacing any previous file.
    pub fn save(&self, rows: &[ScoredCandidate], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        load_font()?;

        let root = BitMapBackend::new(path, chart_size(rows.len())).into_drawing_area();
        self.draw(&root, rows).map_err(|e| ScreenerError::Chart(e.to_string()))?;

        info!("Chart saved to {}", path.display());
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        rows: &[ScoredCandidate],
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        // an empty chart keeps one empty row so the frame is still drawn
        let slots = rows.len().max(1);
        let labels: Vec<String> = rows.iter().map(|r| truncate_label(&r.identifier)).collect();
        let label_chars = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, (FONT_FAMILY, 22.0).into_font().color(&TEXT_COLOR))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(label_chars * LABEL_CHAR_WIDTH + 16)
            .build_cartesian_2d(0f64..100f64, (0..slots).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc(self.x_label.as_str())
            .x_labels(6)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_labels(slots)
            .y_label_formatter(&|value| match value {
                SegmentValue::CenterOf(slot) => row_at(*slot, slots)
                    .and_then(|index| labels.get(index))
                    .cloned()
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .label_style((FONT_FAMILY, 14.0))
            .axis_desc_style((FONT_FAMILY, 16.0))
            .draw()?;

        chart.draw_series(rows.iter().enumerate().map(|(index, row)| {
            let slot = slot_for(index, slots);
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(slot)),
                    (row.score.clamp(0.0, 100.0), SegmentValue::Exact(slot + 1)),
                ],
                BAR_COLOR.filled(),
            );
            bar.set_margin(5, 5, 0, 0);
            bar
        }))?;

        let value_style = (FONT_FAMILY, 13.0)
            .into_font()
            .color(&TEXT_COLOR)
            .pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(rows.iter().enumerate().map(|(index, row)| {
            let score = row.score.clamp(0.0, 100.0);
            // keep the value inside the frame for near-perfect scores
            let x = if score > 90.0 { score - 9.0 } else { score + 1.0 };
            Text::new(
                format!("{:.2}", row.score),
                (x, SegmentValue::CenterOf(slot_for(index, slots))),
                value_style.clone(),
            )
        }))?;

        if let Some(threshold) = self.threshold_percent {
            let x = threshold.clamp(0.0, 100.0);
            chart
                .draw_series(LineSeries::new(
                    [(x, SegmentValue::Exact(0)), (x, SegmentValue::Exact(slots))],
                    THRESHOLD_COLOR.stroke_width(2),
                ))?
                .label(format!("Threshold ({:.0}%)", threshold))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], THRESHOLD_COLOR.stroke_width(2)));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&TEXT_COLOR)
                .label_font((FONT_FAMILY, 13.0))
                .draw()?;
        }

        root.present()
    }
}

/// Image size for a chart of `rows` bars.
pub fn chart_size(rows: usize) -> (u32, u32) {
    (WIDTH, FRAME_HEIGHT + rows.max(1) as u32 * ROW_HEIGHT)
}

/// Segment 0 is the bottom of the plot, so row 0 takes the last one.
fn slot_for(index: usize, slots: usize) -> usize {
    slots - 1 - index
}

fn row_at(slot: usize, slots: usize) -> Option<usize> {
    slots.checked_sub(slot + 1)
}

fn load_font() -> Result<()> {
    static LOADED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    LOADED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT)
                .map_err(|_| "bundled chart font is invalid".to_string())
        })
        .clone()
        .map_err(ScreenerError::Chart)
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 2).collect();
        format!("{}..", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::similarity::MatchThreshold;
    use tempfile::TempDir;

    fn candidates(scores: &[(&str, f64)]) -> Vec<ScoredCandidate> {
        let threshold = MatchThreshold::default();
        scores
            .iter()
            .map(|(name, score)| ScoredCandidate::new(*name, *score, &threshold))
            .collect()
    }

    fn bar_pixels(chart: &BarChart, rows: &[ScoredCandidate]) -> usize {
        load_font().unwrap();
        let (width, height) = chart_size(rows.len());
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            chart.draw(&root, rows).unwrap();
        }
        buffer
            .chunks(3)
            .filter(|px| *px == [BAR_COLOR.0, BAR_COLOR.1, BAR_COLOR.2])
            .count()
    }

    #[test]
    fn test_height_scales_with_row_count() {
        assert_eq!(chart_size(4).1 - chart_size(2).1, 2 * ROW_HEIGHT);
        assert_eq!(chart_size(0), chart_size(1));
    }

    #[test]
    fn test_first_row_takes_the_top_slot() {
        assert_eq!(slot_for(0, 3), 2);
        assert_eq!(slot_for(2, 3), 0);
        assert_eq!(row_at(2, 3), Some(0));
        assert_eq!(row_at(3, 3), None);
    }

    #[test]
    fn test_longer_bars_cover_more_pixels() {
        let chart = BarChart::new("Scores").with_threshold(30.0);
        let short = bar_pixels(&chart, &candidates(&[("a.pdf", 10.0)]));
        let long = bar_pixels(&chart, &candidates(&[("a.pdf", 80.0)]));

        assert!(short > 0);
        assert!(long > short * 4);
        assert_eq!(bar_pixels(&chart, &[]), 0);
    }

    #[test]
    fn test_empty_chart_still_renders_and_saves() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("charts").join("empty.png");

        BarChart::new("Nothing to show").save(&[], &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), chart_size(0));
    }

    #[test]
    fn test_non_ascii_labels_render() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bias.png");
        let rows = candidates(&[("Zoë Ångström", 55.5), ("José Núñez", 12.25)]);

        BarChart::new("Bias Check - Résumé Score").with_threshold(30.0).save(&rows, &path).unwrap();

        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let label = "a".repeat(MAX_LABEL_CHARS + 5);
        let truncated = truncate_label(&label);
        assert_eq!(truncated.chars().count(), MAX_LABEL_CHARS);
        assert!(truncated.ends_with(".."));
    }
}
