use std::error::Error;
use std::io::Cursor;

use plotters::prelude::*;

use crate::aggregate::GroupedAggregate;

/// Series color of the cost-by-therapy-type chart.
pub const COST_ACCENT: RGBColor = RGBColor(0x00, 0x83, 0xB8);
/// Series color of the duration-by-therapist chart.
pub const DURATION_ACCENT: RGBColor = RGBColor(0xFF, 0x57, 0x33);

// Dark template: near-black canvas, light labels.
const BACKGROUND: RGBColor = RGBColor(17, 17, 17);
const TEXT_COLOR: RGBColor = RGBColor(0xEE, 0xEE, 0xEE);

/// Styling for one bar chart.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub accent: RGBColor,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Graphique".to_string(),
            width: 800,
            height: 480,
            accent: COST_ACCENT,
        }
    }
}

/// Cost by therapy type as horizontal bars (value axis on X), themed
/// like the production dashboard. Returns PNG bytes.
pub fn cost_by_therapy_type_chart(agg: &GroupedAggregate) -> Result<Vec<u8>, Box<dyn Error>> {
    horizontal_bar_chart(
        agg,
        &ChartOptions {
            title: "Coût par Type de Thérapie".to_string(),
            accent: COST_ACCENT,
            ..ChartOptions::default()
        },
    )
}

/// Duration by therapist as vertical bars, one per therapist in group
/// order. Returns PNG bytes.
pub fn duration_by_therapist_chart(agg: &GroupedAggregate) -> Result<Vec<u8>, Box<dyn Error>> {
    vertical_bar_chart(
        agg,
        &ChartOptions {
            title: "Durée par Thérapeute".to_string(),
            accent: DURATION_ACCENT,
            ..ChartOptions::default()
        },
    )
}

/// Horizontal bar chart: one bar per entry, categories on the Y axis.
pub fn horizontal_bar_chart(
    agg: &GroupedAggregate,
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if agg.entries.is_empty() {
        return Err("no data to chart".into());
    }

    let labels: Vec<&str> = agg.entries.iter().map(|(k, _)| k.as_str()).collect();
    let n = agg.entries.len();
    let max_value = max_measure(agg);

    let (width, height) = (options.width, options.height);
    let mut raw = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&BACKGROUND)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                &options.title,
                ("sans-serif", 26).into_font().color(&options.accent),
            )
            .margin(16)
            .x_label_area_size(36)
            .y_label_area_size(130)
            .build_cartesian_2d(0.0..max_value * 1.1, (0..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .axis_style(&TEXT_COLOR)
            .label_style(("sans-serif", 14).into_font().color(&TEXT_COLOR))
            .y_labels(n)
            .y_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(i) => {
                    labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
                }
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(agg.entries.iter().enumerate().map(|(i, (_, value))| {
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (*value, SegmentValue::Exact(i + 1)),
                ],
                options.accent.filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))?;

        root.present()?;
    }

    encode_png(width, height, raw)
}

/// Vertical bar chart: one bar per entry, categories on the X axis.
pub fn vertical_bar_chart(
    agg: &GroupedAggregate,
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if agg.entries.is_empty() {
        return Err("no data to chart".into());
    }

    let labels: Vec<&str> = agg.entries.iter().map(|(k, _)| k.as_str()).collect();
    let n = agg.entries.len();
    let max_value = max_measure(agg);

    let (width, height) = (options.width, options.height);
    let mut raw = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&BACKGROUND)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                &options.title,
                ("sans-serif", 26).into_font().color(&options.accent),
            )
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(48)
            .build_cartesian_2d((0..n).into_segmented(), 0.0..max_value * 1.1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .axis_style(&TEXT_COLOR)
            .label_style(("sans-serif", 14).into_font().color(&TEXT_COLOR))
            .x_labels(n)
            .x_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(i) => {
                    labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
                }
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(agg.entries.iter().enumerate().map(|(i, (_, value))| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), *value),
                ],
                options.accent.filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))?;

        root.present()?;
    }

    encode_png(width, height, raw)
}

fn max_measure(agg: &GroupedAggregate) -> f64 {
    agg.entries
        .iter()
        .map(|(_, v)| *v)
        .fold(0.0f64, f64::max)
        .max(1.0)
}

/// PNG-encode the raw RGB pixels the backend drew into.
fn encode_png(width: u32, height: u32, raw: Vec<u8>) -> Result<Vec<u8>, Box<dyn Error>> {
    let image =
        image::RgbImage::from_raw(width, height, raw).ok_or("chart buffer size mismatch")?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)?;
    Ok(png)
}
