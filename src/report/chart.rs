use crate::sample::SampleBuffer;
use crate::utils::errors::MonitoringError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// 12x8 inches at 200 dpi.
pub const CHART_SIZE: (u32, u32) = (2400, 1600);

const LEFT_COLOR: RGBColor = RGBColor(31, 119, 180);
const RIGHT_COLOR: RGBColor = RGBColor(255, 127, 14);
const FONT: &str = "sans-serif";

/// One panel: two series over time on independent y axes.
struct Panel<'a> {
    title: &'a str,
    left_label: &'a str,
    right_label: &'a str,
    left: Vec<(f64, f64)>,
    right: Vec<(f64, f64)>,
}

fn chart_err<E: std::fmt::Display>(e: E) -> MonitoringError {
    MonitoringError::Report(format!("Failed to draw chart: {}", e))
}

/// Render CPU/RAM on top and GPU power/memory below as a PNG.
pub fn write_chart(buffer: &SampleBuffer, path: &Path) -> Result<(), MonitoringError> {
    let (start, end) = buffer.time_range();
    let time_range = start..end.max(start + 1.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let (upper, lower) = root.split_vertically(CHART_SIZE.1 / 2);

    draw_panel(
        &upper,
        time_range.clone(),
        Panel {
            title: "CPU and Memory Usage",
            left_label: "CPU %",
            right_label: "RAM MB",
            left: buffer.iter().map(|s| (s.elapsed_s, s.cpu_percent)).collect(),
            right: buffer.iter().map(|s| (s.elapsed_s, s.memory_mb)).collect(),
        },
    )?;
    draw_panel(
        &lower,
        time_range,
        Panel {
            title: "GPU Power and Memory Usage",
            left_label: "GPU Power (W)",
            right_label: "GPU Memory (MB)",
            left: buffer.iter().map(|s| (s.elapsed_s, s.gpu_power_w)).collect(),
            right: buffer.iter().map(|s| (s.elapsed_s, s.gpu_memory_mb)).collect(),
        },
    )?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    time_range: Range<f64>,
    panel: Panel<'_>,
) -> Result<(), MonitoringError> {
    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, (FONT, 40))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(120)
        .right_y_label_area_size(120)
        .build_cartesian_2d(time_range.clone(), value_range(&panel.left))
        .map_err(chart_err)?
        .set_secondary_coord(time_range, value_range(&panel.right));

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc(panel.left_label)
        .x_label_style((FONT, 24))
        .y_label_style((FONT, 24).into_font().color(&LEFT_COLOR))
        .axis_desc_style((FONT, 28))
        .draw()
        .map_err(chart_err)?;

    chart
        .configure_secondary_axes()
        .y_desc(panel.right_label)
        .label_style((FONT, 24).into_font().color(&RIGHT_COLOR))
        .axis_desc_style((FONT, 28))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(panel.left, LEFT_COLOR.stroke_width(3)))
        .map_err(chart_err)?
        .label(panel.left_label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], LEFT_COLOR.stroke_width(3)));

    chart
        .draw_secondary_series(LineSeries::new(panel.right, RIGHT_COLOR.stroke_width(3)))
        .map_err(chart_err)?
        .label(panel.right_label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], RIGHT_COLOR.stroke_width(3)));

    // secondary series register their legend entries on the primary axes,
    // so one legend covers both lines
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FONT, 24))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    Ok(())
}

/// `0..max` with 10% headroom; flat or empty series get `0..1`.
fn value_range(points: &[(f64, f64)]) -> Range<f64> {
    let max = points
        .iter()
        .map(|&(_, y)| y)
        .filter(|y| y.is_finite())
        .fold(0.0_f64, f64::max);
    if max > 0.0 { 0.0..max * 1.1 } else { 0.0..1.0 }
}
