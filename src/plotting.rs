use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::dynamics::{SimulationResult, SimulationSample};
use crate::output::{ensure_directory, OutputArtifacts};

const CANVAS_SIZE: (u32, u32) = (680, 540);
const TRAJECTORY_CANVAS: (u32, u32) = (620, 620);

pub fn render_all(result: &SimulationResult, artifacts: &OutputArtifacts) -> Result<()> {
    if result.samples.is_empty() {
        return Err(anyhow!("No samples available for plotting"));
    }

    if artifacts.toggles.trajectory {
        draw_trajectory_png(result, &artifacts.trajectory_png)?;
        draw_trajectory_svg(result, &artifacts.trajectory_svg)?;
    }

    if artifacts.toggles.energy {
        draw_energy_png(result, &artifacts.energy_png)?;
        draw_energy_svg(result, &artifacts.energy_svg)?;
    }

    if artifacts.toggles.angular_momentum {
        draw_angular_momentum_png(result, &artifacts.angular_momentum_png)?;
        draw_angular_momentum_svg(result, &artifacts.angular_momentum_svg)?;
    }

    Ok(())
}

fn draw_trajectory_png(result: &SimulationResult, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let backend = BitMapBackend::new(path, TRAJECTORY_CANVAS);
    let drawing_area = backend.into_drawing_area();
    draw_trajectory(drawing_area, result)
}

fn draw_trajectory_svg(result: &SimulationResult, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let backend = SVGBackend::new(path, TRAJECTORY_CANVAS);
    let drawing_area = backend.into_drawing_area();
    draw_trajectory(drawing_area, result)
}

fn draw_energy_png(result: &SimulationResult, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let backend = BitMapBackend::new(path, CANVAS_SIZE);
    let drawing_area = backend.into_drawing_area();
    draw_energy_chart(drawing_area, result)
}

fn draw_energy_svg(result: &SimulationResult, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let backend = SVGBackend::new(path, CANVAS_SIZE);
    let drawing_area = backend.into_drawing_area();
    draw_energy_chart(drawing_area, result)
}

fn draw_angular_momentum_png(result: &SimulationResult, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let backend = BitMapBackend::new(path, CANVAS_SIZE);
    let drawing_area = backend.into_drawing_area();
    draw_angular_momentum_chart(drawing_area, result)
}

fn draw_angular_momentum_svg(result: &SimulationResult, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let backend = SVGBackend::new(path, CANVAS_SIZE);
    let drawing_area = backend.into_drawing_area();
    draw_angular_momentum_chart(drawing_area, result)
}

fn draw_energy_chart<DB: DrawingBackend>(
    drawing_area: DrawingArea<DB, Shift>,
    result: &SimulationResult,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    draw_time_series_chart(
        drawing_area,
        result,
        "Specific orbital energy versus time",
        "E",
        |sample| sample.specific_energy,
    )
}

fn draw_angular_momentum_chart<DB: DrawingBackend>(
    drawing_area: DrawingArea<DB, Shift>,
    result: &SimulationResult,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    draw_time_series_chart(
        drawing_area,
        result,
        "Specific angular momentum versus time",
        "L",
        |sample| sample.specific_angular_momentum,
    )
}

fn draw_time_series_chart<DB, F>(
    drawing_area: DrawingArea<DB, Shift>,
    result: &SimulationResult,
    title: &str,
    y_label: &str,
    value_accessor: F,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    F: Fn(&SimulationSample) -> f64,
{
    let samples = &result.samples;

    let time_start = samples.first().map(|s| s.time).unwrap_or(0.0);
    let time_end = samples.last().map(|s| s.time).unwrap_or(time_start + 1.0);

    let (y_min, y_max) = min_max(samples.iter().map(|sample| value_accessor(sample)));
    let y_span = (y_max - y_min).abs();
    let y_padding = if y_span < 1e-9 {
        y_max.abs().max(1.0) * 0.05
    } else {
        y_span * 0.05
    };
    let y_lower = y_min - y_padding;
    let y_upper = y_max + y_padding;

    let root = drawing_area;
    root.fill(&WHITE)?;

    let (title_area, chart_area) = root.split_vertically(36);
    let title_style_base = ("sans-serif", 28).into_text_style(&title_area);
    let title_style = title_style_base.pos(Pos::new(HPos::Center, VPos::Center));
    let title_dims = title_area.dim_in_pixel();
    title_area.draw_text(
        title,
        &title_style,
        (title_dims.0 as i32 / 2, title_dims.1 as i32 / 2),
    )?;

    let mut chart = ChartBuilder::on(&chart_area)
        .margin_left(52)
        .margin_right(18)
        .margin_bottom(40)
        .margin_top(6)
        .set_label_area_size(LabelAreaPosition::Left, 58)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(time_start..time_end, y_lower..y_upper)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("time")
        .y_desc(y_label)
        .y_label_formatter(&|value| format_decimal_tick(*value))
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    chart.draw_series(LineSeries::new(
        samples
            .iter()
            .map(|sample| (sample.time, value_accessor(sample))),
        &BLACK,
    ))?;

    chart_area
        .present()
        .map_err(|e| anyhow!("Failed to render time series chart: {:?}", e))?;
    Ok(())
}

fn draw_trajectory<DB: DrawingBackend>(
    drawing_area: DrawingArea<DB, Shift>,
    result: &SimulationResult,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let samples = &result.samples;

    let mut extent: f64 = 0.5;
    for sample in samples.iter() {
        extent = extent.max(sample.x.abs()).max(sample.y.abs());
    }
    extent *= 1.1;

    let root = drawing_area;
    root.fill(&WHITE)?;

    let (title_area, chart_area) = root.split_vertically(36);
    let title_style_base = ("sans-serif", 28).into_text_style(&title_area);
    let title_style = title_style_base.pos(Pos::new(HPos::Center, VPos::Center));
    let title_dims = title_area.dim_in_pixel();
    title_area.draw_text(
        "Orbit trajectory",
        &title_style,
        (title_dims.0 as i32 / 2, title_dims.1 as i32 / 2),
    )?;

    let mut chart = ChartBuilder::on(&chart_area)
        .margin_left(52)
        .margin_right(18)
        .margin_bottom(40)
        .margin_top(6)
        .set_label_area_size(LabelAreaPosition::Left, 58)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x")
        .y_desc("y")
        .y_label_formatter(&|value| format_decimal_tick(*value))
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    chart.draw_series(LineSeries::new(
        samples.iter().map(|sample| (sample.x, sample.y)),
        &BLACK,
    ))?;

    // Central body at the origin, orbiting body at its initial position.
    chart.draw_series(std::iter::once(Circle::new((0.0, 0.0), 6, BLACK.filled())))?;
    if let Some(first) = samples.first() {
        chart.draw_series(std::iter::once(Circle::new(
            (first.x, first.y),
            3,
            ShapeStyle::from(&BLACK).stroke_width(2),
        )))?;
    }

    chart_area
        .present()
        .map_err(|e| anyhow!("Failed to render trajectory chart: {:?}", e))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    Ok(())
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }
    if min > max {
        (0.0, 1.0)
    } else {
        (min, max)
    }
}

fn format_decimal_tick(value: f64) -> String {
    if value.abs() < 1e-9 {
        return "0".to_string();
    }
    if value.abs() >= 1e4 || value.abs() < 1e-3 {
        return format!("{value:.2e}");
    }
    let mut text = format!("{value:.4}");
    while text.contains('.') && text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}
