//! Rendering: draw the planned panels to **SVG** or **PNG**.
//!
//! - One panel per facet row, weeks left to right, Monday on top
//! - Cells shaded on a white→red scale relative to the panel maximum
//! - Month boundary lines and today's highlight box on every panel
//! - Panel titles, month and weekday tick text when a font is available

pub mod util;

use crate::config::PlotConfig;
use crate::grid::{CalendarGrid, month_boundaries, month_tick_positions};
use crate::models::{AxisOverride, Facet, HighlightBox, LayoutPlan};
use crate::viz_plotters_adapter::{fill_style, rgb_color, stroke_style};
use anyhow::{Result, anyhow, bail};
use log::info;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use util::{ensure_font_registered, heat_color};

/// Columns left of week 0 reserved for weekday names.
const DAY_LABEL_COLUMNS: f64 = 3.0;
/// Rows above Monday reserved for month names and the panel title.
const HEADER_ROWS: f64 = 2.5;
const CANVAS_TITLE_PX: i32 = 36;

/// Draw every facet of `plan` to `out_path` (`.svg` → SVG, otherwise bitmap).
///
/// `grids[i]` belongs to `plan.facets[i]`. The highlight, if given, is drawn on
/// every panel.
pub fn render<P: AsRef<Path>>(
    plan: &LayoutPlan,
    grids: &[CalendarGrid],
    highlight: Option<&HighlightBox>,
    config: &PlotConfig,
    out_path: P,
) -> Result<()> {
    if plan.facets.is_empty() {
        bail!("nothing to render: the layout has no facets");
    }
    if grids.len() != plan.facets.len() {
        bail!(
            "{} grids for {} facets; expected one grid per facet",
            grids.len(),
            plan.facets.len()
        );
    }
    let year = grids[0].year();
    if grids.iter().any(|g| g.year() != year) {
        bail!("all panels must show the same year");
    }

    let with_text = ensure_font_registered(config.font_path.as_deref());
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (plan.canvas_width, plan.canvas_height);

    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_canvas(root, plan, grids, highlight, config, with_text)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_canvas(root, plan, grids, highlight, config, with_text)?;
    }
    info!("wrote {} panel(s) to {}", plan.facet_count, out_path.display());
    Ok(())
}

/// Grid y (weekday, growing downwards) to plot y (growing upwards).
fn flip((x, y): (f64, f64)) -> (f64, f64) {
    (x, -y)
}

fn draw_canvas<DB>(
    root: DrawingArea<DB, Shift>,
    plan: &LayoutPlan,
    grids: &[CalendarGrid],
    highlight: Option<&HighlightBox>,
    config: &PlotConfig,
    with_text: bool,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&rgb_color(config.background))
        .map_err(|e| anyhow!("{:?}", e))?;

    let title_px = if with_text { CANVAS_TITLE_PX } else { 0 };
    let (title_area, body) = root.split_vertically(title_px);
    if with_text {
        title_area
            .draw(&Text::new(
                plan.title.clone(),
                (12, 8),
                ("sans-serif", 20).into_font(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let last_week = grids.iter().map(CalendarGrid::last_week).max().unwrap_or(53);
    let year = grids[0].year();
    let boundaries = month_boundaries(year)?;
    let month_ticks = month_tick_positions(year)?;

    let panels = body.split_evenly((plan.facets.len(), 1));
    for ((facet, grid), area) in plan.facets.iter().zip(grids).zip(panels.iter()) {
        let ticks = plan
            .axis_overrides
            .iter()
            .find(|o| o.row_index == facet.row_index);
        let ctx = PanelContext {
            facet,
            grid,
            ticks,
            highlight,
            boundaries: &boundaries,
            month_ticks: &month_ticks,
            last_week,
            with_text,
        };
        draw_panel(area, &ctx, config)?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

struct PanelContext<'a> {
    facet: &'a Facet,
    grid: &'a CalendarGrid,
    ticks: Option<&'a AxisOverride>,
    highlight: Option<&'a HighlightBox>,
    boundaries: &'a [Vec<(f64, f64)>],
    month_ticks: &'a [f64],
    last_week: u32,
    with_text: bool,
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    ctx: &PanelContext<'_>,
    config: &PlotConfig,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let x_range = (-0.5 - DAY_LABEL_COLUMNS)..(f64::from(ctx.last_week) + 0.5);
    let y_range = -6.5f64..(-0.5 + HEADER_ROWS);
    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Cell gap in pixels, split over the two sides of each cell.
    let gap = config.cell_gap.max(0.0).round() as u32;
    let (near, far) = (gap / 2, gap - gap / 2);
    let max = ctx.grid.max_value();
    chart
        .draw_series(ctx.grid.cells().map(|cell| {
            let (x, y) = flip((f64::from(cell.week), f64::from(cell.weekday)));
            let mut rect = Rectangle::new(
                [(x - 0.5, y + 0.5), (x + 0.5, y - 0.5)],
                fill_style(heat_color(cell.value, max)),
            );
            rect.set_margin(near, far, near, far);
            rect
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    let line_style = stroke_style(&config.month_line);
    chart
        .draw_series(ctx.boundaries.iter().map(|line| {
            let points: Vec<(f64, f64)> = line.iter().copied().map(flip).collect();
            PathElement::new(points, line_style)
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    if let Some(hb) = ctx.highlight {
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [flip((hb.x0, hb.y0)), flip((hb.x1, hb.y1))],
                stroke_style(&hb.stroke),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    if !ctx.with_text {
        return Ok(());
    }

    let font = |px: i32, h: HPos| {
        TextStyle::from(("sans-serif", px).into_font()).pos(Pos::new(h, VPos::Center))
    };
    let centered = font(12, HPos::Center);
    let right = font(12, HPos::Right);
    let title = font(15, HPos::Left);

    chart
        .draw_series(std::iter::once(Text::new(
            ctx.facet.display_title.clone(),
            (-0.5 - DAY_LABEL_COLUMNS, -0.5 + HEADER_ROWS - 0.5),
            title,
        )))
        .map_err(|e| anyhow!("{:?}", e))?;

    if let Some(ticks) = ctx.ticks {
        chart
            .draw_series(
                ticks
                    .x_ticktext
                    .iter()
                    .zip(ctx.month_ticks)
                    .map(|(name, x)| Text::new(name.clone(), (*x, 0.6), centered.clone())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_series(
                ticks
                    .y_ticktext
                    .iter()
                    .enumerate()
                    .map(|(k, name)| Text::new(name.clone(), (-0.8, -(k as f64)), right.clone())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}
