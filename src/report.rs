//! Text, CSV and image output for lattices and ensemble results. Nothing in
//! the simulation modules writes output on its own; drivers call these.

use crate::labels::Label;
use crate::lattice::Snapshot;
use anyhow::Context;
use bitvec::prelude::BitVec;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use plotters::prelude::*;
use std::fmt::Write;
use std::path::Path;

/// Labels in fixed-width columns, one lattice row per line.
pub fn format_lattice(snapshot: &Snapshot) -> String {
    let mut buffer = String::new();
    for row in 0..snapshot.size() {
        for label in snapshot.row(row) {
            write!(buffer, "{:>4} ", label).expect("writing to a String cannot fail");
        }
        buffer.push('\n');
    }
    buffer
}

/// One value per line without a trailing newline.
pub fn write_column_csv(path: impl AsRef<Path>, data: &[f64]) -> anyhow::Result<()> {
    let path = path.as_ref();
    std::fs::write(path, data.iter().join("\n"))
        .with_context(|| format!("failed to write {}", path.display()))
}

/// `x,y` pairs under a header line.
pub fn write_series_csv(
    path: impl AsRef<Path>,
    header: (&str, &str),
    points: &[(f64, f64)],
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut buffer = String::new();
    writeln!(buffer, "{},{}", header.0, header.1)?;
    for (x, y) in points {
        writeln!(buffer, "{},{}", x, y)?;
    }
    std::fs::write(path, buffer).with_context(|| format!("failed to write {}", path.display()))
}

pub struct ChartLabels<'a> {
    pub caption: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

/// Line-and-marker chart of a sweep.
pub fn draw_series_chart(
    path: impl AsRef<Path>,
    labels: &ChartLabels<'_>,
    points: &[(f64, f64)],
) -> anyhow::Result<()> {
    anyhow::ensure!(!points.is_empty(), "nothing to plot");

    let (x_min, x_max) = bounds(points.iter().map(|p| p.0));
    let (y_min, y_max) = bounds(points.iter().map(|p| p.1));
    let x_pad = ((x_max - x_min) * 0.05).max(1e-3);
    let y_pad = ((y_max - y_min) * 0.05).max(1e-3);

    let root = BitMapBackend::new(path.as_ref(), (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(labels.caption, ("sans-serif", 32))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d((x_min - x_pad)..(x_max + x_pad), (y_min - y_pad)..(y_max + y_pad))?;

    ctx.configure_mesh()
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .axis_desc_style(("sans-serif", 22))
        .draw()?;

    ctx.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    ctx.draw_series(points.iter().map(|p| Circle::new(*p, 3, RED.filled())))?;

    root.present()?;
    Ok(())
}

/// Lattice as a bitmap: empty sites white, occupied sites grey, the
/// `highlight` cluster red.
pub fn draw_lattice(
    path: impl AsRef<Path>,
    snapshot: &Snapshot,
    highlight: Option<Label>,
    cell: u32,
) -> anyhow::Result<()> {
    let size = snapshot.size();
    let side = size as u32 * cell;
    let mask = highlight
        .map(|label| snapshot.cluster_mask(label))
        .unwrap_or_else(|| BitVec::repeat(false, size * size));

    let root = BitMapBackend::new(path.as_ref(), (side, side)).into_drawing_area();
    root.fill(&WHITE)?;

    for (index, &label) in snapshot.labels().iter().enumerate() {
        if label == 0 {
            continue;
        }
        let color = if mask[index] { RED } else { RGBColor(96, 96, 96) };
        let x = (index % size) as i32 * cell as i32;
        let y = (index / size) as i32 * cell as i32;
        root.draw(&Rectangle::new(
            [(x, y), (x + cell as i32, y + cell as i32)],
            color.filled(),
        ))?;
    }

    root.present()?;
    Ok(())
}

fn bounds(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let min = values.clone().map(OrderedFloat).min().map_or(0.0, |v| v.0);
    let max = values.map(OrderedFloat).max().map_or(0.0, |v| v.0);
    (min, max)
}
