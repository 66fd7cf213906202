//! Renders a feathered curve mask as a binary PGM image on stdout.
//!
//! Usage:
//! ```text
//! cargo run --example render_mask > mask.pgm
//! cargo run --example render_mask -- 640 480 > mask.pgm
//! RUST_LOG=curvemask=trace cargo run --example render_mask > mask.pgm
//! ```

use std::f64::consts::TAU;
use std::io::{self, BufWriter, Write};

use curvemask::geometry::{Shape, Vertex};
use curvemask::math::Point2;
use curvemask::operations::SmoothHandles;
use curvemask::{CurveMask, Identity};

/// A wobbly ring with a pinned, sharp vertex and a band that widens on one side.
fn demo_shape() -> Shape {
    let n = 9;
    let mut vertices: Vec<Vertex> = (0..n)
        .map(|k| {
            let a = TAU * f64::from(k) / f64::from(n);
            let r = if k % 2 == 0 { 0.32 } else { 0.24 };
            let band = 0.02 + 0.04 * (0.5 + 0.5 * a.cos());
            Vertex::new(Point2::new(0.5 + r * a.cos(), 0.5 + r * a.sin())).with_offsets(band, band)
        })
        .collect();
    let corner = vertices[3].corner;
    vertices[3] = Vertex::pinned(corner, corner, corner).with_offsets(0.03, 0.03);
    Shape::new(vertices)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_gray(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default: WARN for everything, INFO for curvemask.
    // Override with RUST_LOG (e.g. RUST_LOG=curvemask=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("curvemask=info".parse()?);
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter)
        .init();

    let mut args = std::env::args().skip(1);
    let width: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(400);
    let height: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(300);

    let mut shape = demo_shape();
    SmoothHandles::new().execute(&mut shape);
    let mask = CurveMask::new(&shape, width, height).get_mask(&Identity)?;
    tracing::info!(
        x = mask.rect.x,
        y = mask.rect.y,
        w = mask.rect.width,
        h = mask.rect.height,
        "rendered mask"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "P5\n{width} {height}\n255")?;
    for y in 0..i64::from(height) {
        let row: Vec<u8> = (0..i64::from(width))
            .map(|x| to_gray(mask.value_at(x, y)))
            .collect();
        out.write_all(&row)?;
    }
    out.flush()?;
    Ok(())
}
