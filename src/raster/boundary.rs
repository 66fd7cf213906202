use crate::math::raster_2d::PixelPoint;
use crate::math::Point2;

use super::{MaskRect, OpacityMask};

/// A maximal stretch of consecutive outline samples on one scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowRun {
    y: i64,
    entry: i64,
    exit: i64,
}

/// Scanline crossings and outline pixels of a closed polyline.
///
/// Every row run of the outline contributes one crossing where the outline
/// passes through the row, and two where it turns back vertically (a local
/// minimum or maximum in y), so each scanline sees an even crossing count.
#[derive(Debug, Clone)]
pub struct BoundaryMarks {
    rect: MaskRect,
    crossings: Vec<u32>,
    outline: Vec<bool>,
}

/// Collapses a closed pixel outline into cyclic row runs.
fn row_runs(pixels: &[PixelPoint]) -> Vec<RowRun> {
    let mut runs: Vec<RowRun> = Vec::new();
    for p in pixels {
        match runs.last_mut() {
            Some(run) if run.y == p.y => run.exit = p.x,
            _ => runs.push(RowRun {
                y: p.y,
                entry: p.x,
                exit: p.x,
            }),
        }
    }
    if runs.len() > 1 && runs[0].y == runs[runs.len() - 1].y {
        if let Some(last) = runs.pop() {
            runs[0].entry = last.entry;
        }
    }
    runs
}

/// Inserts one-pixel runs on the rows skipped between consecutive runs.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn fill_row_gaps(runs: &[RowRun]) -> Vec<RowRun> {
    let m = runs.len();
    let mut out = Vec::with_capacity(m);
    for (k, &a) in runs.iter().enumerate() {
        out.push(a);
        let b = runs[(k + 1) % m];
        let dy = b.y - a.y;
        let steps = dy.abs();
        for s in 1..steps {
            let x = a.exit + ((b.entry - a.exit) as f64 * s as f64 / steps as f64).round() as i64;
            out.push(RowRun {
                y: a.y + s * dy.signum(),
                entry: x,
                exit: x,
            });
        }
    }
    out
}

impl BoundaryMarks {
    /// Marks the closed outline `curve` inside `rect`.
    #[must_use]
    pub fn new(curve: &[Point2], rect: MaskRect) -> Self {
        let mut marks = Self {
            rect,
            crossings: vec![0; rect.area()],
            outline: vec![false; rect.area()],
        };
        let pixels: Vec<PixelPoint> = curve.iter().map(|p| PixelPoint::containing(*p)).collect();
        for p in &pixels {
            marks.mark_outline(p.x, p.y);
        }

        let runs = fill_row_gaps(&row_runs(&pixels));
        let m = runs.len();
        for (k, run) in runs.iter().enumerate() {
            marks.mark_outline(run.entry, run.y);
            if m == 1 {
                marks.add_crossing(run.entry, run.y);
                marks.add_crossing(run.exit, run.y);
                continue;
            }
            let prev = runs[(k + m - 1) % m];
            let next = runs[(k + 1) % m];
            let incoming = (run.y - prev.y).signum();
            let outgoing = (next.y - run.y).signum();
            marks.add_crossing(run.entry, run.y);
            if incoming != outgoing {
                marks.add_crossing(run.exit, run.y);
            }
        }
        marks
    }

    fn mark_outline(&mut self, x: i64, y: i64) {
        if let Some(i) = self.rect.index(x, y) {
            self.outline[i] = true;
        }
    }

    fn add_crossing(&mut self, x: i64, y: i64) {
        if let Some(i) = self.rect.index(x, y) {
            self.crossings[i] += 1;
        }
    }

    /// The rectangle the marks cover.
    #[must_use]
    pub fn rect(&self) -> MaskRect {
        self.rect
    }

    /// Fills the enclosed region by the even-odd rule.
    ///
    /// Outline pixels and pixels inside the outline get opacity 1, all
    /// others 0. The result depends on the marks only.
    #[must_use]
    pub fn fill(&self) -> OpacityMask {
        let mut mask = OpacityMask::new(self.rect);
        for row in 0..self.rect.height {
            let base = row * self.rect.width;
            let mut inside = false;
            for col in 0..self.rect.width {
                let i = base + col;
                if self.crossings[i] % 2 == 1 {
                    inside = !inside;
                }
                if inside || self.crossings[i] > 0 || self.outline[i] {
                    mask.data[i] = 1.0;
                }
            }
        }
        mask
    }
}
