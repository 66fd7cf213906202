use tracing::{debug, trace};

use crate::math::raster_2d::{bridge_pixels, PixelPoint};
use crate::math::Point2;

/// Parameters of the self-intersection search.
///
/// The crossing test is a pixel-grid heuristic; the fields expose its knobs.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionParams {
    /// Bounding boxes with fewer pixels than this are not searched.
    pub min_grid_area: i64,
    /// A revisit only counts as a crossing when at least this many samples
    /// separate the two visits.
    pub min_loop_len: usize,
    /// Reject loops that contain one of the polyline's extremal points:
    /// those come from the curve closing on itself, not from a crossing.
    pub reject_extremal_spans: bool,
}

impl Default for IntersectionParams {
    fn default() -> Self {
        Self {
            min_grid_area: 10,
            min_loop_len: 2,
            reject_extremal_spans: true,
        }
    }
}

/// A cyclic range of polyline indices excluded from drawing: from `start`
/// (inclusive) forward to `end` (exclusive), wrapping past the last index
/// when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipRange {
    pub start: usize,
    pub end: usize,
}

impl SkipRange {
    /// Returns `true` if the range wraps around the end of the polyline.
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Returns `true` if index `i` is skipped.
    #[must_use]
    pub fn contains(&self, i: usize) -> bool {
        if self.wraps() {
            i >= self.start || i < self.end
        } else {
            i >= self.start && i < self.end
        }
    }
}

/// Finds loops where a closed offset polyline crosses itself.
///
/// The polyline is walked once over an integer grid covering its bounding
/// box, starting from its rightmost point. Every grid cell remembers the
/// walk position that last stamped it; reaching a cell (or its left or upper
/// neighbor) stamped by a clearly earlier position marks a crossing. The
/// crossings are merged into a minimal set of disjoint [`SkipRange`]s.
#[derive(Debug)]
pub struct FindSelfIntersections<'a> {
    border: &'a [Point2],
    params: IntersectionParams,
}

/// First index holding the minimum x, maximum x, minimum y and maximum y.
fn extremal_indices(pixels: &[PixelPoint]) -> [usize; 4] {
    let mut ext = [0usize; 4];
    for (i, p) in pixels.iter().enumerate() {
        if p.x < pixels[ext[0]].x {
            ext[0] = i;
        }
        if p.x > pixels[ext[1]].x {
            ext[1] = i;
        }
        if p.y < pixels[ext[2]].y {
            ext[2] = i;
        }
        if p.y > pixels[ext[3]].y {
            ext[3] = i;
        }
    }
    ext
}

/// Walk-position grid over the polyline's bounding box.
struct StampGrid {
    x0: i64,
    y0: i64,
    width: i64,
    cells: Vec<Option<usize>>,
}

impl StampGrid {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn index(&self, p: PixelPoint) -> usize {
        ((p.y - self.y0) * self.width + (p.x - self.x0)) as usize
    }

    fn get(&self, p: PixelPoint) -> Option<usize> {
        self.cells[self.index(p)]
    }

    fn stamp(&mut self, p: PixelPoint, pos: usize) {
        let i = self.index(p);
        self.cells[i] = Some(pos);
    }
}

impl<'a> FindSelfIntersections<'a> {
    /// Creates a search over a closed polyline.
    #[must_use]
    pub fn new(border: &'a [Point2]) -> Self {
        Self {
            border,
            params: IntersectionParams::default(),
        }
    }

    /// Overrides the heuristic parameters.
    #[must_use]
    pub fn with_params(mut self, params: IntersectionParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the search, returning disjoint skip ranges in walk order.
    #[must_use]
    pub fn execute(&self) -> Vec<SkipRange> {
        let n = self.border.len();
        if n < 4 {
            return Vec::new();
        }

        let pixels: Vec<PixelPoint> = self.border.iter().map(|p| PixelPoint::containing(*p)).collect();
        let ext = extremal_indices(&pixels);
        let x0 = pixels[ext[0]].x - 1;
        let x1 = pixels[ext[1]].x + 1;
        let y0 = pixels[ext[2]].y - 1;
        let y1 = pixels[ext[3]].y + 1;
        let width = x1 - x0 + 1;
        let height = y1 - y0 + 1;
        if (x1 - x0) * (y1 - y0) < self.params.min_grid_area {
            trace!(width, height, "border too small for self-intersection search");
            return Vec::new();
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut grid = StampGrid {
            x0,
            y0,
            width,
            cells: vec![None; (width * height) as usize],
        };

        let start = ext[1];
        let walk_pos = |i: usize| (i + n - start) % n;
        let extremal_pos = ext.map(walk_pos);
        let min_gap = self.params.min_loop_len.max(1);

        let mut loops: Vec<(usize, usize)> = Vec::new();
        let mut last = pixels[(start + n - 1) % n];

        for pos in 0..n {
            let current = pixels[(start + pos) % n];
            for cell in bridge_pixels(last, current) {
                let mut neighbors = [Some(cell), None, None];
                if cell.x > grid.x0 {
                    neighbors[1] = Some(PixelPoint::new(cell.x - 1, cell.y));
                }
                if cell.y > grid.y0 {
                    neighbors[2] = Some(PixelPoint::new(cell.x, cell.y - 1));
                }

                for cell_or_neighbor in neighbors.into_iter().flatten() {
                    match grid.get(cell_or_neighbor) {
                        Some(prev) if cell == last || pos - prev < min_gap => grid.stamp(cell, pos),
                        Some(prev) => {
                            if self.accepts(prev, pos, &extremal_pos) {
                                merge_loop(&mut loops, prev, pos);
                            }
                        }
                        None => grid.stamp(cell, pos),
                    }
                }
                last = cell;
            }
        }

        let ranges: Vec<SkipRange> = loops
            .into_iter()
            .map(|(a, b)| SkipRange {
                start: (start + a) % n,
                end: (start + b) % n,
            })
            .collect();
        debug!(samples = n, skip_ranges = ranges.len(), "border self-intersection search");
        ranges
    }

    /// A loop from walk position `prev` to `pos` is a crossing unless it
    /// spans an extremal point of the whole polyline.
    fn accepts(&self, prev: usize, pos: usize, extremal_pos: &[usize; 4]) -> bool {
        !self.params.reject_extremal_spans || extremal_pos.iter().all(|&e| e <= prev || e > pos)
    }
}

/// Adds the loop `[prev, pos)` to a stack of disjoint loops sorted by end,
/// absorbing every loop it overlaps or touches.
fn merge_loop(loops: &mut Vec<(usize, usize)>, prev: usize, pos: usize) {
    let mut merged = (prev, pos);
    while let Some(&(a, b)) = loops.last() {
        if merged.0 > b {
            break;
        }
        merged = (merged.0.min(a), merged.1.max(b));
        loops.pop();
    }
    loops.push(merged);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Closed polyline through integer vertices with one sample per pixel.
    /// Also returns the sample index of every vertex.
    fn densify(vertices: &[(i32, i32)]) -> (Vec<Point2>, Vec<usize>) {
        let mut points = Vec::new();
        let mut starts = Vec::new();
        for (k, &(ax, ay)) in vertices.iter().enumerate() {
            let (bx, by) = vertices[(k + 1) % vertices.len()];
            starts.push(points.len());
            let steps = (bx - ax).abs().max((by - ay).abs());
            for i in 0..steps {
                points.push(Point2::new(
                    f64::from(ax + (bx - ax) * i / steps),
                    f64::from(ay + (by - ay) * i / steps),
                ));
            }
        }
        (points, starts)
    }

    #[test]
    fn simple_loop_has_no_crossings() {
        let (pts, _) = densify(&[(10, 10), (90, 10), (90, 90), (10, 90)]);
        assert!(FindSelfIntersections::new(&pts).execute().is_empty());
    }

    #[test]
    fn figure_eight_yields_one_range_over_the_inner_loop() {
        // The H→I edge crosses the E→F edge at (48, 90).
        let (pts, idx) = densify(&[
            (10, 10), // A
            (90, 10), // B
            (90, 98), // C
            (80, 98), // D
            (80, 90), // E
            (40, 90), // F
            (40, 84), // G
            (48, 84), // H
            (48, 94), // I
            (10, 94), // J
        ]);
        let ranges = FindSelfIntersections::new(&pts).execute();
        assert_eq!(ranges.len(), 1, "ranges: {ranges:?}");
        let r = ranges[0];
        assert!(!r.wraps());
        for inner in [5, 6, 7] {
            assert!(r.contains(idx[inner]), "vertex {inner} not skipped");
        }
        for outer in [0, 1, 2, 3, 4, 8, 9] {
            assert!(!r.contains(idx[outer]), "vertex {outer} skipped");
        }
    }

    #[test]
    fn loop_through_an_extremal_point_is_rejected_by_default() {
        // The loop B→C→D→(crossing) holds the topmost point of the polyline.
        let verts = [
            (10, 20), // A
            (60, 20), // B
            (60, 12), // C
            (52, 12), // D
            (52, 40), // E
            (90, 40), // F
            (90, 80), // G
            (10, 80), // H
        ];
        let (pts, idx) = densify(&verts);
        assert!(FindSelfIntersections::new(&pts).execute().is_empty());

        let params = IntersectionParams {
            reject_extremal_spans: false,
            ..IntersectionParams::default()
        };
        let ranges = FindSelfIntersections::new(&pts).with_params(params).execute();
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].contains(idx[2]));
        assert!(!ranges[0].contains(idx[6]));
    }

    #[test]
    fn tiny_borders_are_not_searched() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 0.5),
        ];
        let params = IntersectionParams {
            min_grid_area: 100,
            ..IntersectionParams::default()
        };
        assert!(FindSelfIntersections::new(&pts).with_params(params).execute().is_empty());
    }

    #[test]
    fn skip_range_membership() {
        let plain = SkipRange { start: 3, end: 7 };
        assert!(plain.contains(3) && plain.contains(6));
        assert!(!plain.contains(7) && !plain.contains(2));
        let wrapped = SkipRange { start: 8, end: 2 };
        assert!(wrapped.wraps());
        assert!(wrapped.contains(9) && wrapped.contains(0) && wrapped.contains(1));
        assert!(!wrapped.contains(2) && !wrapped.contains(5));
    }

    #[test]
    fn overlapping_loops_are_merged() {
        let mut loops = Vec::new();
        merge_loop(&mut loops, 10, 20);
        merge_loop(&mut loops, 30, 40);
        merge_loop(&mut loops, 15, 45);
        assert_eq!(loops, vec![(10, 45)]);
        merge_loop(&mut loops, 50, 52);
        assert_eq!(loops, vec![(10, 45), (50, 52)]);
    }
}
