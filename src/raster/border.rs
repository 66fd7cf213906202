use crate::math::Point2;
use crate::operations::SkipRange;

/// How drawing continues at a marked border sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Samples from here up to (excluding) the target index are skipped.
    JumpTo(usize),
    /// Every sample from here to the end of the polyline is skipped.
    EndOfLoop,
}

/// An offset polyline annotated with the loops to leave out.
#[derive(Debug, Clone, Default)]
pub struct BorderPolyline {
    points: Vec<Point2>,
    marks: Vec<Option<Skip>>,
}

impl BorderPolyline {
    /// Annotates `points` with the given skip ranges.
    ///
    /// A range wrapping past the last sample becomes an [`Skip::EndOfLoop`]
    /// at its start plus a jump from index 0 to its end.
    #[must_use]
    pub fn new(points: Vec<Point2>, ranges: &[SkipRange]) -> Self {
        let n = points.len();
        let mut marks = vec![None; n];
        for r in ranges {
            if r.start >= n || r.end >= n {
                continue;
            }
            if r.wraps() {
                if r.end > 0 {
                    marks[0] = Some(Skip::JumpTo(match marks[0] {
                        Some(Skip::JumpTo(j)) => j.max(r.end),
                        _ => r.end,
                    }));
                }
                marks[r.start] = Some(Skip::EndOfLoop);
            } else {
                marks[r.start] = Some(Skip::JumpTo(r.end));
            }
        }
        Self { points, marks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All samples, skipped ones included.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The skip mark at index `i`, if any.
    #[must_use]
    pub fn mark(&self, i: usize) -> Option<Skip> {
        self.marks.get(i).copied().flatten()
    }

    /// Samples that survive the skip marks, in order.
    #[must_use]
    pub fn visible_points(&self) -> Vec<Point2> {
        let mut out = Vec::with_capacity(self.points.len());
        let mut i = 0;
        while i < self.points.len() {
            match self.marks[i] {
                None => {
                    out.push(self.points[i]);
                    i += 1;
                }
                Some(Skip::JumpTo(j)) if j > i => i = j,
                Some(_) => break,
            }
        }
        out
    }

    /// First drawable sample reached from index `i` by following marks.
    #[must_use]
    pub fn resolve(&self, i: usize) -> usize {
        let mut target = i;
        for _ in 0..self.points.len() {
            match self.marks[target] {
                None => break,
                Some(Skip::JumpTo(j)) => target = j,
                Some(Skip::EndOfLoop) => match target.checked_sub(1) {
                    Some(prev) => target = prev,
                    None => break,
                },
            }
        }
        target
    }
}
