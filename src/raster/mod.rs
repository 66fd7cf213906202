mod border;
mod boundary;
mod falloff;

pub use border::{BorderPolyline, Skip};
pub use boundary::BoundaryMarks;
pub use falloff::FalloffBand;

use crate::math::raster_2d::PixelPoint;
use crate::math::Point2;

/// An axis-aligned pixel rectangle in destination pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskRect {
    /// Left column.
    pub x: i64,
    /// Top row.
    pub y: i64,
    pub width: usize,
    pub height: usize,
}

impl MaskRect {
    /// Creates a rectangle from its top-left pixel and size.
    #[must_use]
    pub fn new(x: i64, y: i64, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest rectangle holding every pixel touched by `points`, grown by
    /// `margin` pixels on each side. Returns `None` for an empty input.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bounding<I>(points: I, margin: i64) -> Option<Self>
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut iter = points.into_iter().map(PixelPoint::containing);
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let x = min.x - margin;
        let y = min.y - margin;
        Some(Self {
            x,
            y,
            width: (max.x + margin - x + 1) as usize,
            height: (max.y + margin - y + 1) as usize,
        })
    }

    /// Returns `true` if the pixel `(x, y)` lies inside the rectangle.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width as i64 && y < self.y + self.height as i64
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Row-major buffer index of pixel `(x, y)`, if inside.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn index(&self, x: i64, y: i64) -> Option<usize> {
        self.contains(x, y)
            .then(|| (y - self.y) as usize * self.width + (x - self.x) as usize)
    }
}

/// A dense opacity buffer over a [`MaskRect`].
///
/// Values are in `[0, 1]`, stored row-major.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpacityMask {
    pub rect: MaskRect,
    pub data: Vec<f32>,
}

impl OpacityMask {
    /// Creates a fully transparent mask.
    #[must_use]
    pub fn new(rect: MaskRect) -> Self {
        Self {
            rect,
            data: vec![0.0; rect.area()],
        }
    }

    /// Opacity at destination pixel `(x, y)`; zero outside the rectangle.
    #[must_use]
    pub fn value_at(&self, x: i64, y: i64) -> f32 {
        self.rect.index(x, y).map_or(0.0, |i| self.data[i])
    }

    /// The buffer row at destination row `y`, if inside the rectangle.
    #[must_use]
    pub fn row(&self, y: i64) -> Option<&[f32]> {
        let start = self.rect.index(self.rect.x, y)?;
        Some(&self.data[start..start + self.rect.width])
    }

    /// Raises the pixel to `value`, never lowering it.
    pub(crate) fn raise(&mut self, x: i64, y: i64, value: f32) {
        if let Some(i) = self.rect.index(x, y) {
            self.data[i] = self.data[i].max(value);
        }
    }
}
