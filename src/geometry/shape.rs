use crate::error::{Result, ShapeError};
use crate::math::polygon_2d::{orientation, Orientation};
use crate::math::{Point2, Vector2};

/// Minimum number of vertices of a closed shape.
pub const MIN_VERTICES: usize = 4;

/// A control vertex of a closed Bezier shape.
///
/// Positions are normalized image coordinates in `[0, 1] × [0, 1]` with y
/// pointing down. Offsets are band half-widths relative to the smaller image
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// The on-curve point.
    pub corner: Point2,
    /// Control handle of the segment arriving at this vertex.
    pub handle_in: Option<Point2>,
    /// Control handle of the segment leaving this vertex.
    pub handle_out: Option<Point2>,
    /// Band half-width at the end of the arriving segment.
    pub offset_in: f64,
    /// Band half-width at the start of the leaving segment.
    pub offset_out: f64,
    /// `true` when the handles are user-set and must not be smoothed.
    pub pinned: bool,
}

impl Vertex {
    /// Creates an auto-smoothed vertex with unset handles and no band.
    #[must_use]
    pub fn new(corner: Point2) -> Self {
        Self {
            corner,
            handle_in: None,
            handle_out: None,
            offset_in: 0.0,
            offset_out: 0.0,
            pinned: false,
        }
    }

    /// Creates a pinned vertex with explicit handles.
    #[must_use]
    pub fn pinned(corner: Point2, handle_in: Point2, handle_out: Point2) -> Self {
        Self {
            corner,
            handle_in: Some(handle_in),
            handle_out: Some(handle_out),
            offset_in: 0.0,
            offset_out: 0.0,
            pinned: true,
        }
    }

    /// Returns the vertex with both band half-widths set.
    #[must_use]
    pub fn with_offsets(mut self, offset_in: f64, offset_out: f64) -> Self {
        self.offset_in = offset_in;
        self.offset_out = offset_out;
        self
    }

    /// Incoming handle, falling back to the corner when unset.
    #[must_use]
    pub fn handle_in_or_corner(&self) -> Point2 {
        self.handle_in.unwrap_or(self.corner)
    }

    /// Outgoing handle, falling back to the corner when unset.
    #[must_use]
    pub fn handle_out_or_corner(&self) -> Point2 {
        self.handle_out.unwrap_or(self.corner)
    }
}

/// A closed shape: an ordered ring of vertices, the last connecting back to
/// the first.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    vertices: Vec<Vertex>,
    source_offset: Option<Vector2>,
}

impl Shape {
    /// Creates a shape from its vertex ring.
    ///
    /// Any vertex count is accepted so editors can build shapes up
    /// incrementally; [`Shape::validate`] enforces the closed-shape minimum.
    #[must_use]
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            source_offset: None,
        }
    }

    /// Returns the shape with a clone-source translation.
    #[must_use]
    pub fn with_source_offset(mut self, offset: Vector2) -> Self {
        self.source_offset = Some(offset);
        self
    }

    /// Places the clone source so that the first corner lands on `position`.
    pub fn set_source_position(&mut self, position: Point2) {
        self.source_offset = self.vertices.first().map(|v| position - v.corner);
    }

    /// Translation from the shape to its clone source, if any.
    #[must_use]
    pub fn source_offset(&self) -> Option<Vector2> {
        self.source_offset
    }

    /// Checks that the ring has enough vertices to form a closed shape.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::TooFewVertices` below [`MIN_VERTICES`].
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() < MIN_VERTICES {
            return Err(ShapeError::TooFewVertices {
                count: self.vertices.len(),
                min: MIN_VERTICES,
            }
            .into());
        }
        Ok(())
    }

    /// Number of vertices in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the ring has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex ring in curve order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Mutable access to the vertices (positions and handles).
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    /// Vertex at a cyclic index; negative and overflowing indices wrap.
    ///
    /// # Panics
    ///
    /// Panics if the shape is empty.
    #[must_use]
    pub fn vertex_wrapped(&self, index: isize) -> &Vertex {
        &self.vertices[self.wrap(index)]
    }

    /// Maps a cyclic index into `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if the shape is empty.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn wrap(&self, index: isize) -> usize {
        let n = self.vertices.len() as isize;
        index.rem_euclid(n) as usize
    }

    /// Corner positions in curve order.
    #[must_use]
    pub fn corners(&self) -> Vec<Point2> {
        self.vertices.iter().map(|v| v.corner).collect()
    }

    /// Traversal direction, recomputed from the corners' shoelace area.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        orientation(&self.corners())
    }
}

/// Feather point for an outgoing handle: the handle rotated a quarter turn
/// about the corner, to the outside of the shape.
///
/// Works in orthonormal (pixel) space.
#[must_use]
pub fn handle_to_feather(corner: Point2, handle_out: Point2, orientation: Orientation) -> Point2 {
    let v = handle_out - corner;
    match orientation {
        Orientation::Clockwise => corner + Vector2::new(v.y, -v.x),
        Orientation::CounterClockwise => corner + Vector2::new(-v.y, v.x),
    }
}

/// Symmetric handles `(handle_in, handle_out)` whose outgoing handle maps
/// back to `feather` under [`handle_to_feather`].
#[must_use]
pub fn feather_to_handles(corner: Point2, feather: Point2, orientation: Orientation) -> (Point2, Point2) {
    let w = feather - corner;
    let forward = match orientation {
        Orientation::Clockwise => Vector2::new(-w.y, w.x),
        Orientation::CounterClockwise => Vector2::new(w.y, -w.x),
    };
    (corner - forward, corner + forward)
}
