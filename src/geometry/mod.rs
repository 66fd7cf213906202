pub mod shape;

pub use shape::{feather_to_handles, handle_to_feather, Shape, Vertex, MIN_VERTICES};
