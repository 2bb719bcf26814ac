//! Fixed-point quantization
//!
//! Converts normalized float buffers into the container words shared by every
//! exporter.

pub mod bit_depth;
pub mod fixed_point;

pub use bit_depth::BitDepth;
pub use fixed_point::{quantize, quantize_bits, FixedPointBuffer};
