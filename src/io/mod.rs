//! Audio I/O modules
//!
//! Input discovery, decoding with Symphonia, and the sample buffer passed
//! between pipeline stages.

pub mod decoder;
pub mod discovery;
pub mod sample_buffer;
