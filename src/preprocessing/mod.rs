//! Signal conditioning stages
//!
//! This module contains the per-file pipeline stages, in the order they run:
//! - Normalization of integer PCM to unit range
//! - Channel mixing (N channels to mono)
//! - Anti-aliasing low-pass filter
//! - Decimation
//! - Silence trimming

pub mod anti_alias;
pub mod channel_mixer;
pub mod normalization;
pub mod resample;
pub mod silence;
