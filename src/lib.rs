//! Animated **nested trochoids** ("spirograph" mechanisms): chains of circles
//! each rolling on the previous one, with the pen's path painted as a
//! persistent stroke whose color cycles with distance travelled.
//!
//! # Overview
//! - [`kinematics`]: closed-form stage centers and pen position at any time
//! - [`sampler`]: per-frame sub-stepping sized to on-screen pen motion
//! - [`trace`]: append-only, arc-length colored stroke on a [`DrawTarget`]
//! - [`spirograph`]: the per-frame driver a host calls once per tick
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod color;
pub mod errors;
pub mod float_types;
pub mod kinematics;
pub mod raster;
pub mod sampler;
pub mod spirograph;
pub mod stage;
pub mod trace;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::KinematicsError;
pub use kinematics::{Mechanism, compute_pen_and_centers, pen_at};
pub use raster::RasterSurface;
pub use sampler::{AdaptiveSampler, SamplerConfig};
pub use spirograph::Spirograph;
pub use stage::{Chain, Stage};
pub use trace::{TraceAccumulator, TraceStyle};
pub use traits::DrawTarget;
