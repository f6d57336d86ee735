//! # Photobench Core
//!
//! The physics engine of the photobench workspace. It models a Gaussian laser
//! beam as it passes through a linear optical bench (polarisers,
//! beamsplitters, mirrors, cuvettes) and predicts power, polarisation, and
//! beam geometry at every stage.
//!
//! ## Architecture
//!
//! Light is an immutable [`signal::OpticalSignal`]. A
//! [`source::OpticalSource`] emits the first one; every
//! [`element::OpticalElement`] turns an incoming signal into a transmitted
//! and/or reflected signal. A [`bench::Bench`] strings these together and
//! walks them in order.
//!
//! ## Modules
//!
//! - [`medium`] — Ambient refractive index threaded through geometry maths.
//! - [`signal`] — Gaussian beam data model and intensity profile.
//! - [`source`] — Laser sources.
//! - [`element`] — Element transform, coefficient normalisation, variants.
//! - [`bench`] — Ordered bench description and single-pass propagation.
//! - [`error`] — Shared error type.

pub mod bench;
pub mod element;
pub mod error;
pub mod medium;
pub mod signal;
pub mod source;

pub use bench::{Bench, Component, Propagation, Selector, Stage, StageOutput};
pub use element::{OpticalElement, Override, PolarisationOverride, Port, SurfaceSpec};
pub use error::{BenchError, Result};
pub use medium::Medium;
pub use signal::{BeamGeometry, OpticalSignal, Polarisation};
pub use source::OpticalSource;
