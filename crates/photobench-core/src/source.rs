//! Laser sources: the first stage of every bench.

use serde::Serialize;

use crate::error::Result;
use crate::medium::Medium;
use crate::signal::{BeamGeometry, OpticalSignal, Polarisation};

/// A laser emitting a Gaussian beam into the bench medium.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpticalSource {
    name: String,
    power_w: f64,
    wavelength_m: f64,
    geometry: BeamGeometry,
    polarisation: Polarisation,
    medium: Medium,
}

impl OpticalSource {
    /// Create a source from its emitter parameters.
    ///
    /// The source emits with [`Polarisation::default`] (angle 0,
    /// ellipticity 1) unless replaced with [`with_polarisation`](Self::with_polarisation).
    ///
    /// # Errors
    /// Any error [`OpticalSignal::new`] would raise for these parameters.
    pub fn new(
        name: impl Into<String>,
        power_w: f64,
        wavelength_m: f64,
        geometry: BeamGeometry,
        medium: Medium,
    ) -> Result<Self> {
        let source = Self {
            name: name.into(),
            power_w,
            wavelength_m,
            geometry,
            polarisation: Polarisation::default(),
            medium,
        };
        source.emit()?;
        Ok(source)
    }

    /// Create a source from optional geometry parameters, exactly one of
    /// which must be set.
    ///
    /// # Errors
    /// [`BenchError::Configuration`](crate::error::BenchError::Configuration)
    /// if zero or more than one geometry parameter is given.
    pub fn from_parameters(
        name: impl Into<String>,
        power_w: f64,
        wavelength_m: f64,
        waist_radius_m: Option<f64>,
        divergence_rad: Option<f64>,
        fwhm_m: Option<f64>,
        medium: Medium,
    ) -> Result<Self> {
        let name = name.into();
        let geometry = BeamGeometry::from_options(&name, waist_radius_m, divergence_rad, fwhm_m)?;
        Self::new(name, power_w, wavelength_m, geometry, medium)
    }

    /// Replace the emitted polarisation.
    pub fn with_polarisation(mut self, polarisation: Polarisation) -> Result<Self> {
        polarisation.validate()?;
        self.polarisation = polarisation;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The signal leaving the laser aperture.
    pub fn emit(&self) -> Result<OpticalSignal> {
        OpticalSignal::new(
            self.power_w,
            self.wavelength_m,
            self.polarisation,
            self.geometry,
            &self.medium,
        )
    }
}
