//! Gaussian optical signal model.
//!
//! An [`OpticalSignal`] describes a TEM₀₀ Gaussian beam at one point on the
//! bench. The beam geometry is specified by exactly one of waist radius,
//! divergence half-angle, or FWHM ([`BeamGeometry`]); the other two are
//! derived at construction together with the peak on-axis intensity and
//! the Rayleigh range:
//!
//! $$
//! \theta = \frac{\lambda}{\pi n w_0}, \qquad
//! \mathrm{FWHM} = w_0 \sqrt{2 \ln 2}, \qquad
//! I_0 = \frac{2P}{\pi w_0^2}, \qquad
//! z_R = \frac{\pi w_0^2 n}{\lambda}
//! $$
//!
//! Signals are immutable. Every element on the bench produces a fresh
//! signal rather than editing the one it received.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::error::{BenchError, Result};
use crate::medium::Medium;

/// $\sqrt{2 \ln 2}$, the ratio between the intensity FWHM and the $1/e^2$
/// waist radius.
pub const FWHM_PER_WAIST: f64 = 1.177_410_022_515_474_7;

/// Upper bound (exclusive) of the polarisation angle, in degrees.
pub const MAX_POLARISATION_ANGLE_DEG: f64 = 180.0;

/// The one geometry parameter a beam is specified by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamGeometry {
    /// $1/e^2$ intensity radius at the focus (m).
    WaistRadius(f64),
    /// Far-field divergence half-angle (rad).
    Divergence(f64),
    /// Full width at half maximum of the transverse intensity profile (m).
    Fwhm(f64),
}

impl BeamGeometry {
    /// Pick the single geometry parameter out of a set of optional ones.
    ///
    /// Fails with [`BenchError::Configuration`] unless exactly one is given.
    pub fn from_options(
        component: &str,
        waist_radius_m: Option<f64>,
        divergence_rad: Option<f64>,
        fwhm_m: Option<f64>,
    ) -> Result<Self> {
        match (waist_radius_m, divergence_rad, fwhm_m) {
            (Some(w), None, None) => Ok(BeamGeometry::WaistRadius(w)),
            (None, Some(theta), None) => Ok(BeamGeometry::Divergence(theta)),
            (None, None, Some(fwhm)) => Ok(BeamGeometry::Fwhm(fwhm)),
            (None, None, None) => Err(BenchError::configuration(
                component,
                "one of waist radius, divergence, or FWHM must be given",
            )),
            _ => Err(BenchError::configuration(
                component,
                "only one of waist radius, divergence, or FWHM may be given",
            )),
        }
    }

    /// Resolve to the full (waist radius, divergence, FWHM) triple.
    fn resolve(self, wavelength_m: f64, medium: &Medium) -> Result<(f64, f64, f64)> {
        let n = medium.refractive_index();
        let (name, value) = match self {
            BeamGeometry::WaistRadius(v) => ("waist radius", v),
            BeamGeometry::Divergence(v) => ("divergence", v),
            BeamGeometry::Fwhm(v) => ("FWHM", v),
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(BenchError::invalid(name, value, "must be positive and finite"));
        }

        let triple = match self {
            BeamGeometry::WaistRadius(w) => (w, wavelength_m / (PI * n * w), w * FWHM_PER_WAIST),
            BeamGeometry::Divergence(theta) => {
                let w = wavelength_m / (PI * n * theta);
                (w, theta, w * FWHM_PER_WAIST)
            }
            BeamGeometry::Fwhm(fwhm) => {
                let w = fwhm / FWHM_PER_WAIST;
                (w, wavelength_m / (PI * n * w), fwhm)
            }
        };
        Ok(triple)
    }
}

/// Simplified polarisation descriptor: orientation plus ellipticity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Polarisation {
    /// Orientation of the major axis, degrees in $[0, 180)$.
    pub angle_deg: f64,
    /// Degree of circularity (dimensionless).
    pub ellipticity: f64,
}

impl Default for Polarisation {
    /// Angle 0, ellipticity 1: the reference state a bare laser emits.
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            ellipticity: 1.0,
        }
    }
}

impl Polarisation {
    pub fn new(angle_deg: f64, ellipticity: f64) -> Self {
        Self {
            angle_deg,
            ellipticity,
        }
    }

    /// Check the angle lies in $[0, 180)$ and the ellipticity is finite.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..MAX_POLARISATION_ANGLE_DEG).contains(&self.angle_deg) {
            return Err(BenchError::invalid(
                "polarisation angle",
                self.angle_deg,
                "must lie in [0, 180) degrees",
            ));
        }
        if !self.ellipticity.is_finite() {
            return Err(BenchError::invalid(
                "polarisation ellipticity",
                self.ellipticity,
                "must be finite",
            ));
        }
        Ok(())
    }
}

/// A Gaussian beam at one point on the bench.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpticalSignal {
    power_w: f64,
    wavelength_m: f64,
    polarisation: Polarisation,
    waist_radius_m: f64,
    divergence_rad: f64,
    fwhm_m: f64,
    peak_intensity_w_m2: f64,
    rayleigh_range_m: f64,
    #[serde(skip)]
    medium: Medium,
}

impl OpticalSignal {
    /// Build a signal from its power, wavelength, polarisation, and one
    /// geometry parameter.
    ///
    /// # Errors
    /// [`BenchError::InvalidParameter`] if the power, wavelength, or geometry
    /// value is not positive and finite, or the polarisation angle is outside
    /// $[0, 180)$.
    pub fn new(
        power_w: f64,
        wavelength_m: f64,
        polarisation: Polarisation,
        geometry: BeamGeometry,
        medium: &Medium,
    ) -> Result<Self> {
        if !power_w.is_finite() || power_w <= 0.0 {
            return Err(BenchError::invalid("power", power_w, "must be positive and finite"));
        }
        if !wavelength_m.is_finite() || wavelength_m <= 0.0 {
            return Err(BenchError::invalid(
                "wavelength",
                wavelength_m,
                "must be positive and finite",
            ));
        }
        polarisation.validate()?;

        let (waist_radius_m, divergence_rad, fwhm_m) = geometry.resolve(wavelength_m, medium)?;
        let w_sq = waist_radius_m * waist_radius_m;

        Ok(Self {
            power_w,
            wavelength_m,
            polarisation,
            waist_radius_m,
            divergence_rad,
            fwhm_m,
            peak_intensity_w_m2: 2.0 * power_w / (PI * w_sq),
            rayleigh_range_m: PI * w_sq * medium.refractive_index() / wavelength_m,
            medium: *medium,
        })
    }

    /// A new signal with the same wavelength, waist, and medium but a
    /// different power and polarisation.
    pub(crate) fn derive(&self, power_w: f64, polarisation: Polarisation) -> Result<Self> {
        Self::new(
            power_w,
            self.wavelength_m,
            polarisation,
            BeamGeometry::WaistRadius(self.waist_radius_m),
            &self.medium,
        )
    }

    pub fn power_w(&self) -> f64 {
        self.power_w
    }

    pub fn wavelength_m(&self) -> f64 {
        self.wavelength_m
    }

    pub fn polarisation(&self) -> Polarisation {
        self.polarisation
    }

    pub fn polarisation_angle_deg(&self) -> f64 {
        self.polarisation.angle_deg
    }

    pub fn polarisation_ellipticity(&self) -> f64 {
        self.polarisation.ellipticity
    }

    pub fn waist_radius_m(&self) -> f64 {
        self.waist_radius_m
    }

    pub fn divergence_rad(&self) -> f64 {
        self.divergence_rad
    }

    pub fn fwhm_m(&self) -> f64 {
        self.fwhm_m
    }

    /// On-axis intensity at the waist (W/m²).
    pub fn peak_intensity_w_m2(&self) -> f64 {
        self.peak_intensity_w_m2
    }

    pub fn rayleigh_range_m(&self) -> f64 {
        self.rayleigh_range_m
    }

    /// Beam parameter product $w_0 \theta$ (m·rad).
    pub fn beam_parameter_product(&self) -> f64 {
        self.waist_radius_m * self.divergence_rad
    }

    /// $1/e^2$ spot radius at axial distance `z_m` from the waist.
    ///
    /// $w(z) = w_0 \sqrt{1 + (z / z_R)^2}$
    pub fn spot_radius_m(&self, z_m: f64) -> f64 {
        let ratio = z_m / self.rayleigh_range_m;
        self.waist_radius_m * (1.0 + ratio * ratio).sqrt()
    }

    /// Intensity (W/m²) at radial offset `r_m` and axial offset `z_m` from
    /// the waist.
    ///
    /// $I(r, z) = I_0 \left(\frac{w_0}{w(z)}\right)^2 \exp\left(\frac{-2r^2}{w(z)^2}\right)$
    pub fn intensity_at(&self, r_m: f64, z_m: f64) -> f64 {
        // (w0 / w(z))^2 = 1 / (1 + (z / z_R)^2); kept in ratio form so large
        // offsets underflow to 0 instead of forming inf / inf.
        let ratio = z_m / self.rayleigh_range_m;
        let rho = r_m / self.spot_radius_m(z_m);
        self.peak_intensity_w_m2 / (1.0 + ratio * ratio) * (-2.0 * rho * rho).exp()
    }

    /// Sample the transverse intensity profile at axial offset `z_m`.
    ///
    /// Returns `samples` evenly spaced `(r, I(r, z))` pairs covering
    /// $[0, r_{\max}]$.
    pub fn transverse_profile(&self, z_m: f64, r_max_m: f64, samples: usize) -> Vec<(f64, f64)> {
        (0..samples)
            .map(|i| {
                let r = r_max_m * i as f64 / (samples - 1).max(1) as f64;
                (r, self.intensity_at(r, z_m))
            })
            .collect()
    }
}

/// One-line stage report.
///
/// Exponents are printed without zero padding (`2.50e-3`), unlike the
/// `2.50e-03` style of C `printf`-derived reports.
impl fmt::Display for OpticalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Watts: {:.2e}, Wavelength m: {:.2e}, Polarization Angle deg: {:.2}, \
             Polarization Ellipticity: {:.2}, FWHM m: {:.2e}",
            self.power_w,
            self.wavelength_m,
            self.polarisation.angle_deg,
            self.polarisation.ellipticity,
            self.fwhm_m,
        )
    }
}
