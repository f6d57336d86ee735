//! Optical elements: the per-component transmit/reflect transform.
//!
//! Every element on the bench is an [`OpticalElement`]: a pair of power
//! coefficients (transmission $T$ and reflection $R$, with $T + R = 1$) and a
//! [`PolarisationOverride`] for each output port. Beamsplitters, mirrors,
//! polarisers, and the rest are factory constructors that pre-fill those
//! fields; none of them changes the transform itself.
//!
//! | Variant | $T$ | $R$ | Overrides |
//! |---|---|---|---|
//! | [`unpolarised_splitter`](OpticalElement::unpolarised_splitter) | 0.5 | 0.5 | none |
//! | [`polarising_splitter`](OpticalElement::polarising_splitter) | 0.5 | 0.5 | angle 45° / 135° |
//! | [`mirror`](OpticalElement::mirror) | 1 | 0 | none |
//! | [`clear_surface`](OpticalElement::clear_surface) | given | $1 - T$ | none |
//! | [`linear_polariser`](OpticalElement::linear_polariser) | 1 | 0 | transmitted angle and ellipticity |
//! | [`absorptive_solution`](OpticalElement::absorptive_solution) | 1 | 0 | inherit |

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::signal::{OpticalSignal, Polarisation, MAX_POLARISATION_ANGLE_DEG};

/// Absolute tolerance on $|T + R - 1|$ when both coefficients are given.
///
/// An exact-equality check rejects valid pairs such as `0.81` / `0.19`
/// whose floating-point sum is not exactly one.
pub const COEFFICIENT_SUM_TOLERANCE: f64 = 1e-9;

/// Either a fixed value or "use whatever the input signal has".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Override<T> {
    #[default]
    Inherit,
    Set(T),
}

impl<T: Copy> Override<T> {
    /// The overriding value if set, otherwise `inherited`.
    pub fn resolve(self, inherited: T) -> T {
        match self {
            Override::Inherit => inherited,
            Override::Set(value) => value,
        }
    }
}

impl<T> From<Option<T>> for Override<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Override::Set(v),
            None => Override::Inherit,
        }
    }
}

/// Polarisation imposed on one output port.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarisationOverride {
    pub angle_deg: Override<f64>,
    pub ellipticity: Override<f64>,
}

impl PolarisationOverride {
    /// Leave the incoming polarisation untouched.
    pub const INHERIT: Self = Self {
        angle_deg: Override::Inherit,
        ellipticity: Override::Inherit,
    };

    /// Force only the orientation.
    pub fn angle(angle_deg: f64) -> Self {
        Self {
            angle_deg: Override::Set(angle_deg),
            ellipticity: Override::Inherit,
        }
    }

    /// Force both orientation and ellipticity.
    pub fn fixed(angle_deg: f64, ellipticity: f64) -> Self {
        Self {
            angle_deg: Override::Set(angle_deg),
            ellipticity: Override::Set(ellipticity),
        }
    }

    /// Polarisation leaving the port when `input` arrives.
    pub fn apply(&self, input: Polarisation) -> Polarisation {
        Polarisation {
            angle_deg: self.angle_deg.resolve(input.angle_deg),
            ellipticity: self.ellipticity.resolve(input.ellipticity),
        }
    }

    fn validate(&self, component: &str, port: Port) -> Result<()> {
        if let Override::Set(angle) = self.angle_deg {
            if !(0.0..MAX_POLARISATION_ANGLE_DEG).contains(&angle) {
                return Err(BenchError::configuration(
                    component,
                    format!("{port} polarisation angle {angle} is outside [0, 180) degrees"),
                ));
            }
        }
        if let Override::Set(ellipticity) = self.ellipticity {
            if !ellipticity.is_finite() {
                return Err(BenchError::configuration(
                    component,
                    format!("{port} polarisation ellipticity must be finite"),
                ));
            }
        }
        Ok(())
    }
}

/// Output port of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Port {
    Transmitted,
    Reflected,
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Port::Transmitted => write!(f, "transmitted"),
            Port::Reflected => write!(f, "reflected"),
        }
    }
}

/// Which physical component an element models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    /// A surface configured directly from coefficients and overrides.
    Surface,
    UnpolarisedSplitter,
    PolarisingSplitter,
    Mirror,
    ClearSurface,
    LinearPolariser,
    /// A cuvette of absorbing solution.
    ///
    /// Concentration and path length are held for an absorption and
    /// depolarisation law that is not modelled yet; until then the solution
    /// passes all power through without changing polarisation.
    AbsorptiveSolution {
        concentration: f64,
        path_length_m: f64,
    },
}

/// User-facing parameter set for a generic surface.
///
/// Unset coefficients are derived from the other one; unset overrides
/// inherit the incoming polarisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceSpec {
    pub transmission: Option<f64>,
    pub reflection: Option<f64>,
    pub transmitted: PolarisationOverride,
    pub reflected: PolarisationOverride,
}

/// Coefficient and polarisation rule in effect on one port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortResponse {
    pub coefficient: f64,
    pub polarisation: PolarisationOverride,
}

/// A linear optical element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpticalElement {
    name: String,
    kind: ElementKind,
    transmission: f64,
    reflection: f64,
    transmitted: PolarisationOverride,
    reflected: PolarisationOverride,
}

impl OpticalElement {
    /// Build an element from an arbitrary coefficient/override set.
    ///
    /// # Errors
    /// [`BenchError::Configuration`] if neither coefficient is given, if
    /// either lies outside $[0, 1]$, if both are given but do not sum to 1
    /// (within [`COEFFICIENT_SUM_TOLERANCE`]), or if an override angle is
    /// outside $[0, 180)$.
    pub fn surface(name: impl Into<String>, spec: SurfaceSpec) -> Result<Self> {
        Self::configured(name.into(), ElementKind::Surface, spec)
    }

    /// 50/50 beamsplitter that leaves polarisation unchanged on both ports.
    pub fn unpolarised_splitter(name: impl Into<String>) -> Self {
        Self::preset(
            name,
            ElementKind::UnpolarisedSplitter,
            0.5,
            PolarisationOverride::INHERIT,
            PolarisationOverride::INHERIT,
        )
    }

    /// 50/50 beamsplitter passing 45° light and reflecting 135° light.
    pub fn polarising_splitter(name: impl Into<String>) -> Self {
        Self::preset(
            name,
            ElementKind::PolarisingSplitter,
            0.5,
            PolarisationOverride::angle(45.0),
            PolarisationOverride::angle(135.0),
        )
    }

    /// Ideal mirror. The transmitted port carries everything; the
    /// reflected port is dark.
    pub fn mirror(name: impl Into<String>) -> Self {
        Self::preset(
            name,
            ElementKind::Mirror,
            1.0,
            PolarisationOverride::INHERIT,
            PolarisationOverride::INHERIT,
        )
    }

    /// Uncoated surface (glass, cuvette wall) with the given transmission.
    pub fn clear_surface(name: impl Into<String>, transmission: f64) -> Result<Self> {
        Self::configured(
            name.into(),
            ElementKind::ClearSurface,
            SurfaceSpec {
                transmission: Some(transmission),
                ..Default::default()
            },
        )
    }

    /// Linear polariser forcing the transmitted polarisation. The reflected
    /// port is dark.
    pub fn linear_polariser(name: impl Into<String>, angle_deg: f64, ellipticity: f64) -> Result<Self> {
        Self::configured(
            name.into(),
            ElementKind::LinearPolariser,
            SurfaceSpec {
                transmission: Some(1.0),
                reflection: Some(0.0),
                transmitted: PolarisationOverride::fixed(angle_deg, ellipticity),
                reflected: PolarisationOverride::INHERIT,
            },
        )
    }

    /// Cuvette of absorbing solution.
    ///
    /// Currently a full-transmission pass-through; see
    /// [`ElementKind::AbsorptiveSolution`].
    pub fn absorptive_solution(
        name: impl Into<String>,
        concentration: f64,
        path_length_m: f64,
    ) -> Result<Self> {
        let name = name.into();
        if !concentration.is_finite() || concentration < 0.0 {
            return Err(BenchError::configuration(
                name,
                format!("concentration must be non-negative, got {concentration}"),
            ));
        }
        if !path_length_m.is_finite() || path_length_m < 0.0 {
            return Err(BenchError::configuration(
                name,
                format!("path length must be non-negative, got {path_length_m}"),
            ));
        }
        Ok(Self::preset(
            name,
            ElementKind::AbsorptiveSolution {
                concentration,
                path_length_m,
            },
            1.0,
            PolarisationOverride::INHERIT,
            PolarisationOverride::INHERIT,
        ))
    }

    fn configured(name: String, kind: ElementKind, spec: SurfaceSpec) -> Result<Self> {
        let (transmission, reflection) =
            normalise_coefficients(&name, spec.transmission, spec.reflection)?;
        spec.transmitted.validate(&name, Port::Transmitted)?;
        spec.reflected.validate(&name, Port::Reflected)?;

        Ok(Self {
            name,
            kind,
            transmission,
            reflection,
            transmitted: spec.transmitted,
            reflected: spec.reflected,
        })
    }

    /// Fixed-parameter variants whose coefficients are known to be valid.
    fn preset(
        name: impl Into<String>,
        kind: ElementKind,
        transmission: f64,
        transmitted: PolarisationOverride,
        reflected: PolarisationOverride,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            transmission,
            reflection: 1.0 - transmission,
            transmitted,
            reflected,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Configured transmission coefficient.
    pub fn transmission(&self) -> f64 {
        self.transmission
    }

    /// Configured reflection coefficient.
    pub fn reflection(&self) -> f64 {
        self.reflection
    }

    /// Coefficient and polarisation rule that apply to `port` right now.
    ///
    /// Computed from the immutable configuration on every call. For the
    /// absorptive solution this is always full transmission, no reflection,
    /// and inherited polarisation regardless of what is stored.
    pub fn response(&self, port: Port) -> PortResponse {
        match (self.kind, port) {
            (ElementKind::AbsorptiveSolution { .. }, Port::Transmitted) => PortResponse {
                coefficient: 1.0,
                polarisation: PolarisationOverride::INHERIT,
            },
            (ElementKind::AbsorptiveSolution { .. }, Port::Reflected) => PortResponse {
                coefficient: 0.0,
                polarisation: PolarisationOverride::INHERIT,
            },
            (_, Port::Transmitted) => PortResponse {
                coefficient: self.transmission,
                polarisation: self.transmitted,
            },
            (_, Port::Reflected) => PortResponse {
                coefficient: self.reflection,
                polarisation: self.reflected,
            },
        }
    }

    /// Signal leaving `port` when `input` arrives.
    ///
    /// Power scales by the port coefficient; wavelength and waist radius are
    /// carried over; polarisation follows the port override.
    ///
    /// # Errors
    /// [`BenchError::InvalidParameter`] if the port is dark (coefficient 0),
    /// since a signal must carry positive power.
    pub fn output(&self, port: Port, input: &OpticalSignal) -> Result<OpticalSignal> {
        let response = self.response(port);
        if response.coefficient == 0.0 {
            log::warn!("'{}' has no output on the {} port", self.name, port);
        }
        input.derive(
            input.power_w() * response.coefficient,
            response.polarisation.apply(input.polarisation()),
        )
    }

    pub fn transmit(&self, input: &OpticalSignal) -> Result<OpticalSignal> {
        self.output(Port::Transmitted, input)
    }

    pub fn reflect(&self, input: &OpticalSignal) -> Result<OpticalSignal> {
        self.output(Port::Reflected, input)
    }
}

/// Apply the coefficient normalisation rule.
///
/// - neither given: error;
/// - one given: the other is `1 - given`;
/// - both given: they must sum to 1 within [`COEFFICIENT_SUM_TOLERANCE`].
pub fn normalise_coefficients(
    component: &str,
    transmission: Option<f64>,
    reflection: Option<f64>,
) -> Result<(f64, f64)> {
    for (label, value) in [("transmission", transmission), ("reflection", reflection)] {
        if let Some(v) = value {
            if !(0.0..=1.0).contains(&v) {
                return Err(BenchError::configuration(
                    component,
                    format!("{label} coefficient {v} is outside [0, 1]"),
                ));
            }
        }
    }

    match (transmission, reflection) {
        (None, None) => Err(BenchError::configuration(
            component,
            "transmission or reflection coefficient must be given",
        )),
        (Some(t), None) => Ok((t, 1.0 - t)),
        (None, Some(r)) => Ok((1.0 - r, r)),
        (Some(t), Some(r)) => {
            if (t + r - 1.0).abs() > COEFFICIENT_SUM_TOLERANCE {
                return Err(BenchError::configuration(
                    component,
                    format!("transmission ({t}) and reflection ({r}) coefficients must sum to 1"),
                ));
            }
            Ok((t, r))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medium::Medium;
    use crate::signal::BeamGeometry;
    use approx::assert_relative_eq;

    fn signal(angle_deg: f64, ellipticity: f64) -> OpticalSignal {
        OpticalSignal::new(
            1e-3,
            650e-9,
            Polarisation::new(angle_deg, ellipticity),
            BeamGeometry::WaistRadius(50e-6),
            &Medium::air(),
        )
        .unwrap()
    }

    #[test]
    fn test_override_resolution() {
        assert_eq!(Override::Inherit.resolve(12.0), 12.0);
        assert_eq!(Override::Set(3.0).resolve(12.0), 3.0);
        assert_eq!(Override::from(Some(1.5)), Override::Set(1.5));
        assert_eq!(Override::<f64>::from(None), Override::Inherit);

        let partial = PolarisationOverride::angle(90.0);
        let out = partial.apply(Polarisation::new(10.0, 0.3));
        assert_eq!(out, Polarisation::new(90.0, 0.3));
    }

    #[test]
    fn test_only_transmission_given() {
        let e = OpticalElement::clear_surface("glass", 0.81).unwrap();
        assert_eq!(e.reflection(), 1.0 - 0.81);

        let input = signal(30.0, 0.0);
        let out = e.transmit(&input).unwrap();
        assert_eq!(out.power_w(), 0.81 * input.power_w());
    }

    #[test]
    fn test_only_reflection_given() {
        let e = OpticalElement::surface(
            "coating",
            SurfaceSpec {
                reflection: Some(0.04),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(e.transmission(), 1.0 - 0.04);
        assert_eq!(e.reflection(), 0.04);
    }

    #[test]
    fn test_neither_coefficient_is_configuration_error() {
        let err = OpticalElement::surface("nothing", SurfaceSpec::default()).unwrap_err();
        assert!(matches!(err, BenchError::Configuration { .. }));
    }

    #[test]
    fn test_contradictory_coefficients_rejected() {
        let err = OpticalElement::surface(
            "leaky",
            SurfaceSpec {
                transmission: Some(0.4),
                reflection: Some(0.4),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, BenchError::Configuration { .. }));
    }

    #[test]
    fn test_sum_check_tolerates_rounding() {
        // 0.1 + 0.2 is not exactly 0.3 in binary floating point
        let t = 0.1 + 0.2;
        let r = 0.7;
        assert!(normalise_coefficients("x", Some(t), Some(r)).is_ok());
        assert!(normalise_coefficients("x", Some(0.81), Some(0.19)).is_ok());
        assert!(normalise_coefficients("x", Some(0.5), Some(0.5 + 1e-6)).is_err());
    }

    #[test]
    fn test_out_of_range_coefficient_rejected() {
        assert!(OpticalElement::clear_surface("glass", 1.2).is_err());
        assert!(OpticalElement::clear_surface("glass", -0.1).is_err());
        assert!(OpticalElement::clear_surface("glass", f64::NAN).is_err());
    }

    #[test]
    fn test_unpolarised_splitter_inherits_and_halves() {
        let e = OpticalElement::unpolarised_splitter("BS");
        let input = signal(72.5, 0.4);
        for out in [e.transmit(&input).unwrap(), e.reflect(&input).unwrap()] {
            assert_eq!(out.power_w(), input.power_w() / 2.0);
            assert_eq!(out.polarisation(), input.polarisation());
            assert_eq!(out.wavelength_m(), input.wavelength_m());
            assert_relative_eq!(out.waist_radius_m(), input.waist_radius_m(), max_relative = 1e-15);
        }
    }

    #[test]
    fn test_polarising_splitter_forces_angles() {
        let e = OpticalElement::polarising_splitter("PBS");
        for &angle in &[0.0, 45.0, 90.0, 170.0] {
            let input = signal(angle, 2.0);
            let t = e.transmit(&input).unwrap();
            let r = e.reflect(&input).unwrap();
            assert_eq!(t.polarisation_angle_deg(), 45.0);
            assert_eq!(r.polarisation_angle_deg(), 135.0);
            // ellipticity is not overridden
            assert_eq!(t.polarisation_ellipticity(), 2.0);
            assert_eq!(r.polarisation_ellipticity(), 2.0);
        }
    }

    #[test]
    fn test_mirror_reflected_port_is_dark() {
        let e = OpticalElement::mirror("M1");
        let input = signal(0.0, 1.0);
        assert_eq!(e.transmit(&input).unwrap().power_w(), input.power_w());
        assert!(matches!(
            e.reflect(&input),
            Err(BenchError::InvalidParameter { name: "power", .. })
        ));
    }

    #[test]
    fn test_linear_polariser_sets_angle_and_ellipticity() {
        let e = OpticalElement::linear_polariser("LP", 90.0, 5.0).unwrap();
        let out = e.transmit(&signal(10.0, 1.0)).unwrap();
        assert_eq!(out.polarisation(), Polarisation::new(90.0, 5.0));
        assert_eq!(e.reflection(), 0.0);
    }

    #[test]
    fn test_linear_polariser_rejects_bad_angle() {
        assert!(matches!(
            OpticalElement::linear_polariser("LP", 180.0, 0.0),
            Err(BenchError::Configuration { .. })
        ));
    }

    #[test]
    fn test_absorptive_solution_is_pass_through() {
        let e = OpticalElement::absorptive_solution("sample", 0.2, 0.01).unwrap();
        let input = signal(33.0, 0.7);
        let out = e.transmit(&input).unwrap();
        assert_eq!(out.power_w(), input.power_w());
        assert_eq!(out.polarisation(), input.polarisation());
        assert!(e.reflect(&input).is_err());
        assert_eq!(
            *e.kind(),
            ElementKind::AbsorptiveSolution {
                concentration: 0.2,
                path_length_m: 0.01
            }
        );
    }

    #[test]
    fn test_response_does_not_change_element() {
        let e = OpticalElement::absorptive_solution("sample", 0.0, 0.0).unwrap();
        let before = e.clone();
        let input = signal(90.0, 5.0);
        for _ in 0..3 {
            e.transmit(&input).unwrap();
            let _ = e.reflect(&input);
        }
        assert_eq!(e, before);
    }

    #[test]
    fn test_negative_solution_parameters_rejected() {
        assert!(OpticalElement::absorptive_solution("s", -1.0, 0.01).is_err());
        assert!(OpticalElement::absorptive_solution("s", 0.1, -0.01).is_err());
    }
}
