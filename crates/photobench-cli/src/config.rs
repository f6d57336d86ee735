//! TOML bench description deserialisation.
//!
//! ```toml
//! [medium]
//! refractive_index = 1.000293
//!
//! [[stage]]
//! name = "LASER"
//! port = "first"
//! kind = "laser"
//! power_w = 2.5e-3
//! wavelength_m = 650e-9
//! waist_radius_m = 50e-6
//!
//! [[stage]]
//! name = "SPLITTER"
//! port = "reflected"
//! kind = "unpolarised_splitter"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;

use photobench_core::bench::{Bench, Component, Selector};
use photobench_core::element::{OpticalElement, PolarisationOverride, SurfaceSpec};
use photobench_core::medium::{Medium, AIR_REFRACTIVE_INDEX};
use photobench_core::signal::Polarisation;
use photobench_core::source::OpticalSource;

/// Top-level bench file.
#[derive(Debug, Deserialize)]
pub struct BenchConfig {
    #[serde(default)]
    pub medium: MediumConfig,
    #[serde(rename = "stage")]
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Ambient medium.
#[derive(Debug, Deserialize)]
pub struct MediumConfig {
    #[serde(default = "default_refractive_index")]
    pub refractive_index: f64,
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self {
            refractive_index: default_refractive_index(),
        }
    }
}

fn default_refractive_index() -> f64 {
    AIR_REFRACTIVE_INDEX
}

/// One `[[stage]]` entry.
#[derive(Debug, Deserialize)]
pub struct StageConfig {
    pub name: String,
    /// Which port of the previous stage feeds this one.
    pub port: Selector,
    #[serde(flatten)]
    pub component: ComponentConfig,
}

/// Component parameters, selected by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentConfig {
    Laser {
        power_w: f64,
        wavelength_m: f64,
        #[serde(default)]
        waist_radius_m: Option<f64>,
        #[serde(default)]
        divergence_rad: Option<f64>,
        #[serde(default)]
        fwhm_m: Option<f64>,
        #[serde(default)]
        polarisation_angle_deg: Option<f64>,
        #[serde(default)]
        polarisation_ellipticity: Option<f64>,
    },
    Surface {
        #[serde(default)]
        transmission: Option<f64>,
        #[serde(default)]
        reflection: Option<f64>,
        #[serde(default)]
        transmitted_angle_deg: Option<f64>,
        #[serde(default)]
        transmitted_ellipticity: Option<f64>,
        #[serde(default)]
        reflected_angle_deg: Option<f64>,
        #[serde(default)]
        reflected_ellipticity: Option<f64>,
    },
    UnpolarisedSplitter,
    PolarisingSplitter,
    Mirror,
    ClearSurface {
        transmission: f64,
    },
    LinearPolariser {
        angle_deg: f64,
        ellipticity: f64,
    },
    AbsorptiveSolution {
        concentration: f64,
        path_length_m: f64,
    },
}

/// Kinds accepted in `kind = "..."`, with a short description.
pub const COMPONENT_KINDS: &[(&str, &str)] = &[
    ("laser", "Gaussian laser source (first stage only)"),
    ("surface", "Generic surface from coefficients and polarisation overrides"),
    ("unpolarised_splitter", "50/50 splitter, polarisation unchanged"),
    ("polarising_splitter", "50/50 splitter, 45° transmitted / 135° reflected"),
    ("mirror", "Ideal mirror, full transmission port"),
    ("clear_surface", "Uncoated surface with given transmission"),
    ("linear_polariser", "Sets transmitted angle and ellipticity"),
    ("absorptive_solution", "Sample cuvette (pass-through until absorption is modelled)"),
];

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the stage table as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save the stage table as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML bench file.
pub fn load_config(path: &std::path::Path) -> Result<BenchConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<BenchConfig> {
    let config: BenchConfig = toml::from_str(content)?;
    Ok(config)
}

impl BenchConfig {
    /// Build the core bench from this description.
    pub fn build_bench(&self) -> Result<Bench> {
        let medium = Medium::new(self.medium.refractive_index)?;
        let mut bench = Bench::new();
        for (index, stage) in self.stages.iter().enumerate() {
            let component = stage
                .component
                .build(&stage.name, medium)
                .with_context(|| format!("Stage {} ('{}')", index, stage.name))?;
            bench.push(component, stage.port);
        }
        Ok(bench)
    }
}

impl ComponentConfig {
    fn build(&self, name: &str, medium: Medium) -> Result<Component> {
        let component = match *self {
            ComponentConfig::Laser {
                power_w,
                wavelength_m,
                waist_radius_m,
                divergence_rad,
                fwhm_m,
                polarisation_angle_deg,
                polarisation_ellipticity,
            } => {
                let mut source = OpticalSource::from_parameters(
                    name,
                    power_w,
                    wavelength_m,
                    waist_radius_m,
                    divergence_rad,
                    fwhm_m,
                    medium,
                )?;
                if polarisation_angle_deg.is_some() || polarisation_ellipticity.is_some() {
                    let reference = Polarisation::default();
                    source = source.with_polarisation(Polarisation::new(
                        polarisation_angle_deg.unwrap_or(reference.angle_deg),
                        polarisation_ellipticity.unwrap_or(reference.ellipticity),
                    ))?;
                }
                Component::Source(source)
            }
            ComponentConfig::Surface {
                transmission,
                reflection,
                transmitted_angle_deg,
                transmitted_ellipticity,
                reflected_angle_deg,
                reflected_ellipticity,
            } => Component::Element(OpticalElement::surface(
                name,
                SurfaceSpec {
                    transmission,
                    reflection,
                    transmitted: PolarisationOverride {
                        angle_deg: transmitted_angle_deg.into(),
                        ellipticity: transmitted_ellipticity.into(),
                    },
                    reflected: PolarisationOverride {
                        angle_deg: reflected_angle_deg.into(),
                        ellipticity: reflected_ellipticity.into(),
                    },
                },
            )?),
            ComponentConfig::UnpolarisedSplitter => {
                Component::Element(OpticalElement::unpolarised_splitter(name))
            }
            ComponentConfig::PolarisingSplitter => {
                Component::Element(OpticalElement::polarising_splitter(name))
            }
            ComponentConfig::Mirror => Component::Element(OpticalElement::mirror(name)),
            ComponentConfig::ClearSurface { transmission } => {
                Component::Element(OpticalElement::clear_surface(name, transmission)?)
            }
            ComponentConfig::LinearPolariser {
                angle_deg,
                ellipticity,
            } => Component::Element(OpticalElement::linear_polariser(name, angle_deg, ellipticity)?),
            ComponentConfig::AbsorptiveSolution {
                concentration,
                path_length_m,
            } => Component::Element(OpticalElement::absorptive_solution(
                name,
                concentration,
                path_length_m,
            )?),
        };
        Ok(component)
    }
}
