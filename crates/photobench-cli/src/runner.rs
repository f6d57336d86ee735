//! Bench runner: builds the bench, propagates it, and writes reports.

use std::path::Path;

use anyhow::{Context, Result};

use photobench_core::bench::{Propagation, StageOutput};

use crate::config::BenchConfig;

/// Build and propagate the bench described by `config`.
pub fn run_bench(config: &BenchConfig) -> Result<Propagation> {
    let bench = config.build_bench()?;
    log::info!("Propagating {} stages", bench.len());

    let propagation = bench.propagate().context("Propagation aborted")?;

    if let Some(throughput) = propagation.overall_throughput() {
        log::info!("Overall throughput: {:.4e}", throughput);
    }
    Ok(propagation)
}

/// Print one block per stage in the human-readable report format.
pub fn print_report(propagation: &Propagation) {
    for output in propagation.outputs() {
        println!("{}\n\t{}\n", output.name, output.signal);
    }
}

/// One CSV row per stage.
fn csv_row(output: &StageOutput) -> String {
    let s = &output.signal;
    format!(
        "{},{},{:.6e},{:.6e},{:.2},{:.2},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e}",
        output.name,
        output.selector,
        s.power_w(),
        s.wavelength_m(),
        s.polarisation_angle_deg(),
        s.polarisation_ellipticity(),
        s.waist_radius_m(),
        s.divergence_rad(),
        s.fwhm_m(),
        s.rayleigh_range_m(),
        s.peak_intensity_w_m2(),
        s.beam_parameter_product(),
    )
}

/// Write the stage table to a CSV file with a metadata header.
pub fn write_stages_csv(propagation: &Propagation, path: &Path, config: &BenchConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writeln!(file, "# Photobench stage report")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# refractive_index: {}", config.medium.refractive_index)?;
    writeln!(file, "#")?;
    writeln!(
        file,
        "stage,port,power_w,wavelength_m,angle_deg,ellipticity,waist_radius_m,divergence_rad,fwhm_m,rayleigh_range_m,peak_intensity_w_m2,beam_parameter_product_m_rad"
    )?;
    for output in propagation.outputs() {
        writeln!(file, "{}", csv_row(output))?;
    }

    println!("Stage report written to: {}", path.display());
    Ok(())
}

/// Write the stage table to a JSON file.
pub fn write_stages_json(propagation: &Propagation, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(propagation.outputs())
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Stage report (JSON) written to: {}", path.display());
    Ok(())
}

/// Print the transverse intensity profile of the final stage at axial
/// offset `z_m`. The radial range defaults to twice the local spot radius.
pub fn print_profile(propagation: &Propagation, z_m: f64, r_max_m: Option<f64>, samples: usize) -> Result<()> {
    let signal = propagation
        .final_signal()
        .context("Bench produced no signal")?;
    let r_max = r_max_m.unwrap_or_else(|| 2.0 * signal.spot_radius_m(z_m));

    println!("# z = {:.3e} m, spot radius = {:.3e} m", z_m, signal.spot_radius_m(z_m));
    println!("r_m,intensity_w_m2");
    for (r, intensity) in signal.transverse_profile(z_m, r_max, samples) {
        println!("{:.6e},{:.6e}", r, intensity);
    }
    Ok(())
}
