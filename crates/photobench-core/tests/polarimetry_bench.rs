//! Integration tests: full polarimetry bench.
//!
//! The reference setup measures a sample cuvette between two 50/50 splitters:
//!
//! LASER → linear polariser (90°, ellipticity 5) → splitter 1 (reflected)
//! → cuvette glass in (T = 0.81) → sample → cuvette glass out (T = 0.81)
//! → splitter 2 (transmitted) → polarising splitter (reflected)

use approx::assert_relative_eq;

use photobench_core::bench::{Bench, Selector};
use photobench_core::element::{OpticalElement, SurfaceSpec};
use photobench_core::error::BenchError;
use photobench_core::medium::Medium;
use photobench_core::signal::BeamGeometry;
use photobench_core::source::OpticalSource;

// ─────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────

fn polarimetry_bench(medium: Medium) -> Bench {
    let laser = OpticalSource::from_parameters("LASER", 2.5e-3, 650e-9, Some(50e-6), None, None, medium)
        .unwrap();

    Bench::new()
        .with_stage(laser, Selector::First)
        .with_stage(
            OpticalElement::linear_polariser("LINEAR POLARIZER", 90.0, 5.0).unwrap(),
            Selector::Transmitted,
        )
        .with_stage(
            OpticalElement::unpolarised_splitter("UNPOLARIZED 5050 SPLITTER 1"),
            Selector::Reflected,
        )
        .with_stage(
            OpticalElement::clear_surface("CUVETTE GLASS IN", 0.81).unwrap(),
            Selector::Transmitted,
        )
        .with_stage(
            OpticalElement::absorptive_solution("HEMOZOIN", 0.0, 0.0).unwrap(),
            Selector::Transmitted,
        )
        .with_stage(
            OpticalElement::clear_surface("CUVETTE GLASS OUT", 0.81).unwrap(),
            Selector::Transmitted,
        )
        .with_stage(
            OpticalElement::unpolarised_splitter("UNPOLARIZED 5050 SPLITTER 2"),
            Selector::Transmitted,
        )
        .with_stage(
            OpticalElement::polarising_splitter("POLARIZED 5050 SPLITTER"),
            Selector::Reflected,
        )
}

// ─────────────────────────────────────────────────────────────
// End-to-end
// ─────────────────────────────────────────────────────────────

#[test]
fn test_final_power_and_angle() {
    let run = polarimetry_bench(Medium::air()).propagate().unwrap();
    assert_eq!(run.outputs().len(), 8);

    let last = run.final_signal().unwrap();
    let expected = 2.5e-3 * 0.5 * 0.81 * 0.81 * 0.5 * 0.5;
    assert_relative_eq!(last.power_w(), expected, max_relative = 1e-12);
    assert_relative_eq!(last.power_w(), 2.05e-4, max_relative = 1e-3);
    assert_eq!(last.polarisation_angle_deg(), 135.0);
    // ellipticity set by the polariser survives every later stage
    assert_eq!(last.polarisation_ellipticity(), 5.0);
}

#[test]
fn test_intermediate_stages() {
    let run = polarimetry_bench(Medium::air()).propagate().unwrap();
    let out = run.outputs();

    assert_eq!(out[0].signal.polarisation_angle_deg(), 0.0);
    assert_eq!(out[1].signal.power_w(), 2.5e-3);
    assert_eq!(out[1].signal.polarisation_angle_deg(), 90.0);
    assert_relative_eq!(out[2].signal.power_w(), 1.25e-3, max_relative = 1e-12);
    assert_relative_eq!(out[3].signal.power_w(), 1.25e-3 * 0.81, max_relative = 1e-12);

    // the sample is a pass-through
    assert_eq!(out[4].signal.power_w(), out[3].signal.power_w());
    assert_eq!(out[4].signal.polarisation(), out[3].signal.polarisation());
}

#[test]
fn test_beam_geometry_is_carried_through() {
    let run = polarimetry_bench(Medium::air()).propagate().unwrap();
    let source = &run.outputs()[0].signal;
    for stage in run.outputs() {
        assert_relative_eq!(stage.signal.waist_radius_m(), source.waist_radius_m(), max_relative = 1e-12);
        assert_relative_eq!(stage.signal.fwhm_m(), source.fwhm_m(), max_relative = 1e-12);
        assert_eq!(stage.signal.wavelength_m(), 650e-9);
    }
}

#[test]
fn test_throughput_independent_of_medium() {
    let air = polarimetry_bench(Medium::air()).propagate().unwrap();
    let water = polarimetry_bench(Medium::new(1.33).unwrap()).propagate().unwrap();
    assert_relative_eq!(
        air.overall_throughput().unwrap(),
        water.overall_throughput().unwrap(),
        max_relative = 1e-12
    );
    // geometry does depend on the medium
    assert!(water.final_signal().unwrap().rayleigh_range_m() > air.final_signal().unwrap().rayleigh_range_m());
}

#[test]
fn test_bench_is_reusable() {
    let bench = polarimetry_bench(Medium::air());
    let first = bench.propagate().unwrap();
    let second = bench.propagate().unwrap();
    assert_eq!(first, second);
}

// ─────────────────────────────────────────────────────────────
// Failure modes
// ─────────────────────────────────────────────────────────────

#[test]
fn test_contradictory_surface_aborts_before_propagation() {
    let err = OpticalElement::surface(
        "BAD",
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
fn test_polariser_reflection_port_aborts_chain() {
    let laser = OpticalSource::new("LASER", 1e-3, 650e-9, BeamGeometry::WaistRadius(5e-5), Medium::air()).unwrap();
    let bench = Bench::new()
        .with_stage(laser, Selector::First)
        .with_stage(
            OpticalElement::linear_polariser("LP", 90.0, 0.0).unwrap(),
            Selector::Reflected,
        )
        .with_stage(OpticalElement::mirror("M"), Selector::Transmitted);

    let err = bench.propagate().unwrap_err();
    assert!(matches!(err, BenchError::InvalidParameter { name: "power", .. }));
}
