use approx::assert_abs_diff_eq;
use ndarray::array;
use swe_core::error::SweError;
use swe_core::units::{convert, convert_array, convert_named, ConversionParams, SweVariable};

fn params() -> ConversionParams {
    ConversionParams::default()
}

// ---------------------------------------------------------------------------
// Variable names
// ---------------------------------------------------------------------------

#[test]
fn test_variable_keys_round_trip() {
    for var in SweVariable::ALL {
        assert_eq!(var.key().parse::<SweVariable>().unwrap(), var);
        assert_eq!(format!("{var}"), var.key());
    }
}

#[test]
fn test_default_variable_is_youngs_modulus() {
    assert_eq!(SweVariable::default(), SweVariable::YoungsModulus);
}

#[test]
fn test_units() {
    assert_eq!(SweVariable::Velocity.unit(), "m/s");
    assert_eq!(SweVariable::ShearModulus.unit(), "kPa");
    assert_eq!(SweVariable::YoungsModulus.unit(), "kPa");
}

#[test]
fn test_unknown_name_is_invalid_unit() {
    let err = "stiffness".parse::<SweVariable>().unwrap_err();
    assert!(matches!(err, SweError::InvalidUnit(_)));
}

// ---------------------------------------------------------------------------
// Closed forms
// ---------------------------------------------------------------------------

#[test]
fn test_shear_youngs_factor_three() {
    let p = params();
    assert_eq!(
        convert(10.0, SweVariable::ShearModulus, SweVariable::YoungsModulus, &p).unwrap(),
        30.0
    );
    assert_eq!(
        convert(30.0, SweVariable::YoungsModulus, SweVariable::ShearModulus, &p).unwrap(),
        10.0
    );
}

#[test]
fn test_velocity_shear_with_default_density() {
    let p = params();
    // mu = rho * v^2 / 1000 with rho = 1000 kg/m^3
    assert_eq!(
        convert(3.0, SweVariable::Velocity, SweVariable::ShearModulus, &p).unwrap(),
        9.0
    );
    assert_eq!(
        convert(12.0, SweVariable::ShearModulus, SweVariable::Velocity, &p).unwrap(),
        3.4641
    );
    assert_eq!(
        convert(3.0, SweVariable::Velocity, SweVariable::YoungsModulus, &p).unwrap(),
        27.0
    );
}

#[test]
fn test_youngs_to_velocity_uses_rounded_shear() {
    let p = params();
    // E = 100 -> mu = 33.3333 -> v = sqrt(33.3333) = 5.77349...
    assert_eq!(
        convert(100.0, SweVariable::YoungsModulus, SweVariable::Velocity, &p).unwrap(),
        5.7735
    );
    assert_eq!(
        convert(50.0, SweVariable::YoungsModulus, SweVariable::Velocity, &p).unwrap(),
        4.0825
    );
}

#[test]
fn test_density_changes_velocity() {
    let p = ConversionParams {
        density: 1060.0,
        decimals: 4,
    };
    let mu = convert(2.0, SweVariable::Velocity, SweVariable::ShearModulus, &p).unwrap();
    assert_abs_diff_eq!(mu, 4.24, epsilon = 1e-12);
}

#[test]
fn test_results_have_at_most_four_decimals() {
    let p = params();
    let v = convert(7.0, SweVariable::ShearModulus, SweVariable::Velocity, &p).unwrap();
    assert_abs_diff_eq!(v * 1e4, (v * 1e4).round(), epsilon = 1e-6);
}

// ---------------------------------------------------------------------------
// Round trips and errors
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip_all_directed_pairs() {
    let p = params();
    for from in SweVariable::ALL {
        for to in SweVariable::ALL {
            if from == to {
                continue;
            }
            // Squaring a velocity rounded to 4 decimals amplifies its rounding error.
            let tolerance = if from == SweVariable::Velocity || to == SweVariable::Velocity {
                1e-3
            } else {
                1.5e-4
            };
            for x in [0.5, 1.0, 2.5, 7.3, 42.0] {
                let there = convert(x, from, to, &p).unwrap();
                let back = convert(there, to, from, &p).unwrap();
                assert_abs_diff_eq!(back, x, epsilon = tolerance);
            }
        }
    }
}

#[test]
fn test_same_variable_is_invalid_unit() {
    for var in SweVariable::ALL {
        let err = convert(1.0, var, var, &params()).unwrap_err();
        assert!(matches!(err, SweError::InvalidUnit(_)));
    }
}

#[test]
fn test_convert_named() {
    let e = convert_named(3.0, "velocity", "youngs_m", &params()).unwrap();
    assert_eq!(e, 27.0);
    assert!(matches!(
        convert_named(3.0, "velocity", "kpa", &params()),
        Err(SweError::InvalidUnit(_))
    ));
}

#[test]
fn test_convert_array_keeps_nan() {
    let values = array![[30.0, f64::NAN], [0.0, 3.0]];
    let out = convert_array(
        &values,
        SweVariable::YoungsModulus,
        SweVariable::ShearModulus,
        &params(),
    )
    .unwrap();
    assert_eq!(out[[0, 0]], 10.0);
    assert!(out[[0, 1]].is_nan());
    assert_eq!(out[[1, 0]], 0.0);
    assert_eq!(out[[1, 1]], 1.0);
}

#[test]
fn test_convert_array_rejects_same_variable() {
    let values = array![1.0, 2.0];
    assert!(convert_array(&values, SweVariable::Velocity, SweVariable::Velocity, &params()).is_err());
}
