use std::str::FromStr;

use ndarray::{Array, ArrayBase, Data, Dimension};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DECIMALS, DEFAULT_TISSUE_DENSITY};
use crate::error::{Result, SweError};

/// Physical variable rendered by the SWE colour overlay.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SweVariable {
    /// Shear wave velocity (m/s).
    #[serde(rename = "velocity")]
    Velocity,
    /// Shear modulus (kPa).
    #[serde(rename = "shear_m")]
    ShearModulus,
    /// Young's modulus (kPa).
    #[default]
    #[serde(rename = "youngs_m")]
    YoungsModulus,
}

impl SweVariable {
    pub const ALL: [SweVariable; 3] = [
        SweVariable::Velocity,
        SweVariable::ShearModulus,
        SweVariable::YoungsModulus,
    ];

    /// Key used in result records and stat names.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Velocity => "velocity",
            Self::ShearModulus => "shear_m",
            Self::YoungsModulus => "youngs_m",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Velocity => "m/s",
            Self::ShearModulus | Self::YoungsModulus => "kPa",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Velocity => "Wave velocity",
            Self::ShearModulus => "Shear modulus",
            Self::YoungsModulus => "Young's modulus",
        }
    }
}

impl std::fmt::Display for SweVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SweVariable {
    type Err = SweError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "velocity" => Ok(Self::Velocity),
            "shear_m" => Ok(Self::ShearModulus),
            "youngs_m" => Ok(Self::YoungsModulus),
            other => Err(SweError::InvalidUnit(format!(
                "'{other}' is not one of velocity, shear_m, youngs_m"
            ))),
        }
    }
}

/// Tissue model used by conversions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionParams {
    /// Density in kg/m³.
    pub density: f64,
    /// Decimal places each intermediate and final value is rounded to.
    pub decimals: u32,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            density: DEFAULT_TISSUE_DENSITY,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl ConversionParams {
    /// Round half to even at the configured precision.
    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals as i32);
        (value * scale).round_ties_even() / scale
    }

    /// μ (kPa) -> v (m/s)
    fn shear_to_velocity(&self, mu: f64) -> f64 {
        self.round((mu * 1000.0 / self.density).sqrt())
    }

    /// v (m/s) -> μ (kPa)
    fn velocity_to_shear(&self, v: f64) -> f64 {
        self.round(self.density * v * v / 1000.0)
    }
}

/// Convert one value between SWE variables.
///
/// Fails with [`SweError::InvalidUnit`] when `from == to`: a cross-conversion
/// needs two distinct variables.
pub fn convert(value: f64, from: SweVariable, to: SweVariable, params: &ConversionParams) -> Result<f64> {
    use SweVariable::*;

    let converted = match (from, to) {
        (ShearModulus, Velocity) => params.shear_to_velocity(value),
        (ShearModulus, YoungsModulus) => params.round(3.0 * value),
        (YoungsModulus, ShearModulus) => params.round(value / 3.0),
        (YoungsModulus, Velocity) => params.shear_to_velocity(params.round(value / 3.0)),
        (Velocity, ShearModulus) => params.velocity_to_shear(value),
        (Velocity, YoungsModulus) => params.round(3.0 * params.velocity_to_shear(value)),
        (a, b) => {
            return Err(SweError::InvalidUnit(format!(
                "cannot convert {a} to itself ({b})"
            )))
        }
    };
    Ok(converted)
}

/// Convert variable names given as strings (`velocity`, `shear_m`, `youngs_m`).
pub fn convert_named(value: f64, from: &str, to: &str, params: &ConversionParams) -> Result<f64> {
    convert(value, from.parse()?, to.parse()?, params)
}

/// Element-wise conversion of an array. NaN stays NaN.
pub fn convert_array<S, D>(
    values: &ArrayBase<S, D>,
    from: SweVariable,
    to: SweVariable,
    params: &ConversionParams,
) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    // Validate the pair once so the closure below cannot fail.
    convert(0.0, from, to, params)?;
    Ok(values.mapv(|v| convert(v, from, to, params).unwrap_or(f64::NAN)))
}
