pub mod analysis;
pub mod calibration;
pub mod consts;
pub mod error;
pub mod filter;
pub mod frame;
pub mod io;
pub mod matcher;
pub mod metadata;
pub mod pipeline;
pub mod region;
pub mod resample;
pub mod stats;
pub mod units;
