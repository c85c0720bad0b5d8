pub mod calibration;

pub use calibration::{Calibration, LuminosityEstimator, Percent, RawSample};
