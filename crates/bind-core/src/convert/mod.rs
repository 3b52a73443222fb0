//! Subsistema de conversión de tipos: texto crudo → `FieldValue`.

mod builtin;
mod factory;
mod registry;

pub use builtin::{parse_bool, parse_duration, parse_time};
pub use factory::{bool_converter, duration_converter, enum_converter, time_converter};
pub use registry::{ConvertFn, ConvertRegistry};
