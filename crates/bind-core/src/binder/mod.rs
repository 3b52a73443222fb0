//! El binder: orquestación del recorrido plan → sources → registro.

mod body;
mod builder;
mod config;
mod core;

pub use builder::BinderBuilder;
pub use config::{BinderConfig, KeyNormalizer, SliceMode, UnknownFieldPolicy};
pub use core::Binder;
