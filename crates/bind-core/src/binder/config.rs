//! Configuración inmutable del binder.
//!
//! Snapshot de opciones funcionales: se construye vía `BinderBuilder` y se
//! comparte read-only entre todos los binds posteriores. Contrato de
//! construcción: nada de esto muta después de que el binder empieza a
//! aceptar binds, por eso es seguro reusarla concurrentemente.

use std::sync::Arc;

use crate::convert::ConvertRegistry;
use crate::event::EventSink;

/// Política ante claves del source que el plan no conoce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Silencio total.
    Ignore,
    /// Se emite el evento `UnknownField`, sin error.
    Warn,
    /// Además del evento, el bind produce un `BindError` por la clave.
    Error,
}

/// Cómo se interpretan los valores de un campo slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceMode {
    /// Claves repetidas: cada valor llega por separado (`tag=a&tag=b`).
    Repeat,
    /// Un solo valor partido por comas, con trim por elemento.
    Csv,
}

/// Normalizador de claves aplicado antes de cada lookup.
pub type KeyNormalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

pub struct BinderConfig {
    pub max_depth: usize,
    pub max_slice_len: usize,
    pub max_map_size: usize,
    pub unknown_fields: UnknownFieldPolicy,
    pub slice_mode: SliceMode,
    /// `true` = CollectAll (acumula en `MultiError`), `false` = FailFast.
    pub all_errors: bool,
    pub registry: ConvertRegistry,
    pub normalizer: Option<KeyNormalizer>,
    pub events: Option<Arc<dyn EventSink>>,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_slice_len: 256,
            max_map_size: 256,
            unknown_fields: UnknownFieldPolicy::Ignore,
            slice_mode: SliceMode::Repeat,
            all_errors: false,
            registry: ConvertRegistry::default(),
            normalizer: None,
            events: None,
        }
    }
}

impl std::fmt::Debug for BinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinderConfig")
            .field("max_depth", &self.max_depth)
            .field("max_slice_len", &self.max_slice_len)
            .field("max_map_size", &self.max_map_size)
            .field("unknown_fields", &self.unknown_fields)
            .field("slice_mode", &self.slice_mode)
            .field("all_errors", &self.all_errors)
            .field("registry", &self.registry)
            .field("normalizer", &self.normalizer.is_some())
            .field("events", &self.events.is_some())
            .finish()
    }
}
