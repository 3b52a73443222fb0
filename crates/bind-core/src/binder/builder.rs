//! Builder del binder: opciones funcionales aplicadas antes del primer uso.
//!
//! Consume `self` en cada paso y congela la configuración en `build()`;
//! después de eso no hay mutación posible (los registries no son seguros
//! de mutar en concurrencia con lecturas).

use std::sync::Arc;
use std::time::Duration;

use super::config::{BinderConfig, SliceMode, UnknownFieldPolicy};
use super::core::Binder;
use crate::convert::ConvertFn;
use crate::errors::ConvertError;
use crate::event::EventSink;
use crate::plan::{default_plan_cache, PlanCache};
use crate::value::FieldValue;

#[derive(Debug, Default)]
pub struct BinderBuilder {
    config: BinderConfig,
    cache: Option<Arc<PlanCache>>,
}

impl BinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn max_slice_len(mut self, len: usize) -> Self {
        self.config.max_slice_len = len;
        self
    }

    pub fn max_map_size(mut self, size: usize) -> Self {
        self.config.max_map_size = size;
        self
    }

    pub fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.config.unknown_fields = policy;
        self
    }

    pub fn slice_mode(mut self, mode: SliceMode) -> Self {
        self.config.slice_mode = mode;
        self
    }

    /// `true` acumula todos los errores de campo en un `MultiError`;
    /// `false` (default) aborta en el primero.
    pub fn all_errors(mut self, yes: bool) -> Self {
        self.config.all_errors = yes;
        self
    }

    /// Reemplaza el set de layouts de tiempo, probados en orden.
    pub fn time_layouts(mut self, layouts: &[&str]) -> Self {
        self.config
            .registry
            .set_time_layouts(layouts.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Alias de duración (match exacto, case-sensitive, antes del parser).
    pub fn duration_alias(mut self, alias: &str, d: Duration) -> Self {
        self.config.registry.add_duration_alias(alias, d);
        self
    }

    /// Tokens truthy/falsy propios para campos bool.
    pub fn bool_tokens(mut self, truthy: &[&str], falsy: &[&str]) -> Self {
        self.config.registry.set_bool_tokens(
            truthy.iter().map(|t| t.to_string()).collect(),
            falsy.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    /// Registra un converter para el shape `Custom(name)` (el nombre que
    /// `bindable_scalar!` deriva del tipo).
    pub fn converter<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&str) -> Result<FieldValue, ConvertError> + Send + Sync + 'static,
    {
        self.config.registry.register(name, Arc::new(f) as ConvertFn);
        self
    }

    /// Normalizador de claves aplicado a cada lookup (y al escaneo de
    /// desconocidos).
    pub fn key_normalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.config.normalizer = Some(Arc::new(f));
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.config.events = Some(sink);
        self
    }

    /// Inyecta un plan cache propio (tests); por defecto se usa el del
    /// proceso.
    pub fn plan_cache(mut self, cache: Arc<PlanCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Binder {
        Binder::from_parts(
            Arc::new(self.config),
            self.cache.unwrap_or_else(default_plan_cache),
        )
    }
}
