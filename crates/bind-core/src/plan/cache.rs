//! Cache de planes a nivel proceso.
//!
//! Ciclo de vida documentado: crece con cada (tipo, kind) nuevo y nunca
//! desaloja; el universo de tipos de un programa es estático, así que el
//! tamaño queda acotado. No es un singleton escondido: el binder recibe el
//! cache como dependencia inyectable y sólo por defecto usa la instancia
//! global del proceso.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::sync::Arc;

use super::build::build_plan;
use super::types::BindingPlan;
use crate::errors::ShapeError;
use crate::shape::Bindable;
use crate::source::SourceKind;

static DEFAULT_CACHE: Lazy<Arc<PlanCache>> = Lazy::new(|| Arc::new(PlanCache::new()));

/// Instancia global perezosa, compartida por todos los binders que no
/// inyectan la suya.
pub fn default_plan_cache() -> Arc<PlanCache> {
    DEFAULT_CACHE.clone()
}

/// Cache concurrente (tipo, source kind) → plan.
///
/// Carreras de primer uso: dos callers pueden construir el mismo plan en
/// paralelo; se retiene una sola entrada y, como los planes son
/// valor-idénticos, la carrera no es observable desde afuera.
#[derive(Debug, Default)]
pub struct PlanCache {
    inner: DashMap<(TypeId, SourceKind), Arc<BindingPlan>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devuelve el plan cacheado o lo construye en el primer uso.
    ///
    /// `max_depth` se re-verifica sobre hits: el plan pudo haberse construido
    /// bajo un presupuesto de profundidad más laxo de otro binder.
    pub fn plan_for<T: Bindable>(
        &self,
        kind: SourceKind,
        max_depth: usize,
    ) -> Result<Arc<BindingPlan>, ShapeError> {
        let key = (TypeId::of::<T>(), kind);
        if let Some(plan) = self.inner.get(&key) {
            if plan.depth > max_depth {
                return Err(ShapeError::DepthExceeded {
                    record: plan.record,
                    depth: plan.depth,
                    max: max_depth,
                });
            }
            return Ok(plan.clone());
        }

        let plan = Arc::new(build_plan(T::shape(), kind, "", 1, max_depth)?);
        self.inner.insert(key, plan.clone());
        Ok(plan)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
