//! Recorrido principal del binder sobre sources planos y compuestos.
//!
//! Algoritmo por campo (en orden de plan):
//! 1. primera clave presente entre primaria y aliases,
//! 2. si no hay, default crudo; si no hay y es required, error,
//! 3. shapes compuestos (slice/map/record) con sus límites verificados
//!    antes de convertir,
//! 4. conversión vía registry + check enum post-conversión,
//! 5. errores según política (FailFast corta, CollectAll acumula).
//!
//! El motor no introduce concurrencia propia: un bind corre completo en el
//! thread del caller y no toca I/O.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

use super::builder::BinderBuilder;
use super::config::{BinderConfig, SliceMode, UnknownFieldPolicy};
use crate::errors::{BindCause, BindError, BindFailure, MultiError};
use crate::event::BindEventKind;
use crate::plan::{BindingPlan, FieldDescriptor, PlanCache};
use crate::shape::{Bindable, FieldShape};
use crate::source::{SourceKind, ValueSource};
use crate::value::FieldValue;

/// Estadísticas y errores acumulados de un bind en curso.
#[derive(Debug, Default)]
pub(super) struct WalkState {
    pub errors: Vec<BindError>,
    pub bound: usize,
    pub skipped: usize,
}

/// Resultado intermedio de un campo: valor convertido, clave que lo aportó
/// y kind del source ganador. `None` = campo saltado (queda en cero).
pub(super) type FieldOutcome = Option<(FieldValue, String, SourceKind)>;

/// El orquestador. Barato de clonar (la configuración y el cache van en
/// `Arc`); seguro de compartir entre threads.
#[derive(Debug, Clone)]
pub struct Binder {
    pub(super) config: Arc<BinderConfig>,
    pub(super) cache: Arc<PlanCache>,
}

impl Default for Binder {
    fn default() -> Self {
        BinderBuilder::new().build()
    }
}

impl Binder {
    pub fn builder() -> BinderBuilder {
        BinderBuilder::new()
    }

    /// Binder con toda la configuración por defecto.
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn from_parts(config: Arc<BinderConfig>, cache: Arc<PlanCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    pub fn plan_cache(&self) -> &Arc<PlanCache> {
        &self.cache
    }

    // ------------------------------------------------------------------
    // Entradas públicas
    // ------------------------------------------------------------------

    /// Bind de un source único en un registro nuevo.
    pub fn bind<T: Bindable>(&self, source: &dyn ValueSource) -> Result<T, BindFailure> {
        let mut record = T::default();
        self.bind_into(&mut record, source)?;
        Ok(record)
    }

    /// Bind sobre un registro existente. Bajo CollectAll los campos válidos
    /// quedan escritos aunque se devuelva `MultiError` (comportamiento
    /// documentado, no un invariante del que depender para side effects).
    pub fn bind_into<T: Bindable>(
        &self,
        record: &mut T,
        source: &dyn ValueSource,
    ) -> Result<(), BindFailure> {
        let plan = self
            .cache
            .plan_for::<T>(source.kind(), self.config.max_depth)?;

        let mut st = WalkState::default();
        let mut outcome = Ok(());
        for desc in &plan.fields {
            let res = self.bind_field(desc, source, &mut st);
            if let Err(e) = self.apply_outcome(record, desc, &mut st, res) {
                outcome = Err(e);
                break;
            }
        }
        if outcome.is_ok() {
            if let Err(e) = self.scan_unknown(&plan, source, &mut st) {
                outcome = Err(e);
            }
        }
        self.finish(record, st, outcome)
    }

    /// Composición multi-source: cada campo se resuelve una sola vez contra
    /// el **último** source (en orden de aplicación) que lo tiene presente;
    /// si ninguno lo tiene, aplican default/required del plan.
    pub fn bind_composed<T: Bindable>(
        &self,
        sources: &[&dyn ValueSource],
    ) -> Result<T, BindFailure> {
        let mut record = T::default();
        self.bind_composed_into(&mut record, sources)?;
        Ok(record)
    }

    pub fn bind_composed_into<T: Bindable>(
        &self,
        record: &mut T,
        sources: &[&dyn ValueSource],
    ) -> Result<(), BindFailure> {
        if sources.is_empty() {
            return Ok(());
        }
        let mut plans = Vec::with_capacity(sources.len());
        for s in sources {
            plans.push(self.cache.plan_for::<T>(s.kind(), self.config.max_depth)?);
        }
        // unión ordenada de campos: cada vista de kind sólo contiene los
        // campos anotados para ese kind
        let mut names: Vec<&str> = Vec::new();
        for plan in &plans {
            for d in &plan.fields {
                if !names.contains(&d.name) {
                    names.push(d.name);
                }
            }
        }

        let mut st = WalkState::default();
        let mut outcome = Ok(());
        for name in names {
            // último source con el campo presente gana; cada source se
            // consulta con las claves de su propia vista de anotaciones.
            // Si ninguno lo tiene, default/required corren contra el último
            // source que declara el campo.
            let mut chosen: Option<(&dyn ValueSource, &FieldDescriptor)> = None;
            for (src, plan) in sources.iter().zip(plans.iter()).rev() {
                let Some(d) = plan.fields.iter().find(|d| d.name == name) else {
                    continue;
                };
                if chosen.is_none() {
                    chosen = Some((*src, d));
                }
                if self.field_present(d, *src) {
                    chosen = Some((*src, d));
                    break;
                }
            }
            let Some((src, desc)) = chosen else {
                continue;
            };
            let res = self.bind_field(desc, src, &mut st);
            if let Err(e) = self.apply_outcome(record, desc, &mut st, res) {
                outcome = Err(e);
                break;
            }
        }
        if outcome.is_ok() {
            'scan: for (src, plan) in sources.iter().zip(plans.iter()) {
                if let Err(e) = self.scan_unknown(plan, *src, &mut st) {
                    outcome = Err(e);
                    break 'scan;
                }
            }
        }
        self.finish(record, st, outcome)
    }

    // ------------------------------------------------------------------
    // Resolución por campo
    // ------------------------------------------------------------------

    pub(super) fn normalize(&self, key: &str) -> String {
        match &self.config.normalizer {
            Some(f) => f(key),
            None => key.to_string(),
        }
    }

    pub(super) fn emit(&self, kind: BindEventKind) {
        if let Some(sink) = &self.config.events {
            sink.emit(kind);
        }
    }

    /// FailFast devuelve el error; CollectAll lo acumula y sigue.
    pub(super) fn fail(&self, st: &mut WalkState, e: BindError) -> Result<(), BindError> {
        if self.config.all_errors {
            st.errors.push(e);
            Ok(())
        } else {
            Err(e)
        }
    }

    pub(super) fn required_err(&self, desc: &FieldDescriptor, kind: SourceKind) -> BindError {
        BindError {
            field: desc.primary_key().to_string(),
            origin: kind,
            raw: None,
            cause: BindCause::Required,
        }
    }

    fn limit_err(
        &self,
        desc: &FieldDescriptor,
        kind: SourceKind,
        what: &'static str,
        got: usize,
        limit: usize,
    ) -> BindError {
        BindError {
            field: desc.primary_key().to_string(),
            origin: kind,
            raw: None,
            cause: BindCause::LimitExceeded {
                kind: what,
                got,
                limit,
            },
        }
    }

    /// Primera clave (primaria o alias) presente en el source. En modo
    /// Repeat también acepta el sinónimo con sufijo `[]` para slices.
    fn lookup_key(&self, desc: &FieldDescriptor, source: &dyn ValueSource) -> Option<String> {
        for key in &desc.keys {
            let k = self.normalize(key);
            if source.has(&k) {
                return Some(k);
            }
            if desc.is_list() && self.config.slice_mode == SliceMode::Repeat {
                let bracket = format!("{k}[]");
                if source.has(&bracket) {
                    return Some(bracket);
                }
            }
        }
        None
    }

    /// Conversión del texto crudo + check enum contra la forma canónica del
    /// valor ya convertido. Para destinos string el deletreo se canonicaliza
    /// al del conjunto.
    pub(super) fn convert_checked(
        &self,
        desc: &FieldDescriptor,
        shape: &FieldShape,
        raw: &str,
        kind: SourceKind,
    ) -> Result<FieldValue, BindError> {
        let wrap = |cause: crate::errors::ConvertError| BindError {
            field: desc.primary_key().to_string(),
            origin: kind,
            raw: Some(raw.to_string()),
            cause: BindCause::Convert(cause),
        };
        let value = self.config.registry.convert(shape, raw).map_err(wrap)?;
        self.enum_check(desc, value, kind, Some(raw))
    }

    /// Check enum post-conversión (shared con el camino body, donde el raw
    /// puede no ser texto).
    pub(super) fn enum_check(
        &self,
        desc: &FieldDescriptor,
        value: FieldValue,
        kind: SourceKind,
        raw: Option<&str>,
    ) -> Result<FieldValue, BindError> {
        let Some(allow) = &desc.enum_allow else {
            return Ok(value);
        };
        let canon = value.canonical();
        match allow.iter().find(|a| a.eq_ignore_ascii_case(&canon)) {
            Some(entry) => {
                if matches!(value, FieldValue::Str(_)) {
                    Ok(FieldValue::Str(entry.clone()))
                } else {
                    Ok(value)
                }
            }
            None => Err(BindError {
                field: desc.primary_key().to_string(),
                origin: kind,
                raw: raw.map(|r| r.to_string()),
                cause: BindCause::Convert(crate::errors::ConvertError::Enum {
                    got: canon,
                    allowed: allow.clone(),
                }),
            }),
        }
    }

    /// Resuelve un campo completo contra un source plano.
    pub(super) fn bind_field(
        &self,
        desc: &FieldDescriptor,
        source: &dyn ValueSource,
        st: &mut WalkState,
    ) -> Result<FieldOutcome, BindError> {
        match desc.shape.strip_optional().clone() {
            FieldShape::Record(_) => self.bind_record_field(desc, source, st),
            FieldShape::File => self.bind_file_field(desc, source),
            FieldShape::List(inner) => self.bind_list_field(desc, &inner, source),
            FieldShape::Map(inner) => self.bind_map_field(desc, &inner, source),
            leaf => self.bind_scalar_field(desc, &leaf, source),
        }
    }

    fn bind_scalar_field(
        &self,
        desc: &FieldDescriptor,
        shape: &FieldShape,
        source: &dyn ValueSource,
    ) -> Result<FieldOutcome, BindError> {
        if let Some(key) = self.lookup_key(desc, source) {
            let raw = source.get(&key).unwrap_or_default();
            let kind = source.kind_of(&key);
            let value = self.convert_checked(desc, shape, &raw, kind)?;
            return Ok(Some((value, key, kind)));
        }
        if let Some(default_raw) = &desc.default_raw {
            let value = self.convert_checked(desc, shape, default_raw, source.kind())?;
            return Ok(Some((value, desc.primary_key().to_string(), source.kind())));
        }
        if desc.required {
            return Err(self.required_err(desc, source.kind()));
        }
        Ok(None)
    }

    fn bind_list_field(
        &self,
        desc: &FieldDescriptor,
        inner: &FieldShape,
        source: &dyn ValueSource,
    ) -> Result<FieldOutcome, BindError> {
        let (raws, key, kind) = match self.lookup_key(desc, source) {
            Some(key) => {
                let raws = match self.config.slice_mode {
                    SliceMode::Repeat => source.get_all(&key),
                    SliceMode::Csv => split_csv(&source.get(&key).unwrap_or_default()),
                };
                let kind = source.kind_of(&key);
                (raws, key, kind)
            }
            None => match &desc.default_raw {
                // los defaults de slice siempre se parten por comas
                Some(d) => (split_csv(d), desc.primary_key().to_string(), source.kind()),
                None if desc.required => return Err(self.required_err(desc, source.kind())),
                None => return Ok(None),
            },
        };

        // el límite se verifica antes de intentar conversión alguna
        if raws.len() > self.config.max_slice_len {
            return Err(self.limit_err(desc, kind, "slice", raws.len(), self.config.max_slice_len));
        }
        let mut items = Vec::with_capacity(raws.len());
        for raw in &raws {
            items.push(self.convert_checked(desc, inner, raw, kind)?);
        }
        Ok(Some((FieldValue::List(items), key, kind)))
    }

    fn bind_map_field(
        &self,
        desc: &FieldDescriptor,
        inner: &FieldShape,
        source: &dyn ValueSource,
    ) -> Result<FieldOutcome, BindError> {
        let prefix = format!("{}.", self.normalize(desc.primary_key()));
        let entry_keys: Vec<String> = source
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect();

        if entry_keys.is_empty() {
            if desc.required {
                return Err(self.required_err(desc, source.kind()));
            }
            return Ok(None);
        }
        if entry_keys.len() > self.config.max_map_size {
            return Err(self.limit_err(
                desc,
                source.kind(),
                "map",
                entry_keys.len(),
                self.config.max_map_size,
            ));
        }

        let mut map = IndexMap::new();
        for full_key in &entry_keys {
            let sub = full_key[prefix.len()..].to_string();
            let raw = source.get(full_key).unwrap_or_default();
            let value = self.convert_checked(desc, inner, &raw, source.kind_of(full_key))?;
            map.insert(sub, value);
        }
        Ok(Some((
            FieldValue::Map(map),
            desc.primary_key().to_string(),
            source.kind(),
        )))
    }

    fn bind_file_field(
        &self,
        desc: &FieldDescriptor,
        source: &dyn ValueSource,
    ) -> Result<FieldOutcome, BindError> {
        for key in &desc.keys {
            let k = self.normalize(key);
            if let Some(file) = source.file(&k) {
                let kind = source.kind_of(&k);
                return Ok(Some((FieldValue::File(file), k, kind)));
            }
        }
        if desc.required {
            return Err(self.required_err(desc, source.kind()));
        }
        Ok(None)
    }

    /// Registro anidado contra un source plano: se recorren sus descriptores
    /// (claves ya punteadas desde el plan) y los valores exitosos se
    /// acumulan en un `Map` carrier.
    fn bind_record_field(
        &self,
        desc: &FieldDescriptor,
        source: &dyn ValueSource,
        st: &mut WalkState,
    ) -> Result<FieldOutcome, BindError> {
        let Some(plan) = desc.nested.as_deref() else {
            return Ok(None);
        };
        let mut map = IndexMap::new();
        for sub in &plan.fields {
            match self.bind_field(sub, source, st) {
                Ok(Some((value, key, kind))) => {
                    let is_record = matches!(sub.shape.strip_optional(), FieldShape::Record(_));
                    map.insert(sub.name.to_string(), value);
                    if !is_record {
                        st.bound += 1;
                        self.emit(BindEventKind::FieldBound {
                            field: sub.primary_key().to_string(),
                            key,
                            source: kind,
                        });
                    }
                }
                Ok(None) => st.skipped += 1,
                Err(e) => self.fail(st, e)?,
            }
        }
        if map.is_empty() {
            if desc.required {
                return Err(self.required_err(desc, source.kind()));
            }
            return Ok(None);
        }
        Ok(Some((
            FieldValue::Map(map),
            desc.primary_key().to_string(),
            source.kind(),
        )))
    }

    /// Presencia de un campo en un source, para la resolución compuesta.
    fn field_present(&self, desc: &FieldDescriptor, source: &dyn ValueSource) -> bool {
        match desc.shape.strip_optional() {
            FieldShape::Record(_) => desc
                .nested
                .as_deref()
                .map(|p| p.fields.iter().any(|sub| self.field_present(sub, source)))
                .unwrap_or(false),
            FieldShape::Map(_) => {
                let prefix = format!("{}.", self.normalize(desc.primary_key()));
                source.keys().iter().any(|k| k.starts_with(&prefix))
            }
            FieldShape::File => desc
                .keys
                .iter()
                .any(|k| source.file(&self.normalize(k)).is_some()),
            _ => self.lookup_key(desc, source).is_some(),
        }
    }

    // ------------------------------------------------------------------
    // Post-pass y cierre
    // ------------------------------------------------------------------

    /// Escribe el resultado de un campo en el registro y emite eventos.
    pub(super) fn apply_outcome<T: Bindable>(
        &self,
        record: &mut T,
        desc: &FieldDescriptor,
        st: &mut WalkState,
        res: Result<FieldOutcome, BindError>,
    ) -> Result<(), BindError> {
        match res {
            Ok(Some((value, key, kind))) => {
                let is_record = matches!(desc.shape.strip_optional(), FieldShape::Record(_));
                match record.set_field(desc.name, value) {
                    Ok(()) => {
                        if !is_record {
                            st.bound += 1;
                            self.emit(BindEventKind::FieldBound {
                                field: desc.primary_key().to_string(),
                                key,
                                source: kind,
                            });
                        }
                        Ok(())
                    }
                    Err(cause) => self.fail(
                        st,
                        BindError {
                            field: desc.primary_key().to_string(),
                            origin: kind,
                            raw: None,
                            cause: BindCause::Convert(cause),
                        },
                    ),
                }
            }
            Ok(None) => {
                st.skipped += 1;
                Ok(())
            }
            Err(e) => self.fail(st, e),
        }
    }

    fn scan_unknown(
        &self,
        plan: &BindingPlan,
        source: &dyn ValueSource,
        st: &mut WalkState,
    ) -> Result<(), BindError> {
        if self.config.unknown_fields == UnknownFieldPolicy::Ignore {
            return Ok(());
        }
        let exact: HashSet<String> = plan
            .claims
            .exact
            .iter()
            .map(|k| self.normalize(k))
            .collect();
        // mismo tratamiento que las exactas: se normaliza la clave, no el punto
        let prefixes: Vec<String> = plan
            .claims
            .prefixes
            .iter()
            .map(|p| match p.strip_suffix('.') {
                Some(base) => format!("{}.", self.normalize(base)),
                None => self.normalize(p),
            })
            .collect();

        for key in source.keys() {
            let k = self.normalize(&key);
            if exact.contains(&k) || prefixes.iter().any(|p| k.starts_with(p.as_str())) {
                continue;
            }
            let kind = source.kind_of(&key);
            self.emit(BindEventKind::UnknownField {
                key: k.clone(),
                source: kind,
            });
            if self.config.unknown_fields == UnknownFieldPolicy::Error {
                let e = BindError {
                    field: k,
                    origin: kind,
                    raw: None,
                    cause: BindCause::UnknownField,
                };
                self.fail(st, e)?;
            }
        }
        Ok(())
    }

    /// Emite `Done` (siempre), agrega errores según política y corre el hook
    /// de validación si el bind estructural fue limpio.
    pub(super) fn finish<T: Bindable>(
        &self,
        record: &T,
        st: WalkState,
        outcome: Result<(), BindError>,
    ) -> Result<(), BindFailure> {
        let fatal = usize::from(outcome.is_err());
        self.emit(BindEventKind::Done {
            bound: st.bound,
            skipped: st.skipped,
            errors: st.errors.len() + fatal,
        });
        if let Err(e) = outcome {
            return Err(BindFailure::Field(e));
        }
        if let Some(multi) = MultiError::from_vec(st.errors) {
            return Err(BindFailure::Many(multi));
        }
        record.validate().map_err(BindFailure::Invalid)
    }
}

/// Split CSV con trim por elemento; el string vacío es la lista vacía.
pub(super) fn split_csv(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}
