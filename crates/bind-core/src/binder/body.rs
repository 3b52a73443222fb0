//! Camino de bind para sources con forma de body (JSON/YAML/...).
//!
//! A diferencia de los sources planos, el payload completo se decodifica en
//! una sola llamada al `BodyDecoder` inyectado; después se reconcilia el
//! árbol contra el plan: defaults, required, enum, límites y la política de
//! campos desconocidos se aplican como post-pass.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::HashSet;

use super::core::{split_csv, Binder, FieldOutcome, WalkState};
use crate::decoder::BodyDecoder;
use crate::errors::{BindCause, BindError, BindFailure, ConvertError};
use crate::event::BindEventKind;
use crate::plan::{BindingPlan, FieldDescriptor};
use crate::shape::{Bindable, FieldShape};
use crate::source::SourceKind;
use crate::value::FieldValue;

type JsonObject = serde_json::Map<String, JsonValue>;

impl Binder {
    /// Decodifica `bytes` con el decoder inyectado y reconcilia contra el
    /// plan del kind Body.
    pub fn bind_body<T: Bindable>(
        &self,
        decoder: &dyn BodyDecoder,
        bytes: &[u8],
    ) -> Result<T, BindFailure> {
        let mut record = T::default();
        self.bind_body_into(&mut record, decoder, bytes)?;
        Ok(record)
    }

    pub fn bind_body_into<T: Bindable>(
        &self,
        record: &mut T,
        decoder: &dyn BodyDecoder,
        bytes: &[u8],
    ) -> Result<(), BindFailure> {
        let plan = self
            .cache
            .plan_for::<T>(SourceKind::Body, self.config().max_depth)?;
        let mut st = WalkState::default();

        let decoded = match decoder.decode(bytes) {
            Ok(v) => v,
            Err(detail) => {
                // el fallo del decoder es un único BindError con el formato
                // como identidad del source
                let e = decode_error(decoder.format(), detail);
                return self.finish(record, st, Err(e));
            }
        };
        let Some(object) = decoded.as_object() else {
            let e = decode_error(decoder.format(), "payload is not an object".to_string());
            return self.finish(record, st, Err(e));
        };

        let mut outcome = Ok(());
        for desc in &plan.fields {
            let res = self.bind_body_field(desc, object, &mut st);
            if let Err(e) = self.apply_outcome(record, desc, &mut st, res) {
                outcome = Err(e);
                break;
            }
        }
        if outcome.is_ok() {
            if let Err(e) = self.scan_unknown_object(&plan, object, &mut st) {
                outcome = Err(e);
            }
        }
        self.finish(record, st, outcome)
    }

    /// Un campo contra un objeto decodificado: primera clave presente y no
    /// nula, después default/required como en el camino plano.
    fn bind_body_field(
        &self,
        desc: &FieldDescriptor,
        object: &JsonObject,
        st: &mut WalkState,
    ) -> Result<FieldOutcome, BindError> {
        for key in &desc.keys {
            let k = self.normalize(key);
            if let Some(v) = object.get(&k) {
                if !v.is_null() {
                    let value = self.json_to_field(desc, &desc.shape, v, st)?;
                    return Ok(Some((value, k, SourceKind::Body)));
                }
            }
        }
        if let Some(default_raw) = &desc.default_raw {
            let value = match desc.shape.strip_optional() {
                FieldShape::List(inner) => {
                    let raws = split_csv(default_raw);
                    let mut items = Vec::with_capacity(raws.len());
                    for raw in &raws {
                        items.push(self.convert_checked(desc, inner, raw, SourceKind::Body)?);
                    }
                    FieldValue::List(items)
                }
                FieldShape::Record(_) | FieldShape::Map(_) | FieldShape::File => {
                    return Ok(None); // sin default textual razonable
                }
                leaf => self.convert_checked(desc, leaf, default_raw, SourceKind::Body)?,
            };
            return Ok(Some((value, desc.primary_key().to_string(), SourceKind::Body)));
        }
        if desc.required {
            return Err(self.required_err(desc, SourceKind::Body));
        }
        Ok(None)
    }

    /// Traduce un nodo del árbol decodificado al shape pedido.
    fn json_to_field(
        &self,
        desc: &FieldDescriptor,
        shape: &FieldShape,
        v: &JsonValue,
        st: &mut WalkState,
    ) -> Result<FieldValue, BindError> {
        let cfg = self.config();
        match shape.strip_optional() {
            FieldShape::Record(_) => {
                let Some(plan) = desc.nested.as_deref() else {
                    return Err(self.body_mismatch(desc, "record"));
                };
                let Some(sub) = v.as_object() else {
                    return Err(self.body_mismatch(desc, "object"));
                };
                self.bind_body_record(plan, sub, st)
            }
            FieldShape::List(inner) => {
                let Some(items) = v.as_array() else {
                    return Err(self.body_mismatch(desc, "array"));
                };
                if items.len() > cfg.max_slice_len {
                    return Err(BindError {
                        field: desc.primary_key().to_string(),
                        origin: SourceKind::Body,
                        raw: None,
                        cause: BindCause::LimitExceeded {
                            kind: "slice",
                            got: items.len(),
                            limit: cfg.max_slice_len,
                        },
                    });
                }
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.json_to_field(desc, inner, item, st)?);
                }
                Ok(FieldValue::List(out))
            }
            FieldShape::Map(inner) => {
                let Some(entries) = v.as_object() else {
                    return Err(self.body_mismatch(desc, "object"));
                };
                if entries.len() > cfg.max_map_size {
                    return Err(BindError {
                        field: desc.primary_key().to_string(),
                        origin: SourceKind::Body,
                        raw: None,
                        cause: BindCause::LimitExceeded {
                            kind: "map",
                            got: entries.len(),
                            limit: cfg.max_map_size,
                        },
                    });
                }
                let mut map = IndexMap::new();
                for (k, item) in entries {
                    map.insert(k.clone(), self.json_to_field(desc, inner, item, st)?);
                }
                Ok(FieldValue::Map(map))
            }
            FieldShape::File => Err(self.body_mismatch(desc, "file")),
            leaf => self.json_leaf(desc, leaf, v),
        }
    }

    /// Hoja: los strings pasan por el registry (layouts, aliases, custom);
    /// números y booleanos nativos se aceptan directo. El check enum aplica
    /// en ambos casos, post-conversión.
    fn json_leaf(
        &self,
        desc: &FieldDescriptor,
        shape: &FieldShape,
        v: &JsonValue,
    ) -> Result<FieldValue, BindError> {
        match v {
            JsonValue::String(s) => self.convert_checked(desc, shape, s, SourceKind::Body),
            JsonValue::Bool(b) if matches!(shape, FieldShape::Bool) => {
                self.enum_check(desc, FieldValue::Bool(*b), SourceKind::Body, None)
            }
            JsonValue::Number(n) => {
                let direct = match shape {
                    FieldShape::Int => n.as_i64().map(FieldValue::Int),
                    FieldShape::Uint => n.as_u64().map(FieldValue::Uint),
                    FieldShape::Float => n.as_f64().map(FieldValue::Float),
                    FieldShape::Str => Some(FieldValue::Str(n.to_string())),
                    _ => None,
                };
                match direct {
                    Some(value) => self.enum_check(desc, value, SourceKind::Body, None),
                    None => self.convert_checked(desc, shape, &n.to_string(), SourceKind::Body),
                }
            }
            other => self.convert_checked(
                desc,
                shape,
                &json_as_text(other),
                SourceKind::Body,
            ),
        }
    }

    fn bind_body_record(
        &self,
        plan: &BindingPlan,
        object: &JsonObject,
        st: &mut WalkState,
    ) -> Result<FieldValue, BindError> {
        let mut map = IndexMap::new();
        for sub in &plan.fields {
            match self.bind_body_field(sub, object, st) {
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
        self.scan_unknown_object(plan, object, st)?;
        Ok(FieldValue::Map(map))
    }

    /// Política de campos desconocidos sobre un nivel del objeto decodificado.
    /// A diferencia del camino plano, el scan es local a cada nivel.
    fn scan_unknown_object(
        &self,
        plan: &BindingPlan,
        object: &JsonObject,
        st: &mut WalkState,
    ) -> Result<(), BindError> {
        use super::config::UnknownFieldPolicy;
        if self.config().unknown_fields == UnknownFieldPolicy::Ignore {
            return Ok(());
        }
        let known: HashSet<String> = plan
            .fields
            .iter()
            .flat_map(|d| d.keys.iter())
            .map(|k| self.normalize(k))
            .collect();
        for key in object.keys() {
            let k = self.normalize(key);
            if known.contains(&k) {
                continue;
            }
            self.emit(BindEventKind::UnknownField {
                key: k.clone(),
                source: SourceKind::Body,
            });
            if self.config().unknown_fields == UnknownFieldPolicy::Error {
                let e = BindError {
                    field: k,
                    origin: SourceKind::Body,
                    raw: None,
                    cause: BindCause::UnknownField,
                };
                self.fail(st, e)?;
            }
        }
        Ok(())
    }

    fn body_mismatch(&self, desc: &FieldDescriptor, expected: &str) -> BindError {
        BindError {
            field: desc.primary_key().to_string(),
            origin: SourceKind::Body,
            raw: None,
            cause: BindCause::Convert(ConvertError::Mismatch {
                target: expected.to_string(),
            }),
        }
    }
}

fn decode_error(format: &str, detail: String) -> BindError {
    BindError {
        field: "<body>".to_string(),
        origin: SourceKind::Body,
        raw: None,
        cause: BindCause::Decode {
            format: format.to_string(),
            detail,
        },
    }
}

fn json_as_text(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
