//! Errores del motor de binding.
//!
//! Taxonomía en dos niveles:
//! - `ShapeError`: el plan no puede construirse (error fatal, en tiempo de
//!   introspección, nunca en tiempo de bind).
//! - `BindError`: un campo concreto falló durante el bind; lleva el campo,
//!   el source kind, el valor crudo y la causa. Bajo política CollectAll se
//!   agregan en `MultiError` (no-vacío por construcción).

use serde::Serialize;
use thiserror::Error;

use crate::source::SourceKind;

/// Error de conversión de un valor crudo a un valor tipado.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum ConvertError {
    /// El texto no pudo parsearse como el tipo destino.
    #[error("cannot parse {raw:?} as {target}")]
    Parse { target: String, raw: String },
    /// No hay converter registrado para el shape destino.
    #[error("no converter for shape {0}")]
    UnsupportedType(String),
    /// El valor no pertenece al conjunto enum permitido.
    #[error("value {got:?} not in enum set [{}]", .allowed.join(", "))]
    Enum { got: String, allowed: Vec<String> },
    /// El `FieldValue` entregado no es compatible con el campo destino.
    #[error("unexpected value kind for {target}")]
    Mismatch { target: String },
}

/// Error de shape: el registro anotado no puede producir un plan válido.
///
/// Siempre aborta el bind sin importar la política de errores.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum ShapeError {
    #[error("duplicate binding key {key:?} in record {record}")]
    DuplicateKey { record: &'static str, key: String },
    #[error("record {record} needs nesting depth {depth}, max is {max}")]
    DepthExceeded {
        record: &'static str,
        depth: usize,
        max: usize,
    },
    #[error("field {record}.{field}: shape {shape} is not bindable from this source kind")]
    UnsupportedShape {
        record: &'static str,
        field: &'static str,
        shape: String,
    },
    #[error("field {record}.{field}: bad annotation: {detail}")]
    BadAnnotation {
        record: &'static str,
        field: &'static str,
        detail: String,
    },
}

/// Causa subyacente de un `BindError`.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum BindCause {
    #[error("required field missing")]
    Required,
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("{kind} length {got} exceeds limit {limit}")]
    LimitExceeded {
        kind: &'static str,
        got: usize,
        limit: usize,
    },
    #[error("unknown field")]
    UnknownField,
    #[error("body decode failed ({format}): {detail}")]
    Decode { format: String, detail: String },
}

/// Error de un campo individual, con contexto completo para matching
/// estructural por parte del caller.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[error("{origin}/{field}: {cause}")]
pub struct BindError {
    /// Clave primaria (con prefijo punteado si el campo está anidado).
    pub field: String,
    /// Source kind que aportó (o debía aportar) el valor.
    pub origin: SourceKind,
    /// Valor crudo tal como lo entregó el source, si hubo uno.
    pub raw: Option<String>,
    pub cause: BindCause,
}

/// Agregado ordenado de `BindError`; no-vacío por construcción.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiError(Vec<BindError>);

impl MultiError {
    /// Construye desde un acumulador; `None` si no hubo errores.
    pub fn from_vec(errors: Vec<BindError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn errors(&self) -> &[BindError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Siempre `false`: el constructor rechaza vectores vacíos.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for MultiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} binding error(s)", self.0.len())?;
        for e in &self.0 {
            write!(f, "; {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiError {}

impl IntoIterator for MultiError {
    type Item = BindError;
    type IntoIter = std::vec::IntoIter<BindError>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Resultado de error de un bind completo.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BindFailure {
    /// El plan mismo es inválido (ver `ShapeError`).
    #[error(transparent)]
    Shape(#[from] ShapeError),
    /// Primer error bajo política FailFast, o fallo único (p.ej. decode).
    #[error(transparent)]
    Field(#[from] BindError),
    /// Todos los errores acumulados bajo política CollectAll.
    #[error(transparent)]
    Many(#[from] MultiError),
    /// El hook de validación post-bind rechazó el registro.
    #[error("validation failed: {0}")]
    Invalid(String),
}
