//! Valor intermedio tipado entre el texto crudo y los campos del registro.
//!
//! Los converters del registry producen `FieldValue`; el macro `bindable!`
//! genera `set_field` que los traduce al tipo Rust concreto vía
//! `BindableField::from_field_value`.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::time::Duration;
use uuid::Uuid;

use crate::errors::ConvertError;
use crate::shape::FieldShape;

/// Referencia a un archivo subido (multipart). El almacenamiento y el
/// streaming son problema del caller; aquí sólo viaja la referencia.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRef {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Valor convertido, listo para escribirse en un campo.
///
/// `Map` cumple doble rol: mapping-of-string-to-T y carrier de registros
/// anidados (clave = nombre de campo).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    Duration(Duration),
    Uuid(Uuid),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
    File(FileRef),
}

impl FieldValue {
    /// Forma textual canónica del valor. Es la forma contra la que se
    /// comprueban los conjuntos enum (post-conversión).
    pub fn canonical(&self) -> String {
        match self {
            FieldValue::Str(s) => s.clone(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Uint(u) => u.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Time(t) => t.to_rfc3339(),
            FieldValue::Duration(d) => format!("{d:?}"),
            FieldValue::Uuid(u) => u.to_string(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::canonical)
                .collect::<Vec<_>>()
                .join(","),
            FieldValue::Map(m) => m
                .iter()
                .map(|(k, v)| format!("{k}={}", v.canonical()))
                .collect::<Vec<_>>()
                .join(","),
            FieldValue::File(f) => f.filename.clone(),
        }
    }
}

fn mismatch(target: &str) -> ConvertError {
    ConvertError::Mismatch {
        target: target.to_string(),
    }
}

/// Tipos que pueden ocupar un campo de un registro bindable.
///
/// Los registros declarados con `bindable!` lo implementan automáticamente;
/// los newtypes con `FromStr` lo obtienen vía `bindable_scalar!`.
pub trait BindableField: Sized {
    /// Shape declarado del campo, usado para construir el plan.
    fn field_shape() -> FieldShape;
    /// Traduce el valor convertido al tipo concreto.
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError>;
}

impl BindableField for String {
    fn field_shape() -> FieldShape {
        FieldShape::Str
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        Ok(value.canonical())
    }
}

macro_rules! int_field {
    ($ty:ty) => {
        impl BindableField for $ty {
            fn field_shape() -> FieldShape {
                FieldShape::Int
            }
            fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
                match value {
                    FieldValue::Int(i) => {
                        <$ty>::try_from(i).map_err(|_| mismatch(stringify!($ty)))
                    }
                    FieldValue::Uint(u) => {
                        <$ty>::try_from(u).map_err(|_| mismatch(stringify!($ty)))
                    }
                    _ => Err(mismatch(stringify!($ty))),
                }
            }
        }
    };
}

macro_rules! uint_field {
    ($ty:ty) => {
        impl BindableField for $ty {
            fn field_shape() -> FieldShape {
                FieldShape::Uint
            }
            fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
                match value {
                    FieldValue::Uint(u) => {
                        <$ty>::try_from(u).map_err(|_| mismatch(stringify!($ty)))
                    }
                    FieldValue::Int(i) => {
                        <$ty>::try_from(i).map_err(|_| mismatch(stringify!($ty)))
                    }
                    _ => Err(mismatch(stringify!($ty))),
                }
            }
        }
    };
}

int_field!(i16);
int_field!(i32);
int_field!(i64);
uint_field!(u16);
uint_field!(u32);
uint_field!(u64);

impl BindableField for f64 {
    fn field_shape() -> FieldShape {
        FieldShape::Float
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Float(f) => Ok(f),
            FieldValue::Int(i) => Ok(i as f64),
            FieldValue::Uint(u) => Ok(u as f64),
            _ => Err(mismatch("f64")),
        }
    }
}

impl BindableField for f32 {
    fn field_shape() -> FieldShape {
        FieldShape::Float
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        f64::from_field_value(value).map(|f| f as f32)
    }
}

impl BindableField for bool {
    fn field_shape() -> FieldShape {
        FieldShape::Bool
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            _ => Err(mismatch("bool")),
        }
    }
}

impl BindableField for DateTime<Utc> {
    fn field_shape() -> FieldShape {
        FieldShape::Time
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Time(t) => Ok(t),
            _ => Err(mismatch("DateTime<Utc>")),
        }
    }
}

impl BindableField for Duration {
    fn field_shape() -> FieldShape {
        FieldShape::Duration
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Duration(d) => Ok(d),
            _ => Err(mismatch("Duration")),
        }
    }
}

impl BindableField for Uuid {
    fn field_shape() -> FieldShape {
        FieldShape::Uuid
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Uuid(u) => Ok(u),
            FieldValue::Str(s) => Uuid::parse_str(&s).map_err(|_| ConvertError::Parse {
                target: "Uuid".to_string(),
                raw: s,
            }),
            _ => Err(mismatch("Uuid")),
        }
    }
}

impl BindableField for std::net::IpAddr {
    fn field_shape() -> FieldShape {
        FieldShape::Custom("IpAddr")
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        let raw = value.canonical();
        raw.parse().map_err(|_| ConvertError::Parse {
            target: "IpAddr".to_string(),
            raw,
        })
    }
}

impl BindableField for std::net::SocketAddr {
    fn field_shape() -> FieldShape {
        FieldShape::Custom("SocketAddr")
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        let raw = value.canonical();
        raw.parse().map_err(|_| ConvertError::Parse {
            target: "SocketAddr".to_string(),
            raw,
        })
    }
}

impl BindableField for FileRef {
    fn field_shape() -> FieldShape {
        FieldShape::File
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::File(f) => Ok(f),
            _ => Err(mismatch("FileRef")),
        }
    }
}

impl<T: BindableField> BindableField for Option<T> {
    fn field_shape() -> FieldShape {
        FieldShape::Optional(Box::new(T::field_shape()))
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        T::from_field_value(value).map(Some)
    }
}

impl<T: BindableField> BindableField for Vec<T> {
    fn field_shape() -> FieldShape {
        FieldShape::List(Box::new(T::field_shape()))
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::List(items) => items.into_iter().map(T::from_field_value).collect(),
            // Un único valor suelto se acepta como lista de uno.
            other => Ok(vec![T::from_field_value(other)?]),
        }
    }
}

impl<T: BindableField> BindableField for IndexMap<String, T> {
    fn field_shape() -> FieldShape {
        FieldShape::Map(Box::new(T::field_shape()))
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Map(m) => m
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_field_value(v)?)))
                .collect(),
            _ => Err(mismatch("map")),
        }
    }
}

impl<T: BindableField> BindableField for std::collections::HashMap<String, T> {
    fn field_shape() -> FieldShape {
        FieldShape::Map(Box::new(T::field_shape()))
    }
    fn from_field_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Map(m) => m
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_field_value(v)?)))
                .collect(),
            _ => Err(mismatch("map")),
        }
    }
}
