//! Tipos del modelo de shapes.

use std::fmt;

/// Puntero a la función `shape()` de un registro anidado. Usar un fn pointer
/// evita ciclos de inicialización entre estáticos.
pub type ShapeRef = fn() -> &'static RecordShape;

/// Shape declarado de un campo.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    Str,
    Int,
    Uint,
    Float,
    Bool,
    Time,
    Duration,
    Uuid,
    File,
    /// Tipo escalar del caller con capacidad de decodificación textual
    /// (`FromStr`); el nombre indexa converters registrados.
    Custom(&'static str),
    List(Box<FieldShape>),
    Map(Box<FieldShape>),
    Optional(Box<FieldShape>),
    Record(ShapeRef),
}

impl FieldShape {
    /// Quita el envoltorio `Optional`, si lo hay.
    pub fn strip_optional(&self) -> &FieldShape {
        match self {
            FieldShape::Optional(inner) => inner.strip_optional(),
            other => other,
        }
    }

    /// Shape del registro anidado, atravesando Optional/List/Map.
    pub fn record_ref(&self) -> Option<ShapeRef> {
        match self {
            FieldShape::Record(r) => Some(*r),
            FieldShape::Optional(inner) | FieldShape::List(inner) | FieldShape::Map(inner) => {
                inner.record_ref()
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldShape::Str => write!(f, "string"),
            FieldShape::Int => write!(f, "int"),
            FieldShape::Uint => write!(f, "uint"),
            FieldShape::Float => write!(f, "float"),
            FieldShape::Bool => write!(f, "bool"),
            FieldShape::Time => write!(f, "time"),
            FieldShape::Duration => write!(f, "duration"),
            FieldShape::Uuid => write!(f, "uuid"),
            FieldShape::File => write!(f, "file"),
            FieldShape::Custom(name) => write!(f, "{name}"),
            FieldShape::List(inner) => write!(f, "[]{inner}"),
            FieldShape::Map(inner) => write!(f, "map[string]{inner}"),
            FieldShape::Optional(inner) => write!(f, "?{inner}"),
            FieldShape::Record(r) => write!(f, "record {}", r().name),
        }
    }
}

/// Un campo tal como lo declaró el macro: nombre, shape y tag crudo.
/// El tag se parsea en tiempo de construcción de plan, nunca en bind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: FieldShape,
    pub tag: &'static str,
}

/// Shape completo de un registro. Inmutable una vez derivado.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}
