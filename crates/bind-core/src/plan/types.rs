//! Tipos del plan de binding.

use crate::shape::FieldShape;
use crate::source::SourceKind;

/// Metadata de binding de un campo, ya resuelta para un source kind.
///
/// Invariante: `keys` no está vacío (la primaria va primero) y, para kinds
/// planos, ya viene con el prefijo punteado de sus ancestros.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Clave primaria + aliases, en orden de consulta.
    pub keys: Vec<String>,
    pub default_raw: Option<String>,
    pub required: bool,
    /// Conjunto enum permitido; el match es case-insensitive contra la forma
    /// canónica del valor convertido.
    pub enum_allow: Option<Vec<String>>,
    pub shape: FieldShape,
    /// Plan del registro anidado, si el shape contiene uno.
    pub nested: Option<Box<BindingPlan>>,
}

impl FieldDescriptor {
    pub fn primary_key(&self) -> &str {
        &self.keys[0]
    }

    pub fn is_list(&self) -> bool {
        matches!(self.shape.strip_optional(), FieldShape::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.shape.strip_optional(), FieldShape::Map(_))
    }
}

/// Claves que el plan reclama como propias, para la política de campos
/// desconocidos. `prefixes` cubre las entradas de campos map (`attrs.*`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyClaims {
    pub exact: Vec<String>,
    pub prefixes: Vec<String>,
}

impl KeyClaims {
    pub fn covers(&self, key: &str) -> bool {
        self.exact.iter().any(|k| k == key)
            || self.prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

/// Secuencia ordenada de descriptores para un (record shape, source kind),
/// más la profundidad total de anidamiento, verificada una única vez al
/// construir (nunca por bind).
#[derive(Debug, Clone, PartialEq)]
pub struct BindingPlan {
    pub record: &'static str,
    pub kind: SourceKind,
    pub fields: Vec<FieldDescriptor>,
    pub depth: usize,
    pub claims: KeyClaims,
}
