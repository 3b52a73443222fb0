//! Parser de la sintaxis de anotaciones por campo.
//!
//! Gramática (entradas separadas por espacios):
//!   `kind:"key[,alias...]"  default:"literal"  enum:"v1,v2"  required:"true"`
//!
//! Una entrada cuyo nombre no coincide con `default`/`enum`/`required` ni con
//! el source kind pedido se ignora: pertenece a la vista de otro kind.
//! La clave `-` excluye el campo de esa vista.

use crate::source::SourceKind;

/// Resultado de parsear el tag de un campo para un source kind concreto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAnnotation {
    /// Clave primaria + aliases en orden declarado. Vacío si el tag no trae
    /// entrada para el kind pedido.
    pub keys: Vec<String>,
    /// Hubo entrada explícita para el kind pedido.
    pub explicit: bool,
    /// El tag trae entradas para otros kinds. Un campo ruteado a otras
    /// vistas no cae al nombre del campo en ésta: queda fuera del plan.
    pub foreign: bool,
    pub default_raw: Option<String>,
    pub required: bool,
    pub enum_allow: Option<Vec<String>>,
}

impl FieldAnnotation {
    /// El campo fue excluido explícitamente de esta vista (`kind:"-"`).
    pub fn skipped(&self) -> bool {
        self.explicit && self.keys.len() == 1 && self.keys[0] == "-"
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Parsea un tag crudo para la vista de `kind`. Devuelve el detalle del
/// problema como `String`; el plan builder lo envuelve en `ShapeError` con
/// el contexto de record/campo.
pub(crate) fn parse_tag(tag: &str, kind: SourceKind) -> Result<FieldAnnotation, String> {
    let mut ann = FieldAnnotation::default();
    let mut rest = tag.trim();

    while !rest.is_empty() {
        let colon = rest
            .find(':')
            .ok_or_else(|| format!("expected `name:\"value\"` near {rest:?}"))?;
        let name = rest[..colon].trim();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(format!("invalid annotation name {name:?}"));
        }
        let after = rest[colon + 1..]
            .strip_prefix('"')
            .ok_or_else(|| format!("missing opening quote after `{name}:`"))?;
        let end = after
            .find('"')
            .ok_or_else(|| format!("unterminated value for `{name}`"))?;
        let value = &after[..end];
        rest = after[end + 1..].trim_start();

        match name {
            "default" => ann.default_raw = Some(value.to_string()),
            "required" => ann.required = matches!(value, "true" | "1"),
            "enum" => {
                let allow = split_list(value);
                if allow.is_empty() {
                    return Err("empty enum set".to_string());
                }
                ann.enum_allow = Some(allow);
            }
            other if other == kind.tag() => {
                if value == "-" {
                    ann.keys = vec!["-".to_string()];
                } else {
                    ann.keys = split_list(value);
                    if ann.keys.is_empty() {
                        return Err(format!("empty key list for `{other}`"));
                    }
                }
                ann.explicit = true;
            }
            _ => ann.foreign = true, // entrada de otro source kind
        }
    }

    Ok(ann)
}
