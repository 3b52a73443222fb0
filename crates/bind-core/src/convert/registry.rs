//! Registry de converters: shape destino → función de conversión.
//!
//! Orden de resolución para un shape escalar:
//! 1. converter custom registrado por nombre (shapes `Custom`),
//! 2. capacidad de decodificación textual del propio tipo (`FromStr`, vía
//!    `bindable_scalar!`): el registry entrega el texto tal cual,
//! 3. built-ins de primitivas/tiempo/duración/uuid.
//!
//! El registry se construye al crear el binder y es inmutable después;
//! los converters son funciones puras del texto y no retienen el input.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::builtin;
use crate::errors::ConvertError;
use crate::shape::FieldShape;
use crate::value::FieldValue;

/// Función de conversión registrable.
pub type ConvertFn = Arc<dyn Fn(&str) -> Result<FieldValue, ConvertError> + Send + Sync>;

#[derive(Clone)]
pub struct ConvertRegistry {
    custom: HashMap<String, ConvertFn>,
    time_layouts: Vec<String>,
    duration_aliases: HashMap<String, Duration>,
    true_tokens: Vec<String>,
    false_tokens: Vec<String>,
}

impl std::fmt::Debug for ConvertRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvertRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .field("time_layouts", &self.time_layouts)
            .field("duration_aliases", &self.duration_aliases.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ConvertRegistry {
    fn default() -> Self {
        Self {
            custom: HashMap::new(),
            // RFC3339 primero; los layouts adicionales se anteponen vía config
            time_layouts: vec![
                "%+".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d".to_string(),
            ],
            duration_aliases: HashMap::new(),
            true_tokens: Vec::new(),
            false_tokens: Vec::new(),
        }
    }
}

impl ConvertRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un converter para un shape `Custom(name)`. Pisa al anterior.
    pub fn register(&mut self, name: impl Into<String>, f: ConvertFn) {
        self.custom.insert(name.into(), f);
    }

    pub fn set_time_layouts(&mut self, layouts: Vec<String>) {
        self.time_layouts = layouts;
    }

    pub fn add_duration_alias(&mut self, alias: impl Into<String>, d: Duration) {
        self.duration_aliases.insert(alias.into(), d);
    }

    /// Tokens truthy/falsy adicionales, comprobados antes que las formas
    /// estándar.
    pub fn set_bool_tokens(&mut self, truthy: Vec<String>, falsy: Vec<String>) {
        self.true_tokens = truthy;
        self.false_tokens = falsy;
    }

    pub fn time_layouts(&self) -> &[String] {
        &self.time_layouts
    }

    /// Convierte `raw` al shape escalar pedido. Los shapes compuestos
    /// (List/Map/Record/File) los arma el binder, no el registry.
    pub fn convert(&self, shape: &FieldShape, raw: &str) -> Result<FieldValue, ConvertError> {
        match shape.strip_optional() {
            FieldShape::Str => Ok(FieldValue::Str(raw.to_string())),
            FieldShape::Int => raw
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| self.parse_err("int", raw)),
            FieldShape::Uint => raw
                .parse::<u64>()
                .map(FieldValue::Uint)
                .map_err(|_| self.parse_err("uint", raw)),
            FieldShape::Float => raw
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| self.parse_err("float", raw)),
            FieldShape::Bool => self.convert_bool(raw),
            FieldShape::Time => builtin::parse_time(raw, &self.time_layouts).map(FieldValue::Time),
            FieldShape::Duration => self.convert_duration(raw),
            FieldShape::Uuid => uuid::Uuid::parse_str(raw)
                .map(FieldValue::Uuid)
                .map_err(|_| self.parse_err("uuid", raw)),
            FieldShape::Custom(name) => match self.custom.get(*name) {
                Some(f) => f(raw),
                // sin converter registrado, el texto viaja tal cual y el
                // `FromStr` del tipo destino hace el trabajo en set_field
                None => Ok(FieldValue::Str(raw.to_string())),
            },
            other => Err(ConvertError::UnsupportedType(other.to_string())),
        }
    }

    fn convert_bool(&self, raw: &str) -> Result<FieldValue, ConvertError> {
        if self.true_tokens.iter().any(|t| t == raw) {
            return Ok(FieldValue::Bool(true));
        }
        if self.false_tokens.iter().any(|t| t == raw) {
            return Ok(FieldValue::Bool(false));
        }
        builtin::parse_bool(raw).map(FieldValue::Bool)
    }

    /// Alias map primero (match exacto, case-sensitive), después la sintaxis
    /// compuesta estándar.
    fn convert_duration(&self, raw: &str) -> Result<FieldValue, ConvertError> {
        if let Some(d) = self.duration_aliases.get(raw) {
            return Ok(FieldValue::Duration(*d));
        }
        builtin::parse_duration(raw).map(FieldValue::Duration)
    }

    fn parse_err(&self, target: &str, raw: &str) -> ConvertError {
        ConvertError::Parse {
            target: target.to_string(),
            raw: raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_round_trips() {
        let reg = ConvertRegistry::default();
        assert_eq!(reg.convert(&FieldShape::Int, "-42"), Ok(FieldValue::Int(-42)));
        assert_eq!(reg.convert(&FieldShape::Uint, "42"), Ok(FieldValue::Uint(42)));
        assert_eq!(reg.convert(&FieldShape::Float, "2.5"), Ok(FieldValue::Float(2.5)));
        assert_eq!(reg.convert(&FieldShape::Bool, "true"), Ok(FieldValue::Bool(true)));
        assert!(reg.convert(&FieldShape::Int, "x").is_err());
    }

    #[test]
    fn duration_alias_checked_before_standard_parse() {
        let mut reg = ConvertRegistry::default();
        reg.add_duration_alias("1d", Duration::from_secs(86_400));
        assert_eq!(
            reg.convert(&FieldShape::Duration, "1d"),
            Ok(FieldValue::Duration(Duration::from_secs(86_400)))
        );
        // el alias es case-sensitive y exacto: "1D" cae al parser estándar
        assert!(reg.convert(&FieldShape::Duration, "1D").is_err());
        assert_eq!(
            reg.convert(&FieldShape::Duration, "2s"),
            Ok(FieldValue::Duration(Duration::from_secs(2)))
        );
    }

    #[test]
    fn custom_bool_tokens_win_over_standard() {
        let mut reg = ConvertRegistry::default();
        reg.set_bool_tokens(vec!["on".to_string()], vec!["off".to_string()]);
        assert_eq!(reg.convert(&FieldShape::Bool, "on"), Ok(FieldValue::Bool(true)));
        assert_eq!(reg.convert(&FieldShape::Bool, "off"), Ok(FieldValue::Bool(false)));
        assert_eq!(reg.convert(&FieldShape::Bool, "true"), Ok(FieldValue::Bool(true)));
    }

    #[test]
    fn custom_shape_without_converter_passes_text_through() {
        let reg = ConvertRegistry::default();
        assert_eq!(
            reg.convert(&FieldShape::Custom("Color"), "azul"),
            Ok(FieldValue::Str("azul".to_string()))
        );
    }

    #[test]
    fn registered_custom_converter_is_used() {
        let mut reg = ConvertRegistry::default();
        reg.register(
            "Color",
            Arc::new(|raw| Ok(FieldValue::Str(raw.to_uppercase()))),
        );
        assert_eq!(
            reg.convert(&FieldShape::Custom("Color"), "azul"),
            Ok(FieldValue::Str("AZUL".to_string()))
        );
    }

    #[test]
    fn composite_shapes_are_not_registry_business() {
        let reg = ConvertRegistry::default();
        let list = FieldShape::List(Box::new(FieldShape::Int));
        assert!(matches!(
            reg.convert(&list, "1"),
            Err(ConvertError::UnsupportedType(_))
        ));
    }
}
