//! Factories de converters: producen `ConvertFn` listos para registrar.

use std::sync::Arc;
use std::time::Duration;

use super::builtin;
use super::registry::ConvertFn;
use crate::errors::ConvertError;
use crate::value::FieldValue;

/// Converter de enum case-insensitive contra un conjunto fijo. Canonicaliza
/// al deletreo del conjunto; en mismatch el error lista los permitidos.
pub fn enum_converter(allowed: &[&str]) -> ConvertFn {
    let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
    Arc::new(move |raw| {
        match allowed.iter().find(|a| a.eq_ignore_ascii_case(raw)) {
            Some(canon) => Ok(FieldValue::Str(canon.clone())),
            None => Err(ConvertError::Enum {
                got: raw.to_string(),
                allowed: allowed.clone(),
            }),
        }
    })
}

/// Converter booleano con tokens propios; cae a las formas estándar.
pub fn bool_converter(truthy: &[&str], falsy: &[&str]) -> ConvertFn {
    let truthy: Vec<String> = truthy.iter().map(|s| s.to_string()).collect();
    let falsy: Vec<String> = falsy.iter().map(|s| s.to_string()).collect();
    Arc::new(move |raw| {
        if truthy.iter().any(|t| t == raw) {
            return Ok(FieldValue::Bool(true));
        }
        if falsy.iter().any(|t| t == raw) {
            return Ok(FieldValue::Bool(false));
        }
        builtin::parse_bool(raw).map(FieldValue::Bool)
    })
}

/// Converter de tiempo con un set propio de layouts, probados en orden.
pub fn time_converter(layouts: &[&str]) -> ConvertFn {
    let layouts: Vec<String> = layouts.iter().map(|s| s.to_string()).collect();
    Arc::new(move |raw| builtin::parse_time(raw, &layouts).map(FieldValue::Time))
}

/// Converter de duración con mapa de aliases (match exacto primero).
pub fn duration_converter(aliases: &[(&str, Duration)]) -> ConvertFn {
    let aliases: Vec<(String, Duration)> =
        aliases.iter().map(|(a, d)| (a.to_string(), *d)).collect();
    Arc::new(move |raw| {
        if let Some((_, d)) = aliases.iter().find(|(a, _)| a == raw) {
            return Ok(FieldValue::Duration(*d));
        }
        builtin::parse_duration(raw).map(FieldValue::Duration)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_is_case_insensitive_and_canonicalizes() {
        let conv = enum_converter(&["active", "pending"]);
        assert_eq!(conv("ACTIVE"), Ok(FieldValue::Str("active".to_string())));
        let err = conv("unknown").unwrap_err();
        match err {
            ConvertError::Enum { got, allowed } => {
                assert_eq!(got, "unknown");
                assert_eq!(allowed, vec!["active", "pending"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn custom_bool_tokens() {
        let conv = bool_converter(&["sí"], &["no"]);
        assert_eq!(conv("sí"), Ok(FieldValue::Bool(true)));
        assert_eq!(conv("no"), Ok(FieldValue::Bool(false)));
        assert_eq!(conv("1"), Ok(FieldValue::Bool(true)));
    }

    #[test]
    fn duration_aliases_first() {
        let conv = duration_converter(&[("eternidad", Duration::from_secs(3600))]);
        assert_eq!(
            conv("eternidad"),
            Ok(FieldValue::Duration(Duration::from_secs(3600)))
        );
        assert_eq!(conv("10ms"), Ok(FieldValue::Duration(Duration::from_millis(10))));
    }
}
