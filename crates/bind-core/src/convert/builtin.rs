//! Conversiones built-in: primitivas, tiempo, duraciones.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::time::Duration;

use crate::errors::ConvertError;

fn parse_err(target: &str, raw: &str) -> ConvertError {
    ConvertError::Parse {
        target: target.to_string(),
        raw: raw.to_string(),
    }
}

/// Booleanos en sus formas textuales estándar.
pub fn parse_bool(raw: &str) -> Result<bool, ConvertError> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(parse_err("bool", raw)),
    }
}

/// Prueba cada layout configurado en orden; gana el primero que parsea.
///
/// Cada layout se intenta primero con zona horaria, después como fecha-hora
/// naive (asumida UTC) y por último como fecha sola (medianoche UTC).
pub fn parse_time(raw: &str, layouts: &[String]) -> Result<DateTime<Utc>, ConvertError> {
    for layout in layouts {
        if let Ok(dt) = DateTime::parse_from_str(raw, layout) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, layout) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }
    Err(parse_err("time", raw))
}

const UNITS: &[(&str, f64)] = &[
    ("ns", 1e-9),
    ("us", 1e-6),
    ("µs", 1e-6),
    ("ms", 1e-3),
    ("s", 1.0),
    ("m", 60.0),
    ("h", 3600.0),
];

/// Sintaxis compuesta de duración: secuencia de `<decimal><unidad>` con
/// unidades ns/us/µs/ms/s/m/h, p.ej. `"1h30m"`, `"500ms"`, `"1.5s"`.
/// `"0"` a secas es válido. Las duraciones negativas se rechazan.
pub fn parse_duration(raw: &str) -> Result<Duration, ConvertError> {
    let s = raw.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() || s.starts_with('-') {
        return Err(parse_err("duration", raw));
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| parse_err("duration", raw))?;
        if num_end == 0 {
            return Err(parse_err("duration", raw));
        }
        let (num, tail) = rest.split_at(num_end);
        let value: f64 = num.parse().map_err(|_| parse_err("duration", raw))?;

        // unidades de dos caracteres antes que las de uno ("ms" vs "m")
        let (factor, unit_len) = UNITS
            .iter()
            .filter(|(u, _)| tail.starts_with(u))
            .max_by_key(|(u, _)| u.len())
            .map(|(u, f)| (*f, u.len()))
            .ok_or_else(|| parse_err("duration", raw))?;

        total += value * factor;
        rest = &tail[unit_len..];
    }

    // rechaza también NaN/inf y totales que desbordan Duration
    Duration::try_from_secs_f64(total).map_err(|_| parse_err("duration", raw))
}
