//! Puente hacia decoders de cuerpos estructurados (JSON/YAML/...).
//!
//! El motor trata al decoder como opaco: recibe bytes y devuelve un árbol de
//! valores; todo el formato de wire es problema del adapter que lo provee.

use serde_json::Value;

/// Decoder de un formato de body. Implementaciones concretas viven fuera del
/// core (ver el crate de adapters).
pub trait BodyDecoder: Send + Sync {
    /// Nombre corto del formato ("json", "yaml"); identifica al source en
    /// los errores de decode.
    fn format(&self) -> &'static str;

    /// Decodifica el payload completo en una sola llamada. El detalle del
    /// error se reporta como texto; el binder lo envuelve en `BindError`.
    fn decode(&self, bytes: &[u8]) -> Result<Value, String>;
}
