//! Decoders de body para el puente `BodyDecoder` del core.
//!
//! Ambos decodifican al árbol `serde_json::Value` que el binder reconcilia
//! contra el plan; el formato de wire queda encapsulado acá.

use serde_json::Value;

use bind_core::decoder::BodyDecoder;

/// Decoder JSON (serde_json).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl BodyDecoder for JsonDecoder {
    fn format(&self) -> &'static str {
        "json"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}

/// Decoder YAML (serde_yaml); los mappings YAML llegan como objetos JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl BodyDecoder for YamlDecoder {
    fn format(&self) -> &'static str {
        "yaml"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, String> {
        serde_yaml::from_slice(bytes).map_err(|e| e.to_string())
    }
}
