//! `KeyedSource`: Value Source en memoria sobre un multimapa ordenado.
//!
//! Cubre todos los orígenes planos: query, path, form, header, cookie y
//! multipart (texto + archivos). Las claves de header se normalizan a
//! minúsculas en la inserción, que es la convención del origen.

use indexmap::IndexMap;

use bind_core::source::{SourceKind, ValueSource};
use bind_core::value::FileRef;

#[derive(Debug, Clone)]
pub struct KeyedSource {
    kind: SourceKind,
    values: IndexMap<String, Vec<String>>,
    files: IndexMap<String, FileRef>,
}

impl KeyedSource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            values: IndexMap::new(),
            files: IndexMap::new(),
        }
    }

    pub fn query() -> Self {
        Self::new(SourceKind::Query)
    }

    pub fn path() -> Self {
        Self::new(SourceKind::Path)
    }

    pub fn form() -> Self {
        Self::new(SourceKind::Form)
    }

    pub fn header() -> Self {
        Self::new(SourceKind::Header)
    }

    pub fn cookie() -> Self {
        Self::new(SourceKind::Cookie)
    }

    pub fn multipart() -> Self {
        Self::new(SourceKind::Multipart)
    }

    /// Construcción directa desde pares clave/valor (claves repetidas
    /// acumulan).
    pub fn with_pairs(kind: SourceKind, pairs: &[(&str, &str)]) -> Self {
        let mut src = Self::new(kind);
        for (k, v) in pairs {
            src.append(k, v);
        }
        src
    }

    /// Agrega un valor para la clave, preservando los anteriores.
    pub fn append(&mut self, key: &str, value: &str) -> &mut Self {
        self.values
            .entry(self.store_key(key))
            .or_default()
            .push(value.to_string());
        self
    }

    /// Fija la clave a un único valor, pisando repetidos previos.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.values
            .insert(self.store_key(key), vec![value.to_string()]);
        self
    }

    /// Adjunta una referencia de archivo (sources multipart).
    pub fn attach_file(&mut self, key: &str, file: FileRef) -> &mut Self {
        self.files.insert(self.store_key(key), file);
        self
    }

    fn store_key(&self, key: &str) -> String {
        if self.kind == SourceKind::Header {
            key.to_ascii_lowercase()
        } else {
            key.to_string()
        }
    }
}

impl ValueSource for KeyedSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(|v| v.first().cloned())
    }

    fn get_all(&self, key: &str) -> Vec<String> {
        self.values.get(key).cloned().unwrap_or_default()
    }

    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key) || self.files.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        let mut out: Vec<String> = self.values.keys().cloned().collect();
        for k in self.files.keys() {
            if !out.contains(k) {
                out.push(k.clone());
            }
        }
        out
    }

    fn file(&self, key: &str) -> Option<FileRef> {
        self.files.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_accumulate_in_order() {
        let mut src = KeyedSource::query();
        src.append("tag", "a").append("tag", "b");
        assert_eq!(src.get("tag").as_deref(), Some("a"));
        assert_eq!(src.get_all("tag"), vec!["a", "b"]);
    }

    #[test]
    fn header_keys_are_lowercased() {
        let mut src = KeyedSource::header();
        src.set("X-Request-Id", "abc");
        assert!(src.has("x-request-id"));
        assert_eq!(src.get("x-request-id").as_deref(), Some("abc"));
    }

    #[test]
    fn files_count_as_present() {
        let mut src = KeyedSource::multipart();
        src.attach_file(
            "avatar",
            FileRef {
                filename: "a.png".to_string(),
                content_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            },
        );
        assert!(src.has("avatar"));
        assert_eq!(src.file("avatar").unwrap().filename, "a.png");
        assert_eq!(src.keys(), vec!["avatar"]);
    }
}
