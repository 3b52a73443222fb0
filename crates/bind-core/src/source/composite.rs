//! `CompositeSource`: fusión de varios sources por precedencia.
//!
//! Semántica determinista: para cada clave gana el **último** source de la
//! lista cuyo `has` es verdadero. No hay merge parcial de un valor entre
//! sources; la resolución es por clave completa.

use super::{SourceKind, ValueSource};
use crate::value::FileRef;

/// Vista compuesta sobre una lista ordenada de sources.
pub struct CompositeSource<'a> {
    sources: Vec<&'a (dyn ValueSource + 'a)>,
}

impl<'a> CompositeSource<'a> {
    pub fn new(sources: Vec<&'a (dyn ValueSource + 'a)>) -> Self {
        Self { sources }
    }

    /// El source ganador para `key`: el último que la tiene presente.
    fn winner(&self, key: &str) -> Option<&'a (dyn ValueSource + 'a)> {
        self.sources.iter().rev().find(|s| s.has(key)).copied()
    }
}

impl ValueSource for CompositeSource<'_> {
    fn kind(&self) -> SourceKind {
        // El kind nominal del compuesto es el del source de mayor precedencia.
        self.sources
            .last()
            .map(|s| s.kind())
            .unwrap_or(SourceKind::Query)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.winner(key).and_then(|s| s.get(key))
    }

    fn get_all(&self, key: &str) -> Vec<String> {
        self.winner(key).map(|s| s.get_all(key)).unwrap_or_default()
    }

    fn has(&self, key: &str) -> bool {
        self.sources.iter().any(|s| s.has(key))
    }

    fn keys(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for s in &self.sources {
            for k in s.keys() {
                if !out.contains(&k) {
                    out.push(k);
                }
            }
        }
        out
    }

    fn file(&self, key: &str) -> Option<FileRef> {
        self.sources.iter().rev().find_map(|s| s.file(key))
    }

    fn kind_of(&self, key: &str) -> SourceKind {
        self.winner(key).map(|s| s.kind()).unwrap_or_else(|| self.kind())
    }
}
