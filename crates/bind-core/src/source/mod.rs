//! Capability de lookup sobre un origen de datos (query, header, etc.).
//!
//! El motor nunca es dueño de un source ni lo muta: sólo consulta por clave.

mod composite;
mod kind;

pub use composite::CompositeSource;
pub use kind::SourceKind;

use crate::value::FileRef;

/// Un origen de valores crudos, indexado por clave string.
pub trait ValueSource: Send + Sync {
    /// Kind del origen; determina qué vista de anotaciones aplica.
    fn kind(&self) -> SourceKind;

    /// Valor único para la clave (el primero, si hay repetidos).
    fn get(&self, key: &str) -> Option<String>;

    /// Todos los valores para una clave repetida, en orden de llegada.
    fn get_all(&self, key: &str) -> Vec<String>;

    /// Presencia de la clave.
    fn has(&self, key: &str) -> bool;

    /// Enumeración de claves presentes. Requerida sólo para la política de
    /// campos desconocidos y para campos map; un source que no puede
    /// enumerar devuelve vacío y esas features degradan a no-op.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Referencia de archivo para la clave (sólo sources multipart).
    fn file(&self, _key: &str) -> Option<FileRef> {
        None
    }

    /// Kind del origen concreto que resuelve `key`. Difiere de `kind()`
    /// únicamente en sources compuestos.
    fn kind_of(&self, _key: &str) -> SourceKind {
        self.kind()
    }
}
