//! Kinds de source soportados y su nombre de tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identidad de un origen de datos. Forma parte de la clave del plan cache:
/// un mismo registro tiene un plan por kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Query,
    Path,
    Form,
    Header,
    Cookie,
    Multipart,
    Body,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Query => "query",
            SourceKind::Path => "path",
            SourceKind::Form => "form",
            SourceKind::Header => "header",
            SourceKind::Cookie => "cookie",
            SourceKind::Multipart => "multipart",
            SourceKind::Body => "body",
        }
    }

    /// Nombre de la entrada de tag que lee esta vista. Multipart comparte
    /// la vista `form` (sus campos de texto son campos de formulario).
    pub fn tag(&self) -> &'static str {
        match self {
            SourceKind::Multipart => "form",
            other => other.as_str(),
        }
    }

    /// Los kinds planos direccionan registros anidados con claves punteadas
    /// (`address.street`); el kind body anida de forma estructural.
    pub fn is_flat(&self) -> bool {
        !matches!(self, SourceKind::Body)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
