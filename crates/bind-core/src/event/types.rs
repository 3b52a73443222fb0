//! Tipos de evento del binder y estructura `BindEvent`.
//!
//! Rol en el flujo:
//! - Cada bind emite eventos a un `EventSink` opcional configurado en el
//!   binder; el enum `BindEventKind` es el contrato observable del motor.
//! - `Done` se emite siempre, con estadísticas agregadas, sin importar si el
//!   bind terminó en éxito o en error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::SourceKind;

/// Tipos de eventos soportados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BindEventKind {
    /// Un campo hoja quedó escrito en el registro.
    FieldBound {
        field: String,
        /// Clave que efectivamente aportó el valor (primaria o alias).
        key: String,
        source: SourceKind,
    },
    /// El source trae una clave que el plan no conoce. Bajo política Warn
    /// este evento es la única señal; bajo Error además se produce el
    /// `BindError` correspondiente.
    UnknownField { key: String, source: SourceKind },
    /// Cierre del bind con estadísticas agregadas.
    Done {
        bound: usize,
        skipped: usize,
        errors: usize,
    },
}

/// Envoltura de un evento emitido: orden de emisión + timestamp (metadato).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindEvent {
    pub seq: u64,
    pub ts: DateTime<Utc>,
    pub kind: BindEventKind,
}
