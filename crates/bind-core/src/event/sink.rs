//! Destino de eventos del binder.

use chrono::Utc;
use std::sync::Mutex;

use super::{BindEvent, BindEventKind};

/// Receptor de eventos. A diferencia de un store append-only con `&mut`,
/// aquí el sink recibe `&self`: la configuración del binder se comparte
/// read-only entre binds concurrentes.
pub trait EventSink: Send + Sync {
    fn emit(&self, kind: BindEventKind);
}

/// Sink en memoria para tests y diagnóstico.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    inner: Mutex<Vec<BindEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copia de los eventos emitidos hasta ahora (orden ascendente por seq).
    pub fn events(&self) -> Vec<BindEvent> {
        self.inner.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.inner.lock().map(|v| v.len()).unwrap_or(0)
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, kind: BindEventKind) {
        if let Ok(mut vec) = self.inner.lock() {
            let seq = vec.len() as u64;
            vec.push(BindEvent {
                seq,
                ts: Utc::now(),
                kind,
            });
        }
    }
}
