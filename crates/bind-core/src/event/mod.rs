//! Eventos observables del binder.

mod sink;
mod types;

pub use sink::{EventSink, InMemoryEventSink};
pub use types::{BindEvent, BindEventKind};
