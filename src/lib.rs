//! BindFlow Rust Library
//!
//! Este crate actúa como la fachada del workspace:
//! - Re-exporta `bind_core` (el motor de binding declarativo).
//! - Re-exporta `bind_adapters` (sources en memoria y decoders de body).
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub use bind_adapters::{JsonDecoder, KeyedSource, YamlDecoder};
pub use bind_core::{
    bindable, bindable_scalar, Bindable, BindCause, BindError, BindEvent, BindEventKind,
    BindFailure, Binder, BinderBuilder, BodyDecoder, CompositeSource, ConvertError, EventSink,
    FieldShape, FieldValue, FileRef, InMemoryEventSink, MultiError, PlanCache, ShapeError,
    SliceMode, SourceKind, UnknownFieldPolicy, ValueSource,
};

#[cfg(test)]
mod tests {
    use super::*;

    bindable! {
        record Ping {
            eco: String => r#"query:"eco" default:"pong""#,
        }
    }

    #[test]
    fn facade_reexports_are_usable() {
        let binder = Binder::new();
        let src = KeyedSource::with_pairs(SourceKind::Query, &[]);
        let p: Ping = binder.bind(&src).unwrap();
        assert_eq!(p.eco, "pong");
    }
}
