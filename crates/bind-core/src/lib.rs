//! bind-core: motor de binding declarativo.
//!
//! Convierte datos externos débilmente tipados (query params, path params,
//! formularios, headers, cookies, multipart y bodies estructurados) en
//! registros fuertemente tipados, guiado por las anotaciones declaradas con
//! el macro `bindable!`. Sin networking: el transporte es problema del
//! caller; aquí sólo vive el binding.
pub mod binder;
pub mod convert;
pub mod decoder;
pub mod errors;
pub mod event;
pub mod macros;
pub mod plan;
pub mod shape;
pub mod source;
pub mod value;

pub use binder::{Binder, BinderBuilder, BinderConfig, KeyNormalizer, SliceMode, UnknownFieldPolicy};
pub use convert::{
    bool_converter, duration_converter, enum_converter, parse_duration, time_converter, ConvertFn,
    ConvertRegistry,
};
pub use decoder::BodyDecoder;
pub use errors::{BindCause, BindError, BindFailure, ConvertError, MultiError, ShapeError};
pub use event::{BindEvent, BindEventKind, EventSink, InMemoryEventSink};
pub use plan::{default_plan_cache, BindingPlan, FieldDescriptor, PlanCache};
pub use shape::{Bindable, FieldAnnotation, FieldShape, FieldSpec, RecordShape};
pub use source::{CompositeSource, SourceKind, ValueSource};
pub use value::{BindableField, FieldValue, FileRef};

// Los macros `bindable!` / `bindable_scalar!` se exportan en la raíz vía
// #[macro_export].

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    bindable! {
        record Filtro {
            page: u32 => r#"query:"page" default:"1""#,
            estado: String => r#"query:"estado" enum:"active,pending""#,
        }
    }

    struct QueryFija;

    impl ValueSource for QueryFija {
        fn kind(&self) -> SourceKind {
            SourceKind::Query
        }
        fn get(&self, key: &str) -> Option<String> {
            match key {
                "estado" => Some("ACTIVE".to_string()),
                _ => None,
            }
        }
        fn get_all(&self, key: &str) -> Vec<String> {
            self.get(key).into_iter().collect()
        }
        fn has(&self, key: &str) -> bool {
            key == "estado"
        }
        fn keys(&self) -> Vec<String> {
            vec!["estado".to_string()]
        }
    }

    #[test]
    fn smoke_bind_with_default_and_enum() {
        let binder = Binder::new();
        let f: Filtro = binder.bind(&QueryFija).unwrap();
        // default aplicado y enum canonicalizado al deletreo del conjunto
        assert_eq!(f.page, 1);
        assert_eq!(f.estado, "active");
    }

    #[test]
    fn field_value_canonical_forms() {
        assert_eq!(FieldValue::Int(-3).canonical(), "-3");
        assert_eq!(FieldValue::Bool(true).canonical(), "true");
        let mut m = IndexMap::new();
        m.insert("a".to_string(), FieldValue::Uint(1));
        assert_eq!(FieldValue::Map(m).canonical(), "a=1");
    }
}
