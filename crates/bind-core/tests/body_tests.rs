//! Bind de bodies estructurados a través del puente `BodyDecoder`.

use std::sync::Arc;

use bind_adapters::{JsonDecoder, YamlDecoder};
use bind_core::{
    bindable, BindCause, BindEventKind, BindFailure, Binder, InMemoryEventSink, PlanCache,
    UnknownFieldPolicy,
};

bindable! {
    record Envio {
        calle: String => r#"body:"calle""#,
        ciudad: String => r#"body:"ciudad" default:"CABA""#,
    }
}

bindable! {
    record Pedido {
        id: u64 => r#"body:"id" required:"true""#,
        notas: Vec<String> => r#"body:"notas""#,
        envio: Envio => r#"body:"envio""#,
        total: f64 => r#"body:"total""#,
    }
}

#[test]
fn binds_nested_json_with_defaults() {
    let binder = Binder::new();
    let body = br#"{"id": 5, "notas": ["a", "b"], "envio": {"calle": "Corrientes 348"}, "total": 9.5}"#;
    let p: Pedido = binder.bind_body(&JsonDecoder, body).unwrap();
    assert_eq!(p.id, 5);
    assert_eq!(p.notas, vec!["a", "b"]);
    assert_eq!(p.envio.calle, "Corrientes 348");
    assert_eq!(p.envio.ciudad, "CABA");
    assert_eq!(p.total, 9.5);
}

#[test]
fn string_leaves_go_through_the_registry() {
    let binder = Binder::new();
    let body = br#"{"id": "5", "total": "9.5"}"#;
    let p: Pedido = binder.bind_body(&JsonDecoder, body).unwrap();
    assert_eq!(p.id, 5);
    assert_eq!(p.total, 9.5);
}

#[test]
fn integer_numbers_widen_to_float_fields() {
    let binder = Binder::new();
    let p: Pedido = binder.bind_body(&JsonDecoder, br#"{"id": 1, "total": 7}"#).unwrap();
    assert_eq!(p.total, 7.0);
}

#[test]
fn null_values_count_as_absent() {
    let binder = Binder::new();
    let p: Pedido = binder
        .bind_body(&JsonDecoder, br#"{"id": 1, "notas": null}"#)
        .unwrap();
    assert!(p.notas.is_empty());
}

#[test]
fn decode_failure_is_a_single_error_with_done_event() {
    let sink = Arc::new(InMemoryEventSink::new());
    let binder = Binder::builder().event_sink(sink.clone()).build();
    let err = binder.bind_body::<Pedido>(&JsonDecoder, b"{").unwrap_err();
    match err {
        BindFailure::Field(e) => {
            assert_eq!(e.field, "<body>");
            assert!(matches!(e.cause, BindCause::Decode { ref format, .. } if format == "json"));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
    // Done se emite igual, con el error contado
    match sink.events().last().map(|e| e.kind.clone()) {
        Some(BindEventKind::Done { errors, .. }) => assert_eq!(errors, 1),
        other => panic!("last event is not Done: {other:?}"),
    }
}

#[test]
fn non_object_payload_is_a_decode_error() {
    let binder = Binder::new();
    let err = binder.bind_body::<Pedido>(&JsonDecoder, b"[1, 2]").unwrap_err();
    match err {
        BindFailure::Field(e) => assert!(matches!(e.cause, BindCause::Decode { .. })),
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn required_body_field_missing() {
    let binder = Binder::new();
    let err = binder.bind_body::<Pedido>(&JsonDecoder, b"{}").unwrap_err();
    match err {
        BindFailure::Field(e) => {
            assert_eq!(e.field, "id");
            assert_eq!(e.cause, BindCause::Required);
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn array_over_limit_is_rejected() {
    let binder = Binder::builder()
        .max_slice_len(3)
        .plan_cache(Arc::new(PlanCache::new()))
        .build();
    let body = br#"{"id": 1, "notas": ["a", "b", "c", "d"]}"#;
    let err = binder.bind_body::<Pedido>(&JsonDecoder, body).unwrap_err();
    match err {
        BindFailure::Field(e) => {
            assert_eq!(e.field, "notas");
            assert!(matches!(e.cause, BindCause::LimitExceeded { kind: "slice", .. }));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn unknown_keys_are_scanned_per_object_level() {
    let binder = Binder::builder()
        .unknown_fields(UnknownFieldPolicy::Error)
        .build();

    let err = binder
        .bind_body::<Pedido>(&JsonDecoder, br#"{"id": 1, "extra": true}"#)
        .unwrap_err();
    match err {
        BindFailure::Field(e) => {
            assert_eq!(e.field, "extra");
            assert_eq!(e.cause, BindCause::UnknownField);
        }
        other => panic!("unexpected failure: {other:?}"),
    }

    // el scan también corre dentro de los objetos anidados
    let err = binder
        .bind_body::<Pedido>(
            &JsonDecoder,
            br#"{"id": 1, "envio": {"calle": "x", "zip": "1000"}}"#,
        )
        .unwrap_err();
    match err {
        BindFailure::Field(e) => assert_eq!(e.field, "zip"),
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn yaml_bodies_bind_like_json() {
    let binder = Binder::new();
    let body = b"id: 5\nnotas: [a, b]\ntotal: 9.5\n";
    let p: Pedido = binder.bind_body(&YamlDecoder, body).unwrap();
    assert_eq!(p.id, 5);
    assert_eq!(p.notas, vec!["a", "b"]);
    assert_eq!(p.total, 9.5);
}
