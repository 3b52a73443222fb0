//! Composición multi-source: resolución por campo con el último source
//! presente ganando.

use bind_adapters::KeyedSource;
use bind_core::{
    bindable, BindCause, BindFailure, Binder, CompositeSource, SourceKind, ValueSource,
};

bindable! {
    record ResourceRef {
        id: u64 => r#"path:"id" query:"id""#,
        verbose: bool => r#"query:"verbose" default:"false""#,
        token: String => r#"header:"x-api-token" required:"true""#,
    }
}

fn with_pairs(kind: SourceKind, pairs: &[(&str, &str)]) -> KeyedSource {
    KeyedSource::with_pairs(kind, pairs)
}

#[test]
fn later_source_wins_per_field() {
    let binder = Binder::new();
    let path = with_pairs(SourceKind::Path, &[("id", "7")]);
    let query = with_pairs(SourceKind::Query, &[("id", "9")]);
    let header = with_pairs(SourceKind::Header, &[("X-API-Token", "abc")]);

    let sources: [&dyn ValueSource; 3] = [&path, &query, &header];
    let r: ResourceRef = binder.bind_composed(&sources).unwrap();
    assert_eq!(r.id, 9);
    assert_eq!(r.token, "abc");
    assert!(!r.verbose);
}

#[test]
fn earlier_source_satisfies_required_fields() {
    let binder = Binder::new();
    let path = with_pairs(SourceKind::Path, &[("id", "7")]);
    let header = with_pairs(SourceKind::Header, &[("x-api-token", "tok")]);
    let query = with_pairs(SourceKind::Query, &[("verbose", "true")]);

    let sources: [&dyn ValueSource; 3] = [&path, &header, &query];
    let r: ResourceRef = binder.bind_composed(&sources).unwrap();
    assert_eq!(r.id, 7);
    assert_eq!(r.token, "tok");
    assert!(r.verbose);
}

#[test]
fn missing_required_in_every_source_fails() {
    let binder = Binder::new();
    let path = with_pairs(SourceKind::Path, &[("id", "7")]);
    let query = with_pairs(SourceKind::Query, &[]);

    let sources: [&dyn ValueSource; 2] = [&path, &query];
    let err = binder.bind_composed::<ResourceRef>(&sources).unwrap_err();
    match err {
        BindFailure::Field(e) => assert_eq!(e.cause, BindCause::Required),
        other => panic!("unexpected failure: {other:?}"),
    }
}

bindable! {
    record Paginado {
        cursor: String => r#"query:"cursor" header:"x-cursor""#,
    }
}

#[test]
fn field_absent_from_one_kinds_view_is_skipped_there() {
    // el kind path no declara el campo; el plan de path lo omite y el
    // compuesto lo resuelve contra query
    let binder = Binder::new();
    let path = with_pairs(SourceKind::Path, &[("cursor", "no-debería-verse")]);
    let query = with_pairs(SourceKind::Query, &[("cursor", "abc123")]);

    let sources: [&dyn ValueSource; 2] = [&query, &path];
    let p: Paginado = binder.bind_composed(&sources).unwrap();
    assert_eq!(p.cursor, "abc123");
}

#[test]
fn composite_source_merges_same_kind_with_last_wins() {
    let binder = Binder::new();
    let a = with_pairs(SourceKind::Query, &[("cursor", "viejo")]);
    let b = with_pairs(SourceKind::Query, &[("cursor", "nuevo")]);
    let merged = CompositeSource::new(vec![&a, &b]);

    let p: Paginado = binder.bind(&merged).unwrap();
    assert_eq!(p.cursor, "nuevo");
}

#[test]
fn empty_source_list_is_a_noop() {
    let binder = Binder::new();
    let mut r = Paginado::default();
    binder.bind_composed_into(&mut r, &[]).unwrap();
    assert_eq!(r.cursor, "");
}
