//! Binario de demostración: escenarios representativos del motor de binding.
//!
//! Cada función valida un flujo completo con asserts; si todo pasa, imprime
//! un resumen. No hay networking: los sources se arman en memoria.

use std::sync::Arc;

use bindflow_rust::{
    bindable, BindFailure, Binder, BindEventKind, InMemoryEventSink, JsonDecoder, KeyedSource,
    SourceKind, UnknownFieldPolicy, ValueSource,
};

bindable! {
    record BusquedaDemo {
        q: String => r#"query:"q,term" required:"true""#,
        page: u32 => r#"query:"page" default:"1""#,
        estado: String => r#"query:"estado" enum:"active,pending" default:"pending""#,
        tags: Vec<String> => r#"query:"tags""#,
    }
}

/// Bind plano: defaults, aliases, enums y slices por clave repetida.
fn run_query_demo() {
    let binder = Binder::new();
    let mut src = KeyedSource::query();
    src.set("term", "rust").append("tags", "a").append("tags", "b");
    src.set("estado", "ACTIVE");

    let b: BusquedaDemo = binder.bind(&src).expect("bind de query");
    assert_eq!(b.q, "rust");
    assert_eq!(b.page, 1);
    assert_eq!(b.estado, "active");
    assert_eq!(b.tags, vec!["a", "b"]);
    println!("query demo ok: q={} page={} estado={} tags={:?}", b.q, b.page, b.estado, b.tags);
}

bindable! {
    record RecursoDemo {
        id: u64 => r#"path:"id" query:"id""#,
        token: String => r#"header:"x-api-token" required:"true""#,
        verbose: bool => r#"query:"verbose" default:"false""#,
    }
}

/// Composición multi-source: por campo gana el último source que lo trae.
fn run_compose_demo() {
    let binder = Binder::new();
    let path = KeyedSource::with_pairs(SourceKind::Path, &[("id", "7")]);
    let query = KeyedSource::with_pairs(SourceKind::Query, &[("id", "9"), ("verbose", "true")]);
    let header = KeyedSource::with_pairs(SourceKind::Header, &[("X-API-Token", "tok-123")]);

    let sources: [&dyn ValueSource; 3] = [&path, &query, &header];
    let r: RecursoDemo = binder.bind_composed(&sources).expect("bind compuesto");
    assert_eq!(r.id, 9, "query pisa a path");
    assert_eq!(r.token, "tok-123");
    assert!(r.verbose);
    println!("compose demo ok: id={} token={} verbose={}", r.id, r.token, r.verbose);
}

bindable! {
    record DireccionDemo {
        calle: String => r#"body:"calle""#,
        ciudad: String => r#"body:"ciudad" default:"CABA""#,
    }
}

bindable! {
    record PedidoDemo {
        id: u64 => r#"body:"id" required:"true""#,
        envio: DireccionDemo => r#"body:"envio""#,
        total: f64 => r#"body:"total""#,
    }
}

/// Body estructurado vía el puente de decoders.
fn run_body_demo() {
    let binder = Binder::new();
    let body = br#"{"id": 42, "envio": {"calle": "Corrientes 348"}, "total": "99.9"}"#;
    let p: PedidoDemo = binder.bind_body(&JsonDecoder, body).expect("bind de body");
    assert_eq!(p.id, 42);
    assert_eq!(p.envio.ciudad, "CABA", "default del registro anidado");
    assert_eq!(p.total, 99.9, "hoja string convertida por el registry");
    println!("body demo ok: id={} envio={}/{} total={}", p.id, p.envio.calle, p.envio.ciudad, p.total);
}

/// Eventos y política de campos desconocidos.
fn run_events_demo() {
    let sink = Arc::new(InMemoryEventSink::new());
    let binder = Binder::builder()
        .unknown_fields(UnknownFieldPolicy::Warn)
        .event_sink(sink.clone())
        .build();

    let src = KeyedSource::with_pairs(SourceKind::Query, &[("q", "x"), ("sorpresa", "?")]);
    let _: BusquedaDemo = binder.bind(&src).expect("bind con eventos");

    let events = sink.events();
    assert!(events
        .iter()
        .any(|e| matches!(&e.kind, BindEventKind::UnknownField { key, .. } if key == "sorpresa")));
    assert!(matches!(events.last().map(|e| &e.kind), Some(BindEventKind::Done { .. })));
    println!("events demo ok: {} eventos emitidos", events.len());
}

/// Política CollectAll: todos los errores de una pasada, juntos.
fn run_collect_all_demo() {
    let binder = Binder::builder().all_errors(true).build();
    let src = KeyedSource::with_pairs(
        SourceKind::Query,
        &[("q", "x"), ("page", "abc"), ("estado", "zzz")],
    );
    match binder.bind::<BusquedaDemo>(&src) {
        Err(BindFailure::Many(multi)) => {
            assert_eq!(multi.len(), 2);
            println!("collect-all demo ok: {multi}");
        }
        other => panic!("se esperaba MultiError, llegó {other:?}"),
    }
}

fn main() {
    run_query_demo();
    run_compose_demo();
    run_body_demo();
    run_events_demo();
    run_collect_all_demo();
    println!("todas las demos pasaron");
}
