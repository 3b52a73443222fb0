//! Conversión de texto crudo a valores tipados vía el registry del binder.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use bind_adapters::KeyedSource;
use bind_core::{bindable, bindable_scalar, BindCause, BindFailure, Binder, FieldValue, SourceKind};

bindable! {
    record Evento {
        cuando: Option<DateTime<Utc>> => r#"query:"cuando""#,
        espera: Duration => r#"query:"espera" default:"30s""#,
        id: Option<Uuid> => r#"query:"id""#,
    }
}

fn query(pairs: &[(&str, &str)]) -> KeyedSource {
    KeyedSource::with_pairs(SourceKind::Query, pairs)
}

#[test]
fn rfc3339_is_tried_first() {
    let binder = Binder::new();
    let src = query(&[("cuando", "2024-05-01T10:30:00Z")]);
    let e: Evento = binder.bind(&src).unwrap();
    assert_eq!(
        e.cuando,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap())
    );
}

#[test]
fn configured_layouts_are_tried_in_order() {
    let binder = Binder::builder()
        .time_layouts(&["%d/%m/%Y", "%+"])
        .build();
    let src = query(&[("cuando", "01/05/2024")]);
    let e: Evento = binder.bind(&src).unwrap();
    // fecha sin hora: medianoche UTC
    assert_eq!(
        e.cuando,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
    );

    let src = query(&[("cuando", "no-es-fecha")]);
    assert!(binder.bind::<Evento>(&src).is_err());
}

#[test]
fn duration_compound_syntax_and_aliases() {
    let binder = Binder::builder()
        .duration_alias("1d", Duration::from_secs(86_400))
        .build();

    let src = query(&[("espera", "1h30m")]);
    let e: Evento = binder.bind(&src).unwrap();
    assert_eq!(e.espera, Duration::from_secs(5_400));

    let src = query(&[("espera", "1d")]);
    let e: Evento = binder.bind(&src).unwrap();
    assert_eq!(e.espera, Duration::from_secs(86_400));

    // default textual, por el mismo camino de conversión
    let src = query(&[]);
    let e: Evento = binder.bind(&src).unwrap();
    assert_eq!(e.espera, Duration::from_secs(30));

    // un total desorbitado falla como error de conversión, no desborda
    let src = query(&[("espera", "999999999999999999999h")]);
    let err = binder.bind::<Evento>(&src).unwrap_err();
    match err {
        BindFailure::Field(e) => assert!(matches!(e.cause, BindCause::Convert(_))),
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn uuid_fields_parse_canonical_form() {
    let binder = Binder::new();
    let src = query(&[("id", "67e55044-10b1-426f-9247-bb680e5fe0c8")]);
    let e: Evento = binder.bind(&src).unwrap();
    assert_eq!(
        e.id,
        Some(Uuid::from_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap())
    );

    let src = query(&[("id", "no-uuid")]);
    assert!(binder.bind::<Evento>(&src).is_err());
}

bindable! {
    record Interruptor {
        encendido: bool => r#"query:"encendido""#,
    }
}

#[test]
fn custom_bool_tokens_extend_the_standard_set() {
    let binder = Binder::builder().bool_tokens(&["sí"], &["no"]).build();
    let on: Interruptor = binder.bind(&query(&[("encendido", "sí")])).unwrap();
    assert!(on.encendido);
    let off: Interruptor = binder.bind(&query(&[("encendido", "no")])).unwrap();
    assert!(!off.encendido);
    // las formas estándar siguen vigentes
    let std_on: Interruptor = binder.bind(&query(&[("encendido", "TRUE")])).unwrap();
    assert!(std_on.encendido);
}

bindable! {
    record Conexion {
        remoto: Option<std::net::IpAddr> => r#"query:"remoto""#,
    }
}

#[test]
fn network_addresses_decode_from_text() {
    let binder = Binder::new();
    let c: Conexion = binder.bind(&query(&[("remoto", "10.0.0.7")])).unwrap();
    assert_eq!(c.remoto, Some("10.0.0.7".parse().unwrap()));
    assert!(binder.bind::<Conexion>(&query(&[("remoto", "999.1.1.1")])).is_err());
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Hex(u32);

impl FromStr for Hex {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u32::from_str_radix(s.trim_start_matches("0x"), 16).map(Hex)
    }
}

bindable_scalar!(Hex);

bindable! {
    record Color {
        valor: Hex => r#"query:"valor""#,
    }
}

#[test]
fn custom_scalar_decodes_via_fromstr() {
    let binder = Binder::new();
    let c: Color = binder.bind(&query(&[("valor", "0xff")])).unwrap();
    assert_eq!(c.valor, Hex(255));

    let err = binder.bind::<Color>(&query(&[("valor", "zz")])).unwrap_err();
    match err {
        BindFailure::Field(e) => assert!(matches!(e.cause, BindCause::Convert(_))),
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn registered_converter_overrides_fromstr_input() {
    // el converter pre-procesa el texto; el FromStr del tipo hace el resto
    let binder = Binder::builder()
        .converter("Hex", |raw| Ok(FieldValue::Str(format!("0x{raw}"))))
        .build();
    let c: Color = binder.bind(&query(&[("valor", "ff")])).unwrap();
    assert_eq!(c.valor, Hex(255));
}
