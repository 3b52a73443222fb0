//! Construcción de planes: introspección completa de un `RecordShape`.
//!
//! Aquí se paga todo el costo de parsear tags y validar unicidad y
//! profundidad; el bind posterior sólo recorre descriptores ya resueltos.
//! Un plan jamás falla en tiempo de bind por problemas de shape.

use std::collections::HashSet;

use super::types::{BindingPlan, FieldDescriptor, KeyClaims};
use crate::errors::ShapeError;
use crate::shape::{parse_tag, FieldShape, RecordShape};
use crate::source::SourceKind;

pub(crate) fn build_plan(
    shape: &'static RecordShape,
    kind: SourceKind,
    prefix: &str,
    depth: usize,
    max_depth: usize,
) -> Result<BindingPlan, ShapeError> {
    // corta también shapes auto-recursivos (Vec<Self> y similares)
    if depth > max_depth {
        return Err(ShapeError::DepthExceeded {
            record: shape.name,
            depth,
            max: max_depth,
        });
    }

    let mut fields = Vec::with_capacity(shape.fields.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut total_depth = depth;

    for spec in &shape.fields {
        let ann = parse_tag(spec.tag, kind).map_err(|detail| ShapeError::BadAnnotation {
            record: shape.name,
            field: spec.name,
            detail,
        })?;
        if ann.skipped() {
            continue;
        }
        // campo ruteado a otras vistas: no existe en ésta
        if ann.keys.is_empty() && ann.foreign {
            continue;
        }

        let mut keys: Vec<String> = if ann.keys.is_empty() {
            vec![spec.name.to_string()]
        } else {
            ann.keys
        };
        if kind.is_flat() && !prefix.is_empty() {
            keys = keys.iter().map(|k| format!("{prefix}.{k}")).collect();
        }
        for k in &keys {
            if !seen.insert(k.clone()) {
                return Err(ShapeError::DuplicateKey {
                    record: shape.name,
                    key: k.clone(),
                });
            }
        }

        let nested = match spec.shape.record_ref() {
            Some(sub) => {
                // un source plano no puede expresar colecciones de registros
                if kind.is_flat() && !matches!(spec.shape.strip_optional(), FieldShape::Record(_)) {
                    return Err(ShapeError::UnsupportedShape {
                        record: shape.name,
                        field: spec.name,
                        shape: spec.shape.to_string(),
                    });
                }
                let sub_prefix = if kind.is_flat() { keys[0].as_str() } else { "" };
                let plan = build_plan(sub(), kind, sub_prefix, depth + 1, max_depth)?;
                total_depth = total_depth.max(plan.depth);
                Some(Box::new(plan))
            }
            None => {
                validate_leaf(shape, spec.name, &spec.shape, kind)?;
                None
            }
        };

        fields.push(FieldDescriptor {
            name: spec.name,
            keys,
            default_raw: ann.default_raw,
            required: ann.required,
            enum_allow: ann.enum_allow,
            shape: spec.shape.clone(),
            nested,
        });
    }

    let claims = collect_claims(&fields);
    Ok(BindingPlan {
        record: shape.name,
        kind,
        fields,
        depth: total_depth,
        claims,
    })
}

/// Un shape escalar siempre es convertible (los `Custom` traen su propio
/// `FromStr`); lo que se rechaza son composiciones que un source plano no
/// puede expresar: listas de listas, maps de composites, etc.
fn validate_leaf(
    shape: &'static RecordShape,
    field: &'static str,
    fs: &FieldShape,
    kind: SourceKind,
) -> Result<(), ShapeError> {
    let unsupported = |s: &FieldShape| ShapeError::UnsupportedShape {
        record: shape.name,
        field,
        shape: s.to_string(),
    };
    match fs.strip_optional() {
        FieldShape::List(inner) | FieldShape::Map(inner) => {
            let inner = inner.strip_optional();
            if kind.is_flat()
                && matches!(
                    inner,
                    FieldShape::List(_) | FieldShape::Map(_) | FieldShape::File
                )
            {
                return Err(unsupported(fs));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn collect_claims(fields: &[FieldDescriptor]) -> KeyClaims {
    let mut claims = KeyClaims::default();
    for desc in fields {
        for k in &desc.keys {
            claims.exact.push(k.clone());
            if desc.is_list() {
                claims.exact.push(format!("{k}[]"));
            }
        }
        if desc.is_map() {
            claims.prefixes.push(format!("{}.", desc.primary_key()));
        }
        if let Some(nested) = &desc.nested {
            claims.exact.extend(nested.claims.exact.iter().cloned());
            claims.prefixes.extend(nested.claims.prefixes.iter().cloned());
        }
    }
    claims
}
