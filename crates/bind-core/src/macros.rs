//! Macros para declarar registros bindables sin boilerplate.
//!
//! Exportadas en la raíz del crate para poder usarlas como:
//!   use bind_core::{bindable, bindable_scalar};
//!
//! `bindable!` reemplaza a la reflexión en runtime: genera de forma
//! declarativa el `RecordShape` que el plan cache introspecciona.

/// Declara un registro bindable con sus anotaciones por campo.
///
/// Formas soportadas:
/// - `bindable!(record Name { campo: Tipo => r#"query:"k""#, ... });`
/// - la variante con bloque `validate(self) { ... }` instala el hook de
///   validación post-bind.
///
/// El tag de cada campo usa la sintaxis
/// `kind:"key,alias" default:"v" enum:"a,b" required:"true"`; un tag vacío
/// usa el nombre del campo como clave en todas las vistas.
#[macro_export]
macro_rules! bindable {
    (
        $(#[$meta:meta])*
        record $name:ident {
            $( $fname:ident : $fty:ty => $tag:literal ),+ $(,)?
        }
    ) => {
        $crate::bindable! {
            $(#[$meta])*
            record $name {
                $( $fname : $fty => $tag ),+
            }
            validate(self_) { let _ = self_; Ok(()) }
        }
    };

    (
        $(#[$meta:meta])*
        record $name:ident {
            $( $fname:ident : $fty:ty => $tag:literal ),+ $(,)?
        }
        validate($self_ident:ident) $vbody:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $( pub $fname: $fty, )+
        }

        impl $crate::shape::Bindable for $name {
            fn shape() -> &'static $crate::shape::RecordShape {
                static SHAPE: ::std::sync::OnceLock<$crate::shape::RecordShape> =
                    ::std::sync::OnceLock::new();
                SHAPE.get_or_init(|| $crate::shape::RecordShape {
                    name: stringify!($name),
                    fields: vec![
                        $(
                            $crate::shape::FieldSpec {
                                name: stringify!($fname),
                                shape: <$fty as $crate::value::BindableField>::field_shape(),
                                tag: $tag,
                            },
                        )+
                    ],
                })
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::value::FieldValue,
            ) -> ::std::result::Result<(), $crate::errors::ConvertError> {
                match name {
                    $(
                        stringify!($fname) => {
                            self.$fname =
                                <$fty as $crate::value::BindableField>::from_field_value(value)?;
                            Ok(())
                        }
                    )+
                    _ => Err($crate::errors::ConvertError::Mismatch {
                        target: format!("{}.{}", stringify!($name), name),
                    }),
                }
            }

            fn validate(&self) -> ::std::result::Result<(), String> {
                let $self_ident = self;
                $vbody
            }
        }

        impl $crate::value::BindableField for $name {
            fn field_shape() -> $crate::shape::FieldShape {
                $crate::shape::FieldShape::Record(<$name as $crate::shape::Bindable>::shape)
            }

            fn from_field_value(
                value: $crate::value::FieldValue,
            ) -> ::std::result::Result<Self, $crate::errors::ConvertError> {
                match value {
                    $crate::value::FieldValue::Map(entries) => {
                        let mut out = <Self as ::std::default::Default>::default();
                        for (k, v) in entries {
                            <Self as $crate::shape::Bindable>::set_field(&mut out, &k, v)?;
                        }
                        Ok(out)
                    }
                    _ => Err($crate::errors::ConvertError::Mismatch {
                        target: stringify!($name).to_string(),
                    }),
                }
            }
        }
    };
}

/// Implementa `BindableField` para un tipo escalar del caller que ya expone
/// capacidad de decodificación textual (`FromStr`). El shape resultante es
/// `Custom(nombre)`, lo que permite pisar la conversión registrando un
/// converter con ese nombre.
#[macro_export]
macro_rules! bindable_scalar {
    ($ty:ty) => {
        impl $crate::value::BindableField for $ty {
            fn field_shape() -> $crate::shape::FieldShape {
                $crate::shape::FieldShape::Custom(stringify!($ty))
            }

            fn from_field_value(
                value: $crate::value::FieldValue,
            ) -> ::std::result::Result<Self, $crate::errors::ConvertError> {
                let raw = value.canonical();
                raw.parse::<$ty>()
                    .map_err(|_| $crate::errors::ConvertError::Parse {
                        target: stringify!($ty).to_string(),
                        raw,
                    })
            }
        }
    };
}
