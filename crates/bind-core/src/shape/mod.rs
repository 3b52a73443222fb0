//! Descripción estática de la forma de un registro bindable.
//!
//! Rol en el motor:
//! - `RecordShape` es lo que el macro `bindable!` genera una sola vez por
//!   tipo (vía `OnceLock`); es la entrada de la introspección de planes.
//! - `Bindable` es el contrato que el binder usa para escribir valores ya
//!   convertidos dentro del registro.

mod annotation;
mod record;

pub(crate) use annotation::parse_tag;
pub use annotation::FieldAnnotation;
pub use record::{FieldShape, FieldSpec, RecordShape, ShapeRef};

use crate::errors::ConvertError;
use crate::value::FieldValue;

/// Un registro destino del binding.
///
/// Implementado por el macro `bindable!`; no se espera implementarlo a mano.
/// `validate` es el hook post-bind (capability de validación externa): se
/// invoca una vez tras un bind estructuralmente exitoso y por defecto acepta.
pub trait Bindable: Default + Sized + 'static {
    /// Shape del registro, derivado una única vez y cacheado para siempre.
    fn shape() -> &'static RecordShape;

    /// Escribe un valor convertido en el campo `name`.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ConvertError>;

    /// Validación post-bind. El motor no interpreta el mensaje.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
