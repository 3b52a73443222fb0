//! bind-adapters: implementaciones concretas de las capabilities del core.
//!
//! Este crate provee:
//! - `KeyedSource`: Value Source respaldado por un multimapa ordenado, con
//!   constructores para query/path/form/header/cookie/multipart.
//! - Decoders de body (`JsonDecoder`, `YamlDecoder`) para el puente
//!   `BodyDecoder` del core.
//!
//! Nota: el core sólo conoce los traits `ValueSource` y `BodyDecoder`;
//! nada de lo que hay acá es visible para el motor más allá de ellos.

pub mod decoders;
pub mod keyed;

pub use decoders::{JsonDecoder, YamlDecoder};
pub use keyed::KeyedSource;
