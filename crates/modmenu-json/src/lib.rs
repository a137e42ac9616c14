// Embedded JSON codec: tagged value type, serializer, recursive-descent
// parser, host-table bridge.
//
// One caveat carried over from the host environment: a `Table` with no
// entries converts to an empty Array, so an empty object that travels
// through the table bridge encodes as `[]` and decodes back as an array.
// Callers needing exact empty-object round-trips must build
// `Value::Object` directly.

mod decode;
mod encode;
mod error;
mod table;
mod value;

pub use decode::decode;
pub use encode::encode;
pub use error::{DecodeError, EncodeError};
pub use table::{Table, TableKey};
pub use value::{Map, Value};
