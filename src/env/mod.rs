//! Declarative, typed fields resolved from environment-like sources.

mod cast;
mod error;
mod extract;
mod field;
mod macros;
mod namespace;
mod process;
mod schema;
mod source;
mod value;

pub use error::{CastError, DeclarationError, EnvError};
pub use field::{
    optional_boolean, optional_float, optional_integer, optional_list, optional_path,
    optional_path_list, optional_string, optional_ternary, required_boolean, required_float,
    required_integer, required_list, required_path, required_path_list, required_string,
    required_ternary, AllowedValues, Field, Mode, Optional, Required,
};
pub use namespace::{Namespace, NamespaceBuilder};
pub use process::ProcessEnv;
pub use schema::{Schema, SchemaBuilder};
pub use source::{SharedSource, Source};
pub use value::{FieldKind, FieldValue, FromFieldValue};
