pub mod env;
mod error;

pub use env::{
    optional_boolean, optional_float, optional_integer, optional_list, optional_path,
    optional_path_list, optional_string, optional_ternary, required_boolean, required_float,
    required_integer, required_list, required_path, required_path_list, required_string,
    required_ternary, CastError, DeclarationError, EnvError, FieldKind, FieldValue, Namespace,
    ProcessEnv, Schema, SharedSource, Source,
};
pub use error::Error;

// Re-export for macro-generated code
#[doc(hidden)]
pub mod __private {
    pub use parking_lot::{Mutex, MutexGuard};
}
