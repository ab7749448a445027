//! Declaration macro for namespace types.

/// Declares a namespace type with one typed getter per field.
///
/// Each field is bound to its identifier in upper case, so `port` reads the
/// `PORT` variable. The declared Rust type must match the field kind:
///
/// | kind | type |
/// |------|------|
/// | string | `String` |
/// | integer | `i64` |
/// | float | `f64` |
/// | boolean | `bool` |
/// | ternary | `Option<bool>` |
/// | list | `Vec<String>` |
/// | path | `PathBuf` |
/// | path list | `Vec<PathBuf>` |
///
/// The generated type dereferences to [`Namespace`](crate::Namespace), which
/// provides `set_field`, cache control and the source. Field names must not
/// collide with the generated associated functions (`schema`, `new`,
/// `with_source`, `with_cache`, `global`, `with_global`).
///
/// Instances are independent: each has its own source and cache. `global()`
/// and `with_global()` reach the type-level instance, created on first use
/// over the process environment and shared by the whole process.
///
/// # Panics
///
/// The first use of the type panics if the declaration is invalid, for
/// example when an allowed value cannot be cast to the field's type.
///
/// ## Example
///
/// ```
/// use named_env::{namespace, optional_integer, required_list, SharedSource};
///
/// namespace! {
///     /// Server settings.
///     pub struct ServerEnv {
///         /// Listening port.
///         port: i64 = optional_integer(3000),
///         hosts: Vec<String> = required_list(),
///     }
/// }
///
/// let mut env = ServerEnv::with_source(SharedSource::from_pairs([("HOSTS", "a.com,b.com")]));
/// assert_eq!(env.port()?, 3000);
/// assert_eq!(env.hosts()?, ["a.com", "b.com"]);
///
/// env.set_field("PORT", 8080)?;
/// assert_eq!(env.port()?, 8080);
/// # Ok::<(), named_env::EnvError>(())
/// ```
#[macro_export]
macro_rules! namespace {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty = $decl:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            namespace: $crate::Namespace,
        }

        #[allow(dead_code)]
        impl $name {
            /// Fields declared by this type, shared by every instance.
            pub fn schema() -> ::std::sync::Arc<$crate::Schema> {
                static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<$crate::Schema>> =
                    ::std::sync::OnceLock::new();
                let schema = SCHEMA.get_or_init(|| {
                    let builder = $crate::Schema::builder()
                        $(.field(stringify!($field).to_ascii_uppercase(), $decl))*;
                    match builder.build() {
                        Ok(schema) => ::std::sync::Arc::new(schema),
                        Err(err) => panic!("invalid declaration of {}: {}", stringify!($name), err),
                    }
                });
                ::std::sync::Arc::clone(schema)
            }

            /// Reads the process environment, with caching enabled.
            pub fn new() -> Self {
                Self {
                    namespace: $crate::Namespace::new(Self::schema()),
                }
            }

            pub fn with_source(source: $crate::SharedSource) -> Self {
                Self {
                    namespace: $crate::Namespace::builder(Self::schema())
                        .source(source)
                        .build(),
                }
            }

            pub fn with_cache(mut self, enabled: bool) -> Self {
                self.namespace.set_cache_enabled(enabled);
                self
            }

            #[doc(hidden)]
            pub fn __global_cell() -> &'static $crate::__private::Mutex<$name> {
                static GLOBAL: ::std::sync::OnceLock<$crate::__private::Mutex<$name>> =
                    ::std::sync::OnceLock::new();
                GLOBAL.get_or_init(|| $crate::__private::Mutex::new($name::new()))
            }

            /// The type-level instance, locked until the guard is dropped.
            ///
            /// # Deadlocks
            ///
            /// The lock is not reentrant. A guard lives until the end of the
            /// statement that created it, so calling `global()` twice in one
            /// expression blocks forever. Use [`with_global`](Self::with_global)
            /// for one-off reads.
            pub fn global() -> $crate::__private::MutexGuard<'static, $name> {
                Self::__global_cell().lock()
            }

            /// Runs `f` on the type-level instance and releases the lock
            /// before returning.
            ///
            /// `f` must not reach the type-level instance again.
            pub fn with_global<R>(f: impl ::std::ops::FnOnce(&mut $name) -> R) -> R {
                let mut guard = Self::__global_cell().lock();
                f(&mut *guard)
            }

            $(
                $(#[$field_meta])*
                pub fn $field(&mut self) -> ::std::result::Result<$ty, $crate::EnvError> {
                    self.namespace
                        .get_as::<$ty>(&stringify!($field).to_ascii_uppercase())
                }
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::Namespace;

            fn deref(&self) -> &Self::Target {
                &self.namespace
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.namespace
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::env::field::*;
    use crate::env::{CastError, EnvError, Namespace, SharedSource};

    namespace! {
        struct TestEnv {
            required_defined_string: String = required_string(),
            required_undefined_string: String = required_string(),
            optional_defined_string: String =
                optional_string("OPTIONAL_DEFINED_STRING default value"),
            optional_undefined_string: String =
                optional_string("OPTIONAL_UNDEFINED_STRING default value"),
            good_integer: i64 = required_integer(),
            good_float: f64 = required_float(),
            good_boolean: bool = required_boolean(),
            bad_integer: i64 = required_integer(),
            bad_float: f64 = required_float(),
            bad_boolean: bool = required_boolean(),
            optional_defined_boolean: bool = optional_boolean(false),
            optional_undefined_boolean: bool = optional_boolean(true),
            empty_defined_boolean: bool = required_boolean(),
            required_string_to_set: String = required_string(),
            required_integer_to_set: i64 = required_integer(),
            required_but_missing_integer_to_set: i64 = required_integer(),
            optional_string_to_set: String =
                optional_string("OPTIONAL_STRING_TO_SET value before set"),
            required_defined_list: Vec<String> = required_list(),
            required_undefined_list: Vec<String> = required_list(),
            optional_defined_list: Vec<String> =
                optional_list(vec!["OPTIONAL_DEFINED_LIST default value"]),
            optional_undefined_list: Vec<String> =
                optional_list(vec!["OPTIONAL_UNDEFINED_LIST default value"]),
            choice_correctly_defined_required_string: String = required_string()
                .allowed(["CHOICE_CORRECTLY_DEFINED_REQUIRED_STRING correct value"]),
            choice_incorrectly_defined_required_string: String = required_string()
                .allowed(["CHOICE_INCORRECTLY_DEFINED_REQUIRED_STRING correct value"]),
            choice_correctly_defined_optional_string: String =
                optional_string("CHOICE_CORRECTLY_DEFINED_OPTIONAL_STRING correct value")
                    .allowed(["CHOICE_CORRECTLY_DEFINED_OPTIONAL_STRING correct value"]),
            choice_incorrectly_defined_optional_string: String =
                optional_string("CHOICE_INCORRECTLY_DEFINED_OPTIONAL_STRING incorrect value")
                    .allowed(["CHOICE_INCORRECTLY_DEFINED_OPTIONAL_STRING correct value"]),
            choice_correctly_defined_required_list: Vec<String> = required_list()
                .allowed(["CHOICE_CORRECTLY_DEFINED_REQUIRED_LIST correct value"]),
            choice_incorrectly_defined_required_list: Vec<String> = required_list()
                .allowed(["CHOICE_INCORRECTLY_DEFINED_REQUIRED_LIST correct value"]),
            cache_test_string: String = required_string(),
            required_ternary_true: Option<bool> = required_ternary(),
            required_ternary_false: Option<bool> = required_ternary(),
            required_ternary_none: Option<bool> = required_ternary(),
            required_ternary_empty: Option<bool> = required_ternary(),
            optional_ternary_object_true: Option<bool> = optional_ternary(true),
            optional_ternary_object_false: Option<bool> = optional_ternary(false),
            optional_ternary_object_none: Option<bool> = optional_ternary(None::<bool>),
            optional_ternary_string_true: Option<bool> = optional_ternary("true"),
            optional_ternary_string_false: Option<bool> = optional_ternary("false"),
            optional_ternary_string_none: Option<bool> = optional_ternary("none"),
            required_defined_path: PathBuf = required_path(),
            required_undefined_path: PathBuf = required_path(),
            optional_defined_path: PathBuf = optional_path("/"),
            optional_undefined_path: PathBuf = optional_path("/"),
            required_defined_path_list: Vec<PathBuf> = required_path_list(),
            required_undefined_path_list: Vec<PathBuf> = required_path_list(),
            optional_defined_path_list: Vec<PathBuf> = optional_path_list("/baz:/qux"),
            optional_undefined_path_list: Vec<PathBuf> = optional_path_list("/baz:/qux"),
        }
    }

    fn environ() -> SharedSource {
        SharedSource::from_pairs([
            ("REQUIRED_DEFINED_STRING", "REQUIRED_DEFINED_STRING defined value"),
            ("OPTIONAL_DEFINED_STRING", "OPTIONAL_DEFINED_STRING defined value"),
            ("GOOD_INTEGER", "1"),
            ("GOOD_FLOAT", "10."),
            ("GOOD_BOOLEAN", "N"),
            ("BAD_INTEGER", "Foo"),
            ("BAD_FLOAT", "Bar"),
            ("BAD_BOOLEAN", "Baz"),
            ("OPTIONAL_DEFINED_BOOLEAN", "Y"),
            ("EMPTY_DEFINED_BOOLEAN", ""),
            ("REQUIRED_STRING_TO_SET", "REQUIRED_STRING_TO_SET value before set"),
            ("REQUIRED_INTEGER_TO_SET", "Not even an integer"),
            ("REQUIRED_DEFINED_LIST", "REQUIRED_DEFINED_LIST defined value"),
            ("OPTIONAL_DEFINED_LIST", "OPTIONAL_DEFINED_LIST defined value"),
            (
                "CHOICE_CORRECTLY_DEFINED_REQUIRED_STRING",
                "CHOICE_CORRECTLY_DEFINED_REQUIRED_STRING correct value",
            ),
            (
                "CHOICE_INCORRECTLY_DEFINED_REQUIRED_STRING",
                "CHOICE_INCORRECTLY_DEFINED_REQUIRED_STRING incorrect value",
            ),
            (
                "CHOICE_CORRECTLY_DEFINED_REQUIRED_LIST",
                "CHOICE_CORRECTLY_DEFINED_REQUIRED_LIST correct value,\
                 CHOICE_CORRECTLY_DEFINED_REQUIRED_LIST correct value",
            ),
            (
                "CHOICE_INCORRECTLY_DEFINED_REQUIRED_LIST",
                "CHOICE_INCORRECTLY_DEFINED_REQUIRED_LIST correct value,\
                 CHOICE_INCORRECTLY_DEFINED_REQUIRED_LIST incorrect value",
            ),
            ("REQUIRED_TERNARY_TRUE", "Y"),
            ("REQUIRED_TERNARY_FALSE", "N"),
            ("REQUIRED_TERNARY_NONE", "None"),
            ("REQUIRED_TERNARY_EMPTY", ""),
            ("REQUIRED_DEFINED_PATH", "/"),
            ("OPTIONAL_DEFINED_PATH", "."),
            ("REQUIRED_DEFINED_PATH_LIST", "/foo:/bar"),
            ("OPTIONAL_DEFINED_PATH_LIST", "/foo:/bar"),
        ])
    }

    /// Runs `check` against a fresh instance, then against the type-level one.
    fn instance_and_type(check: impl Fn(&mut TestEnv)) {
        let mut instance = TestEnv::with_source(environ());
        check(&mut instance);

        let mut global = TestEnv::global();
        global.clear_cache();
        global.set_source(environ());
        global.set_cache_enabled(true);
        check(&mut global);
    }

    fn is_missing<T>(result: Result<T, EnvError>, name: &str) -> bool {
        matches!(result, Err(EnvError::MissingVariable { ref variable, .. }) if variable == name)
    }

    #[test]
    fn test_defined_required_string() {
        instance_and_type(|env| {
            assert_eq!(
                env.required_defined_string().unwrap(),
                "REQUIRED_DEFINED_STRING defined value"
            );
        });
    }

    #[test]
    fn test_defined_optional_string() {
        instance_and_type(|env| {
            assert_eq!(
                env.optional_defined_string().unwrap(),
                "OPTIONAL_DEFINED_STRING defined value"
            );
        });
    }

    #[test]
    fn test_undefined_required_string() {
        instance_and_type(|env| {
            assert!(is_missing(
                env.required_undefined_string(),
                "REQUIRED_UNDEFINED_STRING"
            ));
        });
    }

    #[test]
    fn test_undefined_optional_string() {
        instance_and_type(|env| {
            assert_eq!(
                env.optional_undefined_string().unwrap(),
                "OPTIONAL_UNDEFINED_STRING default value"
            );
        });
    }

    #[test]
    fn test_good_numbers_and_boolean() {
        instance_and_type(|env| {
            assert_eq!(env.good_integer().unwrap(), 1);
            assert_eq!(env.good_float().unwrap(), 10.0);
            assert!(!env.good_boolean().unwrap());
        });
    }

    #[test]
    fn test_bad_int() {
        instance_and_type(|env| {
            let err = env.bad_integer().unwrap_err();
            assert!(matches!(err, EnvError::Cast(CastError::Integer { .. })));
            assert!(err.to_string().contains("invalid literal for integer"));
        });
    }

    #[test]
    fn test_bad_float() {
        instance_and_type(|env| {
            let err = env.bad_float().unwrap_err();
            assert!(err.to_string().contains("could not convert string to float"));
        });
    }

    #[test]
    fn test_bad_bool() {
        instance_and_type(|env| {
            assert!(matches!(
                env.bad_boolean(),
                Err(EnvError::Cast(CastError::Boolean(ref raw))) if raw == "Baz"
            ));
        });
    }

    #[test]
    fn test_empty_boolean_is_rejected() {
        instance_and_type(|env| {
            assert!(matches!(
                env.empty_defined_boolean(),
                Err(EnvError::Cast(CastError::Boolean(_)))
            ));
        });
    }

    #[test]
    fn test_optional_boolean() {
        instance_and_type(|env| {
            assert!(env.optional_defined_boolean().unwrap());
            assert!(env.optional_undefined_boolean().unwrap());
        });
    }

    #[test]
    fn test_required_string_set() {
        instance_and_type(|env| {
            assert_eq!(
                env.required_string_to_set().unwrap(),
                "REQUIRED_STRING_TO_SET value before set"
            );
            env.set_field(
                "REQUIRED_STRING_TO_SET",
                "REQUIRED_STRING_TO_SET value after set",
            )
            .unwrap();
            assert_eq!(
                env.required_string_to_set().unwrap(),
                "REQUIRED_STRING_TO_SET value after set"
            );
        });
    }

    #[test]
    fn test_optional_string_set() {
        instance_and_type(|env| {
            assert_eq!(
                env.optional_string_to_set().unwrap(),
                "OPTIONAL_STRING_TO_SET value before set"
            );
            env.set_field(
                "OPTIONAL_STRING_TO_SET",
                "OPTIONAL_STRING_TO_SET value after set",
            )
            .unwrap();
            assert_eq!(
                env.optional_string_to_set().unwrap(),
                "OPTIONAL_STRING_TO_SET value after set"
            );
        });
    }

    #[test]
    fn test_set_over_bad_and_missing_values() {
        instance_and_type(|env| {
            env.set_field("REQUIRED_INTEGER_TO_SET", 2).unwrap();
            assert_eq!(env.required_integer_to_set().unwrap(), 2);

            env.set_field("REQUIRED_BUT_MISSING_INTEGER_TO_SET", 3).unwrap();
            assert_eq!(env.required_but_missing_integer_to_set().unwrap(), 3);
        });
    }

    #[test]
    fn test_lists() {
        instance_and_type(|env| {
            assert_eq!(
                env.required_defined_list().unwrap(),
                ["REQUIRED_DEFINED_LIST defined value"]
            );
            assert_eq!(
                env.optional_defined_list().unwrap(),
                ["OPTIONAL_DEFINED_LIST defined value"]
            );
            assert_eq!(
                env.optional_undefined_list().unwrap(),
                ["OPTIONAL_UNDEFINED_LIST default value"]
            );
            assert!(is_missing(
                env.required_undefined_list(),
                "REQUIRED_UNDEFINED_LIST"
            ));
        });
    }

    #[test]
    fn test_choice_strings() {
        instance_and_type(|env| {
            assert_eq!(
                env.choice_correctly_defined_required_string().unwrap(),
                "CHOICE_CORRECTLY_DEFINED_REQUIRED_STRING correct value"
            );
            assert_eq!(
                env.choice_correctly_defined_optional_string().unwrap(),
                "CHOICE_CORRECTLY_DEFINED_OPTIONAL_STRING correct value"
            );
            assert!(matches!(
                env.choice_incorrectly_defined_required_string(),
                Err(EnvError::NotAllowed { .. })
            ));
            assert!(matches!(
                env.choice_incorrectly_defined_optional_string(),
                Err(EnvError::NotAllowed { .. })
            ));
        });
    }

    #[test]
    fn test_choice_lists() {
        instance_and_type(|env| {
            assert_eq!(
                env.choice_correctly_defined_required_list().unwrap(),
                [
                    "CHOICE_CORRECTLY_DEFINED_REQUIRED_LIST correct value",
                    "CHOICE_CORRECTLY_DEFINED_REQUIRED_LIST correct value",
                ]
            );
            let err = env.choice_incorrectly_defined_required_list().unwrap_err();
            assert_eq!(err.variable(), Some("CHOICE_INCORRECTLY_DEFINED_REQUIRED_LIST"));
            assert!(matches!(err, EnvError::NotAllowed { .. }));
        });
    }

    #[test]
    fn test_enabled_cache() {
        instance_and_type(|env| {
            env.source().insert("CACHE_TEST_STRING", "Foo");
            assert_eq!(env.cache_test_string().unwrap(), "Foo");
            env.source().insert("CACHE_TEST_STRING", "Bar");
            assert_eq!(env.cache_test_string().unwrap(), "Foo");
        });
    }

    #[test]
    fn test_disabled_cache() {
        instance_and_type(|env| {
            env.set_cache_enabled(false);
            env.source().insert("CACHE_TEST_STRING", "Foo");
            assert_eq!(env.cache_test_string().unwrap(), "Foo");
            env.source().insert("CACHE_TEST_STRING", "Bar");
            assert_eq!(env.cache_test_string().unwrap(), "Bar");
        });
    }

    #[test]
    fn test_required_ternary() {
        instance_and_type(|env| {
            assert_eq!(env.required_ternary_true().unwrap(), Some(true));
            assert_eq!(env.required_ternary_false().unwrap(), Some(false));
            assert_eq!(env.required_ternary_none().unwrap(), None);
            assert_eq!(env.required_ternary_empty().unwrap(), None);
        });
    }

    #[test]
    fn test_optional_ternary() {
        instance_and_type(|env| {
            assert_eq!(env.optional_ternary_string_true().unwrap(), Some(true));
            assert_eq!(env.optional_ternary_string_false().unwrap(), Some(false));
            assert_eq!(env.optional_ternary_string_none().unwrap(), None);
            assert_eq!(env.optional_ternary_object_true().unwrap(), Some(true));
            assert_eq!(env.optional_ternary_object_false().unwrap(), Some(false));
            assert_eq!(env.optional_ternary_object_none().unwrap(), None);
        });
    }

    #[test]
    fn test_paths() {
        instance_and_type(|env| {
            assert_eq!(env.required_defined_path().unwrap(), PathBuf::from("/"));
            assert_eq!(env.optional_defined_path().unwrap(), PathBuf::from("."));
            assert_eq!(env.optional_undefined_path().unwrap(), PathBuf::from("/"));
            assert!(is_missing(
                env.required_undefined_path(),
                "REQUIRED_UNDEFINED_PATH"
            ));
        });
    }

    #[test]
    fn test_path_lists() {
        instance_and_type(|env| {
            assert_eq!(
                env.required_defined_path_list().unwrap(),
                [PathBuf::from("/foo"), PathBuf::from("/bar")]
            );
            assert_eq!(
                env.optional_defined_path_list().unwrap(),
                [PathBuf::from("/foo"), PathBuf::from("/bar")]
            );
            assert_eq!(
                env.optional_undefined_path_list().unwrap(),
                [PathBuf::from("/baz"), PathBuf::from("/qux")]
            );
            assert!(is_missing(
                env.required_undefined_path_list(),
                "REQUIRED_UNDEFINED_PATH_LIST"
            ));
        });
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = TestEnv::with_source(environ());
        let mut second = TestEnv::with_source(environ());

        first.set_field("GOOD_INTEGER", 42).unwrap();
        assert_eq!(first.good_integer().unwrap(), 42);
        assert_eq!(second.good_integer().unwrap(), 1);
        assert!(std::sync::Arc::ptr_eq(
            Namespace::schema(&first),
            Namespace::schema(&second)
        ));
    }

    #[test]
    fn test_with_cache_disabled() {
        let source = environ();
        let mut env = TestEnv::with_source(source.clone()).with_cache(false);
        assert_eq!(env.good_integer().unwrap(), 1);

        source.insert("GOOD_INTEGER", "2");
        assert_eq!(env.good_integer().unwrap(), 2);
    }

    #[test]
    fn test_schema_binds_upper_case_names() {
        let schema = TestEnv::schema();
        assert!(schema.contains("REQUIRED_DEFINED_STRING"));
        assert!(!schema.contains("required_defined_string"));
        assert!(schema.get("GOOD_INTEGER").unwrap().is_required());
    }

    namespace! {
        struct PairEnv {
            named_env_pair_first: i64 = optional_integer(1),
            named_env_pair_second: i64 = optional_integer(2),
        }
    }

    #[test]
    fn test_with_global_releases_between_calls() {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            PairEnv::with_global(|env| {
                env.set_source(SharedSource::from_pairs([("NAMED_ENV_PAIR_FIRST", "10")]));
            });
            let sum = PairEnv::with_global(|env| env.named_env_pair_first()).unwrap()
                + PairEnv::with_global(|env| env.named_env_pair_second()).unwrap();
            let _ = tx.send(sum);
        });

        let sum = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .expect("type-level reads did not release the lock");
        assert_eq!(sum, 12);
        assert!(PairEnv::global().is_cached("NAMED_ENV_PAIR_FIRST"));
    }
}
