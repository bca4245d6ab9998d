//!
//! Loader options.
//!
//! Several options can be modified, such as :
//!
//! - prefix, prepended to every variable name
//! - separator between words of a variable name
//! - maximum depth of a bound structure
//! - maximum length of a sequence
//! - converters used for leaf values
//! - tokenizer splitting field names into words
//!
//! ```
//! use envbind::{LoaderBuilder, Registry};
//!
//! let loader = LoaderBuilder::default()
//!     .prefix("app")
//!     .separator("__")
//!     .registry(Registry::with_defaults())
//!     .max_depth(4usize)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(loader.max_depth(), 4);
//! ```
//!
use crate::{
    assign::assign_values,
    bind::{Bind, Record},
    discover::Walker,
    error::Error,
    key::{words, KeyCodec, Tokenizer},
    registry::Registry,
    source::{Snapshot, Source},
    types::{Discovered, Path},
};
use derive_builder::Builder;
use tracing::debug;

/// Default maximum depth of a bound structure.
pub const DEFAULT_DEPTH: usize = 10;

pub const DEFAULT_SEPARATOR: &str = "_";

/// Default bound on sequence indices, missing elements below an index are
/// filled with default values.
pub const DEFAULT_MAX_LEN: usize = 4096;

#[derive(Builder, Debug, Clone)]
#[builder(pattern = "owned", build_fn(validate = "Self::validate"))]
pub struct Loader {
    #[builder(setter(into), default)]
    prefix: String,
    #[builder(setter(into), default = "String::from(DEFAULT_SEPARATOR)")]
    separator: String,
    #[builder(default = "Registry::with_defaults()")]
    registry: Registry,
    #[builder(default = "DEFAULT_DEPTH")]
    max_depth: usize,
    #[builder(default = "DEFAULT_MAX_LEN")]
    max_len: usize,
    #[builder(default = "words")]
    tokenizer: Tokenizer,
}

impl LoaderBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.separator {
            Some(ref separator) if separator.is_empty() => {
                Err(String::from("separator must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

impl Loader {
    /// Loader with the default registry and depth, an empty `separator`
    /// falls back to `_`.
    pub fn new<P, S>(prefix: P, separator: S) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self::with_registry(prefix, separator, Registry::with_defaults(), DEFAULT_DEPTH)
    }

    pub fn with_registry<P, S>(prefix: P, separator: S, registry: Registry, max_depth: usize) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        let separator = separator.into();

        Self {
            prefix: prefix.into(),
            separator: if separator.is_empty() {
                String::from(DEFAULT_SEPARATOR)
            } else {
                separator
            },
            registry,
            max_depth,
            max_len: DEFAULT_MAX_LEN,
            tokenizer: words,
        }
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn codec(&self) -> KeyCodec<'_> {
        KeyCodec::new(&self.prefix, &self.separator, self.tokenizer)
    }

    /// Populates `target` from the process environment.
    pub fn load<T: Record>(&self, target: &mut T) -> Result<(), Error> {
        self.load_from(&Snapshot::from_env(), target)
    }

    ///
    /// Populates `target` from `source`.
    ///
    /// Discovery runs to completion before anything is written, so structural
    /// errors leave `target` untouched. A conversion error stops the
    /// assignment where it is, values written before it are kept.
    ///
    pub fn load_from<T: Record>(&self, source: &dyn Source, target: &mut T) -> Result<(), Error> {
        debug!(prefix = %self.prefix, target = std::any::type_name::<T>(), "loading");

        let values = self.discover::<T>(source)?;
        self.assign(target, &values)?;

        debug!(prefix = %self.prefix, count = values.len(), "loaded");
        Ok(())
    }

    /// Values of `source` that bind somewhere in `T`, in discovery order.
    pub fn discover<T: Bind>(&self, source: &dyn Source) -> Result<Vec<Discovered>, Error> {
        let mut walker = Walker::new(self.codec(), source, self.max_depth, self.max_len);
        T::discover(&mut walker, &mut Path::new())?;

        Ok(walker.into_found())
    }

    /// Writes `values` into `target`, in order.
    pub fn assign<T: Bind>(&self, target: &mut T, values: &[Discovered]) -> Result<(), Error> {
        assign_values(target, self.codec(), &self.registry, self.max_len, values)
    }
}

#[cfg(test)]
mod test {
    use super::{Loader, LoaderBuilder, DEFAULT_DEPTH, DEFAULT_MAX_LEN};
    use crate::{registry::Registry, types::Path};

    fn shout(ident: &str) -> Vec<String> {
        vec![ident.to_string()]
    }

    #[test]
    fn test_options_builder() {
        let r = LoaderBuilder::default()
            .prefix("sample")
            .separator("__")
            .max_depth(3usize)
            .max_len(16usize)
            .registry(Registry::new())
            .build();

        assert!(r.is_ok());

        let loader = r.unwrap();
        assert_eq!(loader.prefix(), "sample");
        assert_eq!(loader.separator(), "__");
        assert_eq!(loader.max_depth(), 3);
        assert_eq!(loader.max_len(), 16);
        assert!(!loader.registry().contains::<u8>());
    }

    #[test]
    fn test_options_builder_defaults() {
        let loader = LoaderBuilder::default().build().unwrap();

        assert_eq!(loader.prefix(), "");
        assert_eq!(loader.separator(), "_");
        assert_eq!(loader.max_depth(), DEFAULT_DEPTH);
        assert_eq!(loader.max_len(), DEFAULT_MAX_LEN);
        assert!(loader.registry().contains::<u8>());
    }

    #[test]
    fn test_options_builder_rejects_empty_separator() {
        assert!(LoaderBuilder::default().separator("").build().is_err());
        assert_eq!(Loader::new("app", "").separator(), "_");
    }

    #[test]
    fn test_custom_tokenizer() {
        let loader = LoaderBuilder::default()
            .prefix("app")
            .tokenizer(shout)
            .build()
            .unwrap();

        let path = Path::from_iter(vec!["string_value"]);
        assert_eq!(loader.codec().key_of(&path), "APP_STRING_VALUE");

        let path = Path::from_iter(vec!["StringValue"]);
        assert_eq!(loader.codec().key_of(&path), "APP_STRINGVALUE");
    }
}
