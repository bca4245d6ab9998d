//!
//! Binds environment variables onto nested typed structures.
//!
//! Variable names are derived from field names: every field is split into
//! words, words are joined with a separator and upper cased, behind an
//! optional prefix. Collections are discovered by listing the variables
//! sharing their name as a prefix.
//!
//! ```
//! use envbind::{Bind, Loader, Snapshot};
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Default, Bind)]
//! struct Database {
//!     host: String,
//!     port: u16,
//! }
//!
//! #[derive(Debug, Default, Bind)]
//! struct Config {
//!     database: Database,
//!     replicas: Vec<Database>,
//!     limits: HashMap<String, i64>,
//! }
//!
//! let env = Snapshot::from_iter(vec![
//!     ("APP_DATABASE_HOST", "localhost"),
//!     ("APP_DATABASE_PORT", "5432"),
//!     ("APP_REPLICAS_0_HOST", "replica"),
//!     ("APP_LIMITS_CONNECTIONS", "20"),
//! ]);
//!
//! let mut config = Config::default();
//! Loader::new("app", "_").load_from(&env, &mut config).unwrap();
//!
//! assert_eq!(config.database.port, 5432);
//! assert_eq!(config.replicas[0].host, "replica");
//! assert_eq!(config.limits["connections"], 20);
//! ```
//!
extern crate self as envbind;

mod assign;
mod bind;
mod de;
mod discover;
mod error;
mod key;
mod options;
mod registry;
mod source;
mod types;
mod value;

pub use crate::{
    assign::Writer,
    bind::{Bind, Record},
    de::{StrDeserializer, DEFAULT_ARRAY_SEP},
    discover::{Indexed, Walker},
    error::{BoxError, Error, LiteralError, PairError},
    key::{words, KeyCodec, Tokenizer},
    options::{Loader, LoaderBuilder, LoaderBuilderError, DEFAULT_DEPTH, DEFAULT_MAX_LEN, DEFAULT_SEPARATOR},
    registry::Registry,
    source::{Snapshot, Source},
    types::{Discovered, Path, Segment},
    value::{parse_bool, parse_duration, parse_signed, parse_unsigned},
};
pub use envbind_derive::Bind;

///
/// Populates `target` from the process environment, variables being named
/// after `prefix` and `_` separated words.
///
/// ```no_run
/// #[derive(Default, envbind::Bind)]
/// struct Config {
///     listen_addr: String,
/// }
///
/// let mut config = Config::default();
/// envbind::load("app", &mut config).unwrap();
/// ```
///
pub fn load<T: Record>(prefix: &str, target: &mut T) -> Result<(), Error> {
    Loader::new(prefix, DEFAULT_SEPARATOR).load(target)
}
