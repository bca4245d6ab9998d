//!
//! Key/value sources.
//!
//! A [`Source`] answers point lookups and enumerates its keys, which is all
//! the walker needs to rebuild structure out of a flat namespace.
//!
use crate::error::{Error, PairError};
use indexmap::IndexMap;
use std::{
    collections::{BTreeMap, HashMap},
    io::BufRead,
};
use tracing::trace;

pub trait Source {
    /// Value of `key`, if defined.
    fn get(&self, key: &str) -> Option<&str>;

    /// Every defined key, in the source's own order.
    fn keys(&self) -> Vec<&str>;

    fn keys_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.keys()
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect()
    }
}

impl<S> Source for &S
where
    S: Source + ?Sized,
{
    #[inline]
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }

    #[inline]
    fn keys(&self) -> Vec<&str> {
        (**self).keys()
    }
}

impl Source for HashMap<String, String> {
    #[inline]
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }

    #[inline]
    fn keys(&self) -> Vec<&str> {
        HashMap::keys(self).map(String::as_str).collect()
    }
}

impl Source for BTreeMap<String, String> {
    #[inline]
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }

    #[inline]
    fn keys(&self) -> Vec<&str> {
        BTreeMap::keys(self).map(String::as_str).collect()
    }
}

impl Source for IndexMap<String, String> {
    #[inline]
    fn get(&self, key: &str) -> Option<&str> {
        IndexMap::get(self, key).map(String::as_str)
    }

    #[inline]
    fn keys(&self) -> Vec<&str> {
        IndexMap::keys(self).map(String::as_str).collect()
    }
}

///
/// Stable, insertion-ordered view of variables.
///
/// Captured once per load so that discovery sees a consistent namespace
/// even if the process environment changes meanwhile.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    inner: IndexMap<String, String>,
}

impl Snapshot {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current process environment, variables that aren't
    /// valid unicode are left out.
    pub fn from_env() -> Self {
        let inner = std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    trace!(key = ?key, "skipping non unicode variable");
                    None
                }
            })
            .collect();

        Self { inner }
    }

    ///
    /// Parses dotenv-like content.
    ///
    /// ```text
    /// # comment
    /// APP_NAME=svc
    /// export APP_RETRIES="3"
    /// ```
    ///
    /// Blank lines and comments are skipped, each line is split on its first
    /// `=`, matching quotes around the value are removed.
    ///
    pub fn from_reader<R>(reader: R) -> Result<Self, Error>
    where
        R: BufRead,
    {
        let mut inner = IndexMap::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = parse_pair(line)?;
            inner.insert(key, value);
        }

        Ok(Self { inner })
    }

    #[inline]
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.insert(key.into(), value.into())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn parse_pair(line: &str) -> Result<(String, String), PairError> {
    let line = line.strip_prefix("export ").unwrap_or(line);

    match line.split_once('=') {
        None => Err(PairError::IncompletePair(String::from(line))),
        Some((key, _)) if key.trim().is_empty() => Err(PairError::EmptyKey(String::from(line))),
        Some((key, value)) => Ok((String::from(key.trim()), String::from(unquote(value.trim())))),
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));

    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Source for Snapshot {
    #[inline]
    fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    #[inline]
    fn keys(&self) -> Vec<&str> {
        self.inner.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod test {
    use super::{Snapshot, Source};
    use crate::error::{Error, PairError};
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_envs() {
        let raw = r#"
    CONFIG_DATABASE_NAME=name
    # credentials
    CONFIG_DATABASE_CREDENTIAL_PASSWORD="some=password"
    export CONFIG_DATABASE_CONNECTION_POOL=10
    CONFIG_DATABASE_CONNECTION_RETRIES='10,20,30'
    CONFIG_APPLICATION_ENV="#;

        let snapshot = Snapshot::from_reader(Cursor::new(raw)).unwrap();

        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.get("CONFIG_DATABASE_NAME"), Some("name"));
        assert_eq!(
            snapshot.get("CONFIG_DATABASE_CREDENTIAL_PASSWORD"),
            Some("some=password")
        );
        assert_eq!(snapshot.get("CONFIG_DATABASE_CONNECTION_POOL"), Some("10"));
        assert_eq!(
            snapshot.get("CONFIG_DATABASE_CONNECTION_RETRIES"),
            Some("10,20,30")
        );
        assert_eq!(snapshot.get("CONFIG_APPLICATION_ENV"), Some(""));
    }

    #[test]
    fn test_parse_incomplete_pair() {
        let result = Snapshot::from_reader(Cursor::new("CONFIG_NAME"));

        assert!(matches!(
            result,
            Err(Error::Pair(PairError::IncompletePair(ref key))) if key == "CONFIG_NAME"
        ));
        assert!(matches!(
            Snapshot::from_reader(Cursor::new("=value")),
            Err(Error::Pair(PairError::EmptyKey(_)))
        ));
    }

    #[test]
    fn test_keys_with_prefix() {
        let snapshot = Snapshot::from_iter(vec![
            ("STRING_VALUE", "FOOO"),
            ("INT_VALUE", "10"),
            ("APP_BOOL_VALUE", "true"),
            ("APP_BAR_VALUE", "true"),
        ]);

        assert_eq!(
            snapshot.keys_with_prefix("APP"),
            vec!["APP_BOOL_VALUE", "APP_BAR_VALUE"]
        );
    }
}
