//! Overview
//!
//! Paths locate a value inside a bound structure, [`Discovered`] pairs a path
//! with the raw string found for it.
//!
use std::{fmt, ops::Deref};

///
/// One step of a [`Path`].
///
/// Field names are tokenized into words when a key is derived from them,
/// keys (map keys or sequence indices) are used as a single token.
///
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Segment {
    Field(&'static str),
    Key(String),
}

impl Segment {
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Field(name) => name,
            Self::Key(key) => key,
        }
    }
}

impl fmt::Display for Segment {
    #[inline]
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

///
/// Route from the root of a structure to a leaf or a collection element.
///
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Path {
    inner: Vec<Segment>,
}

impl Path {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, segment: Segment) {
        self.inner.push(segment)
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Segment> {
        self.inner.pop()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Segment] {
        &self.inner
    }
}

impl Deref for Path {
    type Target = [Segment];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S> FromIterator<S> for Path
where
    S: Into<Segment>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&'static str> for Segment {
    #[inline]
    fn from(name: &'static str) -> Self {
        Self::Field(name)
    }
}

impl From<String> for Segment {
    #[inline]
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for (idx, segment) in self.inner.iter().enumerate() {
            if idx > 0 {
                fmt.write_str(".")?;
            }
            segment.fmt(fmt)?;
        }
        Ok(())
    }
}

///
/// A raw value found in the source, together with the path it binds to.
///
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Discovered {
    pub path: Path,
    pub value: String,
}

impl Discovered {
    pub fn new<S>(path: Path, value: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            path,
            value: value.into(),
        }
    }
}

impl PartialOrd for Discovered {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Discovered {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // natural segment order, then value
        self.path
            .cmp(&other.path)
            .then_with(|| self.value.cmp(&other.value))
    }
}

#[cfg(test)]
mod test {
    use super::{Discovered, Path, Segment};

    #[test]
    fn test_path_display() {
        let path = Path::from_iter(vec![
            Segment::Field("config"),
            Segment::Key("0".to_string()),
            Segment::Field("string_value"),
        ]);

        assert_eq!(path.to_string(), "config.0.string_value");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_discovered_ordering() {
        let mut values = vec![
            Discovered::new(Path::from_iter(vec!["b"]), "2"),
            Discovered::new(Path::from_iter(vec!["a"]), "1"),
        ];
        values.sort();

        assert_eq!(values[0].value, "1");
        assert_eq!(values[1].path[0], Segment::Field("b"));
    }
}
