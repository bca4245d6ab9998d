//!
//! Assignment pass.
//!
//! Replays discovered values onto a live instance: every value walks the
//! structure along its own path, allocating what's missing on the way.
//!
use crate::{
    bind::Bind,
    error::Error,
    key::KeyCodec,
    registry::Registry,
    types::{Discovered, Path, Segment},
};
use std::any::type_name;

pub struct Writer<'a> {
    codec: KeyCodec<'a>,
    registry: &'a Registry,
    current: &'a Path,
    max_len: usize,
}

impl<'a> Writer<'a> {
    #[inline]
    pub(crate) fn new(
        codec: KeyCodec<'a>,
        registry: &'a Registry,
        current: &'a Path,
        max_len: usize,
    ) -> Self {
        Self {
            codec,
            registry,
            current,
            max_len,
        }
    }

    /// Key of the value currently assigned, used in error reports.
    #[inline]
    pub fn var(&self) -> String {
        self.codec.key_of(self.current)
    }

    /// Key of the current path up to and including the first segment of
    /// `remaining`, a suffix of that path.
    pub fn var_at(&self, remaining: &[Segment]) -> String {
        let end = (self.current.len() + 1)
            .saturating_sub(remaining.len())
            .min(self.current.len());

        self.codec.derive_key(&self.current[..end])
    }

    /// Fails when a sequence would have to grow past the configured length.
    pub fn check_len(&self, index: usize, remaining: &[Segment]) -> Result<(), Error> {
        if index >= self.max_len {
            Err(Error::IndexTooLarge {
                index,
                max: self.max_len,
                var: self.var_at(remaining),
            })
        } else {
            Ok(())
        }
    }

    /// Converts `raw` into `slot` through the registry.
    #[inline]
    pub fn convert<T: 'static>(&self, slot: &mut T, raw: &str) -> Result<(), Error> {
        self.registry.convert(slot, raw)
    }

    /// Terminal conversion, `path` must be fully consumed.
    pub fn leaf<T: 'static>(&self, slot: &mut T, path: &[Segment], raw: &str) -> Result<(), Error> {
        match path.first() {
            Some(segment) => Err(Error::TrailingPath(segment.to_string())),
            None => self.convert(slot, raw),
        }
    }

    /// Next segment read as a field name of record `R`.
    pub fn split_field<'p, R: 'static>(
        &self,
        path: &'p [Segment],
    ) -> Result<(&'p str, &'p [Segment]), Error> {
        path.split_first()
            .map(|(head, rest)| (head.as_str(), rest))
            .ok_or_else(|| Error::IncompletePath(type_name::<R>()))
    }

    /// Next segment read as a map key of collection `C`.
    #[inline]
    pub fn split_key<'p, C: 'static>(
        &self,
        path: &'p [Segment],
    ) -> Result<(&'p str, &'p [Segment]), Error> {
        self.split_field::<C>(path)
    }

    /// Next segment read as an index into sequence `C`.
    pub fn split_index<'p, C: 'static>(
        &self,
        path: &'p [Segment],
    ) -> Result<(usize, &'p [Segment]), Error> {
        let (key, rest) = self.split_key::<C>(path)?;
        let index = key.parse::<usize>().map_err(|_| Error::InvalidIndex {
            key: String::from(key),
            var: self.var_at(path),
        })?;

        Ok((index, rest))
    }
}

/// Applies `values` in order, a later value overwrites an earlier one bound
/// to the same slot.
pub(crate) fn assign_values<T: Bind>(
    target: &mut T,
    codec: KeyCodec<'_>,
    registry: &Registry,
    max_len: usize,
    values: &[Discovered],
) -> Result<(), Error> {
    for value in values {
        let writer = Writer::new(codec, registry, &value.path, max_len);
        target.assign(&writer, &value.path, &value.value)?;
    }

    Ok(())
}
