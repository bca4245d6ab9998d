//!
//! Discovery pass.
//!
//! Walks a type, derives the key of every reachable leaf and collects the
//! values present in the [`Source`]. Nothing gets mutated here.
//!
use crate::{
    bind::Bind,
    error::Error,
    key::KeyCodec,
    source::Source,
    types::{Discovered, Path, Segment},
};
use std::any::{type_name, TypeId};
use tracing::trace;

/// Collection kinds whose elements are found by listing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexed {
    /// Fixed length array, indices must be below the length.
    Array(usize),
    /// Growable sequence, any unsigned index.
    Sequence,
    /// Map, keys are kept as they are.
    Map,
}

pub struct Walker<'a> {
    codec: KeyCodec<'a>,
    source: &'a dyn Source,
    max_depth: usize,
    max_len: usize,
    // records currently flattened into the namespace being walked
    flattening: Vec<TypeId>,
    found: Vec<Discovered>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        codec: KeyCodec<'a>,
        source: &'a dyn Source,
        max_depth: usize,
        max_len: usize,
    ) -> Self {
        Self {
            codec,
            source,
            max_depth,
            max_len,
            flattening: vec![],
            found: vec![],
        }
    }

    #[inline]
    pub(crate) fn into_found(self) -> Vec<Discovered> {
        self.found
    }

    /// Discovers `T` at `path`, guarded by the depth limit.
    pub fn visit<T: Bind>(&mut self, path: &mut Path) -> Result<(), Error> {
        if path.len() > self.max_depth {
            return Err(Error::DepthExceeded {
                path: path.to_string(),
                max: self.max_depth,
            });
        }

        T::discover(self, path)
    }

    /// Fails when `T` resolves to the record `R` currently walked.
    pub fn check_recursion<R, T>(&self, field: &'static str) -> Result<(), Error>
    where
        R: 'static,
        T: Bind,
    {
        if T::resolved_type() == TypeId::of::<R>() {
            Err(Error::RecursiveType {
                field,
                ty: type_name::<T>(),
            })
        } else {
            Ok(())
        }
    }

    /// Field `name` of record `R`, adds one segment to the path.
    pub fn field<R, T>(&mut self, name: &'static str, path: &mut Path) -> Result<(), Error>
    where
        R: 'static,
        T: Bind,
    {
        self.check_recursion::<R, T>(name)?;

        path.push(Segment::Field(name));
        let result = self.visit::<T>(path);
        path.pop();

        result
    }

    ///
    /// Flattened field of record `R`, its fields live in `R`'s namespace.
    ///
    /// Flattening doesn't lengthen the path, so the depth guard can't stop a
    /// flatten cycle: a record showing up twice in the flattening chain is
    /// reported as recursive.
    ///
    pub fn flatten<R, T>(&mut self, name: &'static str, path: &mut Path) -> Result<(), Error>
    where
        R: 'static,
        T: Bind,
    {
        self.check_recursion::<R, T>(name)?;

        let resolved = T::resolved_type();
        if self.flattening.contains(&resolved) {
            return Err(Error::RecursiveType {
                field: name,
                ty: type_name::<T>(),
            });
        }

        self.flattening.push(resolved);
        let result = T::discover(self, path);
        self.flattening.pop();

        result
    }

    /// Field `name` of record `R` read as one value, whatever its structure.
    pub fn opaque<R, T>(&mut self, name: &'static str, path: &mut Path) -> Result<(), Error>
    where
        R: 'static,
        T: Bind,
    {
        self.check_recursion::<R, T>(name)?;

        path.push(Segment::Field(name));
        let result = self.lookup(path);
        path.pop();

        result
    }

    /// Reads the value at `path`, an undefined key isn't an error.
    pub fn lookup(&mut self, path: &Path) -> Result<(), Error> {
        let key = self.codec.key_of(path);
        trace!(key = %key, "looking up");

        if let Some(value) = self.source.get(&key) {
            trace!(key = %key, path = %path, "discovered");
            self.found.push(Discovered::new(path.clone(), value));
        }

        Ok(())
    }

    ///
    /// Elements of a collection at `path`.
    ///
    /// The source is asked for every key below the collection's own key, the
    /// next token of those keys gives the element indices or map keys.
    ///
    pub fn visit_indexed<T: Bind>(&mut self, path: &mut Path, kind: Indexed) -> Result<(), Error> {
        let prefix = self.codec.key_of(path);
        let vars = self.source.keys_with_prefix(&prefix);
        let next_keys = self.codec.partition(&prefix, vars);

        let mut tokens = Vec::with_capacity(next_keys.len());

        for var in next_keys {
            let key = self.codec.local_token(&var, &prefix);

            match kind {
                Indexed::Map => tokens.push((0, key)),
                Indexed::Sequence | Indexed::Array(_) => {
                    let index = key.parse::<usize>().map_err(|_| Error::InvalidIndex {
                        key: key.clone(),
                        var: var.clone(),
                    })?;

                    match kind {
                        Indexed::Array(len) if index >= len => {
                            return Err(Error::IndexOutOfBounds { index, len, var });
                        }
                        Indexed::Sequence if index >= self.max_len => {
                            return Err(Error::IndexTooLarge {
                                index,
                                max: self.max_len,
                                var,
                            });
                        }
                        _ => {}
                    }

                    tokens.push((index, key));
                }
            }
        }

        if kind != Indexed::Map {
            // stable, so `01` and `1` keep their listing order
            tokens.sort_by_key(|(index, _)| *index);
        }

        for (_, key) in tokens {
            path.push(Segment::Key(key));
            let result = self.visit::<T>(path);
            path.pop();
            result?;
        }

        Ok(())
    }
}
