//!
//! Static type visitor.
//!
//! Every type that can appear in a bound structure implements [`Bind`]:
//! records through `#[derive(Bind)]`, indirection and containers through the
//! generic impls below, scalars through the [`leaf!`](crate::leaf) macro.
//!
use crate::{
    assign::Writer,
    discover::{Indexed, Walker},
    error::Error,
    types::{Path, Segment},
};
use chrono::{DateTime, FixedOffset, Utc};
use std::{
    any::{type_name, TypeId},
    collections::{BTreeMap, HashMap},
    hash::Hash,
    path::PathBuf,
    sync::mpsc::{Receiver, Sender, SyncSender},
    time::Duration,
};

pub trait Bind: Sized + 'static {
    /// Collects every value defined below `path` into `walker`.
    fn discover(walker: &mut Walker<'_>, path: &mut Path) -> Result<(), Error>;

    /// Writes `raw` into the slot `path` leads to, starting from `self`.
    fn assign(&mut self, writer: &Writer<'_>, path: &[Segment], raw: &str) -> Result<(), Error>;

    /// Writes `raw` into `self` through the registry, without looking at
    /// its structure. Indirection is allocated on the way.
    fn assign_opaque(&mut self, writer: &Writer<'_>, raw: &str) -> Result<(), Error> {
        writer.convert(self, raw)
    }

    /// Identity of the type once every indirection wrapper is removed.
    fn resolved_type() -> TypeId {
        TypeId::of::<Self>()
    }
}

///
/// Record types, implemented by `#[derive(Bind)]`.
///
/// Only records can be flattened into another record or be the root of a
/// load.
///
pub trait Record: Bind {
    /// Whether `name` is a field of this record, flattened fields included.
    fn has_field(name: &str) -> bool;
}

impl<T> Bind for Option<T>
where
    T: Bind + Default,
{
    #[inline]
    fn discover(walker: &mut Walker<'_>, path: &mut Path) -> Result<(), Error> {
        walker.visit::<T>(path)
    }

    #[inline]
    fn assign(&mut self, writer: &Writer<'_>, path: &[Segment], raw: &str) -> Result<(), Error> {
        self.get_or_insert_with(T::default).assign(writer, path, raw)
    }

    #[inline]
    fn assign_opaque(&mut self, writer: &Writer<'_>, raw: &str) -> Result<(), Error> {
        self.get_or_insert_with(T::default).assign_opaque(writer, raw)
    }

    #[inline]
    fn resolved_type() -> TypeId {
        T::resolved_type()
    }
}

impl<T> Bind for Box<T>
where
    T: Bind,
{
    #[inline]
    fn discover(walker: &mut Walker<'_>, path: &mut Path) -> Result<(), Error> {
        walker.visit::<T>(path)
    }

    #[inline]
    fn assign(&mut self, writer: &Writer<'_>, path: &[Segment], raw: &str) -> Result<(), Error> {
        (**self).assign(writer, path, raw)
    }

    #[inline]
    fn assign_opaque(&mut self, writer: &Writer<'_>, raw: &str) -> Result<(), Error> {
        (**self).assign_opaque(writer, raw)
    }

    #[inline]
    fn resolved_type() -> TypeId {
        T::resolved_type()
    }
}

impl<T> Record for Option<T>
where
    T: Record + Default,
{
    #[inline]
    fn has_field(name: &str) -> bool {
        T::has_field(name)
    }
}

impl<T> Record for Box<T>
where
    T: Record,
{
    #[inline]
    fn has_field(name: &str) -> bool {
        T::has_field(name)
    }
}

impl<T> Bind for Vec<T>
where
    T: Bind + Default,
{
    #[inline]
    fn discover(walker: &mut Walker<'_>, path: &mut Path) -> Result<(), Error> {
        walker.visit_indexed::<T>(path, Indexed::Sequence)
    }

    fn assign(&mut self, writer: &Writer<'_>, path: &[Segment], raw: &str) -> Result<(), Error> {
        let (index, rest) = writer.split_index::<Self>(path)?;

        if let Some(elem) = self.get_mut(index) {
            return elem.assign(writer, rest, raw);
        }

        writer.check_len(index, path)?;

        let mut elem = T::default();
        elem.assign(writer, rest, raw)?;

        // indices may show up in any order, missing ones get a default value
        self.resize_with(index, T::default);
        self.push(elem);
        Ok(())
    }
}

impl<T, const N: usize> Bind for [T; N]
where
    T: Bind,
{
    #[inline]
    fn discover(walker: &mut Walker<'_>, path: &mut Path) -> Result<(), Error> {
        walker.visit_indexed::<T>(path, Indexed::Array(N))
    }

    fn assign(&mut self, writer: &Writer<'_>, path: &[Segment], raw: &str) -> Result<(), Error> {
        let (index, rest) = writer.split_index::<Self>(path)?;

        match self.get_mut(index) {
            Some(elem) => elem.assign(writer, rest, raw),
            None => Err(Error::IndexOutOfBounds {
                index,
                len: N,
                var: writer.var_at(path),
            }),
        }
    }
}

macro_rules! impl_map {
    ($map:ident, $($bound:path),+) => {
        impl<K, V> Bind for $map<K, V>
        where
            K: Bind + Default $(+ $bound)+,
            V: Bind + Default,
        {
            #[inline]
            fn discover(walker: &mut Walker<'_>, path: &mut Path) -> Result<(), Error> {
                walker.visit_indexed::<V>(path, Indexed::Map)
            }

            fn assign(
                &mut self,
                writer: &Writer<'_>,
                path: &[Segment],
                raw: &str,
            ) -> Result<(), Error> {
                let (token, rest) = writer.split_key::<Self>(path)?;

                let mut key = K::default();
                key.assign_opaque(writer, token)?;

                if let Some(elem) = self.get_mut(&key) {
                    return elem.assign(writer, rest, raw);
                }

                // only inserted once the element got its value
                let mut elem = V::default();
                elem.assign(writer, rest, raw)?;
                self.insert(key, elem);
                Ok(())
            }
        }
    };
}

impl_map!(HashMap, Eq, Hash);
impl_map!(BTreeMap, Ord);

///
/// Implements [`Bind`] for scalar types converted by the registry.
///
/// A converter must still be registered for the type, otherwise assignment
/// fails with [`Error::UnsupportedType`].
///
/// ```
/// #[derive(Debug, Default, PartialEq)]
/// struct Port(u16);
///
/// envbind::leaf!(Port);
/// ```
///
#[macro_export]
macro_rules! leaf {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::Bind for $ty {
            #[inline]
            fn discover(
                walker: &mut $crate::Walker<'_>,
                path: &mut $crate::Path,
            ) -> ::std::result::Result<(), $crate::Error> {
                walker.lookup(path)
            }

            #[inline]
            fn assign(
                &mut self,
                writer: &$crate::Writer<'_>,
                path: &[$crate::Segment],
                raw: &str,
            ) -> ::std::result::Result<(), $crate::Error> {
                writer.leaf(self, path, raw)
            }
        }
    )*};
}

leaf!(
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    bool,
    char,
    String,
    PathBuf,
    Duration,
    DateTime<Utc>,
    DateTime<FixedOffset>,
);

/// Kinds that can't be populated from a string: functions, raw pointers,
/// channel endpoints.
macro_rules! unsupported {
    ($(<$($param:ident),*> $ty:ty),* $(,)?) => {$(
        impl<$($param: 'static),*> Bind for $ty {
            fn discover(_walker: &mut Walker<'_>, _path: &mut Path) -> Result<(), Error> {
                Err(Error::UnsupportedType(type_name::<Self>()))
            }

            fn assign(
                &mut self,
                _writer: &Writer<'_>,
                _path: &[Segment],
                _raw: &str,
            ) -> Result<(), Error> {
                Err(Error::UnsupportedType(type_name::<Self>()))
            }

            fn assign_opaque(&mut self, _writer: &Writer<'_>, _raw: &str) -> Result<(), Error> {
                Err(Error::UnsupportedType(type_name::<Self>()))
            }
        }
    )*};
}

unsupported!(
    <R> fn() -> R,
    <A, R> fn(A) -> R,
    <T> *const T,
    <T> *mut T,
    <T> Sender<T>,
    <T> SyncSender<T>,
    <T> Receiver<T>,
);
