//!
//! Conversion registry.
//!
//! Maps a leaf type to the function turning a raw string into a value of
//! that type. The registry is keyed by exact [`TypeId`]: `Option<u8>` and
//! `u8` are different entries, though the walker always strips indirection
//! before reaching a converter.
//!
use crate::{
    de::StrDeserializer,
    error::{BoxError, Error},
    value::{parse_bool, parse_duration, parse_signed, parse_unsigned},
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::de::DeserializeOwned;
use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fmt,
    path::PathBuf,
    str::FromStr,
    sync::Arc,
    time::Duration,
};

type ConvertFn = dyn Fn(&str, &mut dyn Any) -> Result<(), BoxError> + Send + Sync;

#[derive(Clone)]
struct Converter {
    name: &'static str,
    convert: Arc<ConvertFn>,
}

#[derive(Clone, Default)]
pub struct Registry {
    converters: HashMap<TypeId, Converter>,
}

macro_rules! register_numbers {
    ($registry:expr, $parse:ident => $($ty:ty),*) => {
        $( $registry.register::<$ty, _, _>($parse::<$ty>); )*
    };
}

impl Registry {
    /// An empty registry, without any converter.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with converters for integers, floats, `bool`, `char`,
    /// `String`, `PathBuf`, RFC 3339 timestamps and duration literals.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        register_numbers!(registry, parse_signed => i8, i16, i32, i64, i128, isize);
        register_numbers!(registry, parse_unsigned => u8, u16, u32, u64, u128, usize);

        registry
            .register_from_str::<f32>()
            .register_from_str::<f64>()
            .register_from_str::<char>()
            .register::<bool, _, _>(parse_bool)
            .register::<String, _, _>(|raw| Ok::<_, BoxError>(String::from(raw)))
            .register::<PathBuf, _, _>(|raw| Ok::<_, BoxError>(PathBuf::from(raw)))
            .register::<Duration, _, _>(parse_duration)
            .register::<DateTime<FixedOffset>, _, _>(DateTime::parse_from_rfc3339)
            .register::<DateTime<Utc>, _, _>(|raw| {
                DateTime::parse_from_rfc3339(raw).map(|date| date.with_timezone(&Utc))
            });

        registry
    }

    ///
    /// Registers `parse` as the converter of `T`, replacing any previous one.
    ///
    /// ```
    /// use envbind::Registry;
    ///
    /// let mut registry = Registry::with_defaults();
    /// registry.register::<Vec<String>, _, _>(|raw| {
    ///     Ok::<_, std::convert::Infallible>(raw.split(',').map(String::from).collect())
    /// });
    ///
    /// assert!(registry.contains::<Vec<String>>());
    /// ```
    ///
    pub fn register<T, F, E>(&mut self, parse: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let name = type_name::<T>();
        let convert = move |raw: &str, slot: &mut dyn Any| -> Result<(), BoxError> {
            // slot is checked before anything gets parsed
            let slot = slot
                .downcast_mut::<T>()
                .ok_or_else(|| format!("cannot write a {} into this slot", name))?;

            match parse(raw) {
                Ok(value) => {
                    *slot = value;
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        };

        self.converters.insert(
            TypeId::of::<T>(),
            Converter {
                name,
                convert: Arc::new(convert),
            },
        );
        self
    }

    /// Registers `T`'s [`FromStr`] implementation.
    #[inline]
    pub fn register_from_str<T>(&mut self) -> &mut Self
    where
        T: FromStr + 'static,
        T::Err: Into<BoxError>,
    {
        self.register::<T, _, _>(T::from_str)
    }

    ///
    /// Registers a converter deserializing `T` out of the raw string with
    /// [`StrDeserializer`]: unit enums, newtypes and comma separated
    /// sequences work out of the box.
    ///
    pub fn register_serde<T>(&mut self) -> &mut Self
    where
        T: DeserializeOwned + 'static,
    {
        self.register::<T, _, _>(|raw| T::deserialize(StrDeserializer::new(raw)))
    }

    #[inline]
    pub fn contains<T: 'static>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// Parses `raw` and writes the result into `slot`.
    pub(crate) fn convert<T: 'static>(&self, slot: &mut T, raw: &str) -> Result<(), Error> {
        let converter = self
            .converters
            .get(&TypeId::of::<T>())
            .ok_or_else(|| Error::UnsupportedType(type_name::<T>()))?;

        (converter.convert)(raw, slot as &mut dyn Any).map_err(Error::Conversion)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut names = self
            .converters
            .values()
            .map(|converter| converter.name)
            .collect::<Vec<_>>();
        names.sort_unstable();

        fmt.debug_struct("Registry").field("converters", &names).finish()
    }
}
