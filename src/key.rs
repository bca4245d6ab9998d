//!
//! Key codec.
//!
//! Turns a [`Path`] into the name of a variable, and reverse-engineers the
//! next structural level (indices, map keys) out of a flat list of names.
//!
use crate::types::{Path, Segment};
use heck::ToSnakeCase;
use indexmap::IndexSet;

/// Splits an identifier into its constituent words.
pub type Tokenizer = fn(&str) -> Vec<String>;

///
/// Default [`Tokenizer`], splits on case boundaries and underscores.
///
/// `IAmBatman` gives `[i, am, batman]`, `string_value` gives `[string, value]`.
///
pub fn words(ident: &str) -> Vec<String> {
    ident
        .to_snake_case()
        .split('_')
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct KeyCodec<'a> {
    prefix: &'a str,
    separator: &'a str,
    tokenizer: Tokenizer,
}

impl<'a> KeyCodec<'a> {
    #[inline]
    pub fn new(prefix: &'a str, separator: &'a str, tokenizer: Tokenizer) -> Self {
        Self {
            prefix,
            separator,
            tokenizer,
        }
    }

    /// `UPPER([PREFIX SEP] WORDS(seg0) SEP WORDS(seg1) ...)`
    pub fn derive_key(&self, path: &[Segment]) -> String {
        let mut tokens = Vec::with_capacity(path.len() + 1);

        if !self.prefix.is_empty() {
            tokens.extend((self.tokenizer)(self.prefix));
        }

        for segment in path {
            match segment {
                Segment::Field(name) => tokens.extend((self.tokenizer)(name)),
                Segment::Key(key) => tokens.push(key.clone()),
            }
        }

        tokens.join(self.separator).to_uppercase()
    }

    #[inline]
    fn lead(&self, prefix: &str) -> String {
        if prefix.is_empty() {
            String::new()
        } else {
            format!("{}{}", prefix, self.separator)
        }
    }

    /// First token following `prefix`, `None` when `key` isn't below `prefix`.
    fn next_token<'k>(&self, key: &'k str, prefix: &str) -> Option<&'k str> {
        let rest = key.strip_prefix(self.lead(prefix).as_str())?;

        rest.split(self.separator)
            .next()
            .filter(|token| !token.is_empty())
    }

    ///
    /// Keys one level below `prefix`, de-duplicated in first-seen order.
    ///
    /// `CONFIG_APP` with `[CONFIG_APP_BATMAN_FOO, CONFIG_APP_ROBIN_FOO,
    /// CONFIG_APP_BATMAN_BAR]` gives `[CONFIG_APP_BATMAN, CONFIG_APP_ROBIN]`.
    ///
    pub fn partition<I, S>(&self, prefix: &str, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lead = self.lead(prefix);

        keys.into_iter()
            .filter_map(|key| {
                self.next_token(key.as_ref(), prefix)
                    .map(|token| format!("{}{}", lead, token))
            })
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Lower-cased first token of `key` after `prefix`.
    pub fn local_token(&self, key: &str, prefix: &str) -> String {
        self.next_token(key, prefix)
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    /// Same as [`derive_key`](Self::derive_key) for a whole [`Path`].
    #[inline]
    pub fn key_of(&self, path: &Path) -> String {
        self.derive_key(path.as_slice())
    }
}
