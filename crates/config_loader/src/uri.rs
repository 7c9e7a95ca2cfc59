//! Sink descriptor parsing
//!
//! A descriptor is `KEY` or `KEY:VALUE`, where `KEY` names the sink kind and
//! `VALUE` is kind-specific (usually a URL with query options).

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use contracts::ContractError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One parsed sink descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SinkUri {
    key: String,
    value: Option<String>,
}

impl SinkUri {
    /// Descriptor with a bare key and no configuration
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Parse `KEY[:VALUE]`
    ///
    /// Environment references (`$VAR`, `${VAR}`) in the value are expanded.
    ///
    /// # Errors
    /// Returns a validation error when the key is empty.
    pub fn parse(raw: &str) -> Result<Self, ContractError> {
        let (key, value) = match raw.split_once(':') {
            Some((key, value)) => (key, Some(value)),
            None => (raw, None),
        };

        if key.is_empty() {
            return Err(ContractError::config_validation(
                raw,
                format!("missing sink kind in '{raw}'"),
            ));
        }

        let value = value.filter(|v| !v.is_empty()).map(expand_env);

        Ok(Self {
            key: key.to_string(),
            value: value.filter(|v| !v.is_empty()),
        })
    }

    /// Sink kind key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw configuration value, if any
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Query options of the value, in order of appearance
    pub fn options(&self) -> Vec<(String, String)> {
        let Some(query) = self.value().and_then(|v| v.split_once('?')).map(|(_, q)| q) else {
            return Vec::new();
        };

        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }
}

impl fmt::Display for SinkUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}", self.key, value),
            None => f.write_str(&self.key),
        }
    }
}

impl FromStr for SinkUri {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SinkUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SinkUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Ordered list of sink descriptors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SinkUris(Vec<SinkUri>);

impl SinkUris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one descriptor, keeping input order
    pub fn push(&mut self, uri: SinkUri) {
        self.0.push(uri);
    }
}

impl Deref for SinkUris {
    type Target = [SinkUri];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<SinkUri>> for SinkUris {
    fn from(uris: Vec<SinkUri>) -> Self {
        Self(uris)
    }
}

impl FromIterator<SinkUri> for SinkUris {
    fn from_iter<I: IntoIterator<Item = SinkUri>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SinkUris {
    type Item = &'a SinkUri;
    type IntoIter = std::slice::Iter<'a, SinkUri>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SinkUris {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, uri) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{uri}")?;
        }
        Ok(())
    }
}

/// Comma-separated descriptors; blank entries are ignored
impl FromStr for SinkUris {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(SinkUri::parse)
            .collect()
    }
}

/// Expand `$VAR` and `${VAR}` from the process environment
///
/// Unset variables expand to the empty string. A `$` not followed by a
/// variable name is kept as is.
fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&std::env::var(&braced[..end]).unwrap_or_default());
                rest = &braced[end + 1..];
                continue;
            }
        }

        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if name_len == 0 {
            out.push('$');
        } else {
            out.push_str(&std::env::var(&after[..name_len]).unwrap_or_default());
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}
