//! Built-in document formats.
//!
//! JSON is always available. TOML is enabled by the default `toml` feature
//! and YAML by the `yaml` feature. Selecting a disabled format is not a
//! compile error: decoding and encoding report it at run time instead.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{BoxError, KeymergeResult};
use crate::merge::Merger;

/// A serialisation format understood by [`Merger::merge_format`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Format {
    /// JSON via `serde_json`.
    Json,
    /// TOML via `toml`.
    Toml,
    /// YAML via `serde-saphyr` for reading and `serde_yaml` for writing.
    Yaml,
}

impl Format {
    /// Lowercase format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        }
    }

    /// Map a file extension, without its leading dot, to a format.
    ///
    /// Matching ignores ASCII case; `yml` is accepted for YAML.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Pick a format from the extension of `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use keymerge::Format;
    ///
    /// assert_eq!(Format::from_path("conf/base.YML"), Some(Format::Yaml));
    /// assert_eq!(Format::from_path("Cargo.lock"), None);
    /// ```
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Decode one document.
    ///
    /// # Errors
    ///
    /// Returns the parser's error, or a message naming the cargo feature
    /// when the format was compiled out.
    pub fn decode(self, bytes: &[u8]) -> Result<Value, BoxError> {
        match self {
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            Self::Toml => decode_toml(bytes),
            Self::Yaml => decode_yaml(bytes),
        }
    }

    /// Encode a merged document.
    ///
    /// JSON is pretty-printed. Every format ends with a newline.
    ///
    /// # Errors
    ///
    /// Returns the serialiser's error, for example when a TOML document is
    /// not a table or holds `null`, or a message naming the cargo feature
    /// when the format was compiled out.
    pub fn encode(self, value: &Value) -> Result<Vec<u8>, BoxError> {
        match self {
            Self::Json => {
                let mut out = serde_json::to_vec_pretty(value)?;
                out.push(b'\n');
                Ok(out)
            }
            Self::Toml => encode_toml(value),
            Self::Yaml => encode_yaml(value),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Merger {
    /// Merge documents encoded in `format`, returning the result in the same
    /// format.
    ///
    /// # Errors
    ///
    /// See [`Merger::merge_encoded`].
    ///
    /// # Examples
    ///
    /// ```
    /// use keymerge::{Format, MergeOptions, Merger};
    ///
    /// let merger = Merger::new(MergeOptions::new().with_primary_keys(["name"]))?;
    /// let out = merger.merge_format(
    ///     Format::Json,
    ///     [r#"{"db": {"host": "a"}}"#, r#"{"db": {"port": 5432}}"#],
    /// )?;
    /// assert_eq!(
    ///     String::from_utf8_lossy(&out),
    ///     "{\n  \"db\": {\n    \"host\": \"a\",\n    \"port\": 5432\n  }\n}\n"
    /// );
    /// # Ok::<(), keymerge::KeymergeError>(())
    /// ```
    pub fn merge_format<I, B>(&self, format: Format, docs: I) -> KeymergeResult<Vec<u8>>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        self.merge_encoded(|bytes| format.decode(bytes), |value| format.encode(value), docs)
    }
}

#[cfg(feature = "toml")]
fn decode_toml(bytes: &[u8]) -> Result<Value, BoxError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(toml::from_str(text)?)
}

#[cfg(feature = "toml")]
fn encode_toml(value: &Value) -> Result<Vec<u8>, BoxError> {
    Ok(toml::to_string(value)?.into_bytes())
}

#[cfg(not(feature = "toml"))]
fn decode_toml(_bytes: &[u8]) -> Result<Value, BoxError> {
    Err(disabled(Format::Toml))
}

#[cfg(not(feature = "toml"))]
fn encode_toml(_value: &Value) -> Result<Vec<u8>, BoxError> {
    Err(disabled(Format::Toml))
}

#[cfg(feature = "yaml")]
fn decode_yaml(bytes: &[u8]) -> Result<Value, BoxError> {
    let text = std::str::from_utf8(bytes)?;
    let options = serde_saphyr::Options {
        strict_booleans: true,
        ..serde_saphyr::Options::default()
    };
    Ok(serde_saphyr::from_str_with_options(text, options)?)
}

#[cfg(feature = "yaml")]
fn encode_yaml(value: &Value) -> Result<Vec<u8>, BoxError> {
    Ok(serde_yaml::to_string(value)?.into_bytes())
}

#[cfg(not(feature = "yaml"))]
fn decode_yaml(_bytes: &[u8]) -> Result<Value, BoxError> {
    Err(disabled(Format::Yaml))
}

#[cfg(not(feature = "yaml"))]
fn encode_yaml(_value: &Value) -> Result<Vec<u8>, BoxError> {
    Err(disabled(Format::Yaml))
}

#[cfg(any(not(feature = "toml"), not(feature = "yaml")))]
fn disabled(format: Format) -> BoxError {
    format!("{format} feature disabled: enable the '{format}' feature to support this format")
        .into()
}
