//! Text encoding of leaf values.
//!
//! A [`Codec`] turns a [`Value`] into the text stored in a leaf file and
//! back. Decoding is allowed to fail; the store treats a failure as "no
//! value" and warns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{Error, Result};

/// Leaf content could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeError {
    /// A description of the failure.
    pub message: String,
}

impl DecodeError {
    /// Create a decode error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Encode and decode leaf values.
///
/// # Examples
///
/// ```
/// use metatree::codec::{Codec, JsonCodec};
/// use serde_json::json;
///
/// let codec = JsonCodec;
/// let text = codec.encode(&json!(27)).unwrap();
/// assert_eq!(codec.decode(&text).unwrap(), json!(27));
/// assert!(codec.decode("{not json").is_err());
/// ```
pub trait Codec {
    /// Encode a value to text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the value cannot be represented.
    fn encode(&self, value: &Value) -> Result<String>;

    /// Decode text to a value.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the text is not validly encoded.
    fn decode(&self, text: &str) -> std::result::Result<Value, DecodeError>;
}

/// JSON encoding (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String> {
        serde_json::to_string(value).map_err(|e| Error::Encode {
            message: e.to_string(),
        })
    }

    fn decode(&self, text: &str) -> std::result::Result<Value, DecodeError> {
        serde_json::from_str(text).map_err(|e| DecodeError::new(e.to_string()))
    }
}

/// YAML encoding.
///
/// Since YAML is a superset of JSON, files written by [`JsonCodec`] decode
/// as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn encode(&self, value: &Value) -> Result<String> {
        serde_yaml::to_string(value).map_err(|e| Error::Encode {
            message: e.to_string(),
        })
    }

    fn decode(&self, text: &str) -> std::result::Result<Value, DecodeError> {
        serde_yaml::from_str(text).map_err(|e| DecodeError::new(e.to_string()))
    }
}

/// Which codec a store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecFormat {
    /// [`JsonCodec`].
    #[default]
    Json,
    /// [`YamlCodec`].
    Yaml,
}

impl CodecFormat {
    /// Build the codec for this format.
    #[must_use]
    pub fn codec(self) -> Box<dyn Codec + Send + Sync> {
        match self {
            Self::Json => Box::new(JsonCodec),
            Self::Yaml => Box::new(YamlCodec),
        }
    }
}

impl fmt::Display for CodecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for CodecFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(format!("unknown codec: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_scalars() {
        let codec = JsonCodec;
        assert_eq!(codec.encode(&json!(true)).unwrap(), "true");
        assert_eq!(codec.encode(&json!("X")).unwrap(), "\"X\"");
        assert_eq!(codec.encode(&json!(28.5)).unwrap(), "28.5");
        assert_eq!(codec.encode(&Value::Null).unwrap(), "null");
    }

    #[test]
    fn test_json_decode_failure() {
        let err = JsonCodec.decode("not json at all").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_yaml_reads_json() {
        assert_eq!(YamlCodec.decode("[1, 2]").unwrap(), json!([1, 2]));
        assert_eq!(YamlCodec.decode("\"X\"").unwrap(), json!("X"));
    }

    #[test]
    fn test_yaml_tuple() {
        let text = YamlCodec.encode(&json!([1, "a"])).unwrap();
        assert_eq!(YamlCodec.decode(&text).unwrap(), json!([1, "a"]));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<CodecFormat>().unwrap(), CodecFormat::Json);
        assert_eq!("yml".parse::<CodecFormat>().unwrap(), CodecFormat::Yaml);
        assert!("toml".parse::<CodecFormat>().is_err());
        assert_eq!(CodecFormat::default(), CodecFormat::Json);
    }

    #[test]
    fn test_format_serde() {
        let format: CodecFormat = serde_yaml::from_str("yaml").unwrap();
        assert_eq!(format, CodecFormat::Yaml);
    }
}
