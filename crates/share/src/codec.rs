use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use foundation::GeoExtent;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// What a share link restores.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SharePayload {
    pub extent: GeoExtent,
    /// Open the link in challenge mode, with the 2D map hidden.
    pub hide_map: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// Not valid base64, not UTF-8, or not the expected JSON shape.
    Malformed(String),
    /// The payload could not be serialized.
    Encoding(String),
    /// Well-formed, but the extent is not a valid geographic box.
    InvalidExtent,
}

impl std::fmt::Display for ShareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareError::Malformed(msg) => write!(f, "malformed share token: {msg}"),
            ShareError::Encoding(msg) => write!(f, "share token encoding failed: {msg}"),
            ShareError::InvalidExtent => write!(f, "share token carries an invalid extent"),
        }
    }
}

impl std::error::Error for ShareError {}

// Wire shape, kept field-for-field compatible with links already in the wild.
#[derive(Debug, Serialize, Deserialize)]
struct WireExtent {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePayload {
    extent: WireExtent,
    #[serde(rename = "hideMap", default, deserialize_with = "truthy")]
    hide_map: bool,
}

// Links written by the web client carry whatever `hideMap` held; any value
// reads as a flag with JavaScript truthiness.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

impl From<&SharePayload> for WirePayload {
    fn from(p: &SharePayload) -> Self {
        WirePayload {
            extent: WireExtent {
                west: p.extent.west,
                south: p.extent.south,
                east: p.extent.east,
                north: p.extent.north,
            },
            hide_map: p.hide_map,
        }
    }
}

impl From<WirePayload> for SharePayload {
    fn from(w: WirePayload) -> Self {
        SharePayload {
            extent: GeoExtent::new(w.extent.west, w.extent.south, w.extent.east, w.extent.north),
            hide_map: w.hide_map,
        }
    }
}

/// Encode a payload into a share token.
///
/// JSON, character order reversed, base64 with the padding stripped.
pub fn encode(payload: &SharePayload) -> Result<String, ShareError> {
    if !payload.extent.is_valid() {
        return Err(ShareError::InvalidExtent);
    }
    let json = serde_json::to_string(&WirePayload::from(payload))
        .map_err(|e| ShareError::Encoding(e.to_string()))?;
    let reversed: String = json.chars().rev().collect();
    Ok(STANDARD_NO_PAD.encode(reversed.as_bytes()))
}

/// Decode a share token produced by [`encode`].
///
/// Also accepts the URL-safe base64 alphabet and tokens that kept their
/// padding. The extent is returned as encoded; it is validated but not
/// normalized.
pub fn decode(token: &str) -> Result<SharePayload, ShareError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ShareError::Malformed("empty token".to_string()));
    }

    let standard: String = token
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let padded = pad_base64(&standard);

    let bytes = STANDARD
        .decode(padded.as_bytes())
        .map_err(|e| ShareError::Malformed(e.to_string()))?;
    let reversed = String::from_utf8(bytes).map_err(|e| ShareError::Malformed(e.to_string()))?;
    let json: String = reversed.chars().rev().collect();

    let wire: WirePayload =
        serde_json::from_str(&json).map_err(|e| ShareError::Malformed(e.to_string()))?;
    let payload = SharePayload::from(wire);
    if !payload.extent.is_valid() {
        return Err(ShareError::InvalidExtent);
    }
    Ok(payload)
}

fn pad_base64(value: &str) -> String {
    let remainder = value.len() % 4;
    if remainder == 0 {
        return value.to_string();
    }
    format!("{value}{}", "=".repeat(4 - remainder))
}
