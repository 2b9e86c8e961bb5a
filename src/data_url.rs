//! `data:<mime>;base64,<payload>` strings, the single image encoding used
//! between the session and the generation client.

use crate::error::{Result, TryOnError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl {
    mime_type: String,
    payload: String,
}

impl DataUrl {
    /// Parses and validates a data URL, including its base64 payload.
    pub fn parse(input: &str) -> Result<Self> {
        let rest = input
            .strip_prefix(SCHEME)
            .ok_or_else(|| malformed("missing 'data:' scheme"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| malformed("missing ',' before the payload"))?;
        let mime_type = meta
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| malformed("only base64 data URLs are supported"))?;

        if mime_type.is_empty() || !mime_type.contains('/') {
            return Err(malformed(format!("invalid MIME type '{}'", mime_type)));
        }

        STANDARD
            .decode(payload)
            .map_err(|e| malformed(format!("payload is not valid base64: {}", e)))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// Reads the whole file and re-encodes it.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| TryOnError::IoError(format!("{}: {}", path.display(), e)))?;
        let mime_type = mime_for_path(path)
            .or_else(|| sniff_mime(&bytes))
            .ok_or_else(|| {
                malformed(format!("{} is not a recognized image type", path.display()))
            })?;

        log::debug!(
            "Encoded {} ({}, {} bytes) as data URL",
            path.display(),
            mime_type,
            bytes.len()
        );
        Ok(Self::from_bytes(mime_type, &bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 text after the comma.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| malformed(format!("payload is not valid base64: {}", e)))
    }

    /// File extension matching the MIME type, for writing images out.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/heic" => "heic",
            "image/heif" => "heif",
            _ => "png",
        }
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{},{}", SCHEME, self.mime_type, BASE64_MARKER, self.payload)
    }
}

impl FromStr for DataUrl {
    type Err = TryOnError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DataUrl {
    type Error = TryOnError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DataUrl> for String {
    fn from(value: DataUrl) -> Self {
        value.to_string()
    }
}

fn malformed(msg: impl Into<String>) -> TryOnError {
    TryOnError::MalformedInput(msg.into())
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
