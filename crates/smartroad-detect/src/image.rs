//! Image references accepted by the detector.
//!
//! A reference is either an inline `data:image/...;base64,` URI or a remote
//! `http(s)://` URL. The supplied string is kept verbatim so it can be stored
//! as a report's `imageUrl`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
  Inline { media_type: String, bytes: Vec<u8> },
  Remote,
}

/// A validated, opaque image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
  raw:    String,
  source: Source,
}

impl ImageRef {
  pub fn parse(raw: impl Into<String>) -> Result<Self> {
    let raw = raw.into();
    let trimmed = raw.trim();

    let source = if let Some(rest) = trimmed.strip_prefix("data:") {
      let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidImage("data URI has no payload".into()))?;
      let media_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| Error::InvalidImage("data URI is not base64-encoded".into()))?;
      if !media_type.starts_with("image/") {
        return Err(Error::InvalidImage(format!("unsupported media type {media_type:?}")));
      }
      let bytes = B64
        .decode(payload)
        .map_err(|e| Error::InvalidImage(format!("bad base64 payload: {e}")))?;
      if bytes.is_empty() {
        return Err(Error::InvalidImage("empty image payload".into()));
      }
      Source::Inline { media_type: media_type.to_owned(), bytes }
    } else if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
      Source::Remote
    } else {
      return Err(Error::InvalidImage("expected a data URI or an http(s) URL".into()));
    };

    Ok(Self { raw, source })
  }

  /// The reference exactly as supplied.
  pub fn as_str(&self) -> &str { &self.raw }

  pub fn media_type(&self) -> Option<&str> {
    match &self.source {
      Source::Inline { media_type, .. } => Some(media_type),
      Source::Remote => None,
    }
  }

  /// SHA-256 hex digest of the image content (inline) or the URL (remote).
  pub fn fingerprint(&self) -> String {
    let mut hasher = Sha256::new();
    match &self.source {
      Source::Inline { bytes, .. } => hasher.update(bytes),
      Source::Remote => hasher.update(self.raw.trim().as_bytes()),
    }
    hex::encode(hasher.finalize())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn data_uri(bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", B64.encode(bytes))
  }

  #[test]
  fn accepts_inline_jpeg() {
    let img = ImageRef::parse(data_uri(b"\xff\xd8\xff\xe0jpeg")).unwrap();
    assert_eq!(img.media_type(), Some("image/jpeg"));
    assert!(img.as_str().starts_with("data:image/jpeg;base64,"));
  }

  #[test]
  fn accepts_remote_url() {
    let img = ImageRef::parse("https://cdn.example/p.png").unwrap();
    assert_eq!(img.media_type(), None);
  }

  #[test]
  fn rejects_non_image_media_type() {
    let raw = format!("data:text/plain;base64,{}", B64.encode(b"hello"));
    assert!(matches!(ImageRef::parse(raw), Err(Error::InvalidImage(_))));
  }

  #[test]
  fn rejects_bad_base64() {
    assert!(matches!(
      ImageRef::parse("data:image/png;base64,!!!"),
      Err(Error::InvalidImage(_))
    ));
  }

  #[test]
  fn rejects_plain_string() {
    assert!(ImageRef::parse("pothole.jpg").is_err());
  }

  #[test]
  fn fingerprint_depends_on_content_only() {
    let a = ImageRef::parse(data_uri(b"same bytes")).unwrap();
    let b = ImageRef::parse(format!("data:image/png;base64,{}", B64.encode(b"same bytes"))).unwrap();
    let c = ImageRef::parse(data_uri(b"other bytes")).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_eq!(a.fingerprint().len(), 64);
  }
}
