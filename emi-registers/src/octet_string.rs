use std::borrow::Cow;
use std::fmt;

/// Octets read from a register block, exactly as many as were requested.
///
/// The content is not NUL terminated and may contain NUL bytes; the length is
/// always the one asked for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OctetString(Vec<u8>);

impl OctetString {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Text up to the first NUL octet.
    pub fn trimmed_text(&self) -> Cow<'_, str> {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(self.0.len());
        String::from_utf8_lossy(&self.0[..end])
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
