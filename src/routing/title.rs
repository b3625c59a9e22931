use std::fmt;

use crate::errors::WikiError;

/// A validated page title: one or more ASCII letters or digits.
///
/// The title doubles as the storage key, so nothing that could reach the
/// filesystem as a separator, dot, or escape ever gets through `parse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    pub fn parse(raw: &str) -> Result<Self, WikiError> {
        if is_valid_title(raw) {
            Ok(Self(raw.to_string()))
        } else {
            log::debug!("Rejected title: {:?}", raw);
            Err(WikiError::InvalidPath)
        }
    }

    /// A title known to be valid at compile time
    pub(crate) fn from_static(raw: &'static str) -> Self {
        debug_assert!(is_valid_title(raw), "{raw:?} is not a valid title");
        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the file backing this title, `<title>.txt`
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_title(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_alphanumeric())
}
