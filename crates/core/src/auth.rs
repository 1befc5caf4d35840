use std::fmt::{Debug, Formatter, Write};

use sha2::{Digest, Sha256};

/// Opaque bearer token presented by an anonymous document viewer.
///
/// The raw value is a secret: `Debug` output is redacted and logs should use
/// [`AccessToken::fingerprint`] instead.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    /// Parses a presented token, rejecting empty or whitespace-only input.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            return None;
        }

        Some(Self(value.to_owned()))
    }

    /// Returns the raw token value for store lookups.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Returns a short, non-reversible identifier safe to emit in logs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        digest
            .iter()
            .take(6)
            .fold(String::with_capacity(12), |mut acc, byte| {
                let _ = write!(acc, "{byte:02x}");
                acc
            })
    }
}

impl Debug for AccessToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "AccessToken({})", self.fingerprint())
    }
}

/// Compares two shared secrets without short-circuiting on the first differing byte.
#[must_use]
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    presented
        .iter()
        .zip(expected.iter())
        .fold(0_u8, |diff, (left, right)| diff | (left ^ right))
        == 0
}
