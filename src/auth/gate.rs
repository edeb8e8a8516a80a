use subtle::{Choice, ConstantTimeEq};

const BASIC_SCHEME: &[u8] = b"Basic";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    Rejected(AuthRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Basic <token>` header at all, or one with another scheme.
    Malformed,
    /// Well-formed header whose token is not on the allow-list.
    Denied,
}

/// Checks `Authorization: Basic <token>` against a fixed allow-list.
///
/// The token is the raw text after the first space, it is not base64-decoded.
/// An empty allow-list lets every request through.
#[derive(Debug, Clone)]
pub struct AuthGate {
    tokens: Vec<Vec<u8>>,
}

impl AuthGate {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().as_bytes().to_vec())
                .collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `header` is the raw Authorization header value, empty when absent.
    pub fn authorize(&self, header: &[u8]) -> AuthDecision {
        if self.is_open() {
            return AuthDecision::Allowed;
        }

        let Some(split) = header.iter().position(|b| *b == b' ') else {
            return AuthDecision::Rejected(AuthRejection::Malformed);
        };
        let (scheme, token) = (&header[..split], &header[split + 1..]);
        if scheme != BASIC_SCHEME {
            return AuthDecision::Rejected(AuthRejection::Malformed);
        }

        // Every candidate is compared, a match does not end the scan early.
        let mut matched = Choice::from(0u8);
        for allowed in &self.tokens {
            matched |= allowed.as_slice().ct_eq(token);
        }

        if bool::from(matched) {
            AuthDecision::Allowed
        } else {
            AuthDecision::Rejected(AuthRejection::Denied)
        }
    }
}
