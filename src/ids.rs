use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Correlation id for one invocation, backed by ULID.
///
/// Taken from the caller when it supplies a valid ULID, otherwise generated.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(pub ulid::Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Use the first candidate that parses as a ULID; if none does, generate one.
    ///
    /// Platform request ids are usually UUIDs and therefore fall through to a
    /// fresh id. The dispatcher carries them separately as
    /// `RequestContext::platform_request_id` and logs them next to this id.
    #[must_use]
    pub fn from_candidates<'a, I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        candidates
            .into_iter()
            .flatten()
            .find_map(|s| s.trim().parse::<RequestId>().ok())
            .unwrap_or_default()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RequestId(ulid::Ulid::from_string(s)?))
    }
}
