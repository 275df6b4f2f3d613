use std::fmt;

/// Farcaster id of the subscriber that owns an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn parse(id: &str) -> Result<SubscriberId, String> {
        id.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| format!("{} is not a valid subscriber id", id))
    }
}

impl From<u64> for SubscriberId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
