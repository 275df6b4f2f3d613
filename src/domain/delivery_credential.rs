/// Token and webhook url granted by a client so it can receive push notifications.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeliveryCredential {
    pub token: String,
    pub url: String,
}

impl DeliveryCredential {
    /// Only a complete pair is usable; a lone token or url is ignored.
    pub fn from_parts(token: Option<&str>, url: Option<&str>) -> Option<DeliveryCredential> {
        match (token, url) {
            (Some(token), Some(url)) if !token.is_empty() && !url.is_empty() => {
                Some(DeliveryCredential {
                    token: String::from(token),
                    url: String::from(url),
                })
            }
            _ => None,
        }
    }
}
