/// Destination of the announcement webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub webhook_id: String,
    pub webhook_token: String,
    pub enabled: bool,
}

impl Endpoint {
    pub fn new(webhook_id: impl Into<String>, webhook_token: impl Into<String>) -> Self {
        let webhook_id = webhook_id.into();
        let webhook_token = webhook_token.into();
        let enabled = !webhook_id.is_empty() && !webhook_token.is_empty();

        Self {
            webhook_id,
            webhook_token,
            enabled,
        }
    }

    /// Both credentials must be present, regardless of the enabled flag.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.webhook_id.is_empty() && !self.webhook_token.is_empty()
    }

    pub fn destination_path(&self) -> String {
        format!("/api/webhooks/{}/{}", self.webhook_id, self.webhook_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_path_includes_id_and_token() {
        let endpoint = Endpoint::new("123", "abc");

        assert_eq!(endpoint.destination_path(), "/api/webhooks/123/abc");
        assert!(endpoint.is_usable());
    }

    #[test]
    fn empty_credential_is_not_usable() {
        assert!(!Endpoint::new("", "abc").is_usable());
        assert!(!Endpoint::new("123", "").is_usable());

        let forced = Endpoint {
            webhook_id: String::new(),
            webhook_token: "abc".to_string(),
            enabled: true,
        };
        assert!(!forced.is_usable());
    }
}
