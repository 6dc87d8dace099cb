use secrecy::SecretString;

/// Grant type sent to the identity endpoint when exchanging an API key.
pub const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
/// Response type requested from the identity endpoint.
pub const CLOUD_IAM_RESPONSE_TYPE: &str = "cloud_iam";

/// Form body of the API key exchange.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiKeyGrant<'a> {
    grant_type: &'static str,
    apikey: &'a str,
    response_type: &'static str,
}

impl<'a> ApiKeyGrant<'a> {
    pub fn new(apikey: &'a str) -> Self {
        Self {
            grant_type: APIKEY_GRANT_TYPE,
            apikey,
            response_type: CLOUD_IAM_RESPONSE_TYPE,
        }
    }
}

/// Token data returned by the identity endpoint.
///
/// Both tokens are kept as secrets and are redacted from `Debug` output.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct IamToken {
    access_token: SecretString,
    #[serde(default)]
    refresh_token: Option<SecretString>,
    #[serde(default = "default_token_type")]
    token_type: String,
    /// Lifetime in seconds.
    #[serde(default)]
    expires_in: u64,
    /// Expiry as a unix timestamp.
    #[serde(default)]
    expiration: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl IamToken {
    pub fn new(access_token: &str, expires_in: u64, expiration: u64) -> Self {
        Self {
            access_token: SecretString::from(access_token.to_string()),
            refresh_token: None,
            token_type: default_token_type(),
            expires_in,
            expiration,
        }
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    pub fn expiration(&self) -> u64 {
        self.expiration
    }

    pub fn is_expired_at(&self, unix_secs: u64) -> bool {
        self.expiration != 0 && unix_secs >= self.expiration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn grant_serializes_as_form_fields() {
        let json = serde_json::to_value(ApiKeyGrant::new("k-123")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "grant_type": "urn:ibm:params:oauth:grant-type:apikey",
                "apikey": "k-123",
                "response_type": "cloud_iam"
            })
        );
    }

    #[test]
    fn parses_token_response() {
        let body = r#"{
            "access_token": "eyJraWQ",
            "refresh_token": "OKBv",
            "token_type": "Bearer",
            "expires_in": 3600,
            "expiration": 1538434848
        }"#;
        let token: IamToken = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token().expose_secret(), "eyJraWQ");
        assert_eq!(
            token.refresh_token().map(|t| t.expose_secret()),
            Some("OKBv")
        );
        assert_eq!(token.expires_in(), 3600);
        assert!(!token.is_expired_at(1538434847));
        assert!(token.is_expired_at(1538434848));
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let token: IamToken = serde_json::from_str(r#"{ "access_token": "t" }"#).unwrap();
        assert_eq!(token.token_type(), "Bearer");
        assert!(!token.is_expired_at(u64::MAX));
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let body = r#"{ "access_token": "eyJraWQ", "refresh_token": "OKBv" }"#;
        let token: IamToken = serde_json::from_str(body).unwrap();

        let printed = format!("{token:?}");
        assert!(!printed.contains("eyJraWQ"), "{printed}");
        assert!(!printed.contains("OKBv"), "{printed}");
        assert!(printed.contains("REDACTED"), "{printed}");
    }
}
