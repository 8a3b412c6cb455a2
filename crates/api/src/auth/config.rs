use crate::config::{parse_or, ConfigError};

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expiration_minutes: u64,
}

impl AuthConfig {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            jwt_secret: lookup("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            access_token_expiration_minutes: parse_or(
                lookup,
                "ACCESS_TOKEN_EXPIRATION_MINUTES",
                15,
            )?,
        })
    }
}
