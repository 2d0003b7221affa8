use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_LIFETIME_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaim {
    pub id: i32,
    pub username: String,
    pub exp: u64,
}

impl UserClaim {
    pub fn new(id: i32, username: &str) -> UserClaim {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        UserClaim {
            id,
            username: username.to_string(),
            exp: now + TOKEN_LIFETIME_SECS,
        }
    }

    pub fn encode(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn decode(token: &str, secret: &str) -> Result<UserClaim, jsonwebtoken::errors::Error> {
        decode::<UserClaim>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips() {
        let claim = UserClaim::new(42, "JohnDoe");
        let token = claim.encode("secret").unwrap();
        let decoded = UserClaim::decode(&token, "secret").unwrap();

        assert_eq!(decoded.id, 42);
        assert_eq!(decoded.username, "JohnDoe");
        assert_eq!(decoded.exp, claim.exp);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = UserClaim::new(1, "JaneSmith").encode("secret").unwrap();
        assert!(UserClaim::decode(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let claim = UserClaim {
            id: 1,
            username: "JohnDoe".to_string(),
            exp: now - 3600,
        };

        let token = claim.encode("secret").unwrap();
        assert!(UserClaim::decode(&token, "secret").is_err());
    }
}
