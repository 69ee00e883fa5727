use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::state::AppState;

/// JWT payload. `exp` is only present when a token lifetime is configured;
/// without it tokens never expire.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl_minutes: Option<i64>,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = self
            .ttl_minutes
            .map(|m| (now + TimeDuration::minutes(m)).unix_timestamp() as usize);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        // Tokens issued without a TTL carry no exp claim.
        validation.required_spec_claims.clear();
        validation.validate_exp = self.ttl_minutes.is_some();
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(ttl_minutes: Option<i64>) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(b"dev-secret"),
            decoding: DecodingKey::from_secret(b"dev-secret"),
            ttl_minutes,
        }
    }

    #[test]
    fn signed_token_embeds_user_id() {
        let keys = make_keys(None);
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn token_without_ttl_has_no_exp_and_still_verifies() {
        let keys = make_keys(None);
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert!(claims.exp.is_none());
    }

    #[test]
    fn token_with_ttl_carries_exp() {
        let keys = make_keys(Some(30));
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        let exp = claims.exp.expect("exp claim set");
        assert!(exp > claims.iat);
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let keys = make_keys(None);
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            ttl_minutes: None,
        };
        let token = other.sign(Uuid::new_v4()).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn keys_derive_from_app_state() {
        let state = crate::state::AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        assert!(keys.verify(&token).is_ok());
    }
}
