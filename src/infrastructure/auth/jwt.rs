use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};

use crate::entities::token::Claims;
use crate::errors::AuthError;
use crate::repositories::token::TokenVerifier;
use crate::settings::AppConfig;

/// The hosted auth provider signs access tokens with a shared HS256 secret.
pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Verifies access tokens. Tokens are never issued by this service.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &AppConfig) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        if config.jwt_audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&[config.jwt_audience.as_str()]);
        }

        JwtVerifier {
            decoding: config.decoding_key(),
            validation,
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation).map_err(AuthError::from)
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("decoding", &"[REDACTED]")
            .field("algorithm", &JWT_ALGORITHM)
            .finish()
    }
}
