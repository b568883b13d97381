use jsonwebtoken::TokenData;

use crate::{entities::token::Claims, errors::AuthError};

pub trait TokenVerifier: Send + Sync {
    /// Decodes an access token issued by the auth provider and returns the claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
