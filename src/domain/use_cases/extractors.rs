use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use uuid::Uuid;
use crate::{entities::token::Claims, errors::AuthError};

/// Extractor for the owner id carried in the token's `sub` claim.
/// Returns 401 if the user is not authenticated.
/// Returns 400 if `sub` is not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct Owner(pub Uuid);

impl FromRequest for Owner {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => match claims.owner_id() {
                Some(id) => ready(Ok(Owner(id))),
                None => ready(Err(AuthError::InvalidUserId.into())),
            },
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}
