use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims of an access token issued by the hosted auth provider.
/// `sub` is the owner id every library query is scoped to.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

impl Claims {
    pub fn owner_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}
