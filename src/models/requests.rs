use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::ClientPreferences;

/// Request to rank artists for a client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(length(min = 1, message = "clientId is required"))]
    #[serde(alias = "client_id", rename = "clientId", default)]
    pub client_id: String,
    #[serde(default)]
    pub preferences: Option<ClientPreferences>,
}
