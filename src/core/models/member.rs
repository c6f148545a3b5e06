use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::UNKNOWN_MEMBER;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Member {
    pub uid: String,
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl Member {
    /// Presentation label: display name, falling back to email, then the placeholder.
    pub fn label(&self) -> &str {
        if !self.display_name.is_empty() {
            &self.display_name
        } else if !self.email.is_empty() {
            &self.email
        } else {
            UNKNOWN_MEMBER
        }
    }
}
