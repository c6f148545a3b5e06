use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::member::Member;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub members: Vec<Member>,
    #[serde(with = "chrono::serde::ts_seconds")]
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Group {
    pub fn is_member(&self, uid: &str) -> bool {
        self.members.iter().any(|m| m.uid == uid)
    }

    pub fn member(&self, uid: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.uid == uid)
    }
}
