use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::AchievementWithStatus;

#[derive(Debug, Serialize)]
pub struct AchievementResponse {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: String,
    pub earned: bool,
    pub earned_at: Option<OffsetDateTime>,
}

impl From<AchievementWithStatus> for AchievementResponse {
    fn from(r: AchievementWithStatus) -> Self {
        Self {
            id: r.id,
            code: r.code,
            title: r.title,
            description: r.description,
            earned: r.earned_at.is_some(),
            earned_at: r.earned_at,
        }
    }
}
