use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AchievementDef {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: String,
    pub criteria_type: String,
    pub criteria_value: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AchievementWithStatus {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: String,
    pub earned_at: Option<OffsetDateTime>,
}

/// Definitions the user has not earned yet.
pub async fn fetch_unearned(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<AchievementDef>> {
    let rows = sqlx::query_as::<_, AchievementDef>(
        "SELECT d.id, d.code, d.title, d.description, d.criteria_type, d.criteria_value
         FROM achievement_definitions d
         WHERE NOT EXISTS (
             SELECT 1 FROM user_achievements ua
             WHERE ua.achievement_id = d.id AND ua.user_id = $1
         )",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_with_status(
    db: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Vec<AchievementWithStatus>> {
    let rows = sqlx::query_as::<_, AchievementWithStatus>(
        "SELECT d.id, d.code, d.title, d.description, ua.earned_at
         FROM achievement_definitions d
         LEFT JOIN user_achievements ua
             ON ua.achievement_id = d.id AND ua.user_id = $1
         ORDER BY d.code",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Idempotent insert. Returns false when the row already existed, which is
/// a success, not an error; concurrent awarding races land here too.
pub async fn award(db: &PgPool, user_id: Uuid, achievement_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        "INSERT INTO user_achievements (user_id, achievement_id)
         VALUES ($1, $2)
         ON CONFLICT (user_id, achievement_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(achievement_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}
