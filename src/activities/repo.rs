use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::ActivityEffort;

#[derive(Debug, Clone, FromRow)]
pub struct ExerciseRow {
    pub id: Uuid,
    pub name: String,
    pub met: Option<f64>,
    pub kcal_per_minute: Option<f64>,
}

/// Activity log with its exercise definition LEFT-joined.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogRow {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub log_date: Date,
    pub duration_min: f64,
    pub created_at: OffsetDateTime,
    pub exercise_name: Option<String>,
    pub met: Option<f64>,
    pub kcal_per_minute: Option<f64>,
}

impl ActivityLogRow {
    pub fn effort(&self) -> ActivityEffort {
        ActivityEffort {
            duration_min: self.duration_min,
            met: self.met,
            kcal_per_minute: self.kcal_per_minute,
        }
    }
}

const LOG_COLUMNS: &str = "a.id, a.exercise_id, a.log_date, a.duration_min, a.created_at, \
                           e.name AS exercise_name, e.met, e.kcal_per_minute";

pub async fn list_exercises(db: &PgPool) -> anyhow::Result<Vec<ExerciseRow>> {
    let rows = sqlx::query_as::<_, ExerciseRow>(
        "SELECT id, name, met, kcal_per_minute FROM exercises ORDER BY name",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn exercise_exists(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM exercises WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.is_some())
}

pub async fn fetch_for_date(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Vec<ActivityLogRow>> {
    let rows = sqlx::query_as::<_, ActivityLogRow>(&format!(
        "SELECT {LOG_COLUMNS}
         FROM activity_logs a
         LEFT JOIN exercises e ON e.id = a.exercise_id
         WHERE a.user_id = $1 AND a.log_date = $2
         ORDER BY a.created_at",
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn fetch_range(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<ActivityLogRow>> {
    let rows = sqlx::query_as::<_, ActivityLogRow>(&format!(
        "SELECT {LOG_COLUMNS}
         FROM activity_logs a
         LEFT JOIN exercises e ON e.id = a.exercise_id
         WHERE a.user_id = $1 AND a.log_date BETWEEN $2 AND $3
         ORDER BY a.log_date, a.created_at",
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    exercise_id: Uuid,
    date: Date,
    duration_min: f64,
) -> anyhow::Result<ActivityLogRow> {
    let inserted: (Uuid,) = sqlx::query_as(
        "INSERT INTO activity_logs (user_id, exercise_id, log_date, duration_min)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(user_id)
    .bind(exercise_id)
    .bind(date)
    .bind(duration_min)
    .fetch_one(db)
    .await?;

    let row = sqlx::query_as::<_, ActivityLogRow>(&format!(
        "SELECT {LOG_COLUMNS}
         FROM activity_logs a
         LEFT JOIN exercises e ON e.id = a.exercise_id
         WHERE a.id = $1",
    ))
    .bind(inserted.0)
    .fetch_one(db)
    .await?;
    Ok(row)
}
