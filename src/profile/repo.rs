use sqlx::PgPool;
use uuid::Uuid;

use crate::calculator::UserProfile;

use super::repo_types::ProfileRow;

const COLUMNS: &str = "user_id, weight_kg, height_cm, age_years, gender, activity_level, goal, \
                       bmr_formula, body_fat_pct, target_kcal_override, updated_at";

pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {COLUMNS} FROM profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Domain profile for a user; an absent row reads as an empty profile.
pub async fn fetch_user_profile(db: &PgPool, user_id: Uuid) -> anyhow::Result<UserProfile> {
    Ok(get(db, user_id)
        .await?
        .map(|r| r.to_profile())
        .unwrap_or_default())
}

#[allow(clippy::too_many_arguments)]
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age_years: Option<i32>,
    gender: Option<&str>,
    activity_level: Option<&str>,
    goal: Option<&str>,
    bmr_formula: Option<&str>,
    body_fat_pct: Option<f64>,
    target_kcal_override: Option<i32>,
) -> anyhow::Result<ProfileRow> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        r#"
        INSERT INTO profiles (user_id, weight_kg, height_cm, age_years, gender,
                              activity_level, goal, bmr_formula, body_fat_pct,
                              target_kcal_override, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
        ON CONFLICT (user_id) DO UPDATE SET
            weight_kg = EXCLUDED.weight_kg,
            height_cm = EXCLUDED.height_cm,
            age_years = EXCLUDED.age_years,
            gender = EXCLUDED.gender,
            activity_level = EXCLUDED.activity_level,
            goal = EXCLUDED.goal,
            bmr_formula = EXCLUDED.bmr_formula,
            body_fat_pct = EXCLUDED.body_fat_pct,
            target_kcal_override = EXCLUDED.target_kcal_override,
            updated_at = now()
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(weight_kg)
    .bind(height_cm)
    .bind(age_years)
    .bind(gender)
    .bind(activity_level)
    .bind(goal)
    .bind(bmr_formula)
    .bind(body_fat_pct)
    .bind(target_kcal_override)
    .fetch_one(db)
    .await?;
    Ok(row)
}
