use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::calculator::{ActivityLevel, BmrFormula, Gender, Goal, UserProfile};

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub bmr_formula: Option<String>,
    pub body_fat_pct: Option<f64>,
    pub target_kcal_override: Option<i32>,
    pub updated_at: OffsetDateTime,
}

impl ProfileRow {
    /// Lenient conversion: unknown enum strings read as unset, which the
    /// calculator then covers with its own defaults.
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age_years: self.age_years.map(f64::from),
            gender: self.gender.as_deref().and_then(Gender::parse),
            activity_level: self.activity_level.as_deref().and_then(ActivityLevel::parse),
            goal: self.goal.as_deref().and_then(Goal::parse),
            bmr_formula: self.bmr_formula.as_deref().and_then(BmrFormula::parse),
            body_fat_pct: self.body_fat_pct,
            target_kcal_override: self.target_kcal_override,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn unknown_enum_strings_read_as_unset() {
        let row = ProfileRow {
            user_id: Uuid::new_v4(),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30),
            gender: Some("attack-helicopter".into()),
            activity_level: Some("couch".into()),
            goal: Some("bulk".into()),
            bmr_formula: Some("made-up".into()),
            body_fat_pct: None,
            target_kcal_override: None,
            updated_at: datetime!(2025-06-01 12:00 UTC),
        };
        let profile = row.to_profile();
        assert!(profile.gender.is_none());
        assert!(profile.activity_level.is_none());
        assert!(profile.goal.is_none());
        assert!(profile.bmr_formula.is_none());

        // Unrecognized activity still produces a TDEE (light multiplier)
        let out = crate::calculator::calculate(&profile);
        assert!((out.tdee.unwrap() - out.bmr.unwrap() * 1.375).abs() < 1e-9);
    }
}
