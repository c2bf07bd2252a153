//! BMR / TDEE / daily calorie target calculation.
//!
//! Three BMR formulas are supported. Formula selection silently falls back to
//! Mifflin-St Jeor when a formula's extra inputs are missing: Harris-Benedict
//! needs a gender, Katch-McArdle needs a body-fat percentage strictly inside
//! (0, 100). All outputs stay unrounded `f64`; rounding happens in the DTO
//! layer only.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sedentary" => Some(Self::Sedentary),
            "light" => Some(Self::Light),
            "moderate" => Some(Self::Moderate),
            "active" => Some(Self::Active),
            "very_active" => Some(Self::VeryActive),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Gain,
    Maintain,
}

impl Goal {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lose" => Some(Self::Lose),
            "gain" => Some(Self::Gain),
            "maintain" => Some(Self::Maintain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    MifflinStJeor,
    HarrisBenedict,
    KatchMcArdle,
}

impl BmrFormula {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mifflin_st_jeor" => Some(Self::MifflinStJeor),
            "harris_benedict" => Some(Self::HarrisBenedict),
            "katch_mcardle" => Some(Self::KatchMcArdle),
            _ => None,
        }
    }
}

/// Body metrics and preferences needed by the calculator and advice engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    pub bmr_formula: Option<BmrFormula>,
    pub body_fat_pct: Option<f64>,
    pub target_kcal_override: Option<i32>,
}

/// Calculator output; every field is `None` when the profile lacks the
/// inputs to compute it ("cannot compute, show N/A").
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CalorieTargets {
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub target_kcal: Option<f64>,
}

/// Lowest daily target ever returned, regardless of goal.
const MIN_TARGET_KCAL: f64 = 1200.0;

pub fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age_years: f64, gender: Option<Gender>) -> f64 {
    let gender_constant = match gender {
        Some(Gender::Male) => 5.0,
        Some(Gender::Female) => -161.0,
        _ => -78.0,
    };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + gender_constant
}

/// Revised Harris-Benedict. `None` without a gender; `Other` averages the
/// male and female equations.
pub fn harris_benedict(
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
    gender: Option<Gender>,
) -> Option<f64> {
    let male = 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years + 88.362;
    let female = 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years + 447.593;
    match gender? {
        Gender::Male => Some(male),
        Gender::Female => Some(female),
        Gender::Other => Some((male + female) / 2.0),
    }
}

/// Katch-McArdle. `None` unless body fat is strictly inside (0, 100).
pub fn katch_mcardle(weight_kg: f64, body_fat_pct: Option<f64>) -> Option<f64> {
    let bfp = body_fat_pct?;
    if !(bfp > 0.0 && bfp < 100.0) {
        return None;
    }
    let lean_mass_kg = weight_kg * (1.0 - bfp / 100.0);
    Some(370.0 + 21.6 * lean_mass_kg)
}

/// Compute BMR, TDEE and the goal-adjusted daily target for a profile.
pub fn calculate(profile: &UserProfile) -> CalorieTargets {
    let (Some(w), Some(h), Some(a)) = (profile.weight_kg, profile.height_cm, profile.age_years)
    else {
        return CalorieTargets::default();
    };
    if w <= 0.0 || h <= 0.0 || a <= 0.0 {
        return CalorieTargets::default();
    }

    let bmr = match profile.bmr_formula.unwrap_or(BmrFormula::MifflinStJeor) {
        BmrFormula::MifflinStJeor => mifflin_st_jeor(w, h, a, profile.gender),
        BmrFormula::HarrisBenedict => harris_benedict(w, h, a, profile.gender)
            .unwrap_or_else(|| mifflin_st_jeor(w, h, a, profile.gender)),
        BmrFormula::KatchMcArdle => katch_mcardle(w, profile.body_fat_pct)
            .unwrap_or_else(|| mifflin_st_jeor(w, h, a, profile.gender)),
    };

    // Missing or unrecognized activity level counts as "light"
    let multiplier = profile
        .activity_level
        .map_or(ActivityLevel::Light.multiplier(), ActivityLevel::multiplier);
    let tdee = bmr * multiplier;

    let target = match profile.goal.unwrap_or(Goal::Maintain) {
        Goal::Lose => (tdee - 500.0).max(bmr),
        Goal::Gain => tdee + 300.0,
        Goal::Maintain => tdee,
    }
    .max(MIN_TARGET_KCAL);

    CalorieTargets {
        bmr: Some(bmr),
        tdee: Some(tdee),
        target_kcal: Some(target),
    }
}

/// Round for the API boundary. Internal math stays floating point.
pub fn round_kcal(v: f64) -> i64 {
    v.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_profile() -> UserProfile {
        UserProfile {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30.0),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Sedentary),
            goal: Some(Goal::Maintain),
            bmr_formula: Some(BmrFormula::MifflinStJeor),
            body_fat_pct: None,
            target_kcal_override: None,
        }
    }

    #[test]
    fn mifflin_male_and_female_constants() {
        let male = mifflin_st_jeor(70.0, 175.0, 30.0, Some(Gender::Male));
        assert_eq!(male, 10.0 * 70.0 + 6.25 * 175.0 - 5.0 * 30.0 + 5.0);

        let female = mifflin_st_jeor(70.0, 175.0, 30.0, Some(Gender::Female));
        assert_eq!(female, male - 166.0); // +5 vs -161
    }

    #[test]
    fn mifflin_other_or_unknown_gender_uses_minus_78() {
        let other = mifflin_st_jeor(60.0, 165.0, 25.0, Some(Gender::Other));
        let none = mifflin_st_jeor(60.0, 165.0, 25.0, None);
        assert_eq!(other, none);
        assert_eq!(other, 10.0 * 60.0 + 6.25 * 165.0 - 5.0 * 25.0 - 78.0);
    }

    #[test]
    fn harris_benedict_other_averages_both_equations() {
        let male = harris_benedict(80.0, 180.0, 40.0, Some(Gender::Male)).unwrap();
        let female = harris_benedict(80.0, 180.0, 40.0, Some(Gender::Female)).unwrap();
        let other = harris_benedict(80.0, 180.0, 40.0, Some(Gender::Other)).unwrap();
        assert!((other - (male + female) / 2.0).abs() < 1e-9);
        assert!(harris_benedict(80.0, 180.0, 40.0, None).is_none());
    }

    #[test]
    fn katch_mcardle_rejects_boundary_body_fat() {
        assert!(katch_mcardle(70.0, Some(0.0)).is_none());
        assert!(katch_mcardle(70.0, Some(100.0)).is_none());
        assert!(katch_mcardle(70.0, None).is_none());

        let bmr = katch_mcardle(70.0, Some(20.0)).unwrap();
        assert!((bmr - (370.0 + 21.6 * 56.0)).abs() < 1e-9);
    }

    #[test]
    fn katch_mcardle_without_body_fat_falls_back_to_mifflin() {
        let mut profile = base_profile();
        profile.bmr_formula = Some(BmrFormula::KatchMcArdle);
        profile.body_fat_pct = None;

        let out = calculate(&profile);
        let expected = mifflin_st_jeor(70.0, 175.0, 30.0, Some(Gender::Male));
        assert_eq!(out.bmr, Some(expected));
    }

    #[test]
    fn harris_benedict_without_gender_falls_back_to_mifflin() {
        let mut profile = base_profile();
        profile.bmr_formula = Some(BmrFormula::HarrisBenedict);
        profile.gender = None;

        let out = calculate(&profile);
        let expected = mifflin_st_jeor(70.0, 175.0, 30.0, None);
        assert_eq!(out.bmr, Some(expected));
    }

    #[test]
    fn missing_activity_level_defaults_to_light_multiplier() {
        let mut profile = base_profile();
        profile.activity_level = None;

        let out = calculate(&profile);
        let bmr = out.bmr.unwrap();
        assert!((out.tdee.unwrap() - bmr * 1.375).abs() < 1e-9);
    }

    #[test]
    fn tdee_uses_multiplier_table() {
        let cases = [
            (ActivityLevel::Sedentary, 1.2),
            (ActivityLevel::Light, 1.375),
            (ActivityLevel::Moderate, 1.55),
            (ActivityLevel::Active, 1.725),
            (ActivityLevel::VeryActive, 1.9),
        ];
        for (level, factor) in cases {
            let mut profile = base_profile();
            profile.activity_level = Some(level);
            let out = calculate(&profile);
            assert!((out.tdee.unwrap() - out.bmr.unwrap() * factor).abs() < 1e-9);
        }
    }

    #[test]
    fn lose_target_never_drops_below_bmr_or_floor() {
        let mut profile = base_profile();
        profile.goal = Some(Goal::Lose);
        let out = calculate(&profile);
        let (bmr, tdee, target) = (out.bmr.unwrap(), out.tdee.unwrap(), out.target_kcal.unwrap());
        assert!(target >= bmr);
        assert!(target >= 1200.0);
        assert!((target - (tdee - 500.0).max(bmr).max(1200.0)).abs() < 1e-9);

        // A tiny person: floor at 1200 kicks in
        let small = UserProfile {
            weight_kg: Some(35.0),
            height_cm: Some(140.0),
            age_years: Some(60.0),
            gender: Some(Gender::Female),
            activity_level: Some(ActivityLevel::Sedentary),
            goal: Some(Goal::Lose),
            ..UserProfile::default()
        };
        assert!(calculate(&small).target_kcal.unwrap() >= 1200.0);
    }

    #[test]
    fn gain_and_maintain_targets() {
        let mut profile = base_profile();
        profile.goal = Some(Goal::Gain);
        let out = calculate(&profile);
        assert!((out.target_kcal.unwrap() - (out.tdee.unwrap() + 300.0)).abs() < 1e-9);

        profile.goal = Some(Goal::Maintain);
        let out = calculate(&profile);
        assert_eq!(out.target_kcal, out.tdee);
    }

    #[test]
    fn invalid_body_metrics_yield_all_none() {
        for bad in [
            UserProfile {
                weight_kg: None,
                ..base_profile()
            },
            UserProfile {
                weight_kg: Some(0.0),
                ..base_profile()
            },
            UserProfile {
                height_cm: Some(-170.0),
                ..base_profile()
            },
            UserProfile {
                age_years: Some(0.0),
                ..base_profile()
            },
        ] {
            let out = calculate(&bad);
            assert!(out.bmr.is_none());
            assert!(out.tdee.is_none());
            assert!(out.target_kcal.is_none());
        }
    }

    #[test]
    fn sedentary_maintain_end_to_end() {
        let out = calculate(&base_profile());
        // 10*70 + 6.25*175 - 5*30 + 5 = 1648.75
        assert!((out.bmr.unwrap() - 1648.75).abs() < 1e-9);
        assert!((out.tdee.unwrap() - 1648.75 * 1.2).abs() < 1e-9);
        assert_eq!(round_kcal(out.bmr.unwrap()), 1649);
        assert_eq!(round_kcal(out.tdee.unwrap()), 1979);
        assert_eq!(round_kcal(out.target_kcal.unwrap()), 1979);
    }
}
