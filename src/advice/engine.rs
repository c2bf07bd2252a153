//! Stateless rule evaluation.
//!
//! The engine walks the rule bank, keeps entries whose condition holds for
//! the current context, applies throttling for low-priority tips via an
//! injected RNG (seedable, so tests can pin behavior), renders each survivor
//! and returns the list sorted by ascending priority.

use std::collections::HashSet;

use rand::Rng;

use crate::calculator::{self, CalorieTargets, Goal, UserProfile};
use crate::nutrition::{DaySummary, ResolvedItem};

use super::dto::AdviceItem;
use super::rules;

/// Everything a rule may look at for one day.
#[derive(Debug, Clone, Default)]
pub struct DayFacts {
    pub kcal_consumed: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal_burned: f64,
    pub net_kcal: f64,
    /// Kcal per meal slot in slot order (breakfast, lunch, dinner, snack).
    pub slot_kcal: [f64; 4],
    pub item_count: usize,
}

impl DayFacts {
    pub fn from_resolved(summary: &DaySummary, items: &[ResolvedItem]) -> Self {
        Self {
            kcal_consumed: summary.kcal_consumed,
            protein: summary.protein,
            fat: summary.fat,
            carbs: summary.carbs,
            kcal_burned: summary.kcal_burned,
            net_kcal: summary.net_kcal,
            slot_kcal: crate::nutrition::kcal_by_slot(items),
            item_count: items.len(),
        }
    }
}

pub struct AdviceContext<'a> {
    pub profile: &'a UserProfile,
    pub day: &'a DayFacts,
    /// Resolved daily target: override when set and positive, else the
    /// calculator's output, else the configured fallback.
    pub target_kcal: f64,
    /// Raw calculator output, kept around for rules comparing the override
    /// against the computed target.
    pub computed: CalorieTargets,
}

impl<'a> AdviceContext<'a> {
    pub fn new(profile: &'a UserProfile, day: &'a DayFacts, fallback_target: f64) -> Self {
        let computed = calculator::calculate(profile);
        let target_kcal = profile
            .target_kcal_override
            .filter(|v| *v > 0)
            .map(f64::from)
            .or(computed.target_kcal)
            .unwrap_or(fallback_target);
        Self {
            profile,
            day,
            target_kcal,
            computed,
        }
    }

    pub fn goal(&self) -> Option<Goal> {
        self.profile.goal
    }

    /// Whether anything was eaten today. Most intake rules are meaningless
    /// on an empty diary.
    pub fn has_food(&self) -> bool {
        self.day.kcal_consumed > 0.0
    }

    /// Kcal distance from target, positive when over.
    pub fn over_target(&self) -> f64 {
        self.day.net_kcal - self.target_kcal
    }
}

/// Evaluate the rule bank against one context.
pub fn evaluate(ctx: &AdviceContext, rng: &mut impl Rng) -> Vec<AdviceItem> {
    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut items: Vec<AdviceItem> = Vec::new();

    for rule in rules::bank() {
        if !(rule.when)(ctx) {
            continue;
        }
        if let Some(p) = rule.throttle {
            if rng.gen::<f64>() >= p {
                continue;
            }
        }
        if !seen.insert(rule.id) {
            continue;
        }
        items.push(AdviceItem {
            id: rule.id,
            kind: rule.kind,
            priority: rule.priority,
            text: (rule.text)(ctx),
        });
    }

    // Stable sort keeps bank order within a priority
    items.sort_by_key(|a| a.priority);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::dto::AdviceKind;
    use crate::calculator::{ActivityLevel, BmrFormula, Gender};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profile(goal: Goal) -> UserProfile {
        UserProfile {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30.0),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Sedentary),
            goal: Some(goal),
            bmr_formula: Some(BmrFormula::MifflinStJeor),
            body_fat_pct: None,
            target_kcal_override: None,
        }
    }

    fn facts(net_kcal: f64, kcal_burned: f64) -> DayFacts {
        let consumed = net_kcal + kcal_burned;
        DayFacts {
            kcal_consumed: consumed,
            protein: 80.0,
            fat: consumed * 0.3 / 9.0,
            carbs: consumed * 0.45 / 4.0,
            kcal_burned,
            net_kcal,
            slot_kcal: [consumed * 0.25, consumed * 0.35, consumed * 0.3, consumed * 0.1],
            item_count: 6,
        }
    }

    fn fired(ctx: &AdviceContext) -> Vec<&'static str> {
        // Direct condition check, no throttling involved
        rules::bank()
            .iter()
            .filter(|r| (r.when)(ctx))
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn calorie_balance_rules_are_goal_gated() {
        let lose = profile(Goal::Lose);
        let gain = profile(Goal::Gain);

        // target for this profile: max(tdee-500, bmr) = bmr = 1648.75
        let target = AdviceContext::new(&lose, &facts(0.0, 0.0), 2000.0).target_kcal;

        // 600 below target: inside the sustainable band, c3 must NOT fire
        let day = facts(target - 600.0, 0.0);
        let ctx = AdviceContext::new(&lose, &day, 2000.0);
        let ids = fired(&ctx);
        assert!(ids.contains(&"c2"));
        assert!(!ids.contains(&"c1"));
        assert!(!ids.contains(&"c3"));

        // Same numbers with goal=gain: none of the lose rules fire
        let ctx = AdviceContext::new(&gain, &day, 2000.0);
        let ids = fired(&ctx);
        assert!(!ids.contains(&"c1"));
        assert!(!ids.contains(&"c2"));
        assert!(!ids.contains(&"c3"));
    }

    #[test]
    fn aggressive_deficit_fires_c3_not_c2() {
        let lose = profile(Goal::Lose);
        let target = AdviceContext::new(&lose, &facts(0.0, 0.0), 2000.0).target_kcal;

        let day = facts(target - 800.0, 0.0);
        let ctx = AdviceContext::new(&lose, &day, 2000.0);
        let ids = fired(&ctx);
        assert!(ids.contains(&"c3"));
        assert!(!ids.contains(&"c2"));
        assert!(!ids.contains(&"c1"));
    }

    #[test]
    fn over_target_while_losing_fires_c1_only() {
        let lose = profile(Goal::Lose);
        let target = AdviceContext::new(&lose, &facts(0.0, 0.0), 2000.0).target_kcal;

        let day = facts(target + 200.0, 0.0);
        let ctx = AdviceContext::new(&lose, &day, 2000.0);
        let ids = fired(&ctx);
        assert!(ids.contains(&"c1"));
        assert!(!ids.contains(&"c2"));
        assert!(!ids.contains(&"c3"));
    }

    #[test]
    fn target_resolution_prefers_positive_override() {
        let mut p = profile(Goal::Maintain);
        p.target_kcal_override = Some(1800);
        let day = facts(1500.0, 0.0);
        assert_eq!(AdviceContext::new(&p, &day, 2000.0).target_kcal, 1800.0);

        // Non-positive override is ignored
        p.target_kcal_override = Some(0);
        let ctx = AdviceContext::new(&p, &day, 2000.0);
        assert_eq!(ctx.target_kcal, ctx.computed.target_kcal.unwrap());
    }

    #[test]
    fn target_falls_back_when_profile_cannot_be_computed() {
        let p = UserProfile::default();
        let day = facts(1500.0, 0.0);
        let ctx = AdviceContext::new(&p, &day, 2000.0);
        assert_eq!(ctx.target_kcal, 2000.0);
    }

    #[test]
    fn output_is_sorted_by_priority() {
        let lose = profile(Goal::Lose);
        let day = facts(800.0, 0.0); // low net intake plus deficit warnings
        let ctx = AdviceContext::new(&lose, &day, 2000.0);
        let mut rng = StdRng::seed_from_u64(7);
        let items = evaluate(&ctx, &mut rng);
        assert!(!items.is_empty());
        for pair in items.windows(2) {
            assert!(pair[0].priority <= pair[1].priority);
        }
    }

    #[test]
    fn seeded_rng_makes_throttled_output_reproducible() {
        let p = profile(Goal::Maintain);
        let target = AdviceContext::new(&p, &facts(0.0, 0.0), 2000.0).target_kcal;
        let day = facts(target, 0.0);
        let ctx = AdviceContext::new(&p, &day, 2000.0);

        let a = evaluate(&ctx, &mut StdRng::seed_from_u64(42));
        let b = evaluate(&ctx, &mut StdRng::seed_from_u64(42));
        let ids_a: Vec<_> = a.iter().map(|i| i.id).collect();
        let ids_b: Vec<_> = b.iter().map(|i| i.id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn unthrottled_rules_survive_any_seed() {
        let lose = profile(Goal::Lose);
        let target = AdviceContext::new(&lose, &facts(0.0, 0.0), 2000.0).target_kcal;
        let day = facts(target + 400.0, 0.0);
        let ctx = AdviceContext::new(&lose, &day, 2000.0);

        for seed in 0..20 {
            let items = evaluate(&ctx, &mut StdRng::seed_from_u64(seed));
            assert!(
                items.iter().any(|i| i.id == "c1" && i.kind == AdviceKind::Warning),
                "c1 must fire regardless of seed"
            );
        }
    }

    #[test]
    fn rule_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for rule in rules::bank() {
            assert!(seen.insert(rule.id), "duplicate rule id {}", rule.id);
            assert!((1..=3).contains(&rule.priority), "bad priority on {}", rule.id);
            if let Some(p) = rule.throttle {
                assert!((0.0..=1.0).contains(&p), "bad throttle on {}", rule.id);
            }
        }
        assert!(seen.len() >= 40, "rule bank unexpectedly small: {}", seen.len());
    }
}
