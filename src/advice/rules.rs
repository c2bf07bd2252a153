//! The advice rule bank.
//!
//! Each entry is data plus two plain function pointers: a condition and a
//! text renderer. Rules never fail; a condition that lacks the data it needs
//! simply evaluates to false. Throttled entries are low-priority tips shown
//! only on a fraction of requests.

use crate::calculator::{round_kcal, ActivityLevel, BmrFormula, Goal};

use super::dto::AdviceKind;
use super::engine::AdviceContext;

pub type Condition = fn(&AdviceContext) -> bool;
pub type Render = fn(&AdviceContext) -> String;

pub struct Rule {
    pub id: &'static str,
    pub priority: u8,
    pub kind: AdviceKind,
    /// Probability of showing the rule when its condition holds.
    pub throttle: Option<f64>,
    pub when: Condition,
    pub text: Render,
}

pub fn bank() -> &'static [Rule] {
    &RULES
}

fn heavy_training(ctx: &AdviceContext) -> bool {
    matches!(
        ctx.profile.activity_level,
        Some(ActivityLevel::Active | ActivityLevel::VeryActive)
    )
}

fn macro_sample_big_enough(ctx: &AdviceContext) -> bool {
    // Macro-share rules are noise on a nearly empty diary
    ctx.has_food() && ctx.day.kcal_consumed >= 800.0
}

static RULES: [Rule; 44] = [
    // --- calorie balance, goal: lose ---
    Rule {
        id: "c1",
        priority: 1,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| ctx.goal() == Some(Goal::Lose) && ctx.has_food() && ctx.over_target() > 0.0,
        text: |ctx| {
            format!(
                "You're {} kcal over your daily target. A lighter dinner or a walk could close the gap.",
                round_kcal(ctx.over_target())
            )
        },
    },
    Rule {
        id: "c2",
        priority: 3,
        kind: AdviceKind::Praise,
        throttle: None,
        when: |ctx| {
            ctx.goal() == Some(Goal::Lose)
                && ctx.has_food()
                && ctx.over_target() <= 0.0
                && ctx.over_target() >= -700.0
        },
        text: |_| "Nice work, you're in a sustainable calorie deficit today.".into(),
    },
    Rule {
        id: "c3",
        priority: 1,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| ctx.goal() == Some(Goal::Lose) && ctx.has_food() && ctx.over_target() < -700.0,
        text: |ctx| {
            format!(
                "You're {} kcal below target. Deficits this steep tend to backfire; eat a bit more.",
                round_kcal(-ctx.over_target())
            )
        },
    },
    // --- calorie balance, goal: gain ---
    Rule {
        id: "g1",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| ctx.goal() == Some(Goal::Gain) && ctx.has_food() && ctx.over_target() < -300.0,
        text: |ctx| {
            format!(
                "You're {} kcal short of your surplus target. An extra snack would help you get there.",
                round_kcal(-ctx.over_target())
            )
        },
    },
    Rule {
        id: "g2",
        priority: 3,
        kind: AdviceKind::Praise,
        throttle: None,
        when: |ctx| {
            ctx.goal() == Some(Goal::Gain) && ctx.has_food() && ctx.over_target().abs() <= 300.0
        },
        text: |_| "Right in your surplus zone today. Keep it up.".into(),
    },
    Rule {
        id: "g3",
        priority: 2,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| ctx.goal() == Some(Goal::Gain) && ctx.has_food() && ctx.over_target() > 500.0,
        text: |ctx| {
            format!(
                "You're {} kcal past your surplus target; much of the extra will be stored as fat.",
                round_kcal(ctx.over_target())
            )
        },
    },
    // --- calorie balance, goal: maintain ---
    Rule {
        id: "m1",
        priority: 3,
        kind: AdviceKind::Praise,
        throttle: None,
        when: |ctx| {
            ctx.goal() == Some(Goal::Maintain) && ctx.has_food() && ctx.over_target().abs() <= 150.0
        },
        text: |_| "Spot on: today's intake matches your maintenance target.".into(),
    },
    Rule {
        id: "m2",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| {
            ctx.goal() == Some(Goal::Maintain) && ctx.has_food() && ctx.over_target() > 300.0
        },
        text: |ctx| {
            format!(
                "You're {} kcal above maintenance today. Fine occasionally, worth watching as a trend.",
                round_kcal(ctx.over_target())
            )
        },
    },
    Rule {
        id: "m3",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| {
            ctx.goal() == Some(Goal::Maintain) && ctx.has_food() && ctx.over_target() < -300.0
        },
        text: |ctx| {
            format!(
                "You're {} kcal below maintenance. If you're not trying to lose weight, eat a bit more.",
                round_kcal(-ctx.over_target())
            )
        },
    },
    // --- general intake level ---
    Rule {
        id: "k1",
        priority: 1,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| ctx.has_food() && ctx.day.net_kcal < 1000.0,
        text: |ctx| {
            format!(
                "Net intake is only {} kcal. That's too little for most adults; please eat more.",
                round_kcal(ctx.day.net_kcal)
            )
        },
    },
    Rule {
        id: "k2",
        priority: 1,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| ctx.has_food() && ctx.day.kcal_consumed > 2.0 * ctx.target_kcal,
        text: |ctx| {
            format!(
                "You've logged more than double your daily target ({} kcal). Double-check the portions.",
                round_kcal(ctx.day.kcal_consumed)
            )
        },
    },
    Rule {
        id: "k3",
        priority: 1,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| ctx.has_food() && ctx.day.kcal_burned > ctx.day.kcal_consumed,
        text: |_| {
            "You burned more calories than you ate today. Underfueling hurts recovery; add a meal."
                .into()
        },
    },
    Rule {
        id: "k4",
        priority: 2,
        kind: AdviceKind::Info,
        throttle: None,
        when: |ctx| ctx.day.item_count == 0,
        text: |_| "Nothing logged yet today. Add your meals to see how you're tracking.".into(),
    },
    // --- protein ---
    Rule {
        id: "pr1",
        priority: 2,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| {
            ctx.has_food()
                && ctx
                    .profile
                    .weight_kg
                    .map_or(false, |w| ctx.day.protein < 0.8 * w)
        },
        text: |ctx| {
            let need = ctx.profile.weight_kg.unwrap_or(0.0) * 0.8;
            format!(
                "Protein is low: {:.0}g so far, aim for at least {:.0}g a day.",
                ctx.day.protein, need
            )
        },
    },
    Rule {
        id: "pr2",
        priority: 3,
        kind: AdviceKind::Praise,
        throttle: None,
        when: |ctx| {
            ctx.goal() == Some(Goal::Gain)
                && ctx.has_food()
                && ctx
                    .profile
                    .weight_kg
                    .map_or(false, |w| ctx.day.protein >= 1.6 * w)
        },
        text: |_| "Great protein intake for building muscle.".into(),
    },
    Rule {
        id: "pr3",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| {
            ctx.has_food()
                && ctx
                    .profile
                    .weight_kg
                    .map_or(false, |w| ctx.day.protein > 3.0 * w)
        },
        text: |_| {
            "That's a lot of protein. Beyond roughly 2g per kg there's little extra benefit.".into()
        },
    },
    // --- fat ---
    Rule {
        id: "f1",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| {
            macro_sample_big_enough(ctx) && ctx.day.fat * 9.0 > 0.40 * ctx.day.kcal_consumed
        },
        text: |ctx| {
            let pct = ctx.day.fat * 9.0 / ctx.day.kcal_consumed * 100.0;
            format!(
                "{:.0}% of today's calories come from fat. Swapping some for protein or carbs may help.",
                pct
            )
        },
    },
    Rule {
        id: "f2",
        priority: 2,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| {
            macro_sample_big_enough(ctx) && ctx.day.fat * 9.0 < 0.15 * ctx.day.kcal_consumed
        },
        text: |_| {
            "Fat intake is very low today. Essential fats matter; nuts, fish or olive oil are easy adds."
                .into()
        },
    },
    // --- carbs ---
    Rule {
        id: "cb1",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| {
            macro_sample_big_enough(ctx) && ctx.day.carbs * 4.0 > 0.65 * ctx.day.kcal_consumed
        },
        text: |ctx| {
            let pct = ctx.day.carbs * 4.0 / ctx.day.kcal_consumed * 100.0;
            format!(
                "Carbs make up {:.0}% of today's calories. Adding protein would balance things out.",
                pct
            )
        },
    },
    Rule {
        id: "cb2",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| {
            macro_sample_big_enough(ctx)
                && heavy_training(ctx)
                && ctx
                    .profile
                    .weight_kg
                    .map_or(false, |w| ctx.day.carbs < 3.0 * w)
        },
        text: |_| {
            "Carbs look low for your training load. Fueling workouts usually needs 3g+ per kg.".into()
        },
    },
    Rule {
        id: "cb3",
        priority: 3,
        kind: AdviceKind::Praise,
        throttle: None,
        when: |ctx| {
            if !macro_sample_big_enough(ctx) {
                return false;
            }
            let kcal = ctx.day.kcal_consumed;
            let protein_share = ctx.day.protein * 4.0 / kcal;
            let fat_share = ctx.day.fat * 9.0 / kcal;
            (0.20..=0.35).contains(&protein_share) && (0.20..=0.35).contains(&fat_share)
        },
        text: |_| "Macros are nicely balanced today.".into(),
    },
    // --- meal structure ---
    Rule {
        id: "ms1",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| ctx.has_food() && ctx.day.slot_kcal[0] == 0.0,
        text: |_| {
            "No breakfast logged. If you skipped it, a protein-rich breakfast can curb evening hunger."
                .into()
        },
    },
    Rule {
        id: "ms2",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| ctx.has_food() && ctx.day.slot_kcal[2] > 0.5 * ctx.day.kcal_consumed,
        text: |ctx| {
            let pct = ctx.day.slot_kcal[2] / ctx.day.kcal_consumed * 100.0;
            format!(
                "Dinner carries {:.0}% of today's calories. Spreading intake earlier often helps.",
                pct
            )
        },
    },
    Rule {
        id: "ms3",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| ctx.has_food() && ctx.day.slot_kcal[3] > 0.3 * ctx.day.kcal_consumed,
        text: |ctx| {
            let pct = ctx.day.slot_kcal[3] / ctx.day.kcal_consumed * 100.0;
            format!(
                "Snacks make up {:.0}% of today's intake. Worth checking what's sneaking in between meals.",
                pct
            )
        },
    },
    Rule {
        id: "ms4",
        priority: 3,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| ctx.has_food() && ctx.day.item_count == 1,
        text: |_| {
            "Only one item logged so far. Logging everything keeps your numbers honest.".into()
        },
    },
    // --- exercise ---
    Rule {
        id: "e1",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| ctx.goal() == Some(Goal::Lose) && ctx.has_food() && ctx.day.kcal_burned == 0.0,
        text: |_| {
            "No activity logged today. Even a 20-minute walk makes the deficit easier to hold.".into()
        },
    },
    Rule {
        id: "e2",
        priority: 3,
        kind: AdviceKind::Praise,
        throttle: None,
        when: |ctx| ctx.day.kcal_burned >= 500.0,
        text: |ctx| {
            format!(
                "Big training day: {} kcal burned.",
                round_kcal(ctx.day.kcal_burned)
            )
        },
    },
    Rule {
        id: "e3",
        priority: 2,
        kind: AdviceKind::Suggestion,
        throttle: None,
        when: |ctx| {
            heavy_training(ctx)
                && ctx.goal() != Some(Goal::Lose)
                && ctx.has_food()
                && ctx.day.kcal_burned == 0.0
        },
        text: |_| {
            "Your profile says you train hard, but no activity is logged today. Log workouts to keep net calories accurate."
                .into()
        },
    },
    Rule {
        id: "e4",
        priority: 1,
        kind: AdviceKind::Warning,
        throttle: None,
        when: |ctx| ctx.day.kcal_burned > 1500.0,
        text: |ctx| {
            format!(
                "{} kcal burned is unusually high. Double-check today's activity entries.",
                round_kcal(ctx.day.kcal_burned)
            )
        },
    },
    // --- profile completeness ---
    Rule {
        id: "pf1",
        priority: 2,
        kind: AdviceKind::Info,
        throttle: None,
        when: |ctx| {
            ctx.profile.weight_kg.is_none()
                || ctx.profile.height_cm.is_none()
                || ctx.profile.age_years.is_none()
        },
        text: |_| {
            "Fill in weight, height and age to get a calorie target computed for you.".into()
        },
    },
    Rule {
        id: "pf2",
        priority: 2,
        kind: AdviceKind::Info,
        throttle: None,
        when: |ctx| {
            ctx.profile.bmr_formula == Some(BmrFormula::KatchMcArdle)
                && !ctx
                    .profile
                    .body_fat_pct
                    .map_or(false, |b| b > 0.0 && b < 100.0)
        },
        text: |_| {
            "Katch-McArdle needs a body-fat percentage; until you set one, Mifflin-St Jeor is used."
                .into()
        },
    },
    Rule {
        id: "pf3",
        priority: 2,
        kind: AdviceKind::Info,
        throttle: None,
        when: |ctx| {
            ctx.profile.bmr_formula == Some(BmrFormula::HarrisBenedict)
                && ctx.profile.gender.is_none()
        },
        text: |_| {
            "Harris-Benedict needs a gender on your profile; until you set one, Mifflin-St Jeor is used."
                .into()
        },
    },
    Rule {
        id: "pf4",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: None,
        when: |ctx| {
            match (ctx.profile.target_kcal_override, ctx.computed.target_kcal) {
                (Some(o), Some(t)) if o > 0 => (f64::from(o) - t).abs() > 400.0,
                _ => false,
            }
        },
        text: |ctx| {
            format!(
                "Your manual target differs a lot from the computed {} kcal. Make sure that's intentional.",
                round_kcal(ctx.computed.target_kcal.unwrap_or_default())
            )
        },
    },
    Rule {
        id: "pf5",
        priority: 2,
        kind: AdviceKind::Info,
        throttle: None,
        when: |ctx| ctx.goal().is_none(),
        text: |_| {
            "Pick a goal (lose, gain or maintain) so your daily target can be adjusted for it.".into()
        },
    },
    // --- occasional tips, throttled ---
    Rule {
        id: "t1",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Thirst is easy to mistake for hunger. Keep a glass of water nearby.".into(),
    },
    Rule {
        id: "t2",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Vegetables add volume and fiber for very few calories. Hard to overeat broccoli.".into(),
    },
    Rule {
        id: "t3",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Logging every day, even imperfectly, beats logging perfectly now and then.".into(),
    },
    Rule {
        id: "t4",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Weigh yourself at the same time of day and watch the weekly trend, not single readings.".into(),
    },
    Rule {
        id: "t5",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Short sleep raises hunger hormones. A consistent bedtime quietly supports any goal.".into(),
    },
    Rule {
        id: "t6",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Spreading protein across meals works better than loading it all into dinner.".into(),
    },
    Rule {
        id: "t7",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Minimally processed foods keep you fuller per calorie than ultra-processed ones.".into(),
    },
    Rule {
        id: "t8",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Deciding tomorrow's meals tonight removes a lot of impulsive choices.".into(),
    },
    Rule {
        id: "t9",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Eating slowly gives fullness signals time to catch up. Twenty minutes per meal is a good floor.".into(),
    },
    Rule {
        id: "t10",
        priority: 3,
        kind: AdviceKind::Info,
        throttle: Some(0.3),
        when: |_| true,
        text: |_| "Liquid calories barely register as food. Check what your drinks add up to.".into(),
    },
];
