use super::*;
use crate::model::recipe::RecipeStep;

#[test]
fn hook_fallback_without_time_or_cost() {
    let r = Recipe::titled("Soup");
    assert_eq!(hook_text(&r), "Fridge chaos → dinner in 15 min ($)");
}

#[test]
fn hook_fallback_with_time_and_cost() {
    let r = Recipe {
        time_minutes: Some(20),
        cost_dollars: Some(7.5),
        ..Recipe::titled("Soup")
    };
    assert_eq!(hook_text(&r), "Fridge chaos → dinner in 20 min ($7.50)");
}

#[test]
fn explicit_hook_wins_unless_blank() {
    let mut r = Recipe {
        hook: Some("  POV: leftover rice  ".to_string()),
        ..Recipe::titled("Rice")
    };
    assert_eq!(hook_text(&r), "POV: leftover rice");
    r.hook = Some("   ".to_string());
    assert!(hook_text(&r).starts_with("Fridge chaos"));
}

#[test]
fn callouts_capitalize_truncate_and_cap() {
    assert_eq!(callout_text("  spinach ").as_deref(), Some("Spinach"));
    assert_eq!(callout_text(""), None);
    assert_eq!(callout_text("   "), None);
    let long = callout_text("parmigiano reggiano cheese").unwrap();
    assert_eq!(long, "Parmigiano reggiano…");
    assert_eq!(long.chars().count(), 20);
    assert_eq!(
        callout_text("exactly twenty chars").as_deref(),
        Some("Exactly twenty chars")
    );

    let r = Recipe {
        ingredients: ["", "egg", "milk", " ", "flour", "sugar"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ..Recipe::titled("Cake")
    };
    assert_eq!(callouts(&r), vec!["Egg", "Milk", "Flour"]);
}

#[test]
fn step_text_strips_punctuation_and_caps_words() {
    assert_eq!(step_body("Don't overcook!").as_deref(), Some("Dont overcook"));
    assert_eq!(
        step_body("Chop onions, garlic & peppers; then fry them slowly").as_deref(),
        Some("Chop onions garlic peppers then fry")
    );
    assert_eq!(step_body("...!?"), None);
}

#[test]
fn steps_are_renumbered_after_drops_and_capped() {
    let mut steps: Vec<RecipeStep> = vec![RecipeStep::new("!!!"), RecipeStep::new("Boil water")];
    steps.extend((0..8).map(|i| RecipeStep::new(format!("Step {i}"))));
    let r = Recipe {
        steps,
        ..Recipe::titled("Pasta")
    };
    let out = step_texts(&r);
    assert_eq!(out.len(), MAX_STEPS);
    assert_eq!(out[0], "1. Boil water");
    assert_eq!(out[1], "2. Step 0");
    assert!(out.iter().all(|s| s.split_whitespace().count() <= 7));
}

#[test]
fn cta_is_deterministic_per_seed() {
    assert_eq!(cta_text(42), cta_text(42));
    let distinct: std::collections::HashSet<_> = (0..64).map(cta_text).collect();
    assert!(distinct.len() > 1);
}
