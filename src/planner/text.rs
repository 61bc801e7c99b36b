//! Text derivation shared by every template.

use crate::foundation::math::Rng64;
use crate::model::recipe::Recipe;

/// Minutes assumed when the recipe has no time.
pub const DEFAULT_MINUTES: u32 = 15;
/// Longest callout, ellipsis included.
pub const MAX_CALLOUT_CHARS: usize = 20;
/// Callouts shown per video.
pub const MAX_CALLOUTS: usize = 3;
/// Words kept from a step, before numbering.
pub const MAX_STEP_WORDS: usize = 6;
/// Steps shown per video.
pub const MAX_STEPS: usize = 6;

const CTA_POOL: [&str; 5] = [
    "Save this for tonight",
    "Link in bio for the recipe",
    "What's in YOUR fridge?",
    "Try it and tag us",
    "Follow for more fridge fixes",
];

/// The recipe hook, or the synthesized time and cost line.
pub fn hook_text(recipe: &Recipe) -> String {
    if let Some(hook) = recipe.hook.as_deref().map(str::trim)
        && !hook.is_empty()
    {
        return hook.to_string();
    }
    format!(
        "Fridge chaos → dinner in {} min ({})",
        recipe.time_minutes.unwrap_or(DEFAULT_MINUTES),
        recipe.cost_label()
    )
}

/// On-screen form of one ingredient name; `None` when blank.
pub fn callout_text(ingredient: &str) -> Option<String> {
    let trimmed = ingredient.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let capitalized: String = first.to_uppercase().chain(chars).collect();
    if capitalized.chars().count() <= MAX_CALLOUT_CHARS {
        return Some(capitalized);
    }
    let head: String = capitalized.chars().take(MAX_CALLOUT_CHARS - 1).collect();
    Some(format!("{}…", head.trim_end()))
}

/// Callouts for the first usable ingredients.
pub fn callouts(recipe: &Recipe) -> Vec<String> {
    recipe
        .ingredients
        .iter()
        .filter_map(|i| callout_text(i))
        .take(MAX_CALLOUTS)
        .collect()
}

/// Punctuation-free body of one step, capped at [`MAX_STEP_WORDS`] words; `None` when empty.
pub fn step_body(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != '\'' && c != '’')
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().take(MAX_STEP_WORDS).collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Numbered step lines ("1. ..."), skipping steps that are empty after cleanup.
pub fn step_texts(recipe: &Recipe) -> Vec<String> {
    recipe
        .steps
        .iter()
        .filter_map(|s| step_body(&s.title))
        .take(MAX_STEPS)
        .enumerate()
        .map(|(i, body)| format!("{}. {body}", i + 1))
        .collect()
}

/// Call to action picked deterministically from the pool.
pub fn cta_text(seed: u64) -> &'static str {
    CTA_POOL[Rng64::new(seed).next_index(CTA_POOL.len())]
}

#[cfg(test)]
#[path = "../../tests/unit/planner/text.rs"]
mod tests;
