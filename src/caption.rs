//! Share caption for a finished reel.

use crate::foundation::math::Rng64;
use crate::model::recipe::{Recipe, format_dollars};

/// Tag carried by every caption.
pub const LEAD_HASHTAG: &str = "#SnapChefChallenge";

/// Rotating tags, three per caption.
pub const HASHTAG_POOL: [&str; 8] = [
    "#WhatsInYourFridge",
    "#ZeroWaste",
    "#HomeCooking",
    "#CookTok",
    "#FoodWaste",
    "#QuickRecipe",
    "#FridgeToTable",
    "#15MinuteMeals",
];

const ROTATED_TAGS: usize = 3;

/// Caption text: title line, time/cost summary when known, then hashtags.
///
/// The rotated tags are a contiguous window of [`HASHTAG_POOL`] picked from `seed`, so the same
/// recipe and seed always produce the same caption.
pub fn caption(recipe: &Recipe, seed: u64) -> String {
    let mut lines = vec![format!("Just made {} with SnapChef! 🍳✨", recipe.title.trim())];

    let mut summary = Vec::new();
    if let Some(m) = recipe.time_minutes {
        summary.push(format!("⏱ {m} min"));
    }
    if let Some(c) = recipe.cost_dollars {
        summary.push(format!("💰 {}", format_dollars(c)));
    }
    if !summary.is_empty() {
        lines.push(summary.join(" · "));
    }

    lines.push(hashtags(seed).join(" "));
    lines.join("\n")
}

/// Lead tag followed by the rotated window for `seed`.
pub fn hashtags(seed: u64) -> Vec<&'static str> {
    let start = Rng64::new(seed).next_index(HASHTAG_POOL.len());
    std::iter::once(LEAD_HASHTAG)
        .chain(
            (0..ROTATED_TAGS).map(|i| HASHTAG_POOL[(start + i) % HASHTAG_POOL.len()]),
        )
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/caption.rs"]
mod tests;
