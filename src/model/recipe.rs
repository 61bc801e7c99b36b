use crate::foundation::error::{ReelError, ReelResult};

/// One cooking step as supplied by the recipe source.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecipeStep {
    /// Step instruction.
    pub title: String,
    /// Suggested on-screen time in seconds, if the source knows one.
    #[serde(default)]
    pub duration_hint_secs: Option<f64>,
}

impl RecipeStep {
    /// Step with no duration hint.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duration_hint_secs: None,
        }
    }
}

/// Recipe description consumed by the planner.
///
/// Built once per render request by the caller and never mutated by the engine.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Recipe {
    /// Recipe name.
    pub title: String,
    /// Opening line; synthesized from time and cost when absent.
    pub hook: Option<String>,
    /// Ordered cooking steps.
    pub steps: Vec<RecipeStep>,
    /// Total time in minutes.
    pub time_minutes: Option<u32>,
    /// Ingredient cost in dollars.
    pub cost_dollars: Option<f64>,
    /// Calories per serving.
    pub calories: Option<u32>,
    /// Ordered ingredient names.
    pub ingredients: Vec<String>,
}

impl Recipe {
    /// Recipe with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Parse a recipe from JSON.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        use anyhow::Context as _;
        let recipe: Self = serde_json::from_str(s).context("parse recipe json")?;
        Ok(recipe)
    }

    /// Check the data every template needs.
    pub fn validate(&self) -> ReelResult<()> {
        if self.title.trim().is_empty() {
            return Err(ReelError::invalid_recipe("recipe title must not be blank"));
        }
        if let Some(cost) = self.cost_dollars
            && (!cost.is_finite() || cost < 0.0)
        {
            return Err(ReelError::invalid_recipe(
                "recipe cost must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Cost formatted for on-screen text, `$` when unknown.
    pub fn cost_label(&self) -> String {
        match self.cost_dollars {
            Some(c) => format_dollars(c),
            None => "$".to_string(),
        }
    }
}

/// Whole amounts print without cents, fractional amounts with two decimals.
///
/// The amount is rounded to cents first, so `7.999` prints as `$8`.
pub fn format_dollars(v: f64) -> String {
    let cents = (v * 100.0).round();
    if cents % 100.0 == 0.0 {
        format!("${:.0}", cents / 100.0)
    } else {
        format!("${:.2}", cents / 100.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/recipe.rs"]
mod tests;
