use super::*;

#[test]
fn parses_partial_json() {
    let r = Recipe::from_json_str(
        r#"{"title":"Pasta","steps":[{"title":"Boil water"}],"cost_dollars":7.5}"#,
    )
    .unwrap();
    assert_eq!(r.title, "Pasta");
    assert_eq!(r.steps, vec![RecipeStep::new("Boil water")]);
    assert_eq!(r.cost_dollars, Some(7.5));
    assert!(r.ingredients.is_empty());
    assert!(r.hook.is_none());
}

#[test]
fn bad_json_reports_context() {
    let err = Recipe::from_json_str("{").unwrap_err();
    assert!(err.to_string().contains("parse recipe json"));
}

#[test]
fn blank_title_is_invalid() {
    let err = Recipe::titled("   ").validate().unwrap_err();
    assert!(matches!(err, ReelError::InvalidRecipe(_)));
}

#[test]
fn negative_cost_is_invalid() {
    let r = Recipe {
        cost_dollars: Some(-1.0),
        ..Recipe::titled("Soup")
    };
    assert!(r.validate().is_err());
    assert!(Recipe::titled("Soup").validate().is_ok());
}

#[test]
fn cost_labels() {
    assert_eq!(Recipe::titled("a").cost_label(), "$");
    assert_eq!(format_dollars(7.0), "$7");
    assert_eq!(format_dollars(7.5), "$7.50");
    assert_eq!(format_dollars(12.25), "$12.25");
}

#[test]
fn near_whole_amounts_round_to_cents_first() {
    assert_eq!(format_dollars(7.999), "$8");
    assert_eq!(format_dollars(8.0), "$8");
    assert_eq!(format_dollars(8.004), "$8");
    assert_eq!(format_dollars(4.499), "$4.50");
    assert_eq!(format_dollars(0.1 + 0.2), "$0.30");
}
