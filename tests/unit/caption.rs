use super::*;

#[test]
fn full_caption_has_summary_and_four_tags() {
    let recipe = Recipe {
        time_minutes: Some(15),
        cost_dollars: Some(7.5),
        ..Recipe::titled("Fried Rice")
    };
    let text = caption(&recipe, 3);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Just made Fried Rice with SnapChef! 🍳✨");
    assert_eq!(lines[1], "⏱ 15 min · 💰 $7.50");
    assert!(lines[2].starts_with(LEAD_HASHTAG));
    assert_eq!(lines[2].split(' ').count(), 4);
}

#[test]
fn summary_line_is_skipped_when_nothing_is_known() {
    let text = caption(&Recipe::titled("Toast"), 0);
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn hashtags_are_deterministic_and_distinct() {
    assert_eq!(hashtags(42), hashtags(42));
    for seed in 0..32 {
        let tags = hashtags(seed);
        let mut unique = tags.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), tags.len());
    }
}

#[test]
fn rotation_covers_the_whole_pool() {
    let mut seen = std::collections::HashSet::new();
    for seed in 0..256 {
        seen.extend(hashtags(seed).into_iter().skip(1));
    }
    assert_eq!(seen.len(), HASHTAG_POOL.len());
}
