use super::*;

fn photo(w: u32, h: u32) -> Raster {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 13 % 256) as u8, (y * 7 % 256) as u8, 90, 255]);
        }
    }
    Raster::from_premul(w, h, data).unwrap()
}

#[test]
fn every_stage_is_clamped_to_the_input_extent() {
    let chain = EffectChain::new()
        .with(Effect::blur(4))
        .with(Effect::color_pop())
        .with(Effect::pan_zoom(1));
    let out = chain.apply(&photo(12, 20), 0.5).unwrap();
    assert!(out.matches_extent(12, 20));
}

#[test]
fn static_prefix_stops_at_first_animated_effect() {
    let chain = EffectChain::new()
        .with(Effect::color_pop())
        .with(Effect::circular_wipe(Point::new(0.0, 0.0), 0.5))
        .with(Effect::blur(2));
    assert_eq!(chain.static_prefix_len(), 1);
    assert_eq!(EffectChain::new().with(Effect::blur(1)).static_prefix_len(), 1);
}

#[test]
fn cached_prefix_matches_full_evaluation() {
    let chain = EffectChain::new()
        .with(Effect::color_pop())
        .with(Effect::pan_zoom(0));
    let input = photo(10, 16);
    let prefix = chain.static_prefix_len();
    let cached = EffectChain {
        effects: chain.effects()[..prefix].iter().cloned().collect(),
    }
    .apply(&input, 0.0)
    .unwrap();
    for p in [0.0, 0.3, 1.0] {
        assert_eq!(
            chain.apply(&input, p).unwrap(),
            chain.apply_range(&cached, prefix, p).unwrap()
        );
    }
}

#[test]
fn wipe_is_hidden_at_start_and_full_after_reveal() {
    let chain = EffectChain::new().with(Effect::circular_wipe(Point::new(0.0, 1.0), 0.5));
    let input = photo(8, 8);
    let start = chain.apply(&input, 0.0).unwrap();
    assert!(start.data.chunks_exact(4).all(|px| px[3] == 0));
    let done = chain.apply(&input, 0.5).unwrap();
    assert_eq!(done, input);
}

#[test]
fn invalid_parameters_are_rejected() {
    assert!(
        Effect::PanZoom {
            from_scale: 0.9,
            to_scale: 1.0,
            direction: PanDirection::Right,
        }
        .validate()
        .is_err()
    );
    assert!(Effect::circular_wipe(Point::new(1.5, 0.0), 0.5).validate().is_err());
    assert!(Effect::circular_wipe(Point::new(0.5, 0.5), 0.0).validate().is_err());
    assert!(EffectChain::new().with(Effect::pan_zoom(3)).validate().is_ok());
}

#[test]
fn in_place_evaluation_matches_and_reuses_buffers() {
    let chain = EffectChain::new()
        .with(Effect::pan_zoom(0))
        .with(Effect::color_pop())
        .with(Effect::circular_wipe(Point::new(0.5, 0.5), 0.8));
    let input = photo(10, 16);
    let expected = chain.effects().iter().fold(input.clone(), |cur, e| {
        e.apply(&cur, 0.4).unwrap().clamp_to(10, 16).unwrap()
    });

    let mut cur = input.clone();
    let mut scratch = vec![0u8; input.data.len()];
    let buffers = [cur.data.as_ptr(), scratch.as_ptr()];
    chain
        .apply_range_in_place(&mut cur, 0, 0.4, &mut scratch)
        .unwrap();
    assert_eq!(cur, expected);
    assert!(buffers.contains(&cur.data.as_ptr()));
    assert!(buffers.contains(&scratch.as_ptr()));
}
