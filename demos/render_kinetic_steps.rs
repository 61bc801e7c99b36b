use std::path::{Path, PathBuf};

use snapreel::{
    MediaBundle, Recipe, RecipeStep, RenderConfig, RenderEngine, RenderRequest, Rgba8Premul,
    StillImage, Template, is_ffmpeg_on_path, plan,
};

fn gradient(w: u32, h: u32, top: [u8; 3], bottom: [u8; 3]) -> anyhow::Result<StillImage> {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        let t = f64::from(y) / f64::from(h.max(2) - 1);
        for _ in 0..w {
            for c in 0..3 {
                let v = f64::from(top[c]) * (1.0 - t) + f64::from(bottom[c]) * t;
                data.push(v.round() as u8);
            }
            data.push(255);
        }
    }
    Ok(StillImage::from_premul(w, h, data)?)
}

fn load_or(path: Option<&String>, fallback: StillImage) -> anyhow::Result<StillImage> {
    match path {
        Some(p) => Ok(StillImage::open(Path::new(p))?),
        None => Ok(fallback),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    // Optional: render_kinetic_steps [before.jpg] [after.jpg]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let before = load_or(args.first(), gradient(540, 960, [40, 52, 70], [12, 16, 22])?)?;
    let after = load_or(args.get(1), gradient(540, 960, [230, 170, 80], [120, 50, 20])?)?;

    let recipe = Recipe {
        steps: [
            "Dice the peppers and onion",
            "Whisk four eggs with soy sauce",
            "Fry the cold rice until crisp",
            "Fold in the eggs and greens",
            "Season, plate and serve hot!",
        ]
        .into_iter()
        .map(RecipeStep::new)
        .collect(),
        time_minutes: Some(15),
        cost_dollars: Some(7.0),
        ingredients: vec!["day-old rice".into(), "eggs".into(), "bell pepper".into()],
        ..Recipe::titled("Fridge Fried Rice")
    };
    let media = MediaBundle {
        before: Some(before),
        after: Some(after),
        plated_meal: Some(StillImage::solid(
            4,
            4,
            Rgba8Premul::from_straight_rgba(200, 120, 50, 255),
        )?),
        ..MediaBundle::default()
    };
    let config = RenderConfig::default();

    let summary = plan(Template::KineticSteps, &recipe, &media, &config)?.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !is_ffmpeg_on_path() {
        eprintln!("render_kinetic_steps: ffmpeg not found on PATH, skipping the MP4 export");
        return Ok(());
    }

    let output_path = PathBuf::from("target/snapreel_demo/kinetic_steps.mp4");
    let out = RenderEngine::default().render(RenderRequest {
        context: "demo".to_string(),
        template: Template::KineticSteps,
        recipe,
        media,
        config,
        output_path,
    })?;

    println!(
        "wrote {} ({} bytes, {} frames, {:.2}s)",
        out.path.display(),
        out.stats.export.size_bytes,
        out.stats.composite.frames,
        out.stats.total.as_secs_f64()
    );
    println!("\n{}", out.caption);
    Ok(())
}
