/// Bridge scene demo — the full pipeline over an in-code scene.
///
/// Run with: cargo run --example bridge_scene
use storyboard_engine::core::pipeline::StoryboardEngine;
use storyboard_engine::schema::character::{Character, CharacterTable};
use storyboard_engine::schema::style::{DirectiveCategory, StyleGuide};

fn main() {
    let mut characters = CharacterTable::new();
    characters.register(Character {
        name: "Mira".to_string(),
        aliases: vec!["the swordswoman".to_string()],
        appearance: vec!["silver armor".to_string(), "braided red hair".to_string()],
        signature_traits: vec!["fearless".to_string()],
    });
    characters.register(Character {
        name: "Kato".to_string(),
        aliases: Vec::new(),
        appearance: vec!["leather vest".to_string(), "nervous eyes".to_string()],
        signature_traits: Vec::new(),
    });

    let mut style = StyleGuide::new();
    style.push(DirectiveCategory::Technique, "ink and wash");
    style.push(DirectiveCategory::Linework, "loose expressive brushwork");
    style.push(DirectiveCategory::Palette, "muted earth tones");
    style.push(DirectiveCategory::Mood, "tense, windswept");

    let engine = StoryboardEngine::builder()
        .with_characters(characters)
        .with_style(style)
        .build()
        .expect("engine construction cannot fail without file loading");

    let scene = "Mira draws her sword. Kato steps back, startled. \
                 Suddenly, the bridge collapses. Mira leaps across the gap. \
                 Kato clings to the edge, terrified.";

    let board = engine.compose(scene).expect("scene has enough beats");

    println!("Storyboard for the bridge scene:\n");
    for block in &board.blocks {
        println!("[{}] {}", block.ordinal, block.moment_summary);
        println!("    {}\n", block.prompt_body);
    }
    for warning in &board.warnings {
        println!("warning: {warning}");
    }
}
