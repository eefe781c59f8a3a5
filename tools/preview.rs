/// Storyboard preview — compose prompts for a scene file and print them.
///
/// Usage: storyboard_preview --scene <path> [--characters <path>] [--style <path>] [--max-len <n>]
///
/// The scene file is plain UTF-8 prose; characters and style are RON
/// files in the same shape as tests/fixtures/.
use storyboard_engine::core::pipeline::StoryboardEngine;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut scene_path = None;
    let mut characters_path = None;
    let mut style_path = None;
    let mut max_len: Option<usize> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scene" if i + 1 < args.len() => {
                scene_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--characters" if i + 1 < args.len() => {
                characters_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--style" if i + 1 < args.len() => {
                style_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--max-len" if i + 1 < args.len() => {
                match args[i + 1].parse() {
                    Ok(n) => max_len = Some(n),
                    Err(_) => {
                        eprintln!("invalid --max-len value: {}", args[i + 1]);
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            other => {
                eprintln!("unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
    }

    let Some(scene_path) = scene_path else {
        eprintln!("--scene is required");
        print_usage();
        std::process::exit(1);
    };

    let scene_text = match std::fs::read_to_string(&scene_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("failed to read scene file {scene_path}: {e}");
            std::process::exit(1);
        }
    };

    let mut builder = StoryboardEngine::builder();
    if let Some(ref path) = characters_path {
        builder = builder.characters_path(path);
    }
    if let Some(ref path) = style_path {
        builder = builder.style_path(path);
    }
    if let Some(n) = max_len {
        builder = builder.max_prompt_len(n);
    }

    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("failed to build engine: {e}");
            std::process::exit(1);
        }
    };

    match engine.compose(&scene_text) {
        Ok(board) => {
            for block in &board.blocks {
                println!("[{}] {}", block.ordinal, block.moment_summary);
                println!("    {}", block.prompt_body);
                println!();
            }
            for warning in &board.warnings {
                eprintln!("warning: {warning}");
            }
        }
        Err(e) => {
            eprintln!("composition failed: {e}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        "Usage: storyboard_preview --scene <path> [--characters <path>] [--style <path>] [--max-len <n>]"
    );
    println!();
    println!("Composes image prompts for a prose scene and prints the numbered blocks.");
}
