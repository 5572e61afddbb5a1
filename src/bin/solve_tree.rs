//! Backward-induction solver binary.
//!
//! Reads a perfect-information game tree from a JSON file, solves it and
//! prints the result as JSON on stdout. Progress notes go to stderr so the
//! output can be piped.
//!
//! Usage: `solve_tree <tree.json> [--path]`

use std::process;
use std::time::Instant;

use game_theory_core::tree::{solve_perfect_information, ExtensiveFormGame};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(tree_path) = args.next() else {
        eprintln!("Usage: solve_tree <tree.json> [--path]");
        process::exit(2);
    };
    let show_path = args.any(|a| a == "--path");

    let game = match ExtensiveFormGame::from_json_file(&tree_path) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Could not load {}: {}", tree_path, e);
            process::exit(1);
        }
    };
    eprintln!(
        "Loaded tree from {}: {} nodes, players {:?}",
        tree_path,
        game.nodes().len(),
        game.players()
    );

    let start = Instant::now();
    let result = solve_perfect_information(&game);
    eprintln!(
        "Solved {} decision nodes in {:.3}ms",
        result.steps.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    if show_path {
        eprintln!("Equilibrium path: {}", result.equilibrium_path(&game).join(" -> "));
    }

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize result: {}", e);
            process::exit(1);
        }
    }
}
