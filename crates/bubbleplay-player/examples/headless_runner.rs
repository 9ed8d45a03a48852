//! Headless runner: plays the sample dataset once through, prints each year's
//! bubble count, then checks that a second run renders the same frames.
//!
//! Run with: `cargo run --package bubbleplay-player --example headless_runner`

use std::path::Path;

use bubbleplay_player::{PlayOptions, Session};

fn main() {
    let config = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/bubbleplay.toml"));

    let mut session = Session::open(config).expect("failed to open session");
    let years = session.controller().dataset().len() as u64;
    let interval = 100;
    let options = PlayOptions {
        duration_ms: years * interval,
        step_ms: 16,
        frame_every_ms: interval,
    };

    println!("=== Sample dataset: {years} years ===");
    let mut run1 = Vec::new();
    let summary = session
        .play(options, |frame| {
            let circles = frame.svg.matches("<circle").count();
            println!(
                "  frame {:>3} @ {:>5} ms: year {:?}, {circles} bubbles",
                frame.number, frame.elapsed_ms, frame.year
            );
            run1.push(frame.svg.clone());
            Ok(())
        })
        .expect("playback failed");
    println!(
        "Played {} ticks, {} frames, ended on {:?}\n",
        summary.ticks, summary.frames, summary.final_year
    );

    // Run 2: determinism check
    let mut session = Session::open(config).expect("failed to open session (run 2)");
    let mut run2 = Vec::new();
    session
        .play(options, |frame| {
            run2.push(frame.svg.clone());
            Ok(())
        })
        .expect("playback failed (run 2)");

    if run1 == run2 {
        println!("Determinism: PASS ({} frames match)", run1.len());
    } else {
        println!("Determinism: FAIL!");
        std::process::exit(1);
    }
}
