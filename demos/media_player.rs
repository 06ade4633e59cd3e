//! Media Player State Machine
//!
//! This example demonstrates nested states assembled with the fluent builder.
//!
//! Key concepts:
//! - Hierarchical states (playback speed lives inside "playing")
//! - Entry/exit events firing top-down and bottom-up
//! - Innermost-first dispatch: PLAY means different things in different states
//!
//! Run with: cargo run --example media_player

use statecraft::{Machine, StateDefinitionBuilder};

fn build_player() -> Machine {
    let playing = StateDefinitionBuilder::new()
        .entry("start_playback")
        .exit("pause_stream")
        .initial("normal")
        .on("STOP", "stopped")
        .state("normal", StateDefinitionBuilder::new().on("FFWD", "fast"))
        .unwrap()
        .state(
            "fast",
            StateDefinitionBuilder::new()
                .entry("speed_up")
                .exit("speed_reset")
                .on("PLAY", "normal"),
        )
        .unwrap();

    let definition = StateDefinitionBuilder::new()
        .initial("stopped")
        .state(
            "stopped",
            StateDefinitionBuilder::new()
                .entry("show_idle_screen")
                .on("PLAY", "playing"),
        )
        .unwrap()
        .state("playing", playing)
        .unwrap()
        .build()
        .unwrap();

    Machine::from_definition(definition)
}

fn main() {
    println!("=== Media Player State Machine ===\n");

    let machine = build_player();
    machine.subscribe_events(|event| println!("  action: {}", event.name));

    machine.start().unwrap();
    println!("started in: {}\n", machine.current_state());

    println!("PLAY while stopped starts playback:");
    machine.send("PLAY");
    println!("now in: {}\n", machine.current_state());

    println!("FFWD switches speed inside the playing state:");
    machine.send("FFWD");
    println!("now in: {}\n", machine.current_state());

    println!("PLAY while fast-forwarding is captured by the inner level:");
    machine.send("PLAY");
    println!("now in: {}\n", machine.current_state());

    println!("STOP leaves the whole playing branch, exits firing bottom-up:");
    machine.send("STOP");
    println!("now in: {}", machine.current_state());

    println!("\n=== Example Complete ===");
}
