//! Traffic Light State Machine
//!
//! This example demonstrates a flat cyclic machine driven from JSON.
//!
//! Key concepts:
//! - Declarative JSON state trees
//! - Event-driven transitions between sibling states
//! - Event and path observers
//!
//! Run with: cargo run --example traffic_light

use statecraft::Machine;

const CONFIG: &str = r#"{
    "initial": "red",
    "states": {
        "red": {
            "entry": "stop_traffic",
            "on": { "TIMER": "green" }
        },
        "green": {
            "entry": "release_traffic",
            "on": { "TIMER": "yellow" }
        },
        "yellow": {
            "entry": "warn_traffic",
            "on": { "TIMER": "red" }
        }
    }
}"#;

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let machine = Machine::new(CONFIG).unwrap();
    machine.subscribe_transitions(|path| println!("  light is now: {}", path));
    machine.subscribe_events(|event| println!("  action: {}", event.name));

    machine.start().unwrap();

    println!("\nCycling through four timer ticks:");
    for _ in 0..4 {
        machine.send("TIMER");
    }

    println!("\nFinal state: {}", machine.current_state());
    println!("Path history: {:?}", machine.history().path_sequence());

    println!("\n=== Example Complete ===");
}
