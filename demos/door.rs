//! Automatic Door
//!
//! This example drives a machine from a simulated frame loop.
//!
//! Key concepts:
//! - Guards over set and pulsed conditions
//! - A decision state that routes without costing a frame
//! - A wildcard transition reachable from every state
//! - Transition logging through `tracing`
//!
//! Run with: RUST_LOG=guardfsm=debug cargo run --example door

use guardfsm::{MachineBuilder, MachineConfig};
use std::cell::Cell;
use std::rc::Rc;
use tracing_subscriber::prelude::*;

const FRAME: f32 = 0.25;

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Automatic Door ===\n");

    let open_time = Rc::new(Cell::new(0.0f32));
    let timer = open_time.clone();
    let reset = open_time.clone();

    let mut door = MachineBuilder::new()
        .config(MachineConfig::default().with_history(Some(32)))
        .state_with("Closed", |s| s.on_enter(|| println!("  door closed")))
        .decision("Sensor")
        .state_with("Open", move |s| {
            s.on_enter(move || {
                reset.set(0.0);
                println!("  door opened");
            })
            .on_tick(move |dt| timer.set(timer.get() + dt))
        })
        .state_with("Locked", |s| s.on_enter(|| println!("  door locked")))
        .transition("Closed", "Sensor", "motion")
        .transition("Sensor", "Closed", "locked")
        .transition("Sensor", "Open", "")
        .transition("Open", "Closed", "timeout & !motion")
        .any_transition("Locked", "lockdown")
        .transition("Locked", "Closed", "unlock")
        .build()
        .unwrap();

    door.begin().unwrap();

    for frame in 0..24 {
        match frame {
            2 | 3 => {
                door.pulse_condition("motion");
            }
            14 => {
                door.pulse_condition("lockdown");
            }
            18 => {
                door.pulse_condition("unlock");
            }
            _ => {}
        }
        door.set_condition("timeout", open_time.get() >= 1.5);

        let resolution = door.evaluate();
        door.tick(FRAME);

        if resolution.changed() {
            tracing::info!(
                frame,
                state = door.current_state_name().unwrap_or("?"),
                hops = resolution.decision_hops,
                "settled"
            );
        }
    }

    door.end();

    println!("\nPath taken:");
    if let Some(history) = door.history() {
        println!("  {}", history.get_path().join(" -> "));
    }
}
