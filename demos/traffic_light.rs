//! Traffic Light State Machine
//!
//! A cyclic machine driven by a fixed-length frame loop. Each light stays
//! lit for a number of ticks, then the loop moves the machine to the next
//! light by name.
//!
//! Run with: RUST_LOG=tickfsm=debug cargo run --example traffic_light

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tickfsm::{MachineBuilder, MachineError, StateBuilder};
use tracing_subscriber::EnvFilter;

const CYCLE: [(&str, usize); 3] = [("red", 4), ("green", 3), ("yellow", 1)];

fn main() -> Result<(), MachineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let lit_for = Arc::new(AtomicUsize::new(0));

    let mut builder = MachineBuilder::new();
    for (i, (name, _)) in CYCLE.iter().enumerate() {
        let on_enter = Arc::clone(&lit_for);
        let on_update = Arc::clone(&lit_for);
        let state = StateBuilder::new()
            .name(*name)
            .on_enter(move || on_enter.store(0, Ordering::SeqCst))
            .on_update(move || {
                on_update.fetch_add(1, Ordering::SeqCst);
            })
            .on_exit(|| {});
        builder = if i == 0 {
            builder.start(state)
        } else {
            builder.state(state)
        };
    }
    let mut machine = builder.build()?;

    machine.subscribe(|change| println!("  {:>6} {}", change.transition, change.state));

    let mut position = 0;
    for frame in 0..20 {
        machine.tick()?;

        let (_, duration) = CYCLE[position];
        if lit_for.load(Ordering::SeqCst) >= duration {
            position = (position + 1) % CYCLE.len();
            println!("frame {frame:>2}: switching");
            machine.to(CYCLE[position].0)?;
        }
    }

    println!("\nLights entered, oldest first:");
    println!("  {}", machine.history().path().join(" -> "));

    println!("\n=== Example Complete ===");
    Ok(())
}
