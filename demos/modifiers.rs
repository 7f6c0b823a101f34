//! Modifiers example: buffs and debuffs loaded from JSON
//!
//! This example demonstrates:
//! - Loading modifier specs from a JSON document
//! - Attaching them as scoped transformations
//! - Reporting invalid specs

use inspectable::{InspectError, Inspectable, ModifierSpec};
use tracing_subscriber::EnvFilter;

const BUFFS: &str = r#"[
    { "name": "iron_skin", "modifier": { "op": "add", "amount": 40.0 } },
    { "name": "blessing", "modifier": { "op": "multiply", "factor": 1.25 }, "priority": 5 },
    { "name": "hp_cap", "modifier": { "op": "clamp", "min": 1.0, "max": 300.0 }, "priority": -2147483647 }
]"#;

const BROKEN: &str = r#"[
    { "name": "curse", "modifier": { "op": "clamp", "min": 50.0, "max": 10.0 } }
]"#;

fn main() -> Result<(), InspectError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let hp = Inspectable::new(200);
    let specs = ModifierSpec::from_json(BUFFS)?;

    println!("Applying modifiers to HP {}:", hp.identity());
    let active = specs
        .iter()
        .map(|spec| {
            println!("  {} ({}, priority {})", spec.name, spec.modifier.description(), spec.priority);
            spec.attach_to(&hp, false)
        })
        .collect::<Result<Vec<_>, _>>()?;

    println!("\nHP with modifiers: {}", hp.get_value(true));

    drop(active);
    println!("HP after modifiers expire: {}", hp.get_value(false));

    match ModifierSpec::from_json(BROKEN) {
        Ok(_) => println!("\nUnexpectedly accepted a broken spec"),
        Err(err) => println!("\nRejected: {}", err),
    }

    Ok(())
}
