//! Speed example: independent modifiers over one value
//!
//! This example demonstrates:
//! - Attaching transformations with priorities
//! - Toggling a transformation and forcing an update
//! - Watching identity and value changes
//! - Scoped buffs that expire at the end of a block
//!
//! Run with `RUST_LOG=inspectable=trace` to see attach/detach events.

use inspectable::{
    ChangeFn, Inspectable, ScopedIdentityChangedFn, ScopedTransformation, ScopedValueChangedFn,
    TransformFn, Transformation, MIN_PRIORITY,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let speed = Inspectable::new(5.0);

    let _value_log = ScopedValueChangedFn::new(
        &speed,
        ChangeFn::new(|_: &Inspectable<f64>, previous: &f64, current: &f64| {
            println!("  speed: {:.2} -> {:.2}", previous, current);
        }),
    );
    let _identity_log = ScopedIdentityChangedFn::new(
        &speed,
        ChangeFn::new(|_: &Inspectable<f64>, previous: &f64, current: &f64| {
            println!("  base speed: {:.2} -> {:.2}", previous, current);
        }),
    );

    println!("Stepping into a mud trap (-1):");
    let mud_trap = Transformation::from_fn(|v: &mut f64| *v -= 1.0);
    speed.add_transformation(&mud_trap, true);

    println!("\nEating a power pill (x1.5):");
    let power_pill = Transformation::from_fn(|v: &mut f64| *v *= 1.5);
    speed.add_transformation(&power_pill, true);

    println!("\nThe pill now applies before the trap:");
    power_pill.set(TransformFn::new(|v: &mut f64| *v *= 1.5), 1, true);
    speed.force_update();

    println!("\nLeaving the mud:");
    mud_trap.disable();
    speed.force_update();

    println!("\nA short sprint (+2, applied last):");
    {
        let _sprint = ScopedTransformation::new(
            &speed,
            TransformFn::new(|v: &mut f64| *v += 2.0),
            MIN_PRIORITY,
            true,
            true,
        )
        .with_update_on_destroy(true);
        println!("  sprinting at {:.2}", speed.get_value(false));
    }

    println!("\nLevelling up the base speed:");
    speed.set_identity(6.0, true);

    println!("\nFinal speed: {:.2}", speed.get_value(false));
}
