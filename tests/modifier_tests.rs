use inspectable::{InspectError, Inspectable, Modifier, ModifierSpec, Transformation};

const BUFFS: &str = r#"[
    { "name": "mud_trap", "modifier": { "op": "add", "amount": -1.0 } },
    { "name": "power_pill", "modifier": { "op": "multiply", "factor": 1.5 }, "priority": 10 },
    { "name": "speed_cap", "modifier": { "op": "clamp", "max": 6.0 }, "priority": -2147483647 },
    { "name": "frozen", "modifier": { "op": "override", "value": 0.0 }, "enabled": false }
]"#;

/// Specs loaded from JSON drive an inspectable end to end.
#[test]
fn test_json_specs_applied_in_priority_order() {
    let specs = ModifierSpec::from_json(BUFFS).unwrap();
    assert_eq!(specs.len(), 4);

    let speed = Inspectable::new(5.0);
    let transformations: Vec<Transformation<f64>> = specs
        .iter()
        .map(|spec| spec.to_transformation().unwrap())
        .collect();
    for t in &transformations {
        speed.add_transformation(t, false);
    }

    // 5 * 1.5 = 7.5, -1 = 6.5, clamp to 6; the override is disabled
    assert_eq!(speed.get_value(true), 6.0);

    transformations[3].enable();
    assert_eq!(speed.get_value(true), 0.0);
}

/// Attached specs detach and recompute when dropped.
#[test]
fn test_attach_to_is_scoped() {
    let hp = Inspectable::new(100);
    let armor = ModifierSpec::new("armor", Modifier::add(25.0));
    {
        let _armor = armor.attach_to(&hp, true).unwrap();
        assert_eq!(hp.get_value(false), 125);
    }
    assert_eq!(hp.get_value(false), 100);
}

/// Malformed JSON surfaces as a configuration error.
#[test]
fn test_malformed_json() {
    let err = ModifierSpec::from_json(r#"[{ "name": "x", "modifier": { "op": "explode" } }]"#)
        .unwrap_err();
    assert!(matches!(err, InspectError::Config(_)));
}

/// Invalid specs are rejected before anything is attached.
#[test]
fn test_invalid_spec_not_attached() {
    let hp = Inspectable::new(10.0);
    let broken = ModifierSpec::new("broken", Modifier::clamp(Some(10.0), Some(1.0)));

    let result = broken.attach_to(&hp, true);
    assert!(matches!(result, Err(InspectError::InvalidModifier { .. })));
    assert_eq!(hp.transformation_count(), 0);
}
