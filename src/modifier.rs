//! Declarative modifiers.
//!
//! A [`Modifier`] is a data description of a common numeric transform (flat
//! bonus, multiplier, override, clamp). A [`ModifierSpec`] adds the name,
//! priority and enabled flag needed to turn it into a [`Transformation`], so
//! buffs and debuffs can live in data files instead of code.
//!
//! ```json
//! [
//!   { "name": "mud_trap",   "modifier": { "op": "add", "amount": -1.0 } },
//!   { "name": "power_pill", "modifier": { "op": "multiply", "factor": 1.5 }, "priority": 10 },
//!   { "name": "speed_cap",  "modifier": { "op": "clamp", "max": 8.0 }, "priority": -2147483647 }
//! ]
//! ```

use crate::error::InspectError;
use crate::inspectable::Inspectable;
use crate::numeric::Numeric;
use crate::scoped::ScopedTransformation;
use crate::transformation::{TransformFn, Transformation, INVALID_PRIORITY};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A numeric transform described as data.
///
/// # Examples
///
/// ```rust
/// use inspectable::Modifier;
///
/// let mut speed = 5.0;
/// Modifier::add(-1.0).apply(&mut speed);
/// Modifier::multiply(1.5).apply(&mut speed);
/// assert_eq!(speed, 6.0);
///
/// let mut crit = 90;
/// Modifier::clamp(None, Some(75.0)).apply(&mut crit);
/// assert_eq!(crit, 75);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Modifier {
    /// Add a flat amount (negative for penalties).
    Add { amount: f64 },
    /// Multiply by a factor.
    Multiply { factor: f64 },
    /// Replace the value outright.
    Override { value: f64 },
    /// Restrict the value to `[min, max]`. Either bound may be absent.
    Clamp {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl Modifier {
    pub fn add(amount: f64) -> Self {
        Modifier::Add { amount }
    }

    pub fn multiply(factor: f64) -> Self {
        Modifier::Multiply { factor }
    }

    pub fn r#override(value: f64) -> Self {
        Modifier::Override { value }
    }

    pub fn clamp(min: Option<f64>, max: Option<f64>) -> Self {
        Modifier::Clamp { min, max }
    }

    /// Apply this modifier to `value` in place.
    pub fn apply<T: Numeric>(&self, value: &mut T) {
        let current = value.to_f64();
        let next = match *self {
            Modifier::Add { amount } => current + amount,
            Modifier::Multiply { factor } => current * factor,
            Modifier::Override { value: replacement } => replacement,
            Modifier::Clamp { min, max } => {
                let floored = min.map_or(current, |min| current.max(min));
                max.map_or(floored, |max| floored.min(max))
            }
        };
        *value = T::from_f64(next);
    }

    /// A human-readable description, e.g. `"+5.00"` or `"×1.50"`.
    pub fn description(&self) -> String {
        match *self {
            Modifier::Add { amount } if amount < 0.0 => format!("{:.2}", amount),
            Modifier::Add { amount } => format!("+{:.2}", amount),
            Modifier::Multiply { factor } => format!("×{:.2}", factor),
            Modifier::Override { value } => format!("={:.2}", value),
            Modifier::Clamp { min, max } => {
                let bound = |b: Option<f64>| b.map_or_else(|| "_".to_string(), |b| format!("{:.2}", b));
                format!("clamp[{}, {}]", bound(min), bound(max))
            }
        }
    }

    /// Wrap this modifier as a transform function.
    pub fn into_fn<T: Numeric>(self) -> TransformFn<T> {
        TransformFn::new(move |value: &mut T| self.apply(value))
    }

    /// Why this modifier cannot be applied, if it cannot.
    fn problem(&self) -> Option<String> {
        let non_finite = |label: &str, v: f64| (!v.is_finite()).then(|| format!("{} is not finite", label));
        match *self {
            Modifier::Add { amount } => non_finite("amount", amount),
            Modifier::Multiply { factor } => non_finite("factor", factor),
            Modifier::Override { value } => non_finite("value", value),
            Modifier::Clamp { min, max } => min
                .and_then(|min| non_finite("min", min))
                .or_else(|| max.and_then(|max| non_finite("max", max)))
                .or_else(|| match (min, max) {
                    (Some(min), Some(max)) if min > max => {
                        Some(format!("min {:.2} is greater than max {:.2}", min, max))
                    }
                    _ => None,
                }),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// A named modifier with the ordering and enabled state of a transformation.
///
/// # Examples
///
/// ```rust
/// use inspectable::{Inspectable, ModifierSpec};
///
/// let speed = Inspectable::new(5.0);
/// let specs = ModifierSpec::from_json(r#"[
///     { "name": "mud_trap", "modifier": { "op": "add", "amount": -1.0 } },
///     { "name": "power_pill", "modifier": { "op": "multiply", "factor": 1.5 }, "priority": 1 }
/// ]"#).unwrap();
///
/// let active: Vec<_> = specs
///     .iter()
///     .map(|spec| spec.attach_to(&speed, false))
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(speed.get_value(true), 6.5);
/// drop(active);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierSpec {
    pub name: String,
    pub modifier: Modifier,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ModifierSpec {
    /// An enabled spec with priority `0`.
    pub fn new(name: impl Into<String>, modifier: Modifier) -> Self {
        Self {
            name: name.into(),
            modifier,
            priority: 0,
            enabled: true,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check that the modifier can be applied and the priority is usable.
    ///
    /// # Errors
    ///
    /// - [`InspectError::ReservedPriority`] for [`INVALID_PRIORITY`]
    /// - [`InspectError::InvalidModifier`] for non-finite numbers or an
    ///   inverted clamp range
    pub fn validate(&self) -> Result<(), InspectError> {
        if self.priority == INVALID_PRIORITY {
            return Err(InspectError::ReservedPriority(self.name.clone()));
        }
        match self.modifier.problem() {
            Some(reason) => Err(InspectError::InvalidModifier {
                name: self.name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Parse and validate a JSON array of specs.
    pub fn from_json(json: &str) -> Result<Vec<Self>, InspectError> {
        let specs: Vec<Self> = serde_json::from_str(json)?;
        for spec in &specs {
            spec.validate()?;
        }
        debug!(count = specs.len(), "modifier specs loaded");
        Ok(specs)
    }

    /// Build a caller-owned transformation from this spec.
    pub fn to_transformation<T: Numeric>(&self) -> Result<Transformation<T>, InspectError> {
        self.validate()?;
        Ok(Transformation::new(
            self.modifier.into_fn(),
            self.priority,
            self.enabled,
        ))
    }

    /// Attach this spec to `inspectable` for the lifetime of the returned
    /// wrapper. Dropping the wrapper detaches it and recomputes the value.
    pub fn attach_to<'a, T: Numeric>(
        &self,
        inspectable: &'a Inspectable<T>,
        and_update: bool,
    ) -> Result<ScopedTransformation<'a, T>, InspectError> {
        self.validate()?;
        debug!(name = %self.name, modifier = %self.modifier.description(), "modifier attached");
        Ok(ScopedTransformation::new(
            inspectable,
            self.modifier.into_fn(),
            self.priority,
            self.enabled,
            and_update,
        )
        .with_update_on_destroy(true))
    }
}
