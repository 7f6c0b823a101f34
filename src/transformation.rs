//! Transformation module.
//!
//! A [`Transformation`] is a single named unit of change over a value: one
//! transform function, a signed priority and an enabled flag. Transformations
//! are owned by the caller. An [`Inspectable`](crate::Inspectable) only keeps a
//! weak reference to the ones attached to it, so dropping a transformation
//! detaches it on the next recomputation.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Highest priority. Transformations with this priority run first.
pub const MAX_PRIORITY: i32 = i32::MAX;

/// Lowest usable priority. Transformations with this priority run last.
pub const MIN_PRIORITY: i32 = i32::MIN + 1;

/// Reserved priority meaning "unset". Default transformations carry it.
pub const INVALID_PRIORITY: i32 = i32::MIN;

/// A transform function over values of type `T`, or nothing.
///
/// Cloning a `TransformFn` shares the underlying function.
///
/// # Examples
///
/// ```rust
/// use inspectable::TransformFn;
///
/// let double = TransformFn::new(|v: &mut f64| *v *= 2.0);
/// let mut value = 4.0;
/// double.call(&mut value);
/// assert_eq!(value, 8.0);
///
/// assert!(TransformFn::<f64>::empty().is_empty());
/// ```
pub struct TransformFn<T> {
    func: Option<Rc<dyn Fn(&mut T)>>,
}

impl<T> TransformFn<T> {
    /// Wrap a function that modifies a value in place.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut T) + 'static,
    {
        Self {
            func: Some(Rc::new(func)),
        }
    }

    /// A function with no target. Skipped wherever it is applied.
    pub fn empty() -> Self {
        Self { func: None }
    }

    /// Whether this function has no target.
    pub fn is_empty(&self) -> bool {
        self.func.is_none()
    }

    /// Apply the function to `value` in place. Does nothing when empty.
    pub fn call(&self, value: &mut T) {
        if let Some(func) = &self.func {
            func(value);
        }
    }
}

impl<T> Clone for TransformFn<T> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
        }
    }
}

impl<T> Default for TransformFn<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for TransformFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("TransformFn(<empty>)")
        } else {
            f.write_str("TransformFn(<fn>)")
        }
    }
}

struct TransformationState<T> {
    func: TransformFn<T>,
    priority: i32,
    enabled: bool,
}

/// A prioritized, toggleable transform function.
///
/// Higher priorities run first. Ties run in the order the transformations
/// were attached. A transformation with an empty function may be attached;
/// it is skipped when the value is recomputed.
///
/// Enabling or disabling a transformation does not recompute any value it
/// is attached to. Call [`Inspectable::force_update`](crate::Inspectable::force_update)
/// afterwards, or use a [`ScopedTransformation`](crate::ScopedTransformation)
/// which can do both in one call.
///
/// # Examples
///
/// ```rust
/// use inspectable::{Inspectable, Transformation, TransformFn};
///
/// let speed = Inspectable::new(5.0);
/// let mud_trap = Transformation::new(TransformFn::new(|v: &mut f64| *v -= 1.0), 0, true);
///
/// speed.add_transformation(&mud_trap, true);
/// assert_eq!(speed.get_value(false), 4.0);
///
/// mud_trap.disable();
/// assert_eq!(speed.get_value(true), 5.0);
/// ```
pub struct Transformation<T> {
    state: Rc<RefCell<TransformationState<T>>>,
}

impl<T> Transformation<T> {
    /// Create a transformation from a function, priority and enabled flag.
    pub fn new(func: TransformFn<T>, priority: i32, enabled: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(TransformationState {
                func,
                priority,
                enabled,
            })),
        }
    }

    /// Create an enabled transformation with priority `0`.
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&mut T) + 'static,
    {
        Self::new(TransformFn::new(func), 0, true)
    }

    /// Replace the function, priority and enabled flag as one update.
    pub fn set(&self, func: TransformFn<T>, priority: i32, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.func = func;
        state.priority = priority;
        state.enabled = enabled;
    }

    pub fn enable(&self) {
        self.state.borrow_mut().enabled = true;
    }

    pub fn disable(&self) {
        self.state.borrow_mut().enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn priority(&self) -> i32 {
        self.state.borrow().priority
    }

    /// The attached function (shared, not copied).
    pub fn transform_fn(&self) -> TransformFn<T> {
        self.state.borrow().func.clone()
    }

    /// Apply the attached function to `value`, regardless of the enabled flag.
    pub fn apply(&self, value: &mut T) {
        let func = self.transform_fn();
        func.call(value);
    }

    pub(crate) fn downgrade(&self, seq: u64) -> TransformationRef<T> {
        TransformationRef {
            seq,
            state: Rc::downgrade(&self.state),
        }
    }
}

impl<T> Default for Transformation<T> {
    fn default() -> Self {
        Self::new(TransformFn::empty(), INVALID_PRIORITY, true)
    }
}

impl<T> fmt::Debug for Transformation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Transformation")
            .field("priority", &state.priority)
            .field("enabled", &state.enabled)
            .field("func", &state.func)
            .finish()
    }
}

/// Non-owning reference to a [`Transformation`], held by inspectables.
pub(crate) struct TransformationRef<T> {
    /// Attachment order, used to break priority ties.
    pub(crate) seq: u64,
    state: Weak<RefCell<TransformationState<T>>>,
}

impl<T> TransformationRef<T> {
    pub(crate) fn refers_to(&self, transformation: &Transformation<T>) -> bool {
        std::ptr::eq(self.state.as_ptr(), Rc::as_ptr(&transformation.state))
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.state.strong_count() > 0
    }

    /// Current priority, or [`INVALID_PRIORITY`] once the owner is gone.
    pub(crate) fn priority(&self) -> i32 {
        self.state
            .upgrade()
            .map_or(INVALID_PRIORITY, |state| state.borrow().priority)
    }

    /// The function to run for this entry, if it is alive, enabled and
    /// has a target.
    pub(crate) fn active_fn(&self) -> Option<TransformFn<T>> {
        let state = self.state.upgrade()?;
        let state = state.borrow();
        if state.enabled && !state.func.is_empty() {
            Some(state.func.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transformation() {
        let t: Transformation<f64> = Transformation::default();
        assert!(t.is_enabled());
        assert_eq!(t.priority(), INVALID_PRIORITY);
        assert!(t.transform_fn().is_empty());
    }

    #[test]
    fn test_set_replaces_all_fields() {
        let t = Transformation::from_fn(|v: &mut i32| *v += 1);
        t.set(TransformFn::new(|v: &mut i32| *v *= 3), 7, false);

        assert_eq!(t.priority(), 7);
        assert!(!t.is_enabled());

        let mut value = 2;
        t.apply(&mut value);
        assert_eq!(value, 6);
    }

    #[test]
    fn test_enable_disable() {
        let t = Transformation::from_fn(|v: &mut i32| *v += 1);
        t.disable();
        assert!(!t.is_enabled());
        t.enable();
        assert!(t.is_enabled());
    }

    #[test]
    fn test_empty_fn_is_noop() {
        let t: Transformation<i32> = Transformation::default();
        let mut value = 9;
        t.apply(&mut value);
        assert_eq!(value, 9);
    }

    #[test]
    fn test_reference_tracks_owner() {
        let t = Transformation::from_fn(|v: &mut i32| *v += 1);
        let other = Transformation::from_fn(|v: &mut i32| *v += 1);
        let weak = t.downgrade(0);

        assert!(weak.refers_to(&t));
        assert!(!weak.refers_to(&other));
        assert!(weak.active_fn().is_some());

        t.disable();
        assert!(weak.active_fn().is_none());

        drop(t);
        assert!(!weak.is_alive());
        assert_eq!(weak.priority(), INVALID_PRIORITY);
    }

    #[test]
    fn test_priority_constants() {
        assert!(MAX_PRIORITY > 0);
        assert!(MIN_PRIORITY > INVALID_PRIORITY);
        assert_eq!(MIN_PRIORITY, INVALID_PRIORITY + 1);
    }
}
