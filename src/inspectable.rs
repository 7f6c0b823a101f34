//! Inspectable values.
//!
//! An [`Inspectable`] holds an identity value and derives its visible value
//! by folding every enabled [`Transformation`] over a copy of the identity,
//! highest priority first. The derived value is cached and only recomputed
//! when asked to (`force_update`, or an `and_update` flag on the mutating
//! calls). Two callback registries report identity changes and changes of
//! the derived value.
//!
//! Callers own their transformations and callbacks. The inspectable holds
//! weak references only: a handle dropped while attached stops contributing
//! and its entry is pruned.
//!
//! # Re-entrancy
//!
//! Every recomputation snapshots the transformation functions and callbacks
//! it is about to run and releases its internal borrows first. Callbacks may
//! therefore read or mutate the inspectable they are notified about; their
//! changes apply to the next recomputation or dispatch. A recomputation
//! requested while transformation functions are still being folded is
//! rejected with [`InspectError::ReentrantUpdate`].

use crate::error::InspectError;
use crate::transformation::{TransformFn, Transformation, TransformationRef};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

type ChangeCallback<T> = dyn Fn(&Inspectable<T>, &T, &T);

/// A change callback: receives the inspectable, the previous value and the
/// new value.
///
/// Cloning a `ChangeFn` shares the underlying function; clones are the same
/// callback as far as registration is concerned.
///
/// # Examples
///
/// ```rust
/// use inspectable::{ChangeFn, Inspectable};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let calls = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&calls);
/// let on_change: ChangeFn<i32> = ChangeFn::new(move |_, _, _| counter.set(counter.get() + 1));
///
/// let hp = Inspectable::new(10);
/// hp.add_on_identity_changed(&on_change);
/// hp.set_identity(12, false);
/// assert_eq!(calls.get(), 1);
/// ```
pub struct ChangeFn<T> {
    func: Option<Rc<ChangeCallback<T>>>,
}

impl<T> ChangeFn<T> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Inspectable<T>, &T, &T) + 'static,
    {
        Self {
            func: Some(Rc::new(func)),
        }
    }

    /// A callback with no target. Registries ignore it.
    pub fn empty() -> Self {
        Self { func: None }
    }

    pub fn is_empty(&self) -> bool {
        self.func.is_none()
    }

    /// Invoke the callback directly. Does nothing when empty.
    pub fn call(&self, inspectable: &Inspectable<T>, previous: &T, current: &T) {
        if let Some(func) = &self.func {
            func(inspectable, previous, current);
        }
    }
}

impl<T> Clone for ChangeFn<T> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
        }
    }
}

impl<T> Default for ChangeFn<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for ChangeFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ChangeFn(<empty>)")
        } else {
            f.write_str("ChangeFn(<fn>)")
        }
    }
}

fn same_callback<T>(entry: &Weak<ChangeCallback<T>>, func: &Rc<ChangeCallback<T>>) -> bool {
    std::ptr::eq(entry.as_ptr() as *const (), Rc::as_ptr(func) as *const ())
}

/// Ordered registry of weakly held change callbacks.
struct CallbackList<T> {
    kind: &'static str,
    entries: RefCell<Vec<Weak<ChangeCallback<T>>>>,
}

impl<T> CallbackList<T> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: RefCell::new(Vec::new()),
        }
    }

    fn add(&self, func: &ChangeFn<T>, unique: bool) {
        let Some(func) = &func.func else {
            return;
        };
        if unique && self.position(func).is_some() {
            return;
        }
        self.entries.borrow_mut().push(Rc::downgrade(func));
        trace!(registry = self.kind, "change callback registered");
    }

    fn remove(&self, func: &ChangeFn<T>) {
        let Some(func) = &func.func else {
            return;
        };
        if let Some(index) = self.position(func) {
            self.entries.borrow_mut().remove(index);
            trace!(registry = self.kind, "change callback removed");
        }
    }

    fn contains(&self, func: &ChangeFn<T>) -> bool {
        func.func
            .as_ref()
            .is_some_and(|func| self.position(func).is_some())
    }

    fn position(&self, func: &Rc<ChangeCallback<T>>) -> Option<usize> {
        self.entries
            .borrow()
            .iter()
            .position(|entry| same_callback(entry, func))
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Live callbacks in registration order. Entries whose owner is gone
    /// are pruned.
    fn snapshot(&self) -> Vec<Rc<ChangeCallback<T>>> {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.strong_count() > 0);
        if entries.len() != before {
            warn!(
                registry = self.kind,
                pruned = before - entries.len(),
                "change callbacks dropped without being removed"
            );
        }
        entries.iter().filter_map(Weak::upgrade).collect()
    }
}

/// Resets the folding flag when a recomputation ends, including by unwinding.
struct FoldGuard<'a> {
    folding: &'a Cell<bool>,
}

impl<'a> FoldGuard<'a> {
    fn enter(folding: &'a Cell<bool>) -> Self {
        folding.set(true);
        Self { folding }
    }
}

impl Drop for FoldGuard<'_> {
    fn drop(&mut self) {
        self.folding.set(false);
    }
}

/// An identity value modified by an ordered set of transformations.
///
/// A player speed with identity `5` can be slowed by a mud trap (`-1`) and
/// boosted by a power pill (`x1.5`) without the speed, the trap or the pill
/// knowing about each other. Attaching the trap then the pill gives `6`.
/// Raising the pill's priority makes it run first and gives `6.5`.
///
/// The derived value is cached. Mutations recompute it only when asked to,
/// which keeps toggling and attaching cheap.
///
/// # Examples
///
/// ```rust
/// use inspectable::{Inspectable, Transformation, TransformFn};
///
/// let speed = Inspectable::new(5.0);
/// let mud_trap = Transformation::from_fn(|v: &mut f64| *v -= 1.0);
/// let power_pill = Transformation::from_fn(|v: &mut f64| *v *= 1.5);
///
/// speed.add_transformation(&mud_trap, false);
/// speed.add_transformation(&power_pill, true);
/// assert_eq!(speed.get_value(false), 6.0);
///
/// power_pill.set(TransformFn::new(|v: &mut f64| *v *= 1.5), 1, true);
/// assert_eq!(speed.get_value(true), 6.5);
/// ```
pub struct Inspectable<T> {
    identity: RefCell<T>,
    last_value: RefCell<T>,
    transformations: RefCell<Vec<TransformationRef<T>>>,
    identity_changed: CallbackList<T>,
    value_changed: CallbackList<T>,
    folding: Cell<bool>,
    next_seq: Cell<u64>,
}

impl<T: Clone + PartialEq> Inspectable<T> {
    /// Create an inspectable whose identity and cached value are `identity`.
    pub fn new(identity: T) -> Self {
        Self {
            last_value: RefCell::new(identity.clone()),
            identity: RefCell::new(identity),
            transformations: RefCell::new(Vec::new()),
            identity_changed: CallbackList::new("identity_changed"),
            value_changed: CallbackList::new("value_changed"),
            folding: Cell::new(false),
            next_seq: Cell::new(0),
        }
    }

    /// Configure `transformation` with `set` and attach it.
    pub fn add_new_transformation(
        &self,
        transformation: &Transformation<T>,
        func: TransformFn<T>,
        priority: i32,
        enabled: bool,
        and_update: bool,
    ) -> &Self {
        transformation.set(func, priority, enabled);
        self.add_transformation(transformation, and_update)
    }

    /// Attach a transformation. The same transformation may be attached
    /// more than once; see [`add_transformation_unique`](Self::add_transformation_unique).
    pub fn add_transformation(&self, transformation: &Transformation<T>, and_update: bool) -> &Self {
        self.insert_transformation(transformation);
        if and_update {
            self.force_update();
        }
        self
    }

    /// Attach a transformation unless it is already attached. An already
    /// attached transformation also skips the requested update.
    pub fn add_transformation_unique(
        &self,
        transformation: &Transformation<T>,
        and_update: bool,
    ) -> &Self {
        if self.contains_transformation(transformation) {
            return self;
        }
        self.add_transformation(transformation, and_update)
    }

    /// Detach the first matching entry. Updates only if something was removed.
    pub fn remove_transformation(&self, transformation: &Transformation<T>, and_update: bool) {
        let removed = {
            let mut transformations = self.transformations.borrow_mut();
            match transformations
                .iter()
                .position(|entry| entry.refers_to(transformation))
            {
                Some(index) => {
                    transformations.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            trace!(priority = transformation.priority(), "transformation detached");
            if and_update {
                self.force_update();
            }
        }
    }

    pub fn contains_transformation(&self, transformation: &Transformation<T>) -> bool {
        self.transformations
            .borrow()
            .iter()
            .any(|entry| entry.refers_to(transformation))
    }

    /// Number of attached entries, counting duplicates.
    pub fn transformation_count(&self) -> usize {
        self.transformations.borrow().len()
    }

    /// Attached priorities in application order.
    pub fn priorities(&self) -> Vec<i32> {
        self.transformations
            .borrow()
            .iter()
            .map(TransformationRef::priority)
            .collect()
    }

    pub fn add_on_identity_changed(&self, func: &ChangeFn<T>) -> &Self {
        self.identity_changed.add(func, false);
        self
    }

    pub fn add_on_identity_changed_unique(&self, func: &ChangeFn<T>) -> &Self {
        self.identity_changed.add(func, true);
        self
    }

    pub fn remove_on_identity_changed(&self, func: &ChangeFn<T>) {
        self.identity_changed.remove(func);
    }

    pub fn contains_on_identity_changed(&self, func: &ChangeFn<T>) -> bool {
        self.identity_changed.contains(func)
    }

    pub fn add_on_value_changed(&self, func: &ChangeFn<T>) -> &Self {
        self.value_changed.add(func, false);
        self
    }

    pub fn add_on_value_changed_unique(&self, func: &ChangeFn<T>) -> &Self {
        self.value_changed.add(func, true);
        self
    }

    pub fn remove_on_value_changed(&self, func: &ChangeFn<T>) {
        self.value_changed.remove(func);
    }

    pub fn contains_on_value_changed(&self, func: &ChangeFn<T>) -> bool {
        self.value_changed.contains(func)
    }

    /// Registered callback counts as `(identity_changed, value_changed)`.
    pub fn callback_counts(&self) -> (usize, usize) {
        (self.identity_changed.len(), self.value_changed.len())
    }

    /// Recompute the derived value, notifying value-changed callbacks if it
    /// differs from the cached one.
    ///
    /// A re-entrant request from inside a transformation function is logged
    /// and ignored; use [`try_force_update`](Self::try_force_update) to
    /// observe it.
    pub fn force_update(&self) {
        if let Err(err) = self.try_force_update() {
            warn!(error = %err, "update skipped");
        }
    }

    /// Recompute the derived value. Returns whether it changed.
    ///
    /// # Errors
    ///
    /// [`InspectError::ReentrantUpdate`] when called while this inspectable's
    /// transformation functions are being applied.
    pub fn try_force_update(&self) -> Result<bool, InspectError> {
        if self.folding.get() {
            return Err(InspectError::ReentrantUpdate);
        }

        let steps = self.active_steps();
        let mut value = self.identity.borrow().clone();
        let previous = self.last_value.borrow().clone();

        {
            let _guard = FoldGuard::enter(&self.folding);
            for step in &steps {
                step.call(&mut value);
            }
        }

        let changed = value != previous;
        *self.last_value.borrow_mut() = value.clone();
        debug!(applied = steps.len(), changed, "inspectable value recomputed");

        if changed {
            for callback in self.value_changed.snapshot() {
                callback(self, &previous, &value);
            }
        }
        Ok(changed)
    }

    /// Replace the identity. Equal values are ignored entirely: no update,
    /// no notification. Otherwise the update (if requested) runs before the
    /// identity-changed callbacks.
    pub fn set_identity(&self, identity: T, and_update: bool) {
        let previous = {
            let mut current = self.identity.borrow_mut();
            if *current == identity {
                return;
            }
            std::mem::replace(&mut *current, identity.clone())
        };

        if and_update {
            self.force_update();
        }
        for callback in self.identity_changed.snapshot() {
            callback(self, &previous, &identity);
        }
    }

    pub fn identity(&self) -> T {
        self.identity.borrow().clone()
    }

    /// The cached derived value, recomputed first if `and_update` is set.
    /// Without an update the value may be stale.
    pub fn get_value(&self, and_update: bool) -> T {
        if and_update {
            self.force_update();
        }
        self.last_value.borrow().clone()
    }

    /// Read a copy of the cached derived value. `f` may use the
    /// inspectable freely, including recomputing it.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.last_value.borrow().clone();
        f(&value)
    }

    fn insert_transformation(&self, transformation: &Transformation<T>) {
        let mut transformations = self.transformations.borrow_mut();
        let seq = self.next_seq.get();
        self.next_seq.set(seq.wrapping_add(1));
        transformations.push(transformation.downgrade(seq));
        sort_by_priority(&mut transformations);
        trace!(
            priority = transformation.priority(),
            attached = transformations.len(),
            "transformation attached"
        );
    }

    /// Prune dead entries, restore priority order and collect the functions
    /// that will run.
    fn active_steps(&self) -> Vec<TransformFn<T>> {
        let mut transformations = self.transformations.borrow_mut();
        let before = transformations.len();
        transformations.retain(TransformationRef::is_alive);
        if transformations.len() != before {
            warn!(
                pruned = before - transformations.len(),
                "transformations dropped while attached"
            );
        }
        sort_by_priority(&mut transformations);
        transformations
            .iter()
            .filter_map(TransformationRef::active_fn)
            .collect()
    }
}

impl<T: Clone + PartialEq + Default> Default for Inspectable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Inspectable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspectable")
            .field("identity", &self.identity.borrow())
            .field("value", &self.last_value.borrow())
            .field("transformations", &self.transformations.borrow().len())
            .field("identity_changed", &self.identity_changed.entries.borrow().len())
            .field("value_changed", &self.value_changed.entries.borrow().len())
            .finish()
    }
}

/// Highest priority first, ties in attachment order.
fn sort_by_priority<T>(transformations: &mut [TransformationRef<T>]) {
    transformations.sort_by_cached_key(|entry| (std::cmp::Reverse(entry.priority()), entry.seq));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformation::{MAX_PRIORITY, MIN_PRIORITY};

    fn recorder() -> (Rc<RefCell<Vec<(i32, i32)>>>, ChangeFn<i32>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let func = ChangeFn::new(move |_: &Inspectable<i32>, previous: &i32, current: &i32| {
            sink.borrow_mut().push((*previous, *current));
        });
        (log, func)
    }

    #[test]
    fn test_new_caches_identity() {
        let value = Inspectable::new(5);
        assert_eq!(value.identity(), 5);
        assert_eq!(value.get_value(false), 5);
    }

    #[test]
    fn test_default_identity() {
        let value: Inspectable<i32> = Inspectable::default();
        assert_eq!(value.get_value(true), 0);
    }

    #[test]
    fn test_add_sorts_by_descending_priority() {
        let value = Inspectable::new(0);
        let low = Transformation::new(TransformFn::new(|v: &mut i32| *v += 1), MIN_PRIORITY, true);
        let high = Transformation::new(TransformFn::new(|v: &mut i32| *v += 1), MAX_PRIORITY, true);
        let mid = Transformation::new(TransformFn::new(|v: &mut i32| *v += 1), 3, true);

        value
            .add_transformation(&low, false)
            .add_transformation(&high, false)
            .add_transformation(&mid, false);

        assert_eq!(value.priorities(), vec![MAX_PRIORITY, 3, MIN_PRIORITY]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let value = Inspectable::new(String::new());
        let a = Transformation::from_fn(|v: &mut String| v.push('a'));
        let b = Transformation::from_fn(|v: &mut String| v.push('b'));
        let c = Transformation::from_fn(|v: &mut String| v.push('c'));

        value.add_transformation(&a, false);
        value.add_transformation(&b, false);
        value.add_transformation(&c, true);

        assert_eq!(value.get_value(false), "abc");
    }

    #[test]
    fn test_tie_order_survives_priority_round_trip() {
        let value = Inspectable::new(String::new());
        let a = Transformation::from_fn(|v: &mut String| v.push('a'));
        let b = Transformation::from_fn(|v: &mut String| v.push('b'));
        value.add_transformation(&a, false);
        value.add_transformation(&b, false);
        assert_eq!(value.get_value(true), "ab");

        a.set(TransformFn::new(|v: &mut String| v.push('a')), -1, true);
        assert_eq!(value.get_value(true), "ba");

        a.set(TransformFn::new(|v: &mut String| v.push('a')), 0, true);
        assert_eq!(value.get_value(true), "ab");
    }

    #[test]
    fn test_with_value_allows_recompute() {
        let value = Inspectable::new(2);
        let t = Transformation::from_fn(|v: &mut i32| *v *= 5);
        value.add_transformation(&t, false);

        let (seen, fresh) = value.with_value(|cached| (*cached, value.get_value(true)));
        assert_eq!((seen, fresh), (2, 10));
        assert_eq!(value.with_value(|cached| *cached), 10);
    }

    #[test]
    fn test_add_without_update_leaves_value_stale() {
        let value = Inspectable::new(5);
        let t = Transformation::from_fn(|v: &mut i32| *v *= 2);
        value.add_transformation(&t, false);
        assert_eq!(value.get_value(false), 5);
        assert_eq!(value.get_value(true), 10);
    }

    #[test]
    fn test_unique_add_skips_duplicates_and_update() {
        let value = Inspectable::new(1);
        let (log, on_change) = recorder();
        value.add_on_value_changed(&on_change);

        let t = Transformation::from_fn(|v: &mut i32| *v += 1);
        value.add_transformation_unique(&t, false);
        value.add_transformation_unique(&t, true);

        assert_eq!(value.transformation_count(), 1);
        assert!(log.borrow().is_empty());
        assert_eq!(value.get_value(false), 1);
    }

    #[test]
    fn test_plain_add_allows_duplicates() {
        let value = Inspectable::new(1);
        let t = Transformation::from_fn(|v: &mut i32| *v += 1);
        value.add_transformation(&t, false);
        value.add_transformation(&t, true);
        assert_eq!(value.transformation_count(), 2);
        assert_eq!(value.get_value(false), 3);
    }

    #[test]
    fn test_remove_transformation() {
        let value = Inspectable::new(1);
        let t = Transformation::from_fn(|v: &mut i32| *v += 10);
        value.add_transformation(&t, true);
        assert_eq!(value.get_value(false), 11);

        value.remove_transformation(&t, true);
        assert!(!value.contains_transformation(&t));
        assert_eq!(value.get_value(false), 1);
    }

    #[test]
    fn test_remove_absent_does_not_update() {
        let value = Inspectable::new(1);
        let (log, on_change) = recorder();
        value.add_on_value_changed(&on_change);

        let attached = Transformation::from_fn(|v: &mut i32| *v += 1);
        let stranger = Transformation::from_fn(|v: &mut i32| *v += 1);
        value.add_transformation(&attached, false);

        value.remove_transformation(&stranger, true);
        assert!(log.borrow().is_empty());
        assert_eq!(value.get_value(false), 1);
    }

    #[test]
    fn test_disabled_and_empty_are_skipped() {
        let value = Inspectable::new(2);
        let disabled = Transformation::new(TransformFn::new(|v: &mut i32| *v += 100), 5, false);
        let empty = Transformation::new(TransformFn::empty(), 4, true);
        let live = Transformation::from_fn(|v: &mut i32| *v *= 3);

        value
            .add_transformation(&disabled, false)
            .add_transformation(&empty, false)
            .add_transformation(&live, true);

        assert_eq!(value.get_value(false), 6);
    }

    #[test]
    fn test_value_changed_fires_only_on_change() {
        let value = Inspectable::new(4);
        let (log, on_change) = recorder();
        value.add_on_value_changed(&on_change);

        let t = Transformation::from_fn(|v: &mut i32| *v += 1);
        value.add_transformation(&t, true);
        value.force_update();
        value.force_update();

        assert_eq!(*log.borrow(), vec![(4, 5)]);
    }

    #[test]
    fn test_set_identity_equal_is_noop() {
        let value = Inspectable::new(3);
        let (identity_log, on_identity) = recorder();
        let (value_log, on_value) = recorder();
        value.add_on_identity_changed(&on_identity);
        value.add_on_value_changed(&on_value);

        let t = Transformation::from_fn(|v: &mut i32| *v += 1);
        value.add_transformation(&t, false);

        value.set_identity(3, true);
        assert!(identity_log.borrow().is_empty());
        assert!(value_log.borrow().is_empty());
        assert_eq!(value.get_value(false), 3);
    }

    #[test]
    fn test_set_identity_updates_before_notifying() {
        let value = Inspectable::new(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let on_identity = ChangeFn::new(move |insp: &Inspectable<i32>, previous: &i32, current: &i32| {
            sink.borrow_mut()
                .push((*previous, *current, insp.get_value(false)));
        });
        value.add_on_identity_changed(&on_identity);

        let t = Transformation::from_fn(|v: &mut i32| *v *= 10);
        value.add_transformation(&t, false);
        value.set_identity(4, true);

        assert_eq!(*seen.borrow(), vec![(3, 4, 40)]);
    }

    #[test]
    fn test_set_identity_without_update() {
        let value = Inspectable::new(3);
        value.set_identity(8, false);
        assert_eq!(value.identity(), 8);
        assert_eq!(value.get_value(false), 3);
        assert_eq!(value.get_value(true), 8);
    }

    #[test]
    fn test_empty_callback_is_ignored() {
        let value = Inspectable::new(0);
        let empty = ChangeFn::empty();
        value.add_on_value_changed(&empty);
        value.add_on_identity_changed(&empty);
        assert_eq!(value.callback_counts(), (0, 0));
        assert!(!value.contains_on_value_changed(&empty));
    }

    #[test]
    fn test_unique_callback_registration() {
        let value = Inspectable::new(0);
        let (log, on_change) = recorder();
        value.add_on_value_changed_unique(&on_change);
        value.add_on_value_changed_unique(&on_change.clone());

        value.set_identity(1, true);
        assert_eq!(log.borrow().len(), 1);

        value.remove_on_value_changed(&on_change);
        assert!(!value.contains_on_value_changed(&on_change));
    }

    #[test]
    fn test_callback_registration_has_no_value_effect() {
        let value = Inspectable::new(0);
        let t = Transformation::from_fn(|v: &mut i32| *v += 1);
        value.add_transformation(&t, false);

        let (log, on_change) = recorder();
        value.add_on_value_changed(&on_change);
        value.remove_on_value_changed(&on_change);
        value.add_on_identity_changed(&on_change);

        assert_eq!(value.get_value(false), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_dropped_transformation_is_pruned() {
        let value = Inspectable::new(1);
        {
            let t = Transformation::from_fn(|v: &mut i32| *v += 5);
            value.add_transformation(&t, true);
            assert_eq!(value.get_value(false), 6);
        }
        assert_eq!(value.get_value(true), 1);
        assert_eq!(value.transformation_count(), 0);
    }

    #[test]
    fn test_dropped_callback_is_pruned() {
        let value = Inspectable::new(1);
        let (log, on_change) = recorder();
        value.add_on_identity_changed(&on_change);
        drop(on_change);

        value.set_identity(2, false);
        assert!(log.borrow().is_empty());
        assert_eq!(value.callback_counts(), (0, 0));
    }

    #[test]
    fn test_reentrant_update_rejected() {
        let value = Rc::new(Inspectable::new(1));
        let outcome = Rc::new(RefCell::new(None));

        let weak = Rc::downgrade(&value);
        let sink = Rc::clone(&outcome);
        let t = Transformation::from_fn(move |v: &mut i32| {
            if let Some(inspectable) = weak.upgrade() {
                *sink.borrow_mut() = Some(inspectable.try_force_update());
            }
            *v += 1;
        });

        value.add_transformation(&t, false);
        assert_eq!(value.try_force_update(), Ok(true));
        assert_eq!(*outcome.borrow(), Some(Err(InspectError::ReentrantUpdate)));
        assert_eq!(value.get_value(false), 2);
    }

    #[test]
    fn test_callback_may_mutate_during_dispatch() {
        let value = Inspectable::new(1);
        let late = Rc::new(Transformation::from_fn(|v: &mut i32| *v += 100));

        let attach = Rc::clone(&late);
        let on_change = ChangeFn::new(move |insp: &Inspectable<i32>, _: &i32, _: &i32| {
            insp.add_transformation_unique(&attach, false);
        });
        value.add_on_value_changed(&on_change);

        value.set_identity(2, true);
        assert!(value.contains_transformation(&late));
        assert_eq!(value.get_value(false), 2);
        assert_eq!(value.get_value(true), 102);
    }
}
