//! Scoped attachments.
//!
//! These wrappers own a transformation or a change callback and keep it
//! attached to one [`Inspectable`] for as long as the wrapper lives. Dropping
//! the wrapper detaches it on every exit path. Wrappers borrow the
//! inspectable, so they cannot outlive it.

use crate::inspectable::{ChangeFn, Inspectable};
use crate::transformation::{TransformFn, Transformation};
use std::fmt;
use tracing::trace;

/// A transformation attached to an inspectable for the lifetime of this value.
///
/// # Examples
///
/// ```rust
/// use inspectable::{Inspectable, ScopedTransformation, TransformFn};
///
/// let speed = Inspectable::new(5.0);
/// {
///     let _haste = ScopedTransformation::new(
///         &speed,
///         TransformFn::new(|v: &mut f64| *v *= 2.0),
///         0,
///         true,
///         true,
///     )
///     .with_update_on_destroy(true);
///     assert_eq!(speed.get_value(false), 10.0);
/// }
/// assert_eq!(speed.get_value(false), 5.0);
/// ```
pub struct ScopedTransformation<'a, T: Clone + PartialEq> {
    inspectable: Option<&'a Inspectable<T>>,
    transformation: Transformation<T>,
    attached: bool,
    update_on_destroy: bool,
}

impl<'a, T: Clone + PartialEq> ScopedTransformation<'a, T> {
    /// Configure the owned transformation and attach it to `inspectable`.
    ///
    /// Attachment is unconditional: no uniqueness check is needed since the
    /// transformation is owned by this wrapper.
    pub fn new(
        inspectable: &'a Inspectable<T>,
        func: TransformFn<T>,
        priority: i32,
        enabled: bool,
        and_update: bool,
    ) -> Self {
        let transformation = Transformation::new(func, priority, enabled);
        inspectable.add_transformation(&transformation, and_update);
        Self {
            inspectable: Some(inspectable),
            transformation,
            attached: true,
            update_on_destroy: false,
        }
    }

    /// Bind to `inspectable` without attaching anything. The first call to
    /// [`set`](Self::set) attaches the transformation.
    pub fn deferred(inspectable: &'a Inspectable<T>) -> Self {
        Self {
            inspectable: Some(inspectable),
            transformation: Transformation::default(),
            attached: false,
            update_on_destroy: false,
        }
    }

    /// A wrapper bound to nothing. Every operation only affects the owned
    /// transformation.
    pub fn unbound() -> Self {
        Self {
            inspectable: None,
            transformation: Transformation::default(),
            attached: false,
            update_on_destroy: false,
        }
    }

    pub fn with_update_on_destroy(mut self, update_on_destroy: bool) -> Self {
        self.update_on_destroy = update_on_destroy;
        self
    }

    /// Reconfigure the owned transformation, attaching it first if this
    /// wrapper was created deferred.
    pub fn set(&mut self, func: TransformFn<T>, priority: i32, enabled: bool, and_update: bool) {
        self.transformation.set(func, priority, enabled);
        if let Some(inspectable) = self.inspectable {
            if !self.attached {
                inspectable.add_transformation(&self.transformation, false);
                self.attached = true;
            }
            if and_update {
                inspectable.force_update();
            }
        }
    }

    /// Whether dropping this wrapper recomputes the inspectable after
    /// detaching.
    pub fn set_update_on_destroy(&mut self, update_on_destroy: bool) {
        self.update_on_destroy = update_on_destroy;
    }

    pub fn enable(&self, and_update: bool) {
        self.transformation.enable();
        self.update_if(and_update);
    }

    pub fn disable(&self, and_update: bool) {
        self.transformation.disable();
        self.update_if(and_update);
    }

    pub fn is_enabled(&self) -> bool {
        self.transformation.is_enabled()
    }

    pub fn priority(&self) -> i32 {
        self.transformation.priority()
    }

    pub fn transform_fn(&self) -> TransformFn<T> {
        self.transformation.transform_fn()
    }

    pub fn apply(&self, value: &mut T) {
        self.transformation.apply(value);
    }

    /// The owned transformation.
    pub fn transformation(&self) -> &Transformation<T> {
        &self.transformation
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn update_if(&self, and_update: bool) {
        if let (Some(inspectable), true) = (self.inspectable, and_update) {
            inspectable.force_update();
        }
    }
}

impl<T: Clone + PartialEq> Default for ScopedTransformation<'_, T> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<T: Clone + PartialEq> Drop for ScopedTransformation<'_, T> {
    fn drop(&mut self) {
        let Some(inspectable) = self.inspectable else {
            return;
        };
        inspectable.remove_transformation(&self.transformation, false);
        trace!(
            update_on_destroy = self.update_on_destroy,
            "scoped transformation released"
        );
        if self.update_on_destroy {
            inspectable.force_update();
        }
    }
}

impl<T: Clone + PartialEq> fmt::Debug for ScopedTransformation<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedTransformation")
            .field("bound", &self.inspectable.is_some())
            .field("attached", &self.attached)
            .field("transformation", &self.transformation)
            .field("update_on_destroy", &self.update_on_destroy)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeEvent {
    Identity,
    Value,
}

/// Shared registration logic for the two scoped callback wrappers.
///
/// Holds at most one active registration: the current (inspectable, func)
/// pair, when both are present. What gets registered is a forwarding handle
/// owned by the wrapper, so registrations of the same `func` made elsewhere
/// are never touched by it.
struct ScopedCallback<'a, T: Clone + PartialEq> {
    event: ChangeEvent,
    inspectable: Option<&'a Inspectable<T>>,
    func: ChangeFn<T>,
    registered: ChangeFn<T>,
}

impl<'a, T: Clone + PartialEq + 'static> ScopedCallback<'a, T> {
    fn new(event: ChangeEvent, inspectable: Option<&'a Inspectable<T>>, func: ChangeFn<T>) -> Self {
        let callback = Self {
            event,
            inspectable,
            registered: forwarding(&func),
            func,
        };
        callback.register();
        callback
    }

    fn set(&mut self, inspectable: Option<&'a Inspectable<T>>, func: ChangeFn<T>) {
        self.unregister();
        self.inspectable = inspectable;
        self.registered = forwarding(&func);
        self.func = func;
        self.register();
    }

    fn set_func(&mut self, func: ChangeFn<T>) {
        self.unregister();
        self.registered = forwarding(&func);
        self.func = func;
        self.register();
    }
}

impl<'a, T: Clone + PartialEq> ScopedCallback<'a, T> {
    fn set_inspectable(&mut self, inspectable: Option<&'a Inspectable<T>>) {
        self.unregister();
        self.inspectable = inspectable;
        self.register();
    }

    fn is_registered(&self) -> bool {
        match self.inspectable {
            Some(inspectable) => match self.event {
                ChangeEvent::Identity => inspectable.contains_on_identity_changed(&self.registered),
                ChangeEvent::Value => inspectable.contains_on_value_changed(&self.registered),
            },
            None => false,
        }
    }

    fn register(&self) {
        let Some(inspectable) = self.inspectable else {
            return;
        };
        if self.registered.is_empty() {
            return;
        }
        match self.event {
            ChangeEvent::Identity => inspectable.add_on_identity_changed(&self.registered),
            ChangeEvent::Value => inspectable.add_on_value_changed(&self.registered),
        };
    }

    fn unregister(&self) {
        let Some(inspectable) = self.inspectable else {
            return;
        };
        if self.registered.is_empty() {
            return;
        }
        match self.event {
            ChangeEvent::Identity => inspectable.remove_on_identity_changed(&self.registered),
            ChangeEvent::Value => inspectable.remove_on_value_changed(&self.registered),
        }
        trace!(event = ?self.event, "scoped callback released");
    }
}

/// A handle of our own that calls `func`. Empty stays empty.
fn forwarding<T: 'static>(func: &ChangeFn<T>) -> ChangeFn<T> {
    if func.is_empty() {
        return ChangeFn::empty();
    }
    let inner = func.clone();
    ChangeFn::new(move |inspectable, previous, current| inner.call(inspectable, previous, current))
}

impl<T: Clone + PartialEq> Drop for ScopedCallback<'_, T> {
    fn drop(&mut self) {
        self.unregister();
    }
}

/// A value-changed callback registered for the lifetime of this value.
///
/// # Examples
///
/// ```rust
/// use inspectable::{ChangeFn, Inspectable, ScopedValueChangedFn, Transformation};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let hp = Inspectable::new(100);
/// let last_seen = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&last_seen);
///
/// let watcher = ScopedValueChangedFn::new(&hp, ChangeFn::new(move |_, _, new: &i32| sink.set(*new)));
/// let armor = Transformation::from_fn(|v: &mut i32| *v += 20);
/// hp.add_transformation(&armor, true);
/// assert_eq!(last_seen.get(), 120);
///
/// drop(watcher);
/// hp.remove_transformation(&armor, true);
/// assert_eq!(last_seen.get(), 120);
/// ```
pub struct ScopedValueChangedFn<'a, T: Clone + PartialEq> {
    callback: ScopedCallback<'a, T>,
}

impl<'a, T: Clone + PartialEq + 'static> ScopedValueChangedFn<'a, T> {
    /// Register `func` on `inspectable` unless `func` is empty.
    pub fn new(inspectable: &'a Inspectable<T>, func: ChangeFn<T>) -> Self {
        Self {
            callback: ScopedCallback::new(ChangeEvent::Value, Some(inspectable), func),
        }
    }

    pub fn set(&mut self, inspectable: Option<&'a Inspectable<T>>, func: ChangeFn<T>) {
        self.callback.set(inspectable, func);
    }

    pub fn set_inspectable(&mut self, inspectable: Option<&'a Inspectable<T>>) {
        self.callback.set_inspectable(inspectable);
    }

    pub fn set_func(&mut self, func: ChangeFn<T>) {
        self.callback.set_func(func);
    }

    pub fn inspectable(&self) -> Option<&'a Inspectable<T>> {
        self.callback.inspectable
    }

    pub fn func(&self) -> &ChangeFn<T> {
        &self.callback.func
    }

    pub fn is_registered(&self) -> bool {
        self.callback.is_registered()
    }
}

impl<T: Clone + PartialEq + 'static> Default for ScopedValueChangedFn<'_, T> {
    fn default() -> Self {
        Self {
            callback: ScopedCallback::new(ChangeEvent::Value, None, ChangeFn::empty()),
        }
    }
}

/// An identity-changed callback registered for the lifetime of this value.
pub struct ScopedIdentityChangedFn<'a, T: Clone + PartialEq> {
    callback: ScopedCallback<'a, T>,
}

impl<'a, T: Clone + PartialEq + 'static> ScopedIdentityChangedFn<'a, T> {
    /// Register `func` on `inspectable` unless `func` is empty.
    pub fn new(inspectable: &'a Inspectable<T>, func: ChangeFn<T>) -> Self {
        Self {
            callback: ScopedCallback::new(ChangeEvent::Identity, Some(inspectable), func),
        }
    }

    pub fn set(&mut self, inspectable: Option<&'a Inspectable<T>>, func: ChangeFn<T>) {
        self.callback.set(inspectable, func);
    }

    pub fn set_inspectable(&mut self, inspectable: Option<&'a Inspectable<T>>) {
        self.callback.set_inspectable(inspectable);
    }

    pub fn set_func(&mut self, func: ChangeFn<T>) {
        self.callback.set_func(func);
    }

    pub fn inspectable(&self) -> Option<&'a Inspectable<T>> {
        self.callback.inspectable
    }

    pub fn func(&self) -> &ChangeFn<T> {
        &self.callback.func
    }

    pub fn is_registered(&self) -> bool {
        self.callback.is_registered()
    }
}

impl<T: Clone + PartialEq + 'static> Default for ScopedIdentityChangedFn<'_, T> {
    fn default() -> Self {
        Self {
            callback: ScopedCallback::new(ChangeEvent::Identity, None, ChangeFn::empty()),
        }
    }
}
