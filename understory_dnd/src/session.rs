// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session store: the current `(source, target)` pair plus change notification.
//!
//! ## Contract
//!
//! - [`SessionStore::snapshot`] returns the same `Rc` until the next
//!   notification, so observers can detect "nothing changed" with
//!   [`Rc::ptr_eq`].
//! - [`SessionStore::begin`] and [`SessionStore::end`] always notify.
//! - [`SessionStore::update`] notifies only when a patched field is not
//!   reference-equal to its previous value.
//! - Subscribers run after the store's own borrows are released; they may read
//!   the snapshot, subscribe, or unsubscribe.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::Rect;
//! use understory_dnd::session::{SessionPatch, SessionStore};
//! use understory_dnd::types::{DragSpec, Draggable};
//!
//! let store: SessionStore<u32> = SessionStore::new();
//! let hits = Rc::new(Cell::new(0));
//! let counter = hits.clone();
//! let _sub = store.subscribe(move || counter.set(counter.get() + 1));
//!
//! let a = Rc::new(Draggable::new(1, DragSpec::new("item"), Rc::new(Rect::ZERO)));
//! store.begin(a.clone());
//! store.update(SessionPatch::new().target(Some(a.clone())));
//! store.update(SessionPatch::new().target(Some(a)));
//! assert_eq!(hits.get(), 2);
//! ```

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::types::Draggable;

bitflags::bitflags! {
    /// Session fields changed by a [`SessionStore::update`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SessionChange: u8 {
        /// The dragged source changed.
        const SOURCE = 0b0000_0001;
        /// The resolved target changed.
        const TARGET = 0b0000_0010;
    }
}

/// The current drag: what is being dragged and what it is over.
pub struct DragSession<K> {
    /// Dragged descriptor; `None` when no drag is active.
    pub source: Option<Rc<Draggable<K>>>,
    /// Resolved target; `None` before the first move and after the drag ends.
    pub target: Option<Rc<Draggable<K>>>,
}

impl<K> Default for DragSession<K> {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
        }
    }
}

impl<K> Clone for DragSession<K> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            target: self.target.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for DragSession<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSession")
            .field("source", &self.source.as_ref().map(|d| d.id()))
            .field("target", &self.target.as_ref().map(|d| d.id()))
            .finish()
    }
}

impl<K> DragSession<K> {
    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }
}

impl<K: PartialEq> DragSession<K> {
    /// Whether `id` is the dragged source.
    pub fn is_dragging(&self, id: &K) -> bool {
        self.source.as_ref().is_some_and(|s| s.id() == id)
    }

    /// Whether `id` is the current target.
    pub fn is_over(&self, id: &K) -> bool {
        self.target.as_ref().is_some_and(|t| t.id() == id)
    }
}

/// A partial session update; unset fields are left alone.
pub struct SessionPatch<K> {
    source: Option<Option<Rc<Draggable<K>>>>,
    target: Option<Option<Rc<Draggable<K>>>>,
}

impl<K> Default for SessionPatch<K> {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for SessionPatch<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn id<T>(v: &Option<Option<Rc<Draggable<T>>>>) -> Option<Option<&T>> {
            v.as_ref().map(|d| d.as_ref().map(|d| d.id()))
        }
        f.debug_struct("SessionPatch")
            .field("source", &id(&self.source))
            .field("target", &id(&self.target))
            .finish()
    }
}

impl<K> SessionPatch<K> {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source.
    pub fn source(mut self, source: Option<Rc<Draggable<K>>>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the target.
    pub fn target(mut self, target: Option<Rc<Draggable<K>>>) -> Self {
        self.target = Some(target);
        self
    }
}

/// Handle returned by subscription calls.
///
/// [`unsubscribe`](Self::unsubscribe) may be called any number of times.
/// Dropping the handle does not unsubscribe.
pub struct Subscription {
    cancel: Cell<Option<Box<dyn FnOnce()>>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cancel = self.cancel.take();
        let active = cancel.is_some();
        self.cancel.set(cancel);
        f.debug_struct("Subscription")
            .field("active", &active)
            .finish()
    }
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Cell::new(Some(Box::new(cancel))),
        }
    }

    /// Stop receiving notifications.
    pub fn unsubscribe(&self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

type Subscriber = Rc<dyn Fn()>;

struct StoreInner<K> {
    session: RefCell<Rc<DragSession<K>>>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
    next_subscriber: Cell<u64>,
}

/// Observable holder of the current [`DragSession`].
///
/// Cloning the store clones the handle; all clones share one session.
pub struct SessionStore<K> {
    inner: Rc<StoreInner<K>>,
}

impl<K> Clone for SessionStore<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K> Default for SessionStore<K> {
    fn default() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                session: RefCell::new(Rc::new(DragSession::default())),
                subscribers: RefCell::new(Vec::new()),
                next_subscriber: Cell::new(0),
            }),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for SessionStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.session.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<K: 'static> SessionStore<K> {
    /// Create a store holding an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session. Stable between notifications.
    pub fn snapshot(&self) -> Rc<DragSession<K>> {
        Rc::clone(&self.inner.session.borrow())
    }

    /// Start a session for `source` with no target. Always notifies.
    pub fn begin(&self, source: Rc<Draggable<K>>) {
        self.replace(DragSession {
            source: Some(source),
            target: None,
        });
    }

    /// Merge `patch` into the session, notifying only if something changed.
    pub fn update(&self, patch: SessionPatch<K>) -> SessionChange {
        let current = self.snapshot();
        let mut next = (*current).clone();
        let mut change = SessionChange::empty();
        if let Some(source) = patch.source
            && !same_ref(&current.source, &source)
        {
            next.source = source;
            change |= SessionChange::SOURCE;
        }
        if let Some(target) = patch.target
            && !same_ref(&current.target, &target)
        {
            next.target = target;
            change |= SessionChange::TARGET;
        }
        if !change.is_empty() {
            self.replace(next);
        }
        change
    }

    /// Clear the session. Always notifies.
    pub fn end(&self) {
        self.replace(DragSession::default());
    }

    /// Register a zero-argument change callback.
    pub fn subscribe(&self, subscriber: impl Fn() + 'static) -> Subscription {
        let id = self.inner.next_subscriber.get();
        self.inner.next_subscriber.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        let weak: Weak<StoreInner<K>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.borrow_mut().retain(|(s, _)| *s != id);
            }
        })
    }

    /// Register a callback that receives the new session on every change.
    pub fn watch(&self, watcher: impl Fn(&DragSession<K>) + 'static) -> Subscription {
        let weak = Rc::downgrade(&self.inner);
        self.subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                let session = Rc::clone(&inner.session.borrow());
                watcher(&session);
            }
        })
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn replace(&self, next: DragSession<K>) {
        *self.inner.session.borrow_mut() = Rc::new(next);
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| Rc::clone(s))
            .collect();
        tracing::trace!(subscribers = subscribers.len(), "drag session changed");
        for subscriber in subscribers {
            subscriber();
        }
    }
}

fn same_ref<K>(a: &Option<Rc<Draggable<K>>>, b: &Option<Rc<Draggable<K>>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}
