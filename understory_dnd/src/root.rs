// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DnD root: one independent drag-and-drop area.
//!
//! ## Overview
//!
//! A [`DndRoot`] owns a [`Registry`], a [`SessionStore`] and a
//! [`GestureRecognizer`], and routes host pointer events through them:
//!
//! 1. The host registers each participant with [`DndRoot::register`] and keeps
//!    the returned [`Sortable`] handle.
//! 2. Pointer down on a participant goes to [`DndRoot::pointer_down`]
//!    (or [`Sortable::pointer_down`]); pointer moves and ups go to
//!    [`DndRoot::pointer_move`] and [`DndRoot::pointer_up`].
//! 3. Each move during a drag re-reads the source from the registry, resolves
//!    a target and updates the session. When the target changes to something
//!    other than the source, [`on_drag_over`](DndRoot::on_drag_over) monitors
//!    receive a [`DragOver`].
//! 4. The application reorders its model (see [`reorder`](crate::reorder)) and
//!    registers the participants again with their new items and geometry.
//!
//! Roots are independent: a source never resolves against another root's
//! registry.
//!
//! ## Reentrancy
//!
//! Subscribers, monitors and release listeners run with no internal borrow
//! held; they may register, unregister or cancel. Bounds providers and the
//! affordance run while the root is borrowed and must not call back into it.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Point;

use crate::debug::{DistanceLine, distance_lines};
use crate::error::DndError;
use crate::gesture::{Affordance, GestureConfig, GestureEvent, GestureRecognizer, NoAffordance};
use crate::registry::{RegistrationToken, Registry, Release, Retired};
use crate::resolve::resolve;
use crate::session::{DragSession, SessionChange, SessionPatch, SessionStore, Subscription};
use crate::types::{BoundsProvider, DragOver, DragSpec, Draggable, Propagation};

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DndConfig {
    /// Gesture thresholds.
    pub gesture: GestureConfig,
}

type Monitor<K> = Rc<dyn Fn(&DragOver<K>)>;

struct RootInner<K> {
    registry: RefCell<Registry<K>>,
    store: SessionStore<K>,
    gesture: RefCell<GestureRecognizer<K, Box<dyn Affordance>>>,
    monitors: RefCell<Vec<(u64, Monitor<K>)>>,
    next_monitor: Cell<u64>,
}

/// Handle to one drag-and-drop area. Cloning shares the area.
pub struct DndRoot<K> {
    inner: Rc<RootInner<K>>,
}

impl<K> Clone for DndRoot<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for DndRoot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DndRoot")
            .field("registry", &*self.inner.registry.borrow())
            .field("store", &self.inner.store)
            .field("gesture", &*self.inner.gesture.borrow())
            .field("monitors", &self.inner.monitors.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<K: Ord + Clone + fmt::Debug + 'static> Default for DndRoot<K> {
    fn default() -> Self {
        Self::new(DndConfig::default())
    }
}

impl<K: Ord + Clone + fmt::Debug + 'static> DndRoot<K> {
    /// Create a root with no cursor affordance.
    pub fn new(config: DndConfig) -> Self {
        Self::with_affordance(config, NoAffordance)
    }

    /// Create a root that applies `affordance` while a drag is active.
    pub fn with_affordance(config: DndConfig, affordance: impl Affordance + 'static) -> Self {
        let affordance: Box<dyn Affordance> = Box::new(affordance);
        Self {
            inner: Rc::new(RootInner {
                registry: RefCell::new(Registry::new()),
                store: SessionStore::new(),
                gesture: RefCell::new(GestureRecognizer::with_affordance(
                    config.gesture,
                    affordance,
                )),
                monitors: RefCell::new(Vec::new()),
                next_monitor: Cell::new(0),
            }),
        }
    }

    /// Register (or replace) the participant `id`.
    pub fn register(
        &self,
        id: K,
        spec: DragSpec<K>,
        bounds: Rc<dyn BoundsProvider>,
    ) -> Sortable<K> {
        let token = self.inner.register(id.clone(), spec, bounds, None);
        self.sortable(id, token)
    }

    /// Like [`register`](Self::register), with a listener that runs once when
    /// this registration is replaced or removed.
    pub fn register_with_release(
        &self,
        id: K,
        spec: DragSpec<K>,
        bounds: Rc<dyn BoundsProvider>,
        release: impl FnOnce() + 'static,
    ) -> Sortable<K> {
        let token = self
            .inner
            .register(id.clone(), spec, bounds, Some(Box::new(release)));
        self.sortable(id, token)
    }

    /// Remove `id` whichever registration it is. Ends the drag if `id` is its source.
    ///
    /// Returns whether anything was removed.
    pub fn unregister(&self, id: &K) -> bool {
        let retired = self.inner.registry.borrow_mut().unregister(id);
        self.inner.retire(id, retired)
    }

    /// Pointer down on the participant `id`.
    ///
    /// Unregistered ids and presses while another gesture is armed return
    /// [`Propagation::Continue`].
    pub fn pointer_down(&self, id: &K, position: Point) -> Propagation {
        self.inner.pointer_down(id, position)
    }

    /// Pointer moved. Starts the drag on the first qualifying move, then resolves the target.
    ///
    /// Returns [`DndError::NoAcceptingTarget`] when nothing accepts the source's
    /// kind; the drag stays active.
    pub fn pointer_move(&self, position: Point) -> Result<(), DndError> {
        let events = self.inner.gesture.borrow_mut().pointer_move(position);
        for event in events {
            match event {
                GestureEvent::Start { source, origin, .. } => self.inner.start(&source, origin),
                GestureEvent::Move { source, position } => self.inner.drag_move(&source, position)?,
                GestureEvent::End { .. } => {}
            }
        }
        Ok(())
    }

    /// Pointer released. Returns whether a drag ended.
    pub fn pointer_up(&self, position: Point) -> bool {
        let events = self.inner.gesture.borrow_mut().pointer_up(position);
        self.inner.finish(&events)
    }

    /// Abort the current gesture. Returns whether a drag ended.
    pub fn cancel(&self) -> bool {
        self.inner.cancel()
    }

    /// Whether `id` is the active drag source.
    pub fn is_dragging(&self, id: &K) -> bool {
        self.inner.store.snapshot().is_dragging(id)
    }

    /// The current session; the same `Rc` until the next change.
    pub fn snapshot(&self) -> Rc<DragSession<K>> {
        self.inner.store.snapshot()
    }

    /// The underlying session store.
    pub fn session_store(&self) -> &SessionStore<K> {
        &self.inner.store
    }

    /// Zero-argument callback on every session change.
    pub fn subscribe(&self, subscriber: impl Fn() + 'static) -> Subscription {
        self.inner.store.subscribe(subscriber)
    }

    /// Callback receiving the new session on every change.
    pub fn on_session_change(&self, watcher: impl Fn(&DragSession<K>) + 'static) -> Subscription {
        self.inner.store.watch(watcher)
    }

    /// Monitor called whenever the resolved target changes to a participant other than the source.
    pub fn on_drag_over(&self, monitor: impl Fn(&DragOver<K>) + 'static) -> Subscription {
        let id = self.inner.next_monitor.get();
        self.inner.next_monitor.set(id + 1);
        self.inner
            .monitors
            .borrow_mut()
            .push((id, Rc::new(monitor)));
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.monitors.borrow_mut().retain(|(m, _)| *m != id);
            }
        })
    }

    /// Distance lines from `pointer` to every candidate for the active source.
    ///
    /// Empty when no drag is active.
    pub fn debug_lines(&self, pointer: Point) -> Vec<DistanceLine<K>> {
        let Some(source) = self.inner.store.snapshot().source.clone() else {
            return Vec::new();
        };
        distance_lines(pointer, &*source, &self.inner.registry.borrow())
    }

    /// The live descriptor for `id`.
    pub fn registered(&self, id: &K) -> Option<Rc<Draggable<K>>> {
        self.inner.registry.borrow().get(id).cloned()
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.borrow().is_empty()
    }

    fn sortable(&self, id: K, token: RegistrationToken) -> Sortable<K> {
        Sortable {
            root: Rc::downgrade(&self.inner),
            id,
            token: Cell::new(token),
        }
    }
}

impl<K: Ord + Clone + fmt::Debug + 'static> RootInner<K> {
    fn register(
        &self,
        id: K,
        spec: DragSpec<K>,
        bounds: Rc<dyn BoundsProvider>,
        release: Option<Release>,
    ) -> RegistrationToken {
        let draggable = Draggable::new(id.clone(), spec, bounds);
        let (token, retired) = self.registry.borrow_mut().register(draggable, release);
        tracing::debug!(?id, replaced = retired.is_some(), "registered draggable");
        drop(retired);
        token
    }

    fn retire(&self, id: &K, retired: Option<Retired<K>>) -> bool {
        let Some(retired) = retired else {
            return false;
        };
        tracing::debug!(?id, "unregistered draggable");
        drop(retired);
        let active = self.gesture.borrow().source() == Some(id);
        if active {
            self.cancel();
        }
        true
    }

    fn pointer_down(&self, id: &K, position: Point) -> Propagation {
        if !self.registry.borrow().contains(id) {
            return Propagation::Continue;
        }
        self.gesture.borrow_mut().pointer_down(id.clone(), position)
    }

    fn start(&self, id: &K, origin: Point) {
        let source = self.registry.borrow().get(id).cloned();
        match source {
            Some(source) => {
                tracing::debug!(?id, x = origin.x, y = origin.y, "drag started");
                self.store.begin(source);
            }
            None => {
                self.cancel();
            }
        }
    }

    fn drag_move(&self, id: &K, position: Point) -> Result<(), DndError> {
        // A subscriber may have cancelled the drag while it was starting.
        if !self.gesture.borrow().is_dragging() {
            return Ok(());
        }
        let source = self.registry.borrow().get(id).cloned();
        let Some(source) = source else {
            tracing::debug!(?id, "drag source vanished");
            self.cancel();
            return Ok(());
        };
        let resolved = resolve(position, &source, &self.registry.borrow());
        let target = match resolved {
            Ok(target) => target,
            Err(err) => {
                tracing::warn!(?id, %err, "drop-target resolution failed");
                self.store.update(SessionPatch::new().source(Some(source)));
                return Err(err);
            }
        };
        let previous = self.store.snapshot().target.as_ref().map(|t| t.id().clone());
        let change = self.store.update(
            SessionPatch::new()
                .source(Some(Rc::clone(&source)))
                .target(Some(Rc::clone(&target))),
        );
        if change.contains(SessionChange::TARGET) {
            tracing::trace!(source = ?id, target = ?target.id(), "drag target changed");
            // A re-registered target is a new descriptor with the same id.
            if previous.as_ref() != Some(target.id()) && target.id() != source.id() {
                self.notify_monitors(&DragOver { source, target });
            }
        }
        Ok(())
    }

    fn notify_monitors(&self, over: &DragOver<K>) {
        let monitors: Vec<Monitor<K>> = self
            .monitors
            .borrow()
            .iter()
            .map(|(_, m)| Rc::clone(m))
            .collect();
        for monitor in monitors {
            monitor(over);
        }
    }

    fn cancel(&self) -> bool {
        let events = self.gesture.borrow_mut().cancel();
        self.finish(&events)
    }

    fn finish(&self, events: &[GestureEvent<K>]) -> bool {
        let ended = events
            .iter()
            .any(|e| matches!(e, GestureEvent::End { .. }));
        if ended {
            tracing::debug!("drag ended");
            self.store.end();
        }
        ended
    }
}

/// Registration handle returned by [`DndRoot::register`].
///
/// Holds a weak reference to its root. Dropping the handle keeps the
/// registration; call [`dispose`](Self::dispose) on unmount.
pub struct Sortable<K> {
    root: Weak<RootInner<K>>,
    id: K,
    token: Cell<RegistrationToken>,
}

impl<K: fmt::Debug> fmt::Debug for Sortable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sortable")
            .field("id", &self.id)
            .field("token", &self.token.get())
            .field("attached", &(self.root.strong_count() > 0))
            .finish()
    }
}

impl<K: Ord + Clone + fmt::Debug + 'static> Sortable<K> {
    /// The registered id.
    pub fn id(&self) -> &K {
        &self.id
    }

    /// Whether this participant is the active drag source.
    pub fn is_dragging(&self) -> Result<bool, DndError> {
        let root = self.root()?;
        Ok(root.store.snapshot().is_dragging(&self.id))
    }

    /// Whether this participant is the current drop target.
    pub fn is_over(&self) -> Result<bool, DndError> {
        let root = self.root()?;
        Ok(root.store.snapshot().is_over(&self.id))
    }

    /// Whether this handle's registration is still the live one.
    pub fn is_registered(&self) -> bool {
        self.root
            .upgrade()
            .is_some_and(|root| root.registry.borrow().is_current(&self.id, self.token.get()))
    }

    /// Forward a pointer down on this participant.
    pub fn pointer_down(&self, position: Point) -> Result<Propagation, DndError> {
        let root = self.root()?;
        Ok(root.pointer_down(&self.id, position))
    }

    /// Register again with a new spec or bounds provider; the handle follows the new registration.
    pub fn update(&self, spec: DragSpec<K>, bounds: Rc<dyn BoundsProvider>) -> Result<(), DndError> {
        let root = self.root()?;
        let token = root.register(self.id.clone(), spec, bounds, None);
        self.token.set(token);
        Ok(())
    }

    /// Remove this registration if it is still the live one. Idempotent.
    pub fn dispose(&self) {
        let Some(root) = self.root.upgrade() else {
            return;
        };
        let retired = root.registry.borrow_mut().dispose(&self.id, self.token.get());
        root.retire(&self.id, retired);
    }

    fn root(&self) -> Result<Rc<RootInner<K>>, DndError> {
        self.root.upgrade().ok_or(DndError::MissingContext)
    }
}
