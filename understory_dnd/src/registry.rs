// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of live draggables keyed by id.
//!
//! ## Replacement and cleanup
//!
//! Registering an id that is already present replaces the previous entry. The
//! replaced entry is handed back as a [`Retired`] value whose release listener
//! runs exactly once, when the `Retired` is dropped. Callers that hold other
//! borrows can delay that drop until they are released.
//!
//! Every registration gets a fresh [`RegistrationToken`]. [`Registry::dispose`]
//! only removes an entry whose token still matches, so a disposer held by a
//! replaced registration cannot remove its successor, and disposing twice is a
//! no-op.
//!
//! ## Ordering
//!
//! Lookup order is unspecified. Each entry records when it was registered, and
//! resolution uses that as its last-resort tie-break (earliest registration
//! wins). Replacing an entry counts as a new registration.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::types::Draggable;

/// Listener cleanup run when a registration is replaced or removed.
pub type Release = Box<dyn FnOnce()>;

/// Identifies one specific registration of an id.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RegistrationToken(u64);

struct Entry<K> {
    seq: u64,
    draggable: Rc<Draggable<K>>,
    release: Option<Release>,
}

/// A registration that has left the registry.
///
/// Dropping it runs the registration's release listener.
pub struct Retired<K> {
    draggable: Rc<Draggable<K>>,
    release: Option<Release>,
}

impl<K> Retired<K> {
    /// The descriptor that was removed.
    pub fn draggable(&self) -> &Rc<Draggable<K>> {
        &self.draggable
    }
}

impl<K> Drop for Retired<K> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Retired<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retired")
            .field("id", self.draggable.id())
            .field("has_release", &self.release.is_some())
            .finish()
    }
}

/// Id → draggable map with replace-on-register semantics.
pub struct Registry<K> {
    entries: BTreeMap<K, Entry<K>>,
    next_seq: u64,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("ids", &self.entries.keys().collect::<Vec<_>>())
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

impl<K: Ord + Clone> Registry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `draggable`, replacing any entry with the same id.
    ///
    /// Returns the token of the new registration and the replaced entry, if any.
    pub fn register(
        &mut self,
        draggable: Draggable<K>,
        release: Option<Release>,
    ) -> (RegistrationToken, Option<Retired<K>>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = draggable.id().clone();
        let entry = Entry {
            seq,
            draggable: Rc::new(draggable),
            release,
        };
        let retired = self.entries.insert(id, entry).map(Entry::retire);
        (RegistrationToken(seq), retired)
    }

    /// Remove the entry for `id`, whichever registration it is.
    pub fn unregister(&mut self, id: &K) -> Option<Retired<K>> {
        self.entries.remove(id).map(Entry::retire)
    }

    /// Remove the entry for `id` only if it is still the registration identified by `token`.
    pub fn dispose(&mut self, id: &K, token: RegistrationToken) -> Option<Retired<K>> {
        match self.entries.get(id) {
            Some(entry) if entry.seq == token.0 => self.unregister(id),
            _ => None,
        }
    }

    /// Whether `token` is the live registration for `id`.
    pub fn is_current(&self, id: &K, token: RegistrationToken) -> bool {
        self.entries.get(id).is_some_and(|e| e.seq == token.0)
    }
}

impl<K: Ord> Registry<K> {
    /// Look up the live descriptor for `id`.
    pub fn get(&self, id: &K) -> Option<&Rc<Draggable<K>>> {
        self.entries.get(id).map(|e| &e.draggable)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &K) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptors in registration order (oldest first).
    pub fn in_registration_order(&self) -> Vec<&Rc<Draggable<K>>> {
        let mut out: Vec<_> = self.entries.values().collect();
        out.sort_by_key(|e| e.seq);
        out.into_iter().map(|e| &e.draggable).collect()
    }

    /// Descriptors paired with their registration sequence, in unspecified order.
    pub(crate) fn sequenced(&self) -> impl Iterator<Item = (u64, &Rc<Draggable<K>>)> {
        self.entries.values().map(|e| (e.seq, &e.draggable))
    }
}

impl<K> Entry<K> {
    fn retire(self) -> Retired<K> {
        Retired {
            draggable: self.draggable,
            release: self.release,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DragSpec;
    use core::cell::Cell;
    use kurbo::Rect;

    fn item(id: u32) -> Draggable<u32> {
        Draggable::new(id, DragSpec::new("item").accepts(["item"]), Rc::new(Rect::ZERO))
    }

    fn counting_release(count: &Rc<Cell<u32>>) -> Option<Release> {
        let count = count.clone();
        Some(Box::new(move || count.set(count.get() + 1)))
    }

    #[test]
    fn replacing_releases_the_previous_registration_once() {
        let mut reg = Registry::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let (t1, retired) = reg.register(item(1), counting_release(&first));
        assert!(retired.is_none());
        let (t2, retired) = reg.register(item(1), counting_release(&second));
        assert_eq!(first.get(), 0, "release runs when the retired entry drops");
        drop(retired);
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert_ne!(t1, t2);
        assert_eq!(reg.len(), 1);

        // The stale token can no longer remove anything.
        assert!(reg.dispose(&1, t1).is_none());
        assert_eq!(first.get(), 1);
        assert!(reg.contains(&1));
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut reg = Registry::new();
        let count = Rc::new(Cell::new(0));
        let (token, _) = reg.register(item(3), counting_release(&count));
        assert!(reg.is_current(&3, token));
        drop(reg.dispose(&3, token));
        drop(reg.dispose(&3, token));
        assert_eq!(count.get(), 1);
        assert!(reg.is_empty());
        assert!(!reg.is_current(&3, token));
    }

    #[test]
    fn unregister_removes_regardless_of_token() {
        let mut reg = Registry::new();
        let _ = reg.register(item(4), None);
        let retired = reg.unregister(&4).unwrap();
        assert_eq!(*retired.draggable().id(), 4);
        assert!(reg.get(&4).is_none());
        assert!(reg.unregister(&4).is_none());
    }

    #[test]
    fn registration_order_tracks_replacement() {
        let mut reg = Registry::new();
        let _ = reg.register(item(5), None);
        let _ = reg.register(item(2), None);
        let _ = reg.register(item(9), None);
        let _ = reg.register(item(5), None);
        let ids: Vec<u32> = reg
            .in_registration_order()
            .into_iter()
            .map(|d| *d.id())
            .collect();
        assert_eq!(ids, [2, 9, 5]);
    }
}
