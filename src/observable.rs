//! Synchronous change notification for the bitmap model.
//!
//! Every mutation in the model runs to completion, releases its borrows and
//! only then notifies observers, in registration order, before the mutating
//! call returns. Nothing is deferred and nothing crosses threads, so the
//! building blocks here are `Rc` + `RefCell` based.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    observers: Vec<(u64, Callback<T>)>,
}

/// A list of callbacks notified with a `&T`.
pub struct Observable<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

/// Handle returned by `add_observer`; `terminate` detaches the observer.
///
/// Dropping a subscription keeps the observer registered.
#[must_use = "dropping a Subscription leaves the observer attached; call `terminate` to detach it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Detach the observer. Does nothing if the observable is already gone.
    pub fn terminate(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
    }
}

impl<T: 'static> Observable<T> {
    pub fn new() -> Self {
        Self { registry: Rc::new(RefCell::new(Registry { next_id: 0, observers: Vec::new() })) }
    }

    /// Register an observer.
    pub fn add_observer(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        let callback: Callback<T> = Rc::new(observer);
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.observers.push((id, callback));
            id
        };
        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().observers.retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    /// Call every registered observer with `value`.
    ///
    /// Observers removed by an earlier observer of the same round are skipped.
    pub fn notify(&self, value: &T) {
        let ids: Vec<u64> = self.registry.borrow().observers.iter().map(|(id, _)| *id).collect();
        for id in ids {
            let callback = self
                .registry
                .borrow()
                .observers
                .iter()
                .find(|(other, _)| *other == id)
                .map(|(_, callback)| Rc::clone(callback));
            if let Some(callback) = callback {
                callback(value);
            }
        }
    }

    /// Number of attached observers.
    pub fn observer_count(&self) -> usize {
        self.registry.borrow().observers.len()
    }

    /// Release all observers.
    pub fn terminate(&self) {
        self.registry.borrow_mut().observers.clear();
    }
}

impl<T: 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.registry.borrow().observers.len())
            .finish()
    }
}

/// A single value that notifies its observers when it changes.
pub struct ObservableValue<T: 'static> {
    value: RefCell<T>,
    observable: Observable<T>,
}

impl<T: Clone + PartialEq + 'static> ObservableValue<T> {
    pub fn new(value: T) -> Self {
        Self { value: RefCell::new(value), observable: Observable::new() }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value`; returns `false` (and stays silent) if it is unchanged.
    pub fn set(&self, value: T) -> bool {
        if *self.value.borrow() == value {
            return false;
        }
        *self.value.borrow_mut() = value.clone();
        self.observable.notify(&value);
        true
    }

    pub fn add_observer(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        self.observable.add_observer(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observable.observer_count()
    }

    pub fn terminate(&self) {
        self.observable.terminate();
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObservableValue").field(&*self.value.borrow()).finish()
    }
}

/// What happened to an [`ObservableCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEventKind {
    Add,
    Remove,
    /// Items were reordered; `item` and `index` are `None`.
    Order,
}

/// Notification sent by an [`ObservableCollection`].
pub struct CollectionEvent<T> {
    pub kind: CollectionEventKind,
    pub item: Option<Rc<T>>,
    pub index: Option<usize>,
}

impl<T> fmt::Debug for CollectionEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionEvent")
            .field("kind", &self.kind)
            .field("has_item", &self.item.is_some())
            .field("index", &self.index)
            .finish()
    }
}

/// Ordered collection of shared items, unique by identity.
pub struct ObservableCollection<T: 'static> {
    items: RefCell<Vec<Rc<T>>>,
    observable: Observable<CollectionEvent<T>>,
}

impl<T: 'static> ObservableCollection<T> {
    pub fn new() -> Self {
        Self { items: RefCell::new(Vec::new()), observable: Observable::new() }
    }

    /// Insert `item` at `index` (clamped to the length; `None` appends).
    ///
    /// Returns `false` without notifying if the same instance is already present.
    pub fn add(&self, item: Rc<T>, index: Option<usize>) -> bool {
        let index = {
            let mut items = self.items.borrow_mut();
            if items.iter().any(|other| Rc::ptr_eq(other, &item)) {
                return false;
            }
            let index = index.unwrap_or(items.len()).min(items.len());
            items.insert(index, Rc::clone(&item));
            index
        };
        self.observable.notify(&CollectionEvent {
            kind: CollectionEventKind::Add,
            item: Some(item),
            index: Some(index),
        });
        true
    }

    pub fn add_all(&self, items: impl IntoIterator<Item = Rc<T>>) {
        for item in items {
            self.add(item, None);
        }
    }

    /// Remove `item` by identity. Returns `false` if it is not a member.
    pub fn remove(&self, item: &Rc<T>) -> bool {
        match self.index_of(item) {
            Some(index) => self.remove_index(index).is_some(),
            None => false,
        }
    }

    pub fn remove_index(&self, index: usize) -> Option<Rc<T>> {
        let removed = {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.observable.notify(&CollectionEvent {
            kind: CollectionEventKind::Remove,
            item: Some(Rc::clone(&removed)),
            index: Some(index),
        });
        Some(removed)
    }

    /// Remove every item, last first, with one `Remove` event each.
    pub fn clear(&self) -> Vec<Rc<T>> {
        let mut removed = Vec::with_capacity(self.len());
        while let Some(last) = self.len().checked_sub(1) {
            if let Some(item) = self.remove_index(last) {
                removed.push(item);
            }
        }
        removed
    }

    /// Move the item at `from` to `to`. Returns `false` when nothing moved.
    pub fn move_item(&self, from: usize, to: usize) -> bool {
        {
            let mut items = self.items.borrow_mut();
            if from == to || from >= items.len() || to >= items.len() {
                return false;
            }
            let item = items.remove(from);
            items.insert(to, item);
        }
        self.observable.notify(&CollectionEvent {
            kind: CollectionEventKind::Order,
            item: None,
            index: None,
        });
        true
    }

    pub fn get(&self, index: usize) -> Option<Rc<T>> {
        self.items.borrow().get(index).cloned()
    }

    pub fn index_of(&self, item: &Rc<T>) -> Option<usize> {
        self.items.borrow().iter().position(|other| Rc::ptr_eq(other, item))
    }

    pub fn contains(&self, item: &Rc<T>) -> bool {
        self.index_of(item).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Snapshot of the current items in order.
    pub fn items(&self) -> Vec<Rc<T>> {
        self.items.borrow().clone()
    }

    /// Register an observer; with `notify_existing` it first receives an
    /// `Add` event for every item already present.
    pub fn add_observer(
        &self,
        observer: impl Fn(&CollectionEvent<T>) + 'static,
        notify_existing: bool,
    ) -> Subscription {
        if notify_existing {
            for (index, item) in self.items().into_iter().enumerate() {
                observer(&CollectionEvent {
                    kind: CollectionEventKind::Add,
                    item: Some(item),
                    index: Some(index),
                });
            }
        }
        self.observable.add_observer(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observable.observer_count()
    }

    pub fn terminate(&self) {
        self.observable.terminate();
    }
}

impl<T: 'static> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for ObservableCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCollection").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_notify_in_registration_order() {
        let observable: Observable<u32> = Observable::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        let _first = observable.add_observer(move |v| a.borrow_mut().push(("a", *v)));
        let _second = observable.add_observer(move |v| b.borrow_mut().push(("b", *v)));
        observable.notify(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_subscription_terminate_detaches_one() {
        let observable: Observable<u32> = Observable::new();
        let hits = Rc::new(Cell::new(0));
        let h1 = Rc::clone(&hits);
        let h2 = Rc::clone(&hits);
        let first = observable.add_observer(move |_| h1.set(h1.get() + 1));
        let _second = observable.add_observer(move |_| h2.set(h2.get() + 10));
        first.terminate();
        observable.notify(&0);
        assert_eq!(hits.get(), 10);
        assert_eq!(observable.observer_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_observable() {
        let observable: Observable<u32> = Observable::new();
        let sub = observable.add_observer(|_| {});
        drop(observable);
        sub.terminate();
    }

    #[test]
    fn test_observer_may_read_during_notify() {
        let value = Rc::new(ObservableValue::new(1u8));
        let seen = Rc::new(Cell::new(0));
        let (v, s) = (Rc::clone(&value), Rc::clone(&seen));
        let _sub = value.add_observer(move |_| s.set(v.get()));
        assert!(value.set(5));
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn test_value_set_same_is_silent() {
        let value = ObservableValue::new("a".to_string());
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = value.add_observer(move |_| h.set(h.get() + 1));
        assert!(!value.set("a".to_string()));
        assert!(value.set("b".to_string()));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_collection_rejects_duplicate_identity() {
        let collection = ObservableCollection::new();
        let item = Rc::new(1u8);
        assert!(collection.add(Rc::clone(&item), None));
        assert!(!collection.add(Rc::clone(&item), None));
        // equal value but a different instance is fine
        assert!(collection.add(Rc::new(1u8), None));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_collection_add_clamps_index() {
        let collection = ObservableCollection::new();
        collection.add(Rc::new('a'), None);
        collection.add(Rc::new('c'), Some(99));
        collection.add(Rc::new('b'), Some(1));
        let items: Vec<char> = collection.items().iter().map(|c| **c).collect();
        assert_eq!(items, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_collection_clear_removes_from_back() {
        let collection = ObservableCollection::new();
        collection.add_all([Rc::new(1), Rc::new(2), Rc::new(3)]);
        let removed = Rc::new(RefCell::new(Vec::new()));
        let r = Rc::clone(&removed);
        let _sub = collection.add_observer(
            move |event: &CollectionEvent<i32>| {
                assert_eq!(event.kind, CollectionEventKind::Remove);
                r.borrow_mut().push((**event.item.as_ref().unwrap(), event.index.unwrap()));
            },
            false,
        );
        collection.clear();
        assert!(collection.is_empty());
        assert_eq!(*removed.borrow(), vec![(3, 2), (2, 1), (1, 0)]);
    }

    #[test]
    fn test_collection_move_emits_order() {
        let collection = ObservableCollection::new();
        collection.add_all([Rc::new('a'), Rc::new('b'), Rc::new('c')]);
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let k = Rc::clone(&kinds);
        let _sub = collection.add_observer(move |e: &CollectionEvent<char>| k.borrow_mut().push(e.kind), false);
        assert!(collection.move_item(0, 2));
        assert!(!collection.move_item(1, 1));
        assert!(!collection.move_item(0, 5));
        let items: Vec<char> = collection.items().iter().map(|c| **c).collect();
        assert_eq!(items, vec!['b', 'c', 'a']);
        assert_eq!(*kinds.borrow(), vec![CollectionEventKind::Order]);
    }

    #[test]
    fn test_collection_notify_existing() {
        let collection = ObservableCollection::new();
        collection.add_all([Rc::new(10), Rc::new(20)]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = collection.add_observer(
            move |e: &CollectionEvent<i32>| s.borrow_mut().push(e.index.unwrap()),
            true,
        );
        collection.add(Rc::new(30), None);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_non_member() {
        let collection = ObservableCollection::new();
        collection.add(Rc::new(1), None);
        assert!(!collection.remove(&Rc::new(1)));
        assert_eq!(collection.len(), 1);
    }
}
