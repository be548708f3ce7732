//! Source collections the control can bind to.
//!
//! A [`SourceCollection`] is any indexable list of items. Collections that
//! can report their own mutations expose a [`CollectionChange`] signal through
//! [`SourceCollection::changes`]; the control subscribes to it while bound.
//!
//! [`ObservableList`] is the change-notifying implementation and
//! [`StaticList`] a plain snapshot.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_segments::model::{ObservableList, SourceCollection};
//!
//! let views = Arc::new(ObservableList::new(vec!["View A".to_string()]));
//! views.push("View B".to_string());
//! assert_eq!(views.len(), 2);
//! assert!(views.changes().is_some());
//! ```

use std::ops::Range;
use std::sync::Arc;

use horizon_segments_core::Signal;
use horizon_segments_core::logging::targets;
use parking_lot::RwLock;

/// An item that can be shown as a segment.
///
/// `None` from [`display_text`](Self::display_text) marks a null item, which
/// the control refuses to display.
pub trait SegmentItem: Clone + PartialEq + Send + Sync + 'static {
    /// The text shown for this item when no display binding is set.
    fn display_text(&self) -> Option<String>;
}

impl SegmentItem for String {
    fn display_text(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl SegmentItem for &'static str {
    fn display_text(&self) -> Option<String> {
        Some((*self).to_string())
    }
}

impl<T: SegmentItem> SegmentItem for Option<T> {
    fn display_text(&self) -> Option<String> {
        self.as_ref().and_then(SegmentItem::display_text)
    }
}

macro_rules! impl_segment_item_via_to_string {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SegmentItem for $ty {
                fn display_text(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_segment_item_via_to_string!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, char, bool);

/// A mutation reported by a change-notifying collection.
///
/// A `start` of `None` means the collection didn't report a position.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionChange<T> {
    /// `items` were inserted starting at `start`.
    Add { start: Option<usize>, items: Vec<T> },
    /// `items` were removed starting at `start`.
    Remove { start: Option<usize>, items: Vec<T> },
    /// `items` moved from `from` to `to`.
    Move { from: usize, to: usize, items: Vec<T> },
    /// `old_items` at `start` were replaced by `new_items`.
    Replace {
        start: usize,
        old_items: Vec<T>,
        new_items: Vec<T>,
    },
    /// The contents changed wholesale.
    Reset,
}

impl<T> CollectionChange<T> {
    /// Short name for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            CollectionChange::Add { .. } => "add",
            CollectionChange::Remove { .. } => "remove",
            CollectionChange::Move { .. } => "move",
            CollectionChange::Replace { .. } => "replace",
            CollectionChange::Reset => "reset",
        }
    }
}

/// An indexable collection of items.
pub trait SourceCollection<T>: Send + Sync {
    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the item at `index`.
    fn get(&self, index: usize) -> Option<T>;

    /// Copy of every item in order.
    fn snapshot(&self) -> Vec<T>;

    /// Index of the first item equal to `item`.
    fn position(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.snapshot().iter().position(|candidate| candidate == item)
    }

    /// The change signal, for collections that report their mutations.
    fn changes(&self) -> Option<Arc<Signal<CollectionChange<T>>>> {
        None
    }
}

/// A list that emits a [`CollectionChange`] for every mutation.
///
/// The change is emitted after the write lock is released, so connected
/// slots may read the list.
pub struct ObservableList<T> {
    items: RwLock<Vec<T>>,
    changes: Arc<Signal<CollectionChange<T>>>,
}

impl<T: Clone + Send + Sync + 'static> ObservableList<T> {
    /// Creates a list with the given items.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            changes: Arc::new(Signal::new()),
        }
    }

    /// Creates an empty list.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn notify(&self, change: CollectionChange<T>) {
        tracing::trace!(target: targets::COLLECTION, kind = change.kind(), "collection changed");
        self.changes.emit(change);
    }

    /// Appends an item.
    pub fn push(&self, item: T) {
        let start = {
            let mut items = self.items.write();
            items.push(item.clone());
            items.len() - 1
        };
        self.notify(CollectionChange::Add {
            start: Some(start),
            items: vec![item],
        });
    }

    /// Inserts an item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&self, index: usize, item: T) {
        self.items.write().insert(index, item.clone());
        self.notify(CollectionChange::Add {
            start: Some(index),
            items: vec![item],
        });
    }

    /// Inserts a block of items at `index` with a single notification.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert_many(&self, index: usize, new_items: Vec<T>) {
        if new_items.is_empty() {
            return;
        }
        {
            let mut items = self.items.write();
            let tail = items.split_off(index);
            items.extend(new_items.iter().cloned());
            items.extend(tail);
        }
        self.notify(CollectionChange::Add {
            start: Some(index),
            items: new_items,
        });
    }

    /// Removes and returns the item at `index`, or `None` if out of range.
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.write();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.notify(CollectionChange::Remove {
            start: Some(index),
            items: vec![removed.clone()],
        });
        Some(removed)
    }

    /// Removes the first item equal to `item`.
    pub fn remove_item(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        let index = self.items.read().iter().position(|candidate| candidate == item);
        index.and_then(|index| self.remove(index)).is_some()
    }

    /// Removes a block of items with a single notification.
    ///
    /// The range is clamped to the list length.
    pub fn remove_range(&self, range: Range<usize>) -> Vec<T> {
        let (start, removed): (usize, Vec<T>) = {
            let mut items = self.items.write();
            let end = range.end.min(items.len());
            let start = range.start.min(end);
            (start, items.drain(start..end).collect())
        };
        if !removed.is_empty() {
            self.notify(CollectionChange::Remove {
                start: Some(start),
                items: removed.clone(),
            });
        }
        removed
    }

    /// Replaces the item at `index`, returning the old one.
    pub fn replace(&self, index: usize, item: T) -> Option<T> {
        let old = {
            let mut items = self.items.write();
            let slot = items.get_mut(index)?;
            std::mem::replace(slot, item.clone())
        };
        self.notify(CollectionChange::Replace {
            start: index,
            old_items: vec![old.clone()],
            new_items: vec![item],
        });
        Some(old)
    }

    /// Moves the item at `from` so it ends up at `to`.
    ///
    /// Returns `false` if either index is out of range.
    pub fn move_item(&self, from: usize, to: usize) -> bool {
        let moved = {
            let mut items = self.items.write();
            if from >= items.len() || to >= items.len() {
                return false;
            }
            let item = items.remove(from);
            items.insert(to, item.clone());
            item
        };
        if from != to {
            self.notify(CollectionChange::Move {
                from,
                to,
                items: vec![moved],
            });
        }
        true
    }

    /// Removes all items.
    pub fn clear(&self) {
        self.items.write().clear();
        self.notify(CollectionChange::Reset);
    }

    /// Replaces the whole contents.
    pub fn set_items(&self, items: Vec<T>) {
        *self.items.write() = items;
        self.notify(CollectionChange::Reset);
    }

    /// Read access to the items.
    pub fn items(&self) -> impl std::ops::Deref<Target = Vec<T>> + '_ {
        self.items.read()
    }

    /// Number of slots currently subscribed to this list.
    pub fn subscriber_count(&self) -> usize {
        self.changes.connection_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Clone + Send + Sync + 'static> SourceCollection<T> for ObservableList<T> {
    fn len(&self) -> usize {
        self.items.read().len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items.read().get(index).cloned()
    }

    fn snapshot(&self) -> Vec<T> {
        self.items.read().clone()
    }

    fn position(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.read().iter().position(|candidate| candidate == item)
    }

    fn changes(&self) -> Option<Arc<Signal<CollectionChange<T>>>> {
        Some(self.changes.clone())
    }
}

/// A collection that never reports changes.
///
/// The control reads it once when bound; later changes require rebinding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticList<T> {
    items: Vec<T>,
}

impl<T> StaticList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> From<Vec<T>> for StaticList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Clone + Send + Sync> SourceCollection<T> for StaticList<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items.get(index).cloned()
    }

    fn snapshot(&self) -> Vec<T> {
        self.items.clone()
    }
}

static_assertions::assert_impl_all!(ObservableList<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    fn recorder(list: &ObservableList<String>) -> Arc<Mutex<Vec<CollectionChange<String>>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        list.changes.connect(move |change| log_clone.lock().push(change.clone()));
        log
    }

    #[test]
    fn test_push_and_insert_report_positions() {
        let list = ObservableList::new(vec!["A".to_string()]);
        let log = recorder(&list);

        list.push("C".into());
        list.insert(1, "B".into());

        assert_eq!(list.snapshot(), vec!["A", "B", "C"]);
        assert_eq!(
            *log.lock(),
            vec![
                CollectionChange::Add { start: Some(1), items: vec!["C".to_string()] },
                CollectionChange::Add { start: Some(1), items: vec!["B".to_string()] },
            ]
        );
    }

    #[test]
    fn test_remove_range_is_one_notification() {
        let list = ObservableList::new(vec!["A".into(), "B".into(), "C".into(), "D".into()]);
        let log = recorder(&list);

        let removed = list.remove_range(1..3);
        assert_eq!(removed, vec!["B", "C"]);
        assert_eq!(list.snapshot(), vec!["A", "D"]);
        assert_eq!(log.lock().len(), 1);
        assert!(matches!(
            &log.lock()[0],
            CollectionChange::Remove { start: Some(1), items } if items.len() == 2
        ));
    }

    #[test]
    fn test_out_of_range_mutations_are_silent() {
        let list = ObservableList::new(vec!["A".to_string()]);
        let log = recorder(&list);

        assert_eq!(list.remove(5), None);
        assert_eq!(list.replace(5, "X".into()), None);
        assert!(!list.move_item(0, 3));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_slot_can_read_list_during_notification() {
        let list = Arc::new(ObservableList::new(vec![1, 2]));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let list_clone = list.clone();
        let seen_clone = seen.clone();
        list.changes().unwrap().connect(move |_| {
            seen_clone.lock().push(list_clone.len());
        });

        list.push(3);
        list.clear();
        assert_eq!(*seen.lock(), vec![3, 0]);
    }

    #[test]
    fn test_move_and_replace() {
        let list = ObservableList::new(vec!['a', 'b', 'c']);
        assert!(list.move_item(0, 2));
        assert_eq!(list.snapshot(), vec!['b', 'c', 'a']);
        assert_eq!(list.replace(0, 'z'), Some('b'));
        assert_eq!(list.position(&'z'), Some(0));
    }

    #[test]
    fn test_static_list_has_no_changes() {
        let list = StaticList::new(vec![1, 2, 3]);
        assert!(list.changes().is_none());
        assert_eq!(list.get(2), Some(3));
        assert_eq!(list.position(&2), Some(1));
    }

    #[test]
    fn test_option_items_are_null_when_none() {
        assert_eq!(Some("A".to_string()).display_text().as_deref(), Some("A"));
        assert_eq!(None::<String>.display_text(), None);
        assert_eq!(7_u32.display_text().as_deref(), Some("7"));
    }
}
