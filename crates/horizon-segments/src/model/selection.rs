//! Selection state for a segmented control.
//!
//! The [`SelectionReconciler`] owns the selected index and the selected item
//! and keeps them consistent with each other and with the item list. Every
//! state transition is returned as a [`SelectionChange`]; a call that leaves
//! the state as it was returns `None`, so owners only notify on real changes.

use serde::{Deserialize, Serialize};

use horizon_segments_core::logging::targets;

use super::collection::SegmentItem;
use super::mirror::BoundListMirror;
use crate::error::{SegmentsError, SegmentsResult};

/// What to select when a control first receives items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialSelection {
    /// Start with no selection.
    #[default]
    None,
    /// Select the first segment.
    First,
}

/// The selected item of a control.
///
/// Bound controls report the source item; unbound controls report the
/// display string.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedItem<T> {
    Source(T),
    Text(String),
}

impl<T> SelectedItem<T> {
    /// The source item, for bound controls.
    pub fn source(&self) -> Option<&T> {
        match self {
            SelectedItem::Source(item) => Some(item),
            SelectedItem::Text(_) => None,
        }
    }

    /// The display string, for unbound controls.
    pub fn text(&self) -> Option<&str> {
        match self {
            SelectedItem::Source(_) => None,
            SelectedItem::Text(text) => Some(text),
        }
    }
}

/// A completed selection transition.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange<T> {
    pub previous: Option<usize>,
    pub index: Option<usize>,
    pub item: Option<SelectedItem<T>>,
}

impl<T> SelectionChange<T> {
    /// The new index, `-1` when nothing is selected.
    pub fn selected_index(&self) -> i32 {
        index_to_i32(self.index)
    }

    /// The previous index, `-1` when nothing was selected.
    pub fn previous_index(&self) -> i32 {
        index_to_i32(self.previous)
    }
}

pub(crate) fn index_to_i32(index: Option<usize>) -> i32 {
    index.and_then(|i| i32::try_from(i).ok()).unwrap_or(-1)
}

/// Read access to the items a selection can refer to.
pub trait ItemLookup<T> {
    /// Number of selectable items.
    fn item_count(&self) -> usize;

    /// The item reported for `index`.
    fn item_at(&self, index: usize) -> Option<SelectedItem<T>>;

    /// Index of `item`, if present.
    fn index_of(&self, item: &SelectedItem<T>) -> Option<usize>;
}

impl<T: SegmentItem> ItemLookup<T> for BoundListMirror<T> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn item_at(&self, index: usize) -> Option<SelectedItem<T>> {
        match self.source() {
            Some(source) => source.get(index).map(SelectedItem::Source),
            None => self.get(index).map(|text| SelectedItem::Text(text.to_owned())),
        }
    }

    fn index_of(&self, item: &SelectedItem<T>) -> Option<usize> {
        match (item, self.source()) {
            (SelectedItem::Source(value), Some(source)) => source.position(value),
            (SelectedItem::Source(value), None) => {
                let text = self.project(value, 0).ok()?;
                self.entries().iter().position(|entry| *entry == text)
            }
            (SelectedItem::Text(text), _) => self.entries().iter().position(|entry| entry == text),
        }
    }
}

/// Selection state captured by [`SelectionReconciler::checkpoint`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCheckpoint<T> {
    index: Option<usize>,
    item: Option<SelectedItem<T>>,
}

/// Owns the selected index and item.
#[derive(Debug, Clone)]
pub struct SelectionReconciler<T> {
    index: Option<usize>,
    item: Option<SelectedItem<T>>,
    initial: InitialSelection,
}

impl<T: Clone + PartialEq> SelectionReconciler<T> {
    pub fn new(initial: InitialSelection) -> Self {
        Self {
            index: None,
            item: None,
            initial,
        }
    }

    /// Selected index, `-1` when nothing is selected.
    pub fn selected_index(&self) -> i32 {
        index_to_i32(self.index)
    }

    /// Selected index as an option.
    pub fn selection(&self) -> Option<usize> {
        self.index
    }

    pub fn selected_item(&self) -> Option<&SelectedItem<T>> {
        self.item.as_ref()
    }

    pub fn initial(&self) -> InitialSelection {
        self.initial
    }

    fn commit<L>(&mut self, index: Option<usize>, lookup: &L) -> Option<SelectionChange<T>>
    where
        L: ItemLookup<T> + ?Sized,
    {
        let item = index.and_then(|i| lookup.item_at(i));
        if index == self.index && item == self.item {
            return None;
        }

        let previous = std::mem::replace(&mut self.index, index);
        self.item = item.clone();
        tracing::debug!(
            target: targets::SELECTION,
            previous = index_to_i32(previous),
            index = index_to_i32(index),
            "selection changed"
        );
        Some(SelectionChange {
            previous,
            index,
            item,
        })
    }

    /// Select by index; `-1` clears the selection.
    ///
    /// Any other index outside `0..len` is rejected and the state is
    /// untouched.
    pub fn set_selected_index<L>(&mut self, index: i32, lookup: &L) -> SegmentsResult<Option<SelectionChange<T>>>
    where
        L: ItemLookup<T> + ?Sized,
    {
        let len = lookup.item_count();
        match usize::try_from(index) {
            Ok(i) if i < len => Ok(self.commit(Some(i), lookup)),
            _ if index == -1 => Ok(self.commit(None, lookup)),
            _ => {
                tracing::debug!(target: targets::SELECTION, index, len, "rejected out-of-range selection");
                Err(SegmentsError::IndexOutOfRange { index, len })
            }
        }
    }

    /// Select the segment the user checked.
    pub fn on_view_checked<L>(&mut self, ordinal: usize, lookup: &L) -> SegmentsResult<Option<SelectionChange<T>>>
    where
        L: ItemLookup<T> + ?Sized,
    {
        let len = lookup.item_count();
        if ordinal >= len {
            return Err(SegmentsError::IndexOutOfRange {
                index: index_to_i32(Some(ordinal)),
                len,
            });
        }
        Ok(self.commit(Some(ordinal), lookup))
    }

    /// Select by item; `None` clears the selection.
    pub fn set_selected_item<L>(
        &mut self,
        item: Option<&SelectedItem<T>>,
        lookup: &L,
    ) -> SegmentsResult<Option<SelectionChange<T>>>
    where
        L: ItemLookup<T> + ?Sized,
    {
        let index = match item {
            Some(item) => Some(lookup.index_of(item).ok_or(SegmentsError::ItemNotFound)?),
            None => None,
        };
        Ok(self.commit(index, lookup))
    }

    /// Capture the current state, to report a batch of transitions as one.
    pub fn checkpoint(&self) -> SelectionCheckpoint<T> {
        SelectionCheckpoint {
            index: self.index,
            item: self.item.clone(),
        }
    }

    /// The net change since `checkpoint`, if any.
    pub fn changes_since(&self, checkpoint: SelectionCheckpoint<T>) -> Option<SelectionChange<T>> {
        (checkpoint.index != self.index || checkpoint.item != self.item).then(|| SelectionChange {
            previous: checkpoint.index,
            index: self.index,
            item: self.item.clone(),
        })
    }

    /// Clear the selection.
    pub fn clear(&mut self) -> Option<SelectionChange<T>> {
        if self.index.is_none() && self.item.is_none() {
            return None;
        }
        let previous = self.index.take();
        self.item = None;
        Some(SelectionChange {
            previous,
            index: None,
            item: None,
        })
    }

    /// Re-derive the selection after the list was replaced wholesale.
    ///
    /// An index past the end is clamped to the last item; an empty list
    /// clears the selection.
    pub fn resolve_after_reset<L>(&mut self, lookup: &L) -> Option<SelectionChange<T>>
    where
        L: ItemLookup<T> + ?Sized,
    {
        let len = lookup.item_count();
        let index = match self.index {
            Some(_) if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
        self.commit(index, lookup)
    }

    /// Keep pointing at the same item after `count` items were inserted at
    /// `index`.
    pub fn on_inserted<L>(&mut self, index: usize, count: usize, lookup: &L) -> Option<SelectionChange<T>>
    where
        L: ItemLookup<T> + ?Sized,
    {
        match self.index {
            Some(selected) if selected >= index => self.commit(Some(selected + count), lookup),
            _ => None,
        }
    }

    /// Adjust for `count` items removed at `index`.
    ///
    /// Removing the selected item clears the selection.
    pub fn on_removed<L>(&mut self, index: usize, count: usize, lookup: &L) -> Option<SelectionChange<T>>
    where
        L: ItemLookup<T> + ?Sized,
    {
        match self.index {
            Some(selected) if selected >= index + count => self.commit(Some(selected - count), lookup),
            Some(selected) if selected >= index => self.commit(None, lookup),
            _ => None,
        }
    }

    /// Apply the initial-selection policy if nothing is selected yet.
    pub fn apply_initial<L>(&mut self, lookup: &L) -> Option<SelectionChange<T>>
    where
        L: ItemLookup<T> + ?Sized,
    {
        if self.initial == InitialSelection::First && self.index.is_none() && lookup.item_count() > 0 {
            self.commit(Some(0), lookup)
        } else {
            None
        }
    }
}

impl<T: Clone + PartialEq> Default for SelectionReconciler<T> {
    fn default() -> Self {
        Self::new(InitialSelection::None)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::StaticList;

    fn direct(items: &[&str]) -> BoundListMirror<String> {
        let mut mirror = BoundListMirror::new();
        for item in items {
            mirror.push(*item).unwrap();
        }
        mirror
    }

    fn bound(items: &[&str]) -> BoundListMirror<String> {
        let mut mirror = BoundListMirror::new();
        let source: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        mirror.attach(Arc::new(StaticList::new(source)), |_| unreachable!()).unwrap();
        mirror
    }

    #[test]
    fn test_set_index_reports_change_once() {
        let mirror = direct(&["A", "B", "C"]);
        let mut selection = SelectionReconciler::default();

        let change = selection.set_selected_index(1, &mirror).unwrap().unwrap();
        assert_eq!(change.previous_index(), -1);
        assert_eq!(change.selected_index(), 1);
        assert_eq!(change.item, Some(SelectedItem::Text("B".into())));

        assert!(selection.set_selected_index(1, &mirror).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_is_rejected_without_change() {
        let mirror = direct(&["A", "B"]);
        let mut selection = SelectionReconciler::default();
        selection.set_selected_index(0, &mirror).unwrap();

        for bad in [2, 7, -2, i32::MIN] {
            let err = selection.set_selected_index(bad, &mirror).unwrap_err();
            assert!(matches!(err, SegmentsError::IndexOutOfRange { len: 2, .. }));
        }
        assert_eq!(selection.selected_index(), 0);
    }

    #[test]
    fn test_minus_one_clears() {
        let mirror = direct(&["A"]);
        let mut selection = SelectionReconciler::default();
        selection.set_selected_index(0, &mirror).unwrap();

        let change = selection.set_selected_index(-1, &mirror).unwrap().unwrap();
        assert_eq!(change.index, None);
        assert_eq!(selection.selected_item(), None);
    }

    #[test]
    fn test_bound_item_is_source_item() {
        let mirror = bound(&["View A", "View B"]);
        let mut selection = SelectionReconciler::default();

        selection.on_view_checked(1, &mirror).unwrap();
        assert_eq!(selection.selected_item(), Some(&SelectedItem::Source("View B".to_string())));
    }

    #[test]
    fn test_set_selected_item_resolves_index() {
        let mirror = bound(&["A", "B", "C"]);
        let mut selection = SelectionReconciler::default();

        let change = selection
            .set_selected_item(Some(&SelectedItem::Source("C".to_string())), &mirror)
            .unwrap()
            .unwrap();
        assert_eq!(change.index, Some(2));

        let missing = selection.set_selected_item(Some(&SelectedItem::Source("Z".to_string())), &mirror);
        assert!(matches!(missing, Err(SegmentsError::ItemNotFound)));
        assert_eq!(selection.selection(), Some(2));
    }

    #[test]
    fn test_reset_clamps_and_clears() {
        let mut selection = SelectionReconciler::default();
        selection.set_selected_index(2, &direct(&["A", "B", "C"])).unwrap();

        let change = selection.resolve_after_reset(&direct(&["X", "Y"])).unwrap();
        assert_eq!(change.index, Some(1));
        assert_eq!(change.item, Some(SelectedItem::Text("Y".into())));

        let change = selection.resolve_after_reset(&direct(&[])).unwrap();
        assert_eq!(change.index, None);
    }

    #[test]
    fn test_reset_with_same_index_new_item_notifies() {
        let mut selection = SelectionReconciler::default();
        selection.set_selected_index(0, &direct(&["A"])).unwrap();

        let change = selection.resolve_after_reset(&direct(&["Z"])).unwrap();
        assert_eq!(change.previous, Some(0));
        assert_eq!(change.index, Some(0));
        assert!(selection.resolve_after_reset(&direct(&["Z"])).is_none());
    }

    #[test]
    fn test_insert_and_remove_shift_selection() {
        let mut selection = SelectionReconciler::default();
        selection.set_selected_index(1, &direct(&["A", "B", "C"])).unwrap();

        let after_insert = direct(&["N", "A", "B", "C"]);
        let change = selection.on_inserted(0, 1, &after_insert).unwrap();
        assert_eq!(change.index, Some(2));
        assert_eq!(change.item, Some(SelectedItem::Text("B".into())));

        assert!(selection.on_inserted(4, 1, &direct(&["N", "A", "B", "C", "D"])).is_none());

        let after_remove = direct(&["A", "B", "C", "D"]);
        assert_eq!(selection.on_removed(0, 1, &after_remove).unwrap().index, Some(1));

        let change = selection.on_removed(1, 1, &direct(&["A", "C", "D"])).unwrap();
        assert_eq!(change.index, None);
        assert_eq!(change.item, None);
    }

    #[test]
    fn test_initial_first() {
        let mut selection = SelectionReconciler::new(InitialSelection::First);
        assert!(selection.apply_initial(&direct(&[])).is_none());
        assert_eq!(selection.apply_initial(&direct(&["A"])).unwrap().index, Some(0));
        assert!(selection.apply_initial(&direct(&["A"])).is_none());
    }

    #[test]
    fn test_changes_since_checkpoint() {
        let mut selection = SelectionReconciler::default();
        selection.set_selected_index(1, &direct(&["A", "B"])).unwrap();

        let checkpoint = selection.checkpoint();
        selection.on_inserted(0, 1, &direct(&["N", "A", "B"]));
        selection.on_removed(0, 1, &direct(&["A", "B"]));
        assert!(selection.changes_since(checkpoint.clone()).is_none());

        selection.on_removed(1, 1, &direct(&["A"]));
        let change = selection.changes_since(checkpoint).unwrap();
        assert_eq!(change.previous, Some(1));
        assert_eq!(change.index, None);
    }
}
