//! The display-string mirror of the bound items source.
//!
//! [`BoundListMirror`] keeps `entries[i] == project(source[i])` for every
//! index while a source is bound. Incremental `Add`/`Remove` notifications
//! are applied in place; anything else (moves, replacements, resets, or a
//! change the mirror can't place) re-projects the whole source.
//!
//! Every operation returns the [`MirrorChange`]s it performed so the owner can
//! forward them to the platform views after releasing its own lock.

use std::fmt;
use std::sync::Arc;

use horizon_segments_core::logging::{span_names, targets};
use horizon_segments_core::{ConnectionGuard, Signal};

use super::collection::{CollectionChange, SegmentItem, SourceCollection};
use super::projector::{DisplayBinding, Projector};
use crate::error::{SegmentsError, SegmentsResult};

/// A shared handle to a bound items source.
pub type SourceHandle<T> = Arc<dyn SourceCollection<T>>;

/// A change applied to the mirror's display entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorChange {
    /// `text` was inserted at `index`.
    Inserted { index: usize, text: String },
    /// The entry at `index` was removed.
    Removed { index: usize },
    /// All entries were replaced.
    Reset { entries: Vec<String> },
}

struct Binding<T: Send + 'static> {
    source: SourceHandle<T>,
    /// Dropping the guard unsubscribes from the source.
    subscription: Option<ConnectionGuard<CollectionChange<T>>>,
}

/// Ordered display strings for a segmented control.
///
/// When unbound, the entries are edited directly through
/// [`insert_at`](Self::insert_at), [`remove_at`](Self::remove_at) and friends.
/// While a source is bound, direct edits fail with
/// [`SegmentsError::ItemsSourceBound`].
pub struct BoundListMirror<T: SegmentItem> {
    entries: Vec<String>,
    projector: Projector<T>,
    binding: Option<Binding<T>>,
}

impl<T: SegmentItem> BoundListMirror<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            projector: Projector::new(),
            binding: None,
        }
    }

    /// An unbound mirror holding `entries` as direct items.
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self {
            entries,
            ..Self::new()
        }
    }

    /// Current display entries.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display string at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Whether an items source is bound.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// The bound items source.
    pub fn source(&self) -> Option<&SourceHandle<T>> {
        self.binding.as_ref().map(|binding| &binding.source)
    }

    /// Whether the mirror holds a live change subscription.
    pub fn is_subscribed(&self) -> bool {
        self.binding
            .as_ref()
            .and_then(|binding| binding.subscription.as_ref())
            .is_some_and(ConnectionGuard::is_connected)
    }

    /// Bind to `source` and re-project it.
    ///
    /// Any previous subscription is released before `subscribe` is called
    /// for the new source, so the mirror is never subscribed to two sources.
    /// If the new source holds a null item the mirror is left unbound and
    /// its entries untouched.
    pub fn attach<S>(&mut self, source: SourceHandle<T>, subscribe: S) -> SegmentsResult<Vec<MirrorChange>>
    where
        S: FnOnce(&Arc<Signal<CollectionChange<T>>>) -> ConnectionGuard<CollectionChange<T>>,
    {
        self.detach();

        let subscription = source.changes().map(|changes| subscribe(&changes));
        tracing::debug!(
            target: targets::MIRROR,
            len = source.len(),
            notifying = subscription.is_some(),
            "items source attached"
        );
        self.binding = Some(Binding {
            source,
            subscription,
        });

        match self.reset() {
            Ok(changes) => Ok(changes),
            Err(err) => {
                self.detach();
                Err(err)
            }
        }
    }

    /// Release the bound source and its subscription.
    ///
    /// The entries stay as they are and become directly editable.
    pub fn detach(&mut self) -> bool {
        match self.binding.take() {
            Some(_binding) => {
                tracing::debug!(target: targets::MIRROR, "items source detached");
                true
            }
            None => false,
        }
    }

    /// Re-project the whole bound source.
    ///
    /// Does nothing when unbound. On a null item the entries are untouched.
    pub fn reset(&mut self) -> SegmentsResult<Vec<MirrorChange>> {
        let Some(binding) = &self.binding else {
            return Ok(Vec::new());
        };

        let items = binding.source.snapshot();
        let _span = tracing::debug_span!(
            target: targets::MIRROR,
            span_names::MIRROR_RESET,
            len = items.len()
        )
        .entered();

        self.entries = self.projector.project_all(&items, 0)?;
        Ok(vec![MirrorChange::Reset {
            entries: self.entries.clone(),
        }])
    }

    /// Apply a notification from the bound source.
    ///
    /// Fails only when an added item is null, in which case the entries are
    /// untouched.
    pub fn on_collection_changed(&mut self, change: &CollectionChange<T>) -> SegmentsResult<Vec<MirrorChange>> {
        if self.binding.is_none() {
            tracing::trace!(target: targets::MIRROR, kind = change.kind(), "ignoring change while unbound");
            return Ok(Vec::new());
        }

        match change {
            CollectionChange::Add { start, items } => {
                let len = self.entries.len();
                let start = start.unwrap_or(len);
                if start > len {
                    return self.resync(start, items.len());
                }

                let texts = self.projector.project_all(items, start)?;
                let mut changes = Vec::with_capacity(texts.len());
                for (offset, text) in texts.into_iter().enumerate() {
                    let index = start + offset;
                    self.entries.insert(index, text.clone());
                    changes.push(MirrorChange::Inserted { index, text });
                }
                Ok(changes)
            }
            CollectionChange::Remove {
                start: Some(start),
                items,
            } => {
                let start = *start;
                let count = items.len();
                if start + count > self.entries.len() {
                    return self.resync(start, count);
                }

                // Last index first so the earlier positions stay valid.
                let mut changes = Vec::with_capacity(count);
                for index in (start..start + count).rev() {
                    self.entries.remove(index);
                    changes.push(MirrorChange::Removed { index });
                }
                Ok(changes)
            }
            CollectionChange::Remove { start: None, .. }
            | CollectionChange::Move { .. }
            | CollectionChange::Replace { .. }
            | CollectionChange::Reset => self.reset(),
        }
    }

    fn resync(&mut self, start: usize, count: usize) -> SegmentsResult<Vec<MirrorChange>> {
        tracing::warn!(
            target: targets::MIRROR,
            "{}",
            SegmentsError::ChangeOutOfRange {
                start,
                count,
                len: self.entries.len(),
            }
        );
        self.reset()
    }

    /// Replace the display binding and re-project.
    ///
    /// If the new binding produces a null projection, the old binding is
    /// restored.
    pub fn set_binding(&mut self, binding: Option<DisplayBinding<T>>) -> SegmentsResult<Vec<MirrorChange>> {
        let previous = self.projector.binding();
        if !self.projector.set_binding(binding) {
            return Ok(Vec::new());
        }
        self.reset().inspect_err(|_| {
            self.projector.set_binding(previous);
        })
    }

    /// Project a single item with the current binding.
    pub fn project(&self, item: &T, index: usize) -> SegmentsResult<String> {
        self.projector.project(item, index)
    }

    fn ensure_unbound(&self) -> SegmentsResult<()> {
        if self.is_bound() {
            Err(SegmentsError::ItemsSourceBound)
        } else {
            Ok(())
        }
    }

    /// Append a display string.
    pub fn push(&mut self, text: impl Into<String>) -> SegmentsResult<MirrorChange> {
        let index = self.entries.len();
        self.insert_at(index, text)
    }

    /// Insert a display string at `index`.
    pub fn insert_at(&mut self, index: usize, text: impl Into<String>) -> SegmentsResult<MirrorChange> {
        self.ensure_unbound()?;
        let len = self.entries.len();
        if index > len {
            return Err(SegmentsError::ChangeOutOfRange { start: index, count: 1, len });
        }
        let text = text.into();
        self.entries.insert(index, text.clone());
        Ok(MirrorChange::Inserted { index, text })
    }

    /// Remove the display string at `index`.
    pub fn remove_at(&mut self, index: usize) -> SegmentsResult<(String, MirrorChange)> {
        self.ensure_unbound()?;
        let len = self.entries.len();
        if index >= len {
            return Err(SegmentsError::ChangeOutOfRange { start: index, count: 1, len });
        }
        let text = self.entries.remove(index);
        Ok((text, MirrorChange::Removed { index }))
    }

    /// Remove every display string.
    pub fn clear(&mut self) -> SegmentsResult<MirrorChange> {
        self.ensure_unbound()?;
        self.entries.clear();
        Ok(MirrorChange::Reset { entries: Vec::new() })
    }

    /// Replace every display string.
    pub fn set_entries(&mut self, entries: Vec<String>) -> SegmentsResult<MirrorChange> {
        self.ensure_unbound()?;
        self.entries = entries;
        Ok(MirrorChange::Reset {
            entries: self.entries.clone(),
        })
    }
}

impl<T: SegmentItem> Default for BoundListMirror<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SegmentItem> fmt::Debug for BoundListMirror<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundListMirror")
            .field("entries", &self.entries)
            .field("bound", &self.is_bound())
            .field("projector", &self.projector)
            .finish()
    }
}
