//! Turns source items into display strings.

use std::fmt;
use std::sync::Arc;

use super::collection::SegmentItem;
use crate::error::{SegmentsError, SegmentsResult};

/// Maps an item to its display string. `None` marks a null projection.
pub type DisplayBinding<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Projects items to display strings.
///
/// Without a binding, items project through [`SegmentItem::display_text`].
/// With one, the binding decides. Projection is pure: it never retains the
/// item.
pub struct Projector<T> {
    binding: Option<DisplayBinding<T>>,
}

impl<T: SegmentItem> Projector<T> {
    pub fn new() -> Self {
        Self { binding: None }
    }

    /// Projector that always uses `binding`.
    pub fn with_binding(binding: DisplayBinding<T>) -> Self {
        Self {
            binding: Some(binding),
        }
    }

    /// Project one item. `index` is only used for error reporting.
    pub fn project(&self, item: &T, index: usize) -> SegmentsResult<String> {
        let text = match &self.binding {
            Some(binding) => binding(item),
            None => item.display_text(),
        };
        text.ok_or(SegmentsError::NullItem { index })
    }

    /// Project a block of items that starts at source position `start`.
    ///
    /// Fails on the first null item, before any caller state is touched.
    pub fn project_all(&self, items: &[T], start: usize) -> SegmentsResult<Vec<String>> {
        items
            .iter()
            .enumerate()
            .map(|(offset, item)| self.project(item, start + offset))
            .collect()
    }

    /// Replace the binding. Returns `true` if a binding was set or cleared.
    pub fn set_binding(&mut self, binding: Option<DisplayBinding<T>>) -> bool {
        let changed = match (&self.binding, &binding) {
            (None, None) => false,
            (Some(old), Some(new)) => !Arc::ptr_eq(old, new),
            _ => true,
        };
        self.binding = binding;
        changed
    }

    /// The current binding, if any.
    pub fn binding(&self) -> Option<DisplayBinding<T>> {
        self.binding.clone()
    }

    pub fn has_binding(&self) -> bool {
        self.binding.is_some()
    }
}

impl<T: SegmentItem> Default for Projector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Projector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector")
            .field("has_binding", &self.binding.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Planet {
        name: String,
        moons: u32,
    }

    impl SegmentItem for Planet {
        fn display_text(&self) -> Option<String> {
            Some(self.name.clone())
        }
    }

    fn planets() -> Vec<Planet> {
        vec![
            Planet { name: "Mars".into(), moons: 2 },
            Planet { name: "Venus".into(), moons: 0 },
        ]
    }

    #[test]
    fn test_project_uses_display_text() {
        let projector = Projector::new();
        assert_eq!(projector.project_all(&planets(), 0).unwrap(), vec!["Mars", "Venus"]);
    }

    #[test]
    fn test_binding_overrides_display_text() {
        let mut projector = Projector::new();
        let binding: DisplayBinding<Planet> =
            Arc::new(|planet| Some(format!("{} ({})", planet.name, planet.moons)));
        assert!(projector.set_binding(Some(binding.clone())));
        assert!(!projector.set_binding(Some(binding)));

        assert_eq!(projector.project(&planets()[0], 0).unwrap(), "Mars (2)");
    }

    #[test]
    fn test_null_item_reports_position() {
        let projector = Projector::<Option<String>>::new();
        let items = vec![Some("A".to_string()), None];

        let err = projector.project_all(&items, 4).unwrap_err();
        assert!(matches!(err, SegmentsError::NullItem { index: 5 }));
    }

    #[test]
    fn test_null_binding_result() {
        let projector = Projector::<Planet>::with_binding(Arc::new(|p: &Planet| {
            (p.moons > 0).then(|| p.name.clone())
        }));
        assert!(projector.project(&planets()[0], 0).is_ok());
        assert!(matches!(
            projector.project(&planets()[1], 1),
            Err(SegmentsError::NullItem { index: 1 })
        ));
    }
}
