//! Subscriptions are released when controls and renderers go away.

use std::sync::Arc;

use horizon_segments::prelude::*;

fn source(items: &[&str]) -> Arc<ObservableList<String>> {
    Arc::new(ObservableList::new(items.iter().map(|s| s.to_string()).collect()))
}

#[test]
fn test_rebinding_keeps_one_subscription() {
    let first = source(&["A"]);
    let second = source(&["X", "Y"]);
    let segments = Segments::<String>::new();

    segments.set_items_source(Some(first.clone())).unwrap();
    segments.set_items_source(Some(first.clone())).unwrap();
    assert_eq!(first.subscriber_count(), 1);

    segments.set_items_source(Some(second.clone())).unwrap();
    assert_eq!(first.subscriber_count(), 0);
    assert_eq!(second.subscriber_count(), 1);

    first.push("B".into());
    assert_eq!(segments.items(), vec!["X", "Y"]);

    segments.set_items_source(None).unwrap();
    assert_eq!(second.subscriber_count(), 0);
}

#[test]
fn test_dispose_releases_source_and_renderer_slots() {
    let items = source(&["A", "B"]);
    let segments = Segments::<String>::new();
    segments.set_items_source(Some(items.clone())).unwrap();

    let mut renderer = SegmentsRenderer::for_host(AndroidSegmentHost::default());
    renderer.set_element(Some(segments.clone()));
    assert_eq!(segments.items_changed().connection_count(), 1);

    segments.dispose();
    assert_eq!(items.subscriber_count(), 0);
    assert_eq!(segments.items_changed().connection_count(), 0);
    assert_eq!(segments.selected_index_changed().connection_count(), 0);

    items.push("C".into());
    renderer.with_synchronizer(|sync| assert_eq!(sync.len(), 2));
    assert!(matches!(segments.add_item("D"), Err(SegmentsError::Disposed)));
}

#[test]
fn test_renderer_dispose_is_idempotent() {
    let segments = Segments::<String>::from_items(["A", "B"]);
    let mut renderer = SegmentsRenderer::for_host(IosSegmentHost::new());
    renderer.set_element(Some(segments.clone()));

    renderer.dispose();
    renderer.dispose();
    assert!(renderer.is_disposed());
    assert!(renderer.element().is_none());
    assert_eq!(segments.property_changed().connection_count(), 0);
    assert!(!renderer.tap(0));
    renderer.with_host(|host| assert_eq!(host.segment_count(), 0));

    // The element outlives its renderer.
    segments.set_selected_index(1).unwrap();
}

#[test]
fn test_dropping_everything_unsubscribes() {
    let items = source(&["A"]);
    {
        let segments = Segments::<String>::new();
        segments.set_items_source(Some(items.clone())).unwrap();
        let mut renderer = SegmentsRenderer::for_host(AndroidSegmentHost::default());
        renderer.set_element(Some(segments));
        assert_eq!(items.subscriber_count(), 1);
    }
    assert_eq!(items.subscriber_count(), 0);
}

#[test]
fn test_detached_renderer_leaves_views_alone() {
    let items = source(&["A", "B"]);
    let segments = Segments::<String>::new();
    segments.set_items_source(Some(items.clone())).unwrap();
    let mut renderer = SegmentsRenderer::for_host(AndroidSegmentHost::default());
    renderer.set_element(Some(segments.clone()));

    renderer.set_element(None);
    items.push("C".into());

    assert_eq!(segments.item_count(), 3);
    renderer.with_synchronizer(|sync| assert_eq!(sync.len(), 2));
}
