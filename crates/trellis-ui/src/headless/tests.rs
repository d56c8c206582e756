use super::*;
use crate::widget::{Align, Widget, WidgetRef};

fn content(factory: &HeadlessFactory) -> WidgetRef {
    factory.new_content_view()
}

#[test]
fn set_child_records_parent() {
    let factory = HeadlessFactory::new();
    let overlay = factory.new_overlay();
    let view = content(&factory);

    overlay.set_child(Some(view.clone()));
    assert_eq!(view.parent(), Some(overlay.id()));
    assert_eq!(overlay.child().map(|c| c.id()), Some(view.id()));
}

#[test]
fn replacing_child_detaches_previous() {
    let factory = HeadlessFactory::new();
    let overlay = factory.new_overlay();
    let first = content(&factory);
    let second = content(&factory);

    overlay.set_child(Some(first.clone()));
    overlay.set_child(Some(second.clone()));
    assert_eq!(first.parent(), None);
    assert_eq!(second.parent(), Some(overlay.id()));

    overlay.set_child(None);
    assert!(overlay.child().is_none());
    assert_eq!(second.parent(), None);
}

#[test]
fn double_parenting_is_refused_and_counted() {
    let factory = HeadlessFactory::new();
    let a = factory.new_overlay();
    let b = factory.new_overlay();
    let view = content(&factory);

    a.set_child(Some(view.clone()));
    b.set_child(Some(view.clone()));

    assert_eq!(view.parent(), Some(a.id()));
    assert!(b.child().is_none());
    assert_eq!(factory.parenting_violations(), 1);
}

#[test]
fn unparent_then_remount_is_clean() {
    let factory = HeadlessFactory::new();
    let a = factory.new_overlay();
    let b = factory.new_box(Orientation::Vertical, 0);
    let view = content(&factory);

    a.set_child(Some(view.clone()));
    view.unparent();
    assert!(a.child().is_none());
    b.append(view.clone());

    assert_eq!(view.parent(), Some(b.id()));
    assert_eq!(factory.parenting_violations(), 0);
}

#[test]
fn overlays_mount_and_remove() {
    let factory = HeadlessFactory::new();
    let overlay = factory.new_overlay();
    let label: WidgetRef = factory.new_label("hi");

    let node = factory.lookup(overlay.id()).unwrap();

    overlay.add_overlay(label.clone());
    assert_eq!(overlay.overlays().len(), 1);
    assert_eq!(node.overlay_flags(label.id()), Some((true, false)));

    overlay.set_clip_overlay(&label, false);
    overlay.set_measure_overlay(&label, true);
    assert_eq!(node.overlay_flags(label.id()), Some((false, true)));

    assert!(overlay.remove_overlay(&label));
    assert!(!overlay.remove_overlay(&label));
    assert_eq!(label.parent(), None);
}

#[test]
fn box_insert_at_clamps_index() {
    let factory = HeadlessFactory::new();
    let container = factory.new_box(Orientation::Horizontal, 4);
    let a = content(&factory);
    let b = content(&factory);
    let c = content(&factory);

    container.append(a.clone());
    container.insert_at(0, b.clone());
    container.insert_at(99, c.clone());

    let ids: Vec<_> = container.children().iter().map(|w| w.id()).collect();
    assert_eq!(ids, vec![b.id(), a.id(), c.id()]);
    assert_eq!(container.orientation(), Orientation::Horizontal);

    assert!(container.remove(&a));
    assert_eq!(container.children().len(), 2);
    assert_eq!(a.parent(), None);
}

#[test]
fn focus_follows_last_grab() {
    let factory = HeadlessFactory::new();
    let a = content(&factory);
    let b = content(&factory);

    assert!(a.grab_focus());
    assert!(a.has_focus());
    assert!(b.grab_focus());
    assert!(!a.has_focus());
    assert_eq!(factory.focused(), Some(b.id()));
}

#[test]
fn unfocusable_or_hidden_widgets_refuse_focus() {
    let factory = HeadlessFactory::new();
    let a = content(&factory);
    a.set_can_focus(false);
    assert!(!a.grab_focus());

    let b = content(&factory);
    b.set_visible(false);
    assert!(!b.grab_focus());
    assert_eq!(factory.focused(), None);
}

#[test]
fn css_classes_and_alignment() {
    let factory = HeadlessFactory::new();
    let label = factory.new_label("x");
    label.add_css_class("toast");
    label.add_css_class("toast-info");
    label.remove_css_class("toast-info");
    label.set_halign(Align::Start);
    label.set_valign(Align::End);

    assert!(label.has_css_class("toast"));
    assert!(!label.has_css_class("toast-info"));

    let node = factory.lookup(label.id()).unwrap();
    assert_eq!(node.css_classes(), vec!["toast".to_string()]);
    assert_eq!(node.halign(), Align::Start);
    assert_eq!(node.valign(), Align::End);
    assert_eq!(node.kind(), WidgetKind::Label);
}

#[test]
fn progress_fraction_is_clamped() {
    let factory = HeadlessFactory::new();
    let bar = factory.new_progress_bar();
    bar.set_fraction(1.7);
    assert!((bar.fraction() - 1.0).abs() < f64::EPSILON);
    bar.set_fraction(-0.2);
    assert!(bar.fraction().abs() < f64::EPSILON);
}

#[test]
fn dropping_parent_releases_children() {
    let factory = HeadlessFactory::new();
    let view = content(&factory);
    {
        let overlay = factory.new_overlay();
        overlay.set_child(Some(view.clone()));
        assert!(view.parent().is_some());
    }
    assert_eq!(view.parent(), None);

    let other = factory.new_overlay();
    other.set_child(Some(view.clone()));
    assert_eq!(factory.parenting_violations(), 0);
}

#[test]
fn live_widgets_tracks_drops() {
    let factory = HeadlessFactory::new();
    let a = content(&factory);
    let b = content(&factory);
    assert_eq!(factory.live_widgets(), 2);
    drop(a);
    assert_eq!(factory.live_widgets(), 1);
    drop(b);
    assert_eq!(factory.live_widgets(), 0);
}
