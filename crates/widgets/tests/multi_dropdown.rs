use dom::{DOCUMENT_ID, Document, Event, EventKind, KeyCode, Modifiers};
use dom_test_support::{DropdownFixture, DropdownMarkup, EventRecorder};
use std::rc::Rc;
use widgets::{ChangeDetail, DropdownConfig, MultiDropdown, ToggleDetail};

const TOGGLE: &str = "multi-dropdown:toggle";
const CHANGE: &str = "multi-dropdown:change";

struct Harness {
    doc: Document,
    fx: DropdownFixture,
    dd: Rc<MultiDropdown>,
    notes: EventRecorder,
}

impl Harness {
    fn new(markup: DropdownMarkup) -> Self {
        let mut doc = Document::new();
        widgets::define(&mut doc).unwrap();
        let fx = markup.build(&mut doc).unwrap();
        let dd = doc
            .custom_element::<MultiDropdown>(fx.root)
            .expect("dropdown upgraded");
        let notes = EventRecorder::new();
        notes.attach(&mut doc, fx.root, EventKind::custom(TOGGLE), false);
        notes.attach(&mut doc, fx.root, EventKind::custom(CHANGE), false);
        Self { doc, fx, dd, notes }
    }

    fn abc() -> Self {
        Self::new(DropdownMarkup::with_values(&["a", "b", "c"]).checked("b"))
    }

    fn toggles(&self) -> Vec<bool> {
        self.notes
            .events()
            .iter()
            .filter_map(|e| e.detail::<ToggleDetail>().map(|d| d.data.is_open))
            .collect()
    }

    fn changes(&self) -> Vec<ChangeDetail> {
        self.notes
            .events()
            .iter()
            .filter_map(|e| e.detail::<ChangeDetail>().map(|d| d.data.clone()))
            .collect()
    }

    fn key(&mut self, code: KeyCode) -> Event {
        self.doc.press_key(code, Modifiers::NONE).unwrap()
    }

    fn assert_marker_in_sync(&self) {
        assert_eq!(self.dd.is_open(), self.doc.has_class(self.fx.root, "open"));
    }
}

#[test]
fn open_marker_never_diverges_from_state() {
    let mut h = Harness::abc();
    h.assert_marker_in_sync();
    for step in 0..12 {
        match step % 3 {
            0 => h.dd.toggle(&mut h.doc, None),
            1 => h.dd.open(&mut h.doc, None),
            _ => h.dd.close(&mut h.doc, None),
        }
        .unwrap();
        h.assert_marker_in_sync();
    }
    h.doc.click(h.fx.title).unwrap();
    h.assert_marker_in_sync();
}

#[test]
fn toggle_twice_emits_open_then_closed() {
    let mut h = Harness::abc();
    h.dd.toggle(&mut h.doc, None).unwrap();
    h.dd.toggle(&mut h.doc, None).unwrap();
    assert_eq!(h.toggles(), vec![true, false]);
    assert!(!h.dd.is_open());
}

#[test]
fn explicit_open_and_close_notify_on_every_call() {
    let mut h = Harness::abc();
    h.dd.open(&mut h.doc, None).unwrap();
    h.dd.open(&mut h.doc, None).unwrap();
    h.dd.close(&mut h.doc, None).unwrap();
    h.dd.close(&mut h.doc, None).unwrap();
    assert_eq!(h.toggles(), vec![true, true, false, false]);
}

#[test]
fn open_reports_checked_values() {
    let mut h = Harness::abc();
    let event = h.dd.open(&mut h.doc, None).unwrap();

    let detail = event.detail::<ToggleDetail>().unwrap();
    assert_eq!(detail.data.values, vec!["b"]);
    assert!(detail.original_event.is_none());
    assert!(event.bubbles() && event.cancelable() && event.composed());
}

#[test]
fn change_values_follow_document_order() {
    let mut h = Harness::abc();
    let c = h.fx.checkbox(&h.doc, "c");
    let a = h.fx.checkbox(&h.doc, "a");

    h.doc.click(c).unwrap();
    h.doc.click(a).unwrap();

    let changes = h.changes();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].element, c);
    assert_eq!(changes[0].values, vec!["b", "c"]);
    assert_eq!(changes[1].element, a);
    assert_eq!(changes[1].values, vec!["a", "b", "c"]);
    assert!(h.toggles().is_empty());
}

#[test]
fn change_notification_uses_default_flags() {
    let mut h = Harness::abc();
    h.doc.click(h.fx.checkbox(&h.doc, "a")).unwrap();
    let records = h.notes.records();
    let record = &records[0];
    assert_eq!(record.kind, CHANGE);
    assert!(record.bubbles && record.cancelable);
    assert!(!record.trusted);
}

#[test]
fn escape_closes_and_returns_focus_to_root() {
    let mut h = Harness::abc();
    h.doc.click(h.fx.title).unwrap();
    assert!(h.dd.is_open());
    let b = h.fx.checkbox(&h.doc, "b");
    h.doc.focus(b).unwrap();
    h.notes.clear();

    let key = h.key(KeyCode::Escape);

    assert!(key.default_prevented());
    assert!(!h.dd.is_open());
    assert_eq!(h.doc.active_element(), Some(h.fx.root));
    assert_eq!(h.toggles(), vec![false]);
    let events = h.notes.events();
    let original = events[0]
        .detail::<ToggleDetail>()
        .and_then(|d| d.original_event.as_ref())
        .unwrap();
    assert_eq!(original.kind(), &EventKind::KeyDown);
}

#[test]
fn tab_past_the_last_element_releases_focus_quietly() {
    let mut h = Harness::abc();
    let last = *h.fx.checkboxes.last().unwrap();
    h.doc.focus(last).unwrap();

    let key = h.key(KeyCode::Tab);

    assert_eq!(h.doc.active_element(), None);
    assert!(!key.default_prevented());
    assert!(h.notes.is_empty());
}

#[test]
fn tab_and_shift_tab_move_through_options() {
    let mut h = Harness::new(DropdownMarkup::with_values(&["a", "b"]).surrounded());
    let a = h.fx.checkbox(&h.doc, "a");
    let b = h.fx.checkbox(&h.doc, "b");
    h.doc.focus(a).unwrap();

    let key = h.key(KeyCode::Tab);
    assert!(key.default_prevented());
    assert_eq!(h.doc.active_element(), Some(b));

    h.doc.press_key(KeyCode::Tab, Modifiers::SHIFT).unwrap();
    assert_eq!(h.doc.active_element(), Some(a));
    h.doc.press_key(KeyCode::Tab, Modifiers::SHIFT).unwrap();
    assert_eq!(h.doc.active_element(), Some(h.fx.root));
}

#[test]
fn outside_click_while_closed_is_ignored() {
    let mut h = Harness::abc();
    h.doc.click(h.fx.outside).unwrap();
    assert!(!h.dd.is_open());
    assert!(h.notes.is_empty());
}

#[test]
fn outside_click_while_open_closes() {
    let mut h = Harness::abc();
    h.doc.click(h.fx.title).unwrap();
    h.doc.click(h.fx.checkbox(&h.doc, "a")).unwrap();
    assert!(h.dd.is_open());

    h.doc.click(h.fx.outside).unwrap();
    assert!(!h.dd.is_open());
    assert_eq!(h.toggles(), vec![true, false]);
}

#[test]
fn title_click_toggles() {
    let mut h = Harness::abc();
    h.doc.click(h.fx.title).unwrap();
    h.doc.click(h.fx.title).unwrap();
    assert_eq!(h.toggles(), vec![true, false]);
}

#[test]
fn space_and_enter_on_root_toggle() {
    let mut h = Harness::abc();
    h.doc.focus(h.fx.root).unwrap();
    let key = h.key(KeyCode::Space);
    assert!(key.default_prevented());
    assert!(h.dd.is_open());
    h.key(KeyCode::Enter);
    assert!(!h.dd.is_open());
    assert_eq!(h.toggles(), vec![true, false]);
}

#[test]
fn space_on_option_flips_it_without_notifying() {
    let mut h = Harness::abc();
    let a = h.fx.checkbox(&h.doc, "a");
    h.doc.focus(a).unwrap();

    h.key(KeyCode::Space);
    assert!(h.doc.is_checked(a));
    assert!(!h.dd.is_open());
    assert!(h.notes.is_empty());
    assert_eq!(h.dd.selected_values(&h.doc), vec!["a", "b"]);
}

#[test]
fn unrecognised_keys_keep_their_default() {
    let mut h = Harness::abc();
    h.doc.focus(h.fx.root).unwrap();
    let key = h.key(KeyCode::from_code("KeyA"));
    assert!(!key.default_prevented());
    let arrow = h.key(KeyCode::ArrowDown);
    assert!(arrow.default_prevented());
    assert!(h.notes.is_empty());
}

#[test]
fn focus_leaving_the_widget_closes_it() {
    let mut h = Harness::new(DropdownMarkup::with_values(&["a", "b"]).surrounded());
    let a = h.fx.checkbox(&h.doc, "a");
    h.doc.focus(a).unwrap();
    h.dd.open(&mut h.doc, None).unwrap();

    h.doc.focus(h.fx.checkbox(&h.doc, "b")).unwrap();
    assert!(h.dd.is_open());

    h.notes.clear();
    h.doc.focus(h.fx.after.unwrap()).unwrap();
    assert!(!h.dd.is_open());

    let records = h.notes.records();
    let record = &records[0];
    assert!(!record.bubbles);
    assert!(!record.cancelable);
    let events = h.notes.events();
    let original = events[0]
        .detail::<ToggleDetail>()
        .and_then(|d| d.original_event.as_ref())
        .unwrap();
    assert_eq!(original.kind(), &EventKind::Blur);
    assert_eq!(original.related_target(), h.fx.after);
}

#[test]
fn blur_to_nowhere_closes_an_open_dropdown() {
    let mut h = Harness::abc();
    h.doc.focus(h.fx.root).unwrap();
    h.dd.open(&mut h.doc, None).unwrap();
    h.doc.blur_active().unwrap();
    assert!(!h.dd.is_open());
}

#[test]
fn unmount_removes_every_subscription() {
    let mut h = Harness::abc();
    h.dd.open(&mut h.doc, None).unwrap();
    h.doc.focus(h.fx.checkbox(&h.doc, "a")).unwrap();
    h.doc.remove(h.fx.root).unwrap();
    h.notes.clear();

    assert!(!h.dd.is_mounted());
    assert!(!h.dd.is_open());
    assert!(!h.doc.has_class(h.fx.root, "open"));
    assert_eq!(h.doc.attr(h.fx.root, "tabindex"), None);
    assert_eq!(h.doc.listener_count(DOCUMENT_ID), 0);
    assert_eq!(h.doc.listener_count(h.fx.root), 2);

    let a = h.fx.checkbox(&h.doc, "a");
    h.doc.click(h.fx.outside).unwrap();
    h.doc.dispatch_event(h.fx.title, Event::click()).unwrap();
    h.doc.dispatch_event(a, Event::change()).unwrap();
    h.doc
        .dispatch_event(h.fx.root, Event::key_down(KeyCode::Space, Modifiers::NONE))
        .unwrap();
    h.doc
        .dispatch_event(a, Event::focus_change(EventKind::Blur, None))
        .unwrap();

    assert!(h.notes.is_empty());
    assert!(!h.dd.is_open());
}

#[test]
fn remount_subscribes_exactly_once() {
    let mut h = Harness::abc();
    h.doc.remove(h.fx.root).unwrap();
    h.doc.append_child(DOCUMENT_ID, h.fx.root).unwrap();

    assert!(h.dd.is_mounted());
    assert_eq!(h.doc.listener_count(DOCUMENT_ID), 1);
    assert_eq!(h.doc.attr(h.fx.root, "tabindex"), Some("0"));

    h.doc.click(h.fx.title).unwrap();
    assert_eq!(h.toggles(), vec![true]);
}

#[test]
fn late_definition_mounts_existing_markup() {
    let mut doc = Document::new();
    let fx = DropdownMarkup::with_values(&["x"]).build(&mut doc).unwrap();
    assert_eq!(doc.attr(fx.root, "tabindex"), None);

    widgets::define(&mut doc).unwrap();
    let dd = doc.custom_element::<MultiDropdown>(fx.root).unwrap();
    assert!(dd.is_mounted());
    assert_eq!(dd.options_region(&doc), Some(fx.options));
}

#[test]
fn custom_config_renames_notifications() {
    let mut doc = Document::new();
    let config = DropdownConfig {
        open_class: "is-open".to_string(),
        event_prefix: "picker".to_string(),
        ..DropdownConfig::default()
    };
    widgets::define_with(&mut doc, "fruit-picker", config).unwrap();
    let markup = DropdownMarkup {
        tag: "fruit-picker".to_string(),
        ..DropdownMarkup::with_values(&["apple"])
    };
    let fx = markup.build(&mut doc).unwrap();
    let notes = EventRecorder::new();
    notes.attach(&mut doc, DOCUMENT_ID, EventKind::custom("picker:toggle"), false);

    doc.click(fx.title).unwrap();
    assert!(doc.has_class(fx.root, "is-open"));
    assert_eq!(notes.kinds(), vec!["picker:toggle"]);
}

#[test]
fn released_dropdown_is_dropped() {
    let mut h = Harness::abc();
    let root = h.fx.root;
    h.doc.release_subtree(root).unwrap();
    assert!(!h.dd.is_mounted());
    assert!(h.doc.custom_element::<MultiDropdown>(root).is_none());
    assert_eq!(Rc::strong_count(&h.dd), 1);
}

#[test]
fn markup_appended_after_mount_is_found() {
    let mut doc = Document::new();
    widgets::define(&mut doc).unwrap();
    let root = doc.append_element(DOCUMENT_ID, "multi-dropdown", &[]).unwrap();
    let dd = doc.custom_element::<MultiDropdown>(root).unwrap();
    assert!(dd.is_mounted());
    assert_eq!(dd.title_region(&doc), None);

    let title = doc.append_element(root, "div", &[("class", "select-title")]).unwrap();
    let options = doc.append_element(root, "div", &[("class", "select-options")]).unwrap();
    doc.append_element(
        options,
        "input",
        &[("type", "checkbox"), ("value", "b"), ("checked", "")],
    )
    .unwrap();

    doc.click(title).unwrap();
    assert!(dd.is_open());

    let event = dd.open(&mut doc, None).unwrap();
    assert_eq!(event.detail::<ToggleDetail>().unwrap().data.values, vec!["b"]);
}

#[test]
fn replaced_options_container_is_queried_afresh() {
    let mut h = Harness::abc();
    assert_eq!(h.dd.options_region(&h.doc), Some(h.fx.options));

    h.doc.release_subtree(h.fx.options).unwrap();
    let fresh = h
        .doc
        .append_element(h.fx.root, "div", &[("class", "select-options")])
        .unwrap();
    let label = h.doc.append_element(fresh, "label", &[]).unwrap();
    h.doc
        .append_element(
            label,
            "input",
            &[("type", "checkbox"), ("value", "z"), ("checked", "")],
        )
        .unwrap();

    assert_eq!(h.dd.options_region(&h.doc), Some(fresh));
    assert_eq!(h.dd.selected_values(&h.doc), vec!["z"]);
}
