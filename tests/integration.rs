//! End-to-end behaviour of the custom select over a headless document.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use custom_select::event::{Key, ListenerKind};
use custom_select::prelude::*;
use custom_select::testing::{pretty_markup, screen_to_string, Pilot};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn colors() -> [NativeOption; 3] {
    ["Red", "Green", "Blue"].map(NativeOption::new)
}

/// A pilot over a page holding one `<select>` with `options`, optionally
/// preceded by a spacer of `spacer` rows.
fn mount_with(options: impl IntoIterator<Item = NativeOption>, spacer: Option<f32>, config: SelectConfig) -> (Pilot, WidgetId, NodeId) {
    let mut pilot = Pilot::new(80, 24);
    let doc = pilot.document_mut();
    let body = doc.body();
    if let Some(height) = spacer {
        doc.page.dom.insert_child(body, NodeData::new("div").with_height(height));
    }
    let select = doc.page.dom.build_select(body, "color", options);
    let id = doc.custom_select(select, config).unwrap();
    (pilot, id, select)
}

fn mount(config: SelectConfig) -> (Pilot, WidgetId, NodeId) {
    mount_with(colors(), None, config)
}

fn open(pilot: &mut Pilot, id: WidgetId) {
    let value = pilot.select(id).value_display();
    pilot.click(value);
    pilot.settle();
    assert!(pilot.select(id).phase() == Phase::Open);
}

fn value_text(pilot: &Pilot, id: WidgetId) -> String {
    pilot.document().page.dom.text_content(pilot.select(id).value_display())
}

fn entry_labels(pilot: &Pilot, id: WidgetId) -> Vec<String> {
    pilot.select(id).entry_labels(&pilot.document().page)
}

fn entry_named(pilot: &Pilot, id: WidgetId, label: &str) -> NodeId {
    let widget = pilot.select(id);
    let page = &pilot.document().page;
    match widget
        .entry_nodes()
        .into_iter()
        .find(|&node| page.dom.text_content(node) == label)
    {
        Some(node) => node,
        None => panic!("no entry labelled {label}"),
    }
}

fn native_selection(pilot: &Pilot, select: NodeId) -> Option<String> {
    pilot.document().page.dom.select_value(select)
}

fn selected_count(pilot: &Pilot, select: NodeId) -> usize {
    let dom = &pilot.document().page.dom;
    dom.native_options(select)
        .into_iter()
        .filter(|&option| dom.get(option).is_some_and(|data| data.selected))
        .count()
}

fn root_has_class(pilot: &Pilot, id: WidgetId, class: &str) -> bool {
    let root = pilot.select(id).root();
    pilot.document().page.dom.get(root).is_some_and(|data| data.has_class(class))
}

// ---------------------------------------------------------------------------
// Rendering and selection
// ---------------------------------------------------------------------------

#[test]
fn mount_builds_block_markup_after_hidden_select() {
    let (pilot, id, select) = mount(SelectConfig::new());
    let page = &pilot.document().page;
    let root = pilot.select(id).root();

    assert_eq!(page.dom.next_sibling(select), Some(root));
    assert!(page.dom.get(select).is_some_and(|data| !data.visible));
    insta::assert_snapshot!(pretty_markup(page, root), @r#"
    <div class="custom-select">
      <button class="custom-select__option custom-select__option--value">Red</button>
      <div class="custom-select__dropdown" hidden>
        <button class="custom-select__option">Green</button>
        <button class="custom-select__option">Blue</button>
      </div>
    </div>
    "#);
}

#[test]
fn red_green_blue_scenario() {
    let (mut pilot, id, select) = mount(SelectConfig::new());
    assert_eq!(value_text(&pilot, id), "Red");
    assert_eq!(entry_labels(&pilot, id), vec!["Green", "Blue"]);

    open(&mut pilot, id);
    assert_eq!(screen_to_string(&pilot.document().page), "Red\nGreen\nBlue");

    let blue = entry_named(&pilot, id, "Blue");
    pilot.click(blue);
    pilot.settle();

    assert_eq!(value_text(&pilot, id), "Blue");
    assert_eq!(entry_labels(&pilot, id), vec!["Red", "Green"]);
    assert_eq!(native_selection(&pilot, select).as_deref(), Some("Blue"));
    assert_eq!(pilot.select(id).phase(), Phase::Closed);

    let changes = pilot.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].select, select);
    assert_eq!(changes[0].value, "Blue");
    assert_eq!(changes[0].label, "Blue");
}

#[test]
fn selecting_x_then_y_keeps_one_selection_and_others_in_order() {
    let options = ["Red", "Green", "Blue", "Violet"].map(NativeOption::new);
    let (mut pilot, id, select) = mount_with(options, None, SelectConfig::new());
    assert_eq!(selected_count(&pilot, select), 1);

    for label in ["Blue", "Green"] {
        open(&mut pilot, id);
        let entry = entry_named(&pilot, id, label);
        pilot.click(entry);
        pilot.settle();
        assert_eq!(selected_count(&pilot, select), 1);
    }

    assert_eq!(native_selection(&pilot, select).as_deref(), Some("Green"));
    assert_eq!(entry_labels(&pilot, id), vec!["Red", "Blue", "Violet"]);
    assert_eq!(pilot.changes().len(), 2);
}

#[test]
fn explicit_selection_and_option_values_are_honoured() {
    let options = [
        NativeOption::new("Red").with_value("r"),
        NativeOption::new("Green").with_value("g").selected(true),
        NativeOption::new("Blue").with_value("b").with_class("cool"),
    ];
    let (mut pilot, id, select) = mount_with(options, None, SelectConfig::new());
    assert_eq!(value_text(&pilot, id), "Green");
    assert_eq!(native_selection(&pilot, select).as_deref(), Some("g"));

    open(&mut pilot, id);
    let blue = entry_named(&pilot, id, "Blue");
    assert!(pilot.document().page.dom.get(blue).is_some_and(|data| data.has_class("cool")));
    pilot.click(blue);
    pilot.settle();

    // The option's classes follow it onto the value display.
    let value = pilot.select(id).value_display();
    assert!(pilot.document().page.dom.get(value).is_some_and(|data| data.has_class("cool")));
    assert_eq!(pilot.changes()[0].value, "b");
}

#[test]
fn programmatic_click_updates_without_change() {
    let (mut pilot, id, select) = mount(SelectConfig::new());
    open(&mut pilot, id);
    let green = entry_named(&pilot, id, "Green");
    pilot.trigger_click(green);
    pilot.settle();

    assert_eq!(native_selection(&pilot, select).as_deref(), Some("Green"));
    assert!(pilot.changes().is_empty());
}

#[test]
fn disabled_entries_cannot_be_clicked() {
    let options = [
        NativeOption::new("Red"),
        NativeOption::new("Green").disabled(true),
        NativeOption::new("Blue"),
    ];
    let (mut pilot, id, select) = mount_with(options, None, SelectConfig::new());
    open(&mut pilot, id);
    let green = entry_named(&pilot, id, "Green");
    pilot.click(green);
    pilot.settle();

    assert_eq!(native_selection(&pilot, select).as_deref(), Some("Red"));
    assert!(pilot.select(id).is_open());
}

#[test]
fn open_then_close_leaves_markup_identical() {
    let (mut pilot, id, _) = mount(SelectConfig::new().search(true));
    let root = pilot.select(id).root();
    let before = pilot.document().page.dom.outer_html(root);

    open(&mut pilot, id);
    assert!(root_has_class(&pilot, id, "custom-select--active"));
    let value = pilot.select(id).value_display();
    pilot.click(value);
    pilot.settle();

    assert_eq!(pilot.document().page.dom.outer_html(root), before);
    assert_eq!(entry_labels(&pilot, id), vec!["Green", "Blue"]);
}

// ---------------------------------------------------------------------------
// Placeholder, include-value, empty
// ---------------------------------------------------------------------------

#[test]
fn placeholder_shows_until_first_selection() {
    let (mut pilot, id, select) = mount(SelectConfig::new().with_placeholder("Pick a colour"));
    assert_eq!(value_text(&pilot, id), "Pick a colour");
    assert_eq!(native_selection(&pilot, select), None);
    assert_eq!(pilot.select(id).selected_index(), None);
    assert_eq!(entry_labels(&pilot, id), vec!["Red", "Green", "Blue"]);

    open(&mut pilot, id);
    let green = entry_named(&pilot, id, "Green");
    pilot.click(green);
    pilot.settle();
    assert_eq!(value_text(&pilot, id), "Green");
    assert_eq!(entry_labels(&pilot, id), vec!["Red", "Blue"]);
}

#[test]
fn include_value_keeps_count_and_moves_marker() {
    let config = SelectConfig::new().include_value_in_dropdown(true);
    let (mut pilot, id, _) = mount(config);
    let marker = "custom-select__option--selected";
    let marked = |pilot: &Pilot| -> Vec<String> {
        let page = &pilot.document().page;
        pilot
            .select(id)
            .entry_nodes()
            .into_iter()
            .filter(|&node| page.dom.get(node).is_some_and(|data| data.has_class(marker)))
            .map(|node| page.dom.text_content(node))
            .collect()
    };
    assert_eq!(entry_labels(&pilot, id), vec!["Red", "Green", "Blue"]);
    assert_eq!(marked(&pilot), vec!["Red"]);

    for label in ["Blue", "Green"] {
        open(&mut pilot, id);
        let entry = entry_named(&pilot, id, label);
        pilot.click(entry);
        pilot.settle();
        assert_eq!(entry_labels(&pilot, id).len(), 3);
        assert_eq!(marked(&pilot), vec![label.to_string()]);
    }
}

#[test]
fn opening_centers_the_selected_entry() {
    for search in [false, true] {
        let options = (0..30).map(|i| NativeOption::new(format!("Option {i}")).selected(i == 20));
        let config = SelectConfig::new().include_value_in_dropdown(true).search(search);
        let (mut pilot, id, _) = mount_with(options, None, config);
        let container = pilot.select(id).option_wrap().unwrap_or(pilot.select(id).dropdown());
        pilot
            .document_mut()
            .page
            .dom
            .update(container, |data| data.style.max_height = Some(5.0));

        open(&mut pilot, id);

        // Row 20 of 30 one-row entries in a five-row frame.
        let scroll_top = pilot.document().page.dom.get(container).map(|data| data.scroll_top);
        assert_eq!(scroll_top, Some(18), "search: {search}");
    }
}

#[test]
fn single_option_disables_value_display() {
    let (mut pilot, id, _) = mount_with([NativeOption::new("Only")], None, SelectConfig::new());
    let value = pilot.select(id).value_display();
    assert!(entry_labels(&pilot, id).is_empty());
    assert!(pilot.document().page.dom.get(value).is_some_and(|data| data.disabled));

    pilot.click(value);
    pilot.settle();
    assert_eq!(pilot.select(id).phase(), Phase::Closed);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn search_filters_after_debounce_and_clears_immediately() {
    let config = SelectConfig::new().search(true).include_value_in_dropdown(true);
    let (mut pilot, id, _) = mount(config);
    open(&mut pilot, id);
    let input = pilot.select(id).search_input().unwrap();
    assert!(pilot.document().page.is_focused(input));

    pilot.type_text("re");
    assert_eq!(pilot.dropdown_labels(id), vec!["Red", "Green", "Blue"]);
    pilot.advance_ms(299);
    assert_eq!(pilot.dropdown_labels(id), vec!["Red", "Green", "Blue"]);
    pilot.advance_ms(1);
    assert_eq!(pilot.dropdown_labels(id), vec!["Red", "Green"]);

    pilot.press_key(Key::Backspace);
    pilot.press_key(Key::Backspace);
    assert_eq!(pilot.dropdown_labels(id), vec!["Red", "Green", "Blue"]);
}

#[test]
fn closing_resets_the_search() {
    let (mut pilot, id, _) = mount(SelectConfig::new().search(true));
    open(&mut pilot, id);
    pilot.type_text("blu");
    pilot.advance_ms(300);
    assert_eq!(pilot.dropdown_labels(id), vec!["Blue"]);

    pilot.press_key(Key::Escape);
    pilot.settle();
    assert_eq!(pilot.select(id).search_query(&pilot.document().page), "");
    assert_eq!(pilot.dropdown_labels(id), vec!["Green", "Blue"]);
}

#[test]
fn reset_while_filtered_keeps_the_filter() {
    let (mut pilot, id, _) = mount(SelectConfig::new().search(true));
    open(&mut pilot, id);
    pilot.type_text("blu");
    pilot.advance_ms(300);
    assert_eq!(pilot.dropdown_labels(id), vec!["Blue"]);

    pilot.document_mut().reset(id).unwrap();

    assert!(pilot.select(id).is_open());
    assert_eq!(pilot.select(id).search_query(&pilot.document().page), "blu");
    assert_eq!(pilot.dropdown_labels(id), vec!["Blue"]);
}

#[test]
fn enter_in_search_input_selects_nothing() {
    let (mut pilot, id, select) = mount(SelectConfig::new().search(true));
    open(&mut pilot, id);
    pilot.press_key(Key::Enter);
    pilot.settle();
    assert!(pilot.select(id).is_open());
    assert_eq!(native_selection(&pilot, select).as_deref(), Some("Red"));
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

#[test]
fn down_cycles_through_enabled_entries_and_wraps() {
    let options = [
        NativeOption::new("Red"),
        NativeOption::new("Green").disabled(true),
        NativeOption::new("Blue"),
        NativeOption::new("Violet"),
    ];
    let (mut pilot, id, _) = mount_with(options, None, SelectConfig::new());
    open(&mut pilot, id);

    let focused_label = |pilot: &Pilot| {
        let page = &pilot.document().page;
        page.focused().map(|node| page.dom.text_content(node))
    };
    let mut seen = Vec::new();
    for _ in 0..3 {
        pilot.press_key(Key::Down);
        seen.push(focused_label(&pilot));
    }
    assert_eq!(
        seen,
        vec![Some("Blue".to_string()), Some("Violet".to_string()), Some("Blue".to_string())]
    );

    pilot.press_key(Key::Up);
    assert_eq!(focused_label(&pilot).as_deref(), Some("Violet"));
}

#[test]
fn enter_on_focused_entry_selects_and_emits_change() {
    let (mut pilot, id, select) = mount(SelectConfig::new());
    open(&mut pilot, id);
    pilot.press_key(Key::Down);
    pilot.press_key(Key::Enter);
    pilot.settle();

    assert_eq!(native_selection(&pilot, select).as_deref(), Some("Green"));
    assert!(pilot.document().page.is_focused(pilot.select(id).value_display()));
    let changes = pilot.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].label, "Green");
}

#[test]
fn escape_closes_and_keyboard_off_ignores_keys() {
    let (mut pilot, id, _) = mount(SelectConfig::new());
    open(&mut pilot, id);
    pilot.press_key(Key::Escape);
    pilot.settle();
    assert_eq!(pilot.select(id).phase(), Phase::Closed);

    let (mut pilot, id, _) = mount(SelectConfig::new().keyboard(false));
    open(&mut pilot, id);
    pilot.press_key(Key::Escape);
    pilot.press_key(Key::Down);
    pilot.settle();
    assert!(pilot.select(id).is_open());
    assert_eq!(pilot.select(id).focus_index(), None);
}

// ---------------------------------------------------------------------------
// Outside interaction and listeners
// ---------------------------------------------------------------------------

#[test]
fn clicking_another_select_closes_the_open_one() {
    let mut pilot = Pilot::new(80, 24);
    let doc = pilot.document_mut();
    let body = doc.body();
    doc.page.dom.build_select(body, "a", colors());
    doc.page.dom.build_select(body, "b", colors());
    let ids = doc.custom_select_all("select", SelectConfig::new()).unwrap();
    let (a, b) = (ids[0], ids[1]);

    open(&mut pilot, a);
    let b_value = pilot.select(b).value_display();
    pilot.click(b_value);
    pilot.settle();

    assert_eq!(pilot.select(a).phase(), Phase::Closed);
    assert_eq!(pilot.select(b).phase(), Phase::Open);
}

#[test]
fn enter_on_another_selects_value_display_opens_it() {
    let mut pilot = Pilot::new(80, 24);
    let doc = pilot.document_mut();
    let body = doc.body();
    doc.page.dom.build_select(body, "a", colors());
    doc.page.dom.build_select(body, "b", colors());
    let ids = doc.custom_select_all("select", SelectConfig::new()).unwrap();
    let (a, b) = (ids[0], ids[1]);

    open(&mut pilot, a);
    let b_value = pilot.select(b).value_display();
    assert!(pilot.document_mut().page.focus(b_value));
    pilot.press_key(Key::Enter);
    pilot.settle();

    assert_eq!(pilot.select(a).phase(), Phase::Closed);
    assert_eq!(pilot.select(b).phase(), Phase::Open);
    assert!(pilot.document().page.is_focused(b_value));
}

#[test]
fn touch_page_opens_on_tap_and_closes_on_outside_touch() {
    let mut pilot = Pilot::with_document(Document::with_page(Page::new(80, 24).with_touch(true)));
    let doc = pilot.document_mut();
    let body = doc.body();
    let select = doc.page.dom.build_select(body, "color", colors());
    let outside = doc
        .page
        .dom
        .insert_child(body, NodeData::new("button").with_text("Elsewhere"));
    let id = doc.custom_select(select, SelectConfig::new()).unwrap();
    let root = pilot.select(id).root();

    // The opening tap's own touchstart comes before any listener exists.
    let value = pilot.select(id).value_display();
    pilot.tap(value);
    pilot.settle();
    assert_eq!(pilot.select(id).phase(), Phase::Open);
    let listeners = &pilot.document().page.listeners;
    assert_eq!(listeners.count_for(root, ListenerKind::OutsidePointer(PointerKind::TouchStart)), 1);
    assert_eq!(listeners.count_for(root, ListenerKind::OutsidePointer(PointerKind::Click)), 0);

    // A plain click is not what a touch page listens for.
    pilot.click(outside);
    pilot.settle();
    assert_eq!(pilot.select(id).phase(), Phase::Open);

    pilot.tap(outside);
    pilot.settle();
    assert_eq!(pilot.select(id).phase(), Phase::Closed);
}

#[test]
fn listeners_exist_only_while_open() {
    let (mut pilot, id, _) = mount(SelectConfig::new());
    let root = pilot.select(id).root();
    let count = |pilot: &Pilot| pilot.document().page.listeners.count_owned(root);
    assert_eq!(count(&pilot), 0);

    open(&mut pilot, id);
    let listeners = &pilot.document().page.listeners;
    assert_eq!(listeners.count_for(root, ListenerKind::OutsidePointer(PointerKind::Click)), 1);
    assert_eq!(listeners.count_for(root, ListenerKind::Viewport), 1);
    assert_eq!(listeners.count_for(root, ListenerKind::KeyDown), 1);

    let value = pilot.select(id).value_display();
    pilot.click(value);
    pilot.settle();
    assert_eq!(count(&pilot), 0);

    // A second cycle does not accumulate listeners.
    open(&mut pilot, id);
    assert_eq!(count(&pilot), 3);
}

#[test]
fn show_and_hide_callbacks_run_after_transitions() {
    let shown = Arc::new(AtomicUsize::new(0));
    let hidden = Arc::new(AtomicUsize::new(0));
    let config = {
        let (shown, hidden) = (Arc::clone(&shown), Arc::clone(&hidden));
        SelectConfig::new()
            .on_show(move |_| {
                shown.fetch_add(1, Ordering::SeqCst);
            })
            .on_hide(move |_| {
                hidden.fetch_add(1, Ordering::SeqCst);
            })
    };
    let (mut pilot, id, _) = mount(config);
    let value = pilot.select(id).value_display();

    pilot.click(value);
    pilot.advance_ms(99);
    assert_eq!(shown.load(Ordering::SeqCst), 0);
    // Clicks during the transition are ignored.
    pilot.click(value);
    pilot.advance_ms(1);
    assert_eq!(shown.load(Ordering::SeqCst), 1);
    assert_eq!(pilot.select(id).phase(), Phase::Open);

    pilot.click(value);
    pilot.advance_ms(100);
    assert_eq!(hidden.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Dropup
// ---------------------------------------------------------------------------

#[test]
fn dropup_applies_only_without_room_below() {
    let (mut pilot, id, _) = mount_with(colors(), Some(22.0), SelectConfig::new());
    open(&mut pilot, id);
    assert!(pilot.select(id).is_dropup());
    assert!(root_has_class(&pilot, id, "custom-select--dropup"));

    // Scrolling the window makes room again.
    pilot.scroll_to(1);
    assert!(!pilot.select(id).is_dropup());
    assert!(!root_has_class(&pilot, id, "custom-select--dropup"));

    let (mut pilot, id, _) = mount(SelectConfig::new());
    open(&mut pilot, id);
    assert!(!pilot.select(id).is_dropup());
}

// ---------------------------------------------------------------------------
// Construction and reset
// ---------------------------------------------------------------------------

#[test]
fn construction_is_idempotent_and_checks_tag() {
    let (mut pilot, id, select) = mount(SelectConfig::new());
    let doc = pilot.document_mut();
    assert_eq!(doc.custom_select(select, SelectConfig::new()).unwrap(), id);
    assert_eq!(doc.page.dom.query_by_class("custom-select").len(), 1);

    let body = doc.body();
    let div = doc.page.dom.insert_child(body, NodeData::new("div"));
    assert!(matches!(doc.custom_select(div, SelectConfig::new()), Err(Error::NotASelect { .. })));
}

#[test]
fn reset_picks_up_native_changes() {
    let (mut pilot, id, select) = mount(SelectConfig::new());
    let doc = pilot.document_mut();
    let violet = doc.page.dom.append_option(select, NativeOption::new("Violet"));
    doc.page.dom.set_selected(select, violet);
    doc.reset(id).unwrap();

    assert_eq!(value_text(&pilot, id), "Violet");
    assert_eq!(entry_labels(&pilot, id), vec!["Red", "Green", "Blue"]);
}

#[test]
fn json_configuration_drives_markup() {
    let config = SelectConfig::from_json(&json!({
        "block": "picker",
        "modifier": "picker--wide",
        "autocomplete": true,
        "placeholder": "Filter",
        "transition": "fast",
    }));
    let (mut pilot, id, _) = mount(config);
    let input = pilot.select(id).search_input().unwrap();
    let page = &pilot.document().page;
    let input_data = page.dom.get(input).unwrap();
    assert!(input_data.has_class("picker__input"));
    assert_eq!(input_data.attr("placeholder"), Some("Filter"));
    assert!(root_has_class(&pilot, id, "picker--wide"));

    let value = pilot.select(id).value_display();
    pilot.click(value);
    pilot.advance_ms(199);
    assert_eq!(pilot.select(id).phase(), Phase::Opening);
    pilot.advance_ms(1);
    assert_eq!(pilot.select(id).phase(), Phase::Open);
}
