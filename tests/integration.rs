//! Integration tests for cadence-tui.
//!
//! These tests exercise the public API from outside the crate: coalesced
//! scheduling, lifecycle ordering, broadcast fan-out, and the full modal
//! dialog flow through the headless Pilot.

use pretty_assertions::assert_eq;

use cadence_tui::event::input::Key;
use cadence_tui::geometry::Size;
use cadence_tui::reactive::broadcast::Subscription;
use cadence_tui::reactive::property::{PropertyDescriptor, PropertyValue};
use cadence_tui::testing::{render_to_string, Pilot};
use cadence_tui::widgets::dialog::{
    Dialog, ModalAnswer, ModalMessage, SetupOptions, CANCEL_LABEL, CONFIRM_LABEL,
};
use cadence_tui::widgets::{Button, SelectList, TextInput};
use tokio::sync::oneshot::error::TryRecvError;

// ---------------------------------------------------------------------------
// Coalesced scheduling
// ---------------------------------------------------------------------------

#[test]
fn mutations_then_one_request_yield_one_commit_with_final_state() {
    let mut pilot = Pilot::new(80, 24);
    let id = pilot.runtime_mut().attach(Box::new(Button::new("v0")));
    pilot
        .runtime_mut()
        .declare_property(id, PropertyDescriptor::new("label", "v0"));

    // N synchronous mutations within one frame.
    for i in 1..=5 {
        pilot
            .runtime_mut()
            .set_property(id, "label", PropertyValue::Text(format!("v{i}")));
    }
    pilot.runtime_mut().request_render(id);
    pilot.frame();

    assert_eq!(pilot.commit_count(id), 1);
    assert_eq!(pilot.last_text(id).as_deref(), Some("[ v5 ]"));
}

#[test]
fn renders_across_frames_commit_separately() {
    let mut pilot = Pilot::new(80, 24);
    let id = pilot.runtime_mut().attach(Box::new(Button::new("OK")));
    pilot.runtime_mut().request_render(id);
    pilot.frame();
    pilot.runtime_mut().request_render(id);
    pilot.frame();
    assert_eq!(pilot.commit_count(id), 2);
}

#[test]
fn first_render_happens_once_across_many_requests() {
    let mut pilot = Pilot::new(80, 24);
    let id = pilot.runtime_mut().attach(Box::new(Button::new("OK")));
    for _ in 0..10 {
        pilot.runtime_mut().request_render(id);
    }
    pilot.frame();
    pilot.runtime_mut().request_render(id);
    pilot.frame();
    assert!(pilot.runtime().has_rendered_once(id));
    assert_eq!(pilot.commit_count(id), 2);
}

// ---------------------------------------------------------------------------
// Broadcast fan-out
// ---------------------------------------------------------------------------

#[test]
fn double_subscription_fans_out_once() {
    let mut pilot = Pilot::new(80, 24);
    let holder = pilot
        .runtime_mut()
        .attach_named("store", Box::new(Button::new("H")));
    let dep = pilot.runtime_mut().attach(Box::new(Button::new("D")));
    pilot
        .runtime_mut()
        .declare_property(holder, PropertyDescriptor::new("count", 0i64));

    let subs = [Subscription::to_path("store", &["count"])];
    pilot.runtime_mut().subscribe(dep, &subs).unwrap();
    pilot.runtime_mut().subscribe(dep, &subs).unwrap();

    // First renders out of the way so the fan-out commit is isolated.
    pilot.runtime_mut().refresh_all();
    pilot.frame();
    assert_eq!(pilot.commit_count(dep), 1);

    pilot
        .runtime_mut()
        .set_property(holder, "count", PropertyValue::Int(1));
    pilot.frame();
    assert_eq!(pilot.commit_count(dep), 2);
}

#[test]
fn fan_out_rerenders_each_dependent() {
    let mut pilot = Pilot::new(80, 24);
    let holder = pilot.runtime_mut().attach(Box::new(Button::new("H")));
    let a = pilot.runtime_mut().attach(Box::new(Button::new("A")));
    let b = pilot.runtime_mut().attach(Box::new(Button::new("B")));
    pilot
        .runtime_mut()
        .declare_property(holder, PropertyDescriptor::new("count", 0i64));
    pilot
        .runtime_mut()
        .subscribe(a, &[Subscription::to_id(holder, &["count"])])
        .unwrap();
    pilot
        .runtime_mut()
        .subscribe(b, &[Subscription::to_id(holder, &["count"])])
        .unwrap();

    pilot
        .runtime_mut()
        .set_property(holder, "count", PropertyValue::Int(7));
    pilot.frame();
    assert_eq!(pilot.commit_count(holder), 1);
    assert_eq!(pilot.commit_count(a), 1);
    assert_eq!(pilot.commit_count(b), 1);
}

// ---------------------------------------------------------------------------
// Modal dialog flow
// ---------------------------------------------------------------------------

#[test]
fn choice_dialog_resolves_clicked_option_index() {
    let mut pilot = Pilot::new(80, 24);
    let dialog_id = pilot.runtime_mut().attach(Box::new(Dialog::new()));
    let button = pilot
        .runtime_mut()
        .attach(Box::new(Button::new(CONFIRM_LABEL)));

    let mut rx = pilot
        .runtime_mut()
        .widget_mut::<Dialog>(dialog_id)
        .unwrap()
        .setup(
            ModalMessage::plain("Delete?"),
            vec![CANCEL_LABEL.into(), CONFIRM_LABEL.into()],
            SetupOptions::default(),
        )
        .unwrap();

    pilot.click_option(CONFIRM_LABEL, button);
    pilot.frame();

    assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Choice(1));
    assert!(!pilot
        .runtime()
        .widget::<Dialog>(dialog_id)
        .unwrap()
        .is_open());
}

#[test]
fn empty_input_with_validator_stays_open_and_unsettled() {
    let mut pilot = Pilot::new(80, 24);
    let dialog_id = pilot.runtime_mut().attach(Box::new(Dialog::new()));

    let rx = pilot
        .runtime_mut()
        .widget_mut::<Dialog>(dialog_id)
        .unwrap()
        .get_input(
            ModalMessage::plain("Enter name"),
            Some(Box::new(|v: &str| !v.is_empty())),
        );
    let mut answer = tokio_test::task::spawn(rx);

    // Enter on an empty field: the validator rejects silently and the
    // future stays pending.
    pilot.press_key(Key::Enter);
    pilot.frame();
    tokio_test::assert_pending!(answer.poll());
    assert!(pilot
        .runtime()
        .widget::<Dialog>(dialog_id)
        .unwrap()
        .is_open());

    // Typing a name and confirming settles the future.
    pilot.type_text("ada");
    pilot.press_key(Key::Enter);
    pilot.frame();
    let settled = tokio_test::assert_ready!(answer.poll());
    assert_eq!(settled.unwrap(), ModalAnswer::Text("ada".into()));
}

#[test]
fn dismiss_resolves_cancel_sentinel_and_repeat_is_noop() {
    let mut pilot = Pilot::new(80, 24);
    let dialog_id = pilot.runtime_mut().attach(Box::new(Dialog::new()));

    let mut rx = pilot
        .runtime_mut()
        .widget_mut::<Dialog>(dialog_id)
        .unwrap()
        .setup(
            ModalMessage::plain("Sure?"),
            vec!["Yes".into()],
            SetupOptions::default(),
        )
        .unwrap();

    let dialog = pilot.runtime_mut().widget_mut::<Dialog>(dialog_id).unwrap();
    dialog.dismiss();
    assert!(!dialog.is_open());
    dialog.dismiss();

    assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Cancelled);
    // No second resolution; the channel is simply closed now.
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Closed);
}

#[test]
fn escape_closes_dialog_through_key_routing() {
    let mut pilot = Pilot::new(80, 24);
    let dialog_id = pilot.runtime_mut().attach(Box::new(Dialog::new()));
    let mut rx = pilot
        .runtime_mut()
        .widget_mut::<Dialog>(dialog_id)
        .unwrap()
        .setup(
            ModalMessage::plain("Quit?"),
            vec!["Stay".into(), "Leave".into()],
            SetupOptions::default(),
        )
        .unwrap();

    pilot.press_key(Key::Escape);
    pilot.frame();
    assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Cancelled);
    // The closed dialog produces no template, so the frame committed nothing
    // for it.
    assert_eq!(pilot.commit_count(dialog_id), 0);
}

#[test]
fn superseded_setup_abandons_prior_future() {
    let mut pilot = Pilot::new(80, 24);
    let dialog_id = pilot.runtime_mut().attach(Box::new(Dialog::new()));
    let dialog = pilot.runtime_mut().widget_mut::<Dialog>(dialog_id).unwrap();

    let mut first = dialog
        .setup(
            ModalMessage::plain("First?"),
            vec!["A".into()],
            SetupOptions::default(),
        )
        .unwrap();
    let mut second = dialog
        .setup(
            ModalMessage::plain("Second?"),
            vec!["B".into()],
            SetupOptions::default(),
        )
        .unwrap();

    assert_eq!(first.try_recv().unwrap_err(), TryRecvError::Closed);
    dialog.on_answer("B");
    assert_eq!(second.try_recv().unwrap(), ModalAnswer::Choice(0));
}

// ---------------------------------------------------------------------------
// Deferred resize
// ---------------------------------------------------------------------------

#[test]
fn early_resize_replays_once_with_original_size() {
    let mut pilot = Pilot::new(80, 24);
    let field = pilot.runtime_mut().attach(Box::new(TextInput::new()));

    // Resize lands before the field has ever committed.
    pilot.resize(100, 40);
    assert_eq!(pilot.runtime().size(), Size::new(100, 40));
    assert!(!pilot.runtime().has_rendered_once(field));

    pilot.frame();
    assert!(pilot.runtime().has_rendered_once(field));
    assert_eq!(pilot.commit_count(field), 1);
}

// ---------------------------------------------------------------------------
// Widgets through the public API
// ---------------------------------------------------------------------------

#[test]
fn select_list_choice_reaches_app_level() {
    let mut pilot = Pilot::new(80, 24);
    let items = vec!["one".to_owned(), "two".to_owned(), "three".to_owned()];
    let list = pilot
        .runtime_mut()
        .attach(Box::new(SelectList::new(items).unwrap()));
    pilot.runtime_mut().set_focus(Some(list));

    pilot.press_key(Key::Down);
    pilot.press_key(Key::Enter);
    let messages = pilot.frame();
    assert_eq!(messages.len(), 1);
    let choice = messages[0]
        .downcast_ref::<cadence_tui::event::message::Choice>()
        .unwrap();
    assert_eq!(choice.index, 1);
}

#[test]
fn text_input_snapshot() {
    let mut input = TextInput::new().placeholder("type here");
    assert_eq!(render_to_string(&input, 20, 1), "type here");
    input.set_value("hello");
    assert_eq!(render_to_string(&input, 20, 1), "hello");
}

#[test]
fn dialog_snapshot_shows_question_and_options() {
    let mut dialog = Dialog::new();
    let _rx = dialog
        .setup(
            ModalMessage::titled("Delete file", "This cannot be undone"),
            vec![CANCEL_LABEL.into(), CONFIRM_LABEL.into()],
            SetupOptions::default(),
        )
        .unwrap();
    let output = render_to_string(&dialog, 40, 4);
    assert_eq!(
        output,
        "Delete file\nThis cannot be undone\n[ Cancel ]  [ OK ]\n"
    );
}
