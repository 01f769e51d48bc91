//! Async driver: feeds input into a document and fires timers on real time.
//!
//! [`run`] waits on whichever comes first, the next input event or the next
//! timer deadline, mapping tokio time onto the document's virtual clock.
//! Under a paused tokio clock (`start_paused`) the loop is fully
//! deterministic.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};

use crate::document::Document;
use crate::event::input::InputEvent;

/// Sleep until `deadline`, or forever without one.
async fn sleep_until_optional(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Drive `document` until the input channel closes, then hand it back.
///
/// Virtual time zero is the moment `run` starts, offset by whatever the
/// document's clock already reads.
pub async fn run(mut document: Document, mut input: UnboundedReceiver<InputEvent>) -> Document {
    let started = Instant::now();
    let offset = document.now();
    let virtual_now = |instant: Instant| -> Duration { offset + instant.saturating_duration_since(started) };

    tracing::debug!("document runtime started");
    loop {
        let deadline = document
            .next_timer_deadline()
            .map(|due| started + due.saturating_sub(offset));

        tokio::select! {
            received = input.recv() => match received {
                Some(event) => {
                    document.advance_to(virtual_now(Instant::now()));
                    tracing::trace!(?event, "input received");
                    document.handle_input(event);
                }
                None => break,
            },
            () = sleep_until_optional(deadline) => {
                document.advance_to(virtual_now(Instant::now()));
            }
        }
    }
    tracing::debug!("input closed, document runtime stopped");
    document
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NativeOption;
    use crate::event::input::PointerEvent;
    use crate::widgets::select::{SelectConfig, SelectWidget};
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn run_fires_transition_and_returns_on_close() {
        let mut document = Document::new(80, 24);
        let body = document.body();
        let select = document
            .page
            .dom
            .build_select(body, "color", ["Red", "Green", "Blue"].map(NativeOption::new));
        let id = document.custom_select(select, SelectConfig::new()).unwrap();
        let value = document.widget::<SelectWidget>(id).unwrap().value_display();

        let (tx, rx) = mpsc::unbounded_channel();
        let feeder = async move {
            tokio_test::assert_ok!(tx.send(InputEvent::Pointer(PointerEvent::click(value))));
            tokio::time::sleep(Duration::from_millis(150)).await;
            drop(tx);
        };
        let (document, ()) = tokio::join!(run(document, rx), feeder);

        let widget = document.widget::<SelectWidget>(id).unwrap();
        assert_eq!(widget.phase(), crate::widgets::select::Phase::Open);
        assert!(document.now() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn run_with_closed_channel_returns_immediately() {
        let (tx, rx) = mpsc::unbounded_channel::<InputEvent>();
        drop(tx);
        let document = run(Document::new(10, 5), rx).await;
        assert_eq!(document.now(), Duration::ZERO);
    }
}
