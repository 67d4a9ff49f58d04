//! The safe-area adapter: handler type, dispatch plumbing, and the
//! last-applied mirror.
//!
//! The platform's listener object is re-expressed here as a plain function
//! value: the event loop (or a test) feeds [`InsetsSnapshot`]s to the one
//! registered [`SafeAreaHandler`], and the default handler pads a sink and
//! consumes the event. Everything is platform-free; the Android side only
//! supplies a sink and the snapshots.

use std::cell::RefCell;
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};

use crate::insets::{Insets, InsetsSnapshot};

/// A handler's report of whether an inset event was fully absorbed.
///
/// The padding handler installed at window creation returns `Consumed` on
/// every invocation: once the content padding reflects the safe area there
/// is nothing left to forward to anyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsetDisposition {
    /// The event was fully absorbed; no inset data travels further.
    Consumed,
    /// The event was not handled and would pass to the next consumer.
    Propagate,
}

impl InsetDisposition {
    pub fn is_consumed(self) -> bool {
        self == InsetDisposition::Consumed
    }
}

/// The inset-change listener as a plain function value, registered against
/// the event source with [`register_safe_area_handler`].
pub type SafeAreaHandler = Box<dyn FnMut(&InsetsSnapshot) -> InsetDisposition>;

/// Where computed padding lands. On Android the root content view implements
/// this over JNI; tests substitute a recording fake.
pub trait InsetSink {
    fn apply_padding(&mut self, padding: Insets);
}

// Last padding the handler applied, readable from any thread. This backs
// last_safe_area() and the C ABI query.
static LAST_SAFE_AREA: Mutex<Insets> = Mutex::new(Insets::ZERO);

thread_local! {
    // The one registered handler. Lives on the event-loop thread.
    static INSET_HANDLER: RefCell<Option<SafeAreaHandler>> = RefCell::new(None);
}

/// The handler body: compute the safe area for `snapshot`, hand it to the
/// sink as padding, publish it to the crate-wide mirror, and consume the
/// event.
///
/// Stateless with respect to prior invocations: the same snapshot always
/// produces the same padding. One diagnostic line records the top, left and
/// bottom edges.
pub fn apply_safe_area(sink: &mut dyn InsetSink, snapshot: &InsetsSnapshot) -> InsetDisposition {
    let padding = snapshot.safe_area();
    sink.apply_padding(padding);
    publish_safe_area(padding);
    info!(
        "applied padding to content view: top={} left={} bottom={}",
        padding.top, padding.left, padding.bottom
    );
    InsetDisposition::Consumed
}

/// Installs the inset-change handler, replacing any previous one. There is
/// exactly one handler at a time; the window-creation hook calls this on the
/// event-loop thread.
pub fn register_safe_area_handler(handler: SafeAreaHandler) {
    INSET_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            debug!("replacing previously registered safe-area handler");
        }
        *slot.borrow_mut() = Some(handler);
    });
}

/// Drops the registered handler. Called when the window goes away.
pub fn clear_safe_area_handler() {
    INSET_HANDLER.with(|slot| {
        *slot.borrow_mut() = None;
    });
}

pub fn has_safe_area_handler() -> bool {
    INSET_HANDLER.with(|slot| slot.borrow().is_some())
}

/// Feeds one snapshot to the registered handler and returns its disposition.
///
/// Uses try_borrow_mut so a handler that re-enters dispatch gets a refusal
/// instead of a panic. With no handler registered the event is reported as
/// unconsumed.
pub fn dispatch_insets_changed(snapshot: &InsetsSnapshot) -> InsetDisposition {
    INSET_HANDLER.with(|slot| match slot.try_borrow_mut() {
        Ok(mut guard) => match guard.as_mut() {
            Some(handler) => handler(snapshot),
            None => {
                debug!("inset event arrived with no handler registered");
                InsetDisposition::Propagate
            }
        },
        Err(_) => {
            warn!("re-entrant inset dispatch refused");
            InsetDisposition::Propagate
        }
    })
}

/// The most recently applied padding quad. All zero until the first inset
/// event lands.
pub fn last_safe_area() -> Insets {
    *LAST_SAFE_AREA.lock().unwrap_or_else(PoisonError::into_inner)
}

fn publish_safe_area(padding: Insets) {
    *LAST_SAFE_AREA.lock().unwrap_or_else(PoisonError::into_inner) = padding;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::MutexGuard;

    // Tests that touch the process-wide mirror run serialized.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[derive(Default)]
    struct RecordingSink {
        applied: Vec<Insets>,
    }

    impl InsetSink for RecordingSink {
        fn apply_padding(&mut self, padding: Insets) {
            self.applied.push(padding);
        }
    }

    #[test]
    fn test_handler_pads_sink_with_per_edge_max() {
        let _guard = serial();
        let mut sink = RecordingSink::default();
        let snapshot = InsetsSnapshot::new(Insets::new(0, 24, 0, 48), Insets::new(0, 30, 0, 0));

        let disposition = apply_safe_area(&mut sink, &snapshot);

        assert_eq!(sink.applied, vec![Insets::new(0, 30, 0, 48)]);
        assert!(disposition.is_consumed());
    }

    #[test]
    fn test_handler_stateless_across_invocations() {
        let _guard = serial();
        let mut sink = RecordingSink::default();
        let snapshot = InsetsSnapshot::new(Insets::new(10, 20, 10, 0), Insets::new(40, 0, 0, 0));

        apply_safe_area(&mut sink, &snapshot);
        apply_safe_area(&mut sink, &snapshot);

        let expected = Insets::new(40, 20, 10, 0);
        assert_eq!(sink.applied, vec![expected, expected]);
    }

    #[test]
    fn test_zero_snapshot_resets_padding() {
        let _guard = serial();
        let mut sink = RecordingSink::default();

        apply_safe_area(
            &mut sink,
            &InsetsSnapshot::new(Insets::new(0, 24, 0, 48), Insets::ZERO),
        );
        apply_safe_area(&mut sink, &InsetsSnapshot::default());

        assert_eq!(sink.applied.last(), Some(&Insets::ZERO));
        assert_eq!(last_safe_area(), Insets::ZERO);
    }

    #[test]
    fn test_every_invocation_consumes() {
        let _guard = serial();
        let mut sink = RecordingSink::default();
        let snapshots = [
            InsetsSnapshot::default(),
            InsetsSnapshot::new(Insets::new(0, 24, 0, 48), Insets::new(0, 30, 0, 0)),
            InsetsSnapshot::new(Insets::new(10, 20, 10, 0), Insets::new(40, 0, 0, 0)),
            InsetsSnapshot::new(Insets::ZERO, Insets::new(0, 0, 0, 17)),
        ];

        for snapshot in &snapshots {
            assert!(apply_safe_area(&mut sink, snapshot).is_consumed());
        }
    }

    #[test]
    fn test_mirror_tracks_last_applied() {
        let _guard = serial();
        let mut sink = RecordingSink::default();
        let snapshot = InsetsSnapshot::new(Insets::new(7, 77, 7, 777), Insets::ZERO);

        apply_safe_area(&mut sink, &snapshot);

        assert_eq!(last_safe_area(), Insets::new(7, 77, 7, 777));
    }

    #[test]
    fn test_dispatch_without_handler_propagates() {
        clear_safe_area_handler();
        let disposition = dispatch_insets_changed(&InsetsSnapshot::default());
        assert_eq!(disposition, InsetDisposition::Propagate);
        assert!(!has_safe_area_handler());
    }

    #[test]
    fn test_dispatch_runs_registered_handler() {
        clear_safe_area_handler();
        let seen: std::rc::Rc<RefCell<Vec<InsetsSnapshot>>> = Default::default();
        let seen_by_handler = seen.clone();
        register_safe_area_handler(Box::new(move |snapshot| {
            seen_by_handler.borrow_mut().push(*snapshot);
            InsetDisposition::Consumed
        }));

        let snapshot = InsetsSnapshot::new(Insets::new(1, 2, 3, 4), Insets::ZERO);
        let disposition = dispatch_insets_changed(&snapshot);

        assert!(disposition.is_consumed());
        assert_eq!(*seen.borrow(), vec![snapshot]);
        clear_safe_area_handler();
    }

    #[test]
    fn test_reentrant_dispatch_refused() {
        clear_safe_area_handler();
        let inner: std::rc::Rc<RefCell<Option<InsetDisposition>>> = Default::default();
        let inner_seen = inner.clone();
        register_safe_area_handler(Box::new(move |snapshot| {
            *inner_seen.borrow_mut() = Some(dispatch_insets_changed(snapshot));
            InsetDisposition::Consumed
        }));

        let outer = dispatch_insets_changed(&InsetsSnapshot::default());

        assert!(outer.is_consumed());
        assert_eq!(*inner.borrow(), Some(InsetDisposition::Propagate));
        clear_safe_area_handler();
    }

    #[test]
    fn test_registration_replaces_previous_handler() {
        clear_safe_area_handler();
        let hits: std::rc::Rc<RefCell<(u32, u32)>> = Default::default();

        let first = hits.clone();
        register_safe_area_handler(Box::new(move |_| {
            first.borrow_mut().0 += 1;
            InsetDisposition::Consumed
        }));
        let second = hits.clone();
        register_safe_area_handler(Box::new(move |_| {
            second.borrow_mut().1 += 1;
            InsetDisposition::Consumed
        }));

        dispatch_insets_changed(&InsetsSnapshot::default());

        assert_eq!(*hits.borrow(), (0, 1));
        clear_safe_area_handler();
    }
}
