//! End-to-end gesture flows: raw touch frames in, viewer events out.

use std::path::Path;
use std::time::Duration;

use folioview::{
    DocumentHandle, DocumentInfo, DocumentLoader, PdfController, PdfProps, Point, RenderBackend,
    Size, TouchEvent, TouchPoint, ViewerError, ViewerEvent, VisibleSlot,
};

struct TenPageLoader;

impl DocumentLoader for TenPageLoader {
    fn load_document(&self, _path: &Path, _password: &str) -> Result<DocumentInfo, ViewerError> {
        Ok(DocumentInfo {
            handle: DocumentHandle(1),
            page_count: 10,
            page_width: 400.0,
            page_height: 800.0,
        })
    }
}

fn loaded_controller() -> PdfController {
    let mut pdf = PdfController::new(TenPageLoader, PdfProps::default(), RenderBackend::Composed);
    pdf.set_layout(Size::new(400.0, 800.0), 0);
    pdf.set_source("/tmp/ten_pages.pdf");

    for _ in 0..200 {
        let events = pdf.pump(0);
        if events
            .iter()
            .any(|event| matches!(event, ViewerEvent::LoadComplete { .. }))
        {
            // Flush the initial page-prop navigation so tests only see
            // the events they cause themselves.
            let initial = pdf.pump(500);
            assert_eq!(initial, vec![ViewerEvent::ScrollToIndex(0)]);
            return pdf;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("document never loaded");
}

fn touch_down(x: f32, y: f32, at_ms: u64) -> TouchEvent {
    TouchEvent::Down {
        touches: vec![TouchPoint::new(x, y)],
        at_ms,
    }
}

fn touch_up(x: f32, y: f32, at_ms: u64) -> TouchEvent {
    TouchEvent::Up {
        location: TouchPoint::new(x, y),
        touches: vec![],
        at_ms,
    }
}

fn two_fingers(a: (f32, f32), b: (f32, f32), at_ms: u64) -> TouchEvent {
    TouchEvent::Move {
        touches: vec![TouchPoint::new(a.0, a.1), TouchPoint::new(b.0, b.1)],
        at_ms,
    }
}

#[test]
fn single_tap_surfaces_as_page_single_tap_after_the_delay() {
    let mut pdf = loaded_controller();

    assert!(pdf.handle_touch(&touch_down(120.0, 300.0, 1_000), 1_000).is_empty());
    assert!(pdf.handle_touch(&touch_up(120.0, 300.0, 1_050), 1_050).is_empty());

    // Before the double-tap window closes: nothing.
    assert!(pdf.pump(1_200).is_empty());

    let events = pdf.pump(1_350);
    assert_eq!(
        events,
        vec![ViewerEvent::PageSingleTap {
            page: 1,
            x: 120.0,
            y: 300.0,
        }]
    );
}

#[test]
fn double_tap_zooms_instead_of_tapping() {
    let mut pdf = loaded_controller();

    pdf.handle_touch(&touch_down(200.0, 400.0, 1_000), 1_000);
    pdf.handle_touch(&touch_up(200.0, 400.0, 1_040), 1_040);
    pdf.handle_touch(&touch_down(205.0, 402.0, 1_150), 1_150);
    let events = pdf.handle_touch(&touch_up(205.0, 402.0, 1_190), 1_190);

    assert!(matches!(
        events.first(),
        Some(ViewerEvent::ScaleChanged(s)) if (s - 1.2).abs() < 1e-4
    ));
    // The pending single tap was consumed by the double tap.
    assert!(pdf.pump(2_000).iter().all(|event| !matches!(
        event,
        ViewerEvent::PageSingleTap { .. }
    )));
}

#[test]
fn pinch_zooms_and_keeps_the_anchor() {
    let mut pdf = loaded_controller();

    pdf.handle_touch(
        &TouchEvent::Down {
            touches: vec![TouchPoint::new(100.0, 400.0), TouchPoint::new(300.0, 400.0)],
            at_ms: 1_000,
        },
        1_000,
    );
    let events = pdf.handle_touch(&two_fingers((80.0, 400.0), (340.0, 400.0), 1_016), 1_016);

    let mut scale_seen = None;
    let mut offset_seen = None;
    for event in events {
        match event {
            ViewerEvent::ScaleChanged(scale) => scale_seen = Some(scale),
            ViewerEvent::ScrollToOffset(offset) => offset_seen = Some(offset),
            other => panic!("unexpected event {other:?}"),
        }
    }
    let scale = scale_seen.expect("pinch must change the scale");
    let offset = offset_seen.expect("zoom must drive the scroll offset");

    // Anchor invariant at the focal point (210, 400) starting from
    // offset (0, 0): new_offset = (old + focal) * ratio - focal.
    assert!((offset.x - (210.0 * scale - 210.0)).abs() < 1e-2);
    assert!((offset.y - (400.0 * scale - 400.0)).abs() < 1e-2);
}

#[test]
fn pinch_and_tap_never_fire_for_the_same_sequence() {
    let mut pdf = loaded_controller();

    // Two-finger sequence that ends in a full release.
    pdf.handle_touch(
        &TouchEvent::Down {
            touches: vec![TouchPoint::new(100.0, 400.0), TouchPoint::new(300.0, 400.0)],
            at_ms: 1_000,
        },
        1_000,
    );
    pdf.handle_touch(&two_fingers((80.0, 400.0), (340.0, 400.0), 1_016), 1_016);
    pdf.handle_touch(
        &TouchEvent::Up {
            location: TouchPoint::new(80.0, 400.0),
            touches: vec![TouchPoint::new(340.0, 400.0)],
            at_ms: 1_100,
        },
        1_100,
    );
    pdf.handle_touch(&touch_up(340.0, 400.0, 1_120), 1_120);

    let late = pdf.pump(2_500);
    assert!(
        late.iter()
            .all(|event| !matches!(event, ViewerEvent::PageSingleTap { .. })),
        "pinch sequence must not produce taps, got {late:?}"
    );
}

#[test]
fn scroll_locks_during_zoom_and_rehomes_after_settle() {
    let mut pdf = loaded_controller();

    pdf.handle_touch(
        &TouchEvent::Down {
            touches: vec![TouchPoint::new(100.0, 400.0), TouchPoint::new(300.0, 400.0)],
            at_ms: 1_000,
        },
        1_000,
    );
    pdf.handle_touch(&two_fingers((60.0, 400.0), (360.0, 400.0), 1_016), 1_016);
    assert!(!pdf.pager().scroll_enabled());

    // Scroll reports during the lock do not move the viewport.
    let before = pdf.pager().content_offset();
    pdf.observe_scroll(Point::new(0.0, 5_000.0), 1_100);
    assert_eq!(pdf.pager().content_offset(), before);

    // One second of scale stability re-enables scrolling and re-homes.
    let events = pdf.pump(2_016);
    assert!(pdf.pager().scroll_enabled());
    assert!(events
        .iter()
        .any(|event| matches!(event, ViewerEvent::ScrollToOffset(_))));
}

#[test]
fn viewability_reports_change_the_page_exactly_once() {
    let mut pdf = loaded_controller();

    let report = vec![VisibleSlot {
        index: 3,
        visible_fraction: 0.8,
    }];
    let mut page_changes = 0;
    for i in 0..5u64 {
        let events = pdf.report_viewability(report.clone(), 5_000 + i * 300);
        page_changes += events
            .iter()
            .filter(|event| matches!(event, ViewerEvent::PageChanged { page: 4, total: 10 }))
            .count();
    }
    assert_eq!(page_changes, 1);
}

#[test]
fn tapped_page_follows_the_scroll_position() {
    let mut pdf = loaded_controller();

    // Fit-both page in a 400x800 viewport at aspect 0.5 is 800 tall,
    // stride 810 with the default 10pt spacing. Scroll to page 4.
    pdf.observe_scroll(Point::new(0.0, 810.0 * 3.0), 1_000);

    pdf.handle_touch(&touch_down(200.0, 100.0, 2_000), 2_000);
    pdf.handle_touch(&touch_up(200.0, 100.0, 2_040), 2_040);
    let events = pdf.pump(2_400);

    assert_eq!(
        events,
        vec![ViewerEvent::PageSingleTap {
            page: 4,
            x: 200.0,
            y: 100.0,
        }]
    );
}
