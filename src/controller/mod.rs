//! Document controller
//!
//! Orchestrates the document load lifecycle, routes raw touch input
//! through the gesture recognizers into the paged view, translates
//! native bridge messages, and surfaces everything to the host as one
//! typed event stream.

pub mod bridge;
pub mod loader;
pub mod navigation;
pub mod source;
pub mod toc;

use std::path::PathBuf;

use crate::error::ViewerError;
use crate::gesture::{GestureEvent, GestureRouter, TapConfig, TapEvent, TouchEvent};
use crate::layout::{
    FitPolicy, PagedScrollView, PagerCommand, PagerConfig, PagerEffect, Point, Size,
    ViewabilityConfig, VisibleSlot,
};

use bridge::BridgeEvent;
use loader::{DocumentInfo, DocumentLoader, LoadOutcome, LoaderService};
use navigation::{NavigationRequest, PageNavigator, RenderBackend, navigator_for};
use toc::TocPayload;

/// Host-facing declarative props.
#[derive(Clone, Debug)]
pub struct PdfProps {
    /// Initial/controlled page, 1-based
    pub page: usize,
    pub scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub spacing: f32,
    pub fit_policy: FitPolicy,
    pub horizontal: bool,
    pub single_page: bool,
    /// Snap-to-page scrolling; carried for the embedder's scroll layer
    pub enable_paging: bool,
    pub password: String,
}

impl Default for PdfProps {
    fn default() -> Self {
        Self {
            page: 1,
            scale: 1.0,
            min_scale: 1.0,
            max_scale: 3.0,
            spacing: 10.0,
            fit_policy: FitPolicy::FitBoth,
            horizontal: false,
            single_page: false,
            enable_paging: false,
            password: String::new(),
        }
    }
}

/// Everything the controller reports to the host application.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerEvent {
    LoadComplete {
        page_count: usize,
        path: PathBuf,
        page_width: f32,
        page_height: f32,
        toc: TocPayload,
    },
    LoadProgress(f32),
    PageChanged {
        page: usize,
        total: usize,
    },
    PageSingleTap {
        page: usize,
        x: f32,
        y: f32,
    },
    ScaleChanged(f32),
    LinkPressed(String),
    Error(String),
    /// `set_page` resolved through the navigation strategy
    Navigation(NavigationRequest),
    /// Drive the embedder's scroll position (zoom anchor, re-home)
    ScrollToOffset(Point),
    /// Drive the embedder's list to a slot
    ScrollToIndex(usize),
}

/// The viewer component's controller.
pub struct PdfController {
    props: PdfProps,
    path: Option<PathBuf>,
    loader: LoaderService,
    navigator: Box<dyn PageNavigator + Send>,
    pager: PagedScrollView,
    gestures: GestureRouter,
    document: Option<DocumentInfo>,
}

impl PdfController {
    /// Create a controller with default gesture and viewability tuning.
    #[must_use]
    pub fn new(loader: impl DocumentLoader, props: PdfProps, backend: RenderBackend) -> Self {
        Self::with_tuning(
            loader,
            props,
            backend,
            TapConfig::default(),
            ViewabilityConfig::default(),
        )
    }

    /// Create a controller with explicit threshold tuning.
    #[must_use]
    pub fn with_tuning(
        loader: impl DocumentLoader,
        props: PdfProps,
        backend: RenderBackend,
        tap: TapConfig,
        viewability: ViewabilityConfig,
    ) -> Self {
        let pager = PagedScrollView::new(PagerConfig {
            fit_policy: props.fit_policy,
            horizontal: props.horizontal,
            spacing: props.spacing,
            single_page: props.single_page,
            min_scale: props.min_scale,
            max_scale: props.max_scale,
            viewability,
        });

        Self {
            props,
            path: None,
            loader: LoaderService::spawn(loader),
            navigator: navigator_for(backend),
            pager,
            gestures: GestureRouter::new(tap),
            document: None,
        }
    }

    #[must_use]
    pub fn props(&self) -> &PdfProps {
        &self.props
    }

    #[must_use]
    pub fn document(&self) -> Option<&DocumentInfo> {
        self.document.as_ref()
    }

    /// Layout queries for the embedding view live on the pager.
    #[must_use]
    pub fn pager(&self) -> &PagedScrollView {
        &self.pager
    }

    /// Point the controller at a document. Accepts a local path or a
    /// `file://` URI; network/asset/base64 sources must go through the
    /// resolver collaborator first. A changed source cancels the effect
    /// of any in-flight load and starts over; an identical source is a
    /// no-op.
    pub fn set_source(&mut self, uri: impl AsRef<str>) {
        let uri = uri.as_ref();
        match source::classify(uri) {
            source::SourceKind::File => {}
            kind => log::warn!("source {uri:?} is {kind:?}, expected an already-resolved file"),
        }
        let path = source::local_path(uri);
        if self.path.as_deref() == Some(path.as_path()) {
            return;
        }
        log::info!("source changed to {}", path.display());
        self.path = Some(path.clone());
        self.document = None;
        self.loader.request_load(&path, &self.props.password);
    }

    /// Drain loader completions and due timers. Call once per event-loop
    /// turn.
    pub fn pump(&mut self, now_ms: u64) -> Vec<ViewerEvent> {
        let mut out = Vec::new();

        for outcome in self.loader.poll() {
            match outcome {
                LoadOutcome::Loaded { info, .. } => {
                    let aspect = info.aspect_ratio();
                    self.apply_pager(
                        PagerCommand::SetDocument {
                            page_count: info.page_count,
                            aspect_ratio: aspect,
                        },
                        now_ms,
                        &mut out,
                    );
                    // Honor the controlled page prop once layout exists.
                    self.apply_pager(
                        PagerCommand::SetPageProp(self.props.page.saturating_sub(1)),
                        now_ms,
                        &mut out,
                    );
                    self.document = Some(info);
                    out.push(ViewerEvent::LoadComplete {
                        page_count: info.page_count,
                        path: self.path.clone().unwrap_or_default(),
                        page_width: info.page_width,
                        page_height: info.page_height,
                        toc: TocPayload::Empty,
                    });
                }
                LoadOutcome::Failed { error, .. } => {
                    out.push(ViewerEvent::Error(error));
                }
            }
        }

        let gestures = self.gestures.tick(now_ms);
        self.route_gestures(gestures, now_ms, &mut out);

        let effects = self.pager.tick(now_ms);
        out.extend(effects.into_iter().map(map_effect));

        out
    }

    /// Feed one raw touch frame through the recognizers.
    pub fn handle_touch(&mut self, event: &TouchEvent, now_ms: u64) -> Vec<ViewerEvent> {
        let mut out = Vec::new();
        let gestures = self.gestures.on_event(event);
        self.route_gestures(gestures, now_ms, &mut out);
        out
    }

    /// The embedding view was laid out.
    pub fn set_layout(&mut self, size: Size, now_ms: u64) -> Vec<ViewerEvent> {
        let mut out = Vec::new();
        self.apply_pager(PagerCommand::SetLayout(size), now_ms, &mut out);
        out
    }

    /// The virtualization layer reported a scroll position.
    pub fn observe_scroll(&mut self, offset: Point, now_ms: u64) -> Vec<ViewerEvent> {
        let mut out = Vec::new();
        self.apply_pager(PagerCommand::Scroll(offset), now_ms, &mut out);
        out
    }

    /// The virtualization layer reported slot visibility.
    pub fn report_viewability(
        &mut self,
        slots: Vec<VisibleSlot>,
        now_ms: u64,
    ) -> Vec<ViewerEvent> {
        let mut out = Vec::new();
        self.apply_pager(PagerCommand::Viewability(slots), now_ms, &mut out);
        out
    }

    /// The controlled `scale` prop changed.
    pub fn set_scale(&mut self, scale: f32, now_ms: u64) -> Vec<ViewerEvent> {
        self.props.scale = scale;
        let mut out = Vec::new();
        self.apply_pager(PagerCommand::SetScaleProp(scale), now_ms, &mut out);
        out
    }

    /// Imperative page navigation.
    ///
    /// The input is the scripting-layer number, so NaN and other
    /// non-finite values are representable; they are a programming error
    /// and fail synchronously.
    pub fn set_page(&mut self, page: f64, now_ms: u64) -> Result<Vec<ViewerEvent>, ViewerError> {
        if !page.is_finite() {
            return Err(ViewerError::invalid_argument(format!(
                "page must be a finite number, got {page}"
            )));
        }
        let page = page.max(1.0) as usize;
        self.props.page = page;

        let request = self.navigator.apply(page);
        let mut out = vec![ViewerEvent::Navigation(request)];
        if request == (NavigationRequest::PropUpdate { page }) {
            // The declarative path loops straight back into our own view.
            self.apply_pager(PagerCommand::SetPageProp(page - 1), now_ms, &mut out);
        }
        Ok(out)
    }

    /// Translate one native bridge message. Malformed messages are
    /// logged and dropped; they never take the view down.
    pub fn on_bridge_message(&mut self, raw: &str, now_ms: u64) -> Vec<ViewerEvent> {
        let event = match bridge::parse_message(raw) {
            Ok(event) => event,
            Err(err) => {
                log::warn!("{err}");
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        match event {
            BridgeEvent::LoadComplete {
                page_count,
                width,
                height,
                toc,
            } => {
                let aspect = if height > 0.0 { width / height } else { 1.0 };
                self.apply_pager(
                    PagerCommand::SetDocument {
                        page_count: page_count as usize,
                        aspect_ratio: aspect,
                    },
                    now_ms,
                    &mut out,
                );
                out.push(ViewerEvent::LoadComplete {
                    page_count: page_count as usize,
                    path: self.path.clone().unwrap_or_default(),
                    page_width: width,
                    page_height: height,
                    toc,
                });
            }
            BridgeEvent::PageChanged { page, total } => out.push(ViewerEvent::PageChanged {
                page: page as usize,
                total: total as usize,
            }),
            BridgeEvent::Error(message) => out.push(ViewerEvent::Error(message)),
            BridgeEvent::PageSingleTap { page, x, y } => out.push(ViewerEvent::PageSingleTap {
                page: page as usize,
                x,
                y,
            }),
            BridgeEvent::ScaleChanged(scale) => out.push(ViewerEvent::ScaleChanged(scale)),
            BridgeEvent::LinkPressed(url) => out.push(ViewerEvent::LinkPressed(url)),
        }
        out
    }

    /// The source resolver reported download progress.
    #[must_use]
    pub fn on_load_progress(&self, fraction: f32) -> ViewerEvent {
        ViewerEvent::LoadProgress(fraction.clamp(0.0, 1.0))
    }

    /// Detach: cancel timers and in-flight work. Late loader completions
    /// are discarded by generation on the (now unreachable) poll side.
    pub fn unmount(&mut self) {
        self.gestures.detach();
        self.loader.shutdown();
        self.document = None;
    }

    fn route_gestures(
        &mut self,
        gestures: Vec<GestureEvent>,
        now_ms: u64,
        out: &mut Vec<ViewerEvent>,
    ) {
        for gesture in gestures {
            match gesture {
                GestureEvent::Tap(TapEvent::Single { x, y }) => {
                    self.apply_pager(PagerCommand::SingleTap { x, y }, now_ms, out);
                }
                GestureEvent::Tap(TapEvent::Double) => {
                    self.apply_pager(PagerCommand::DoubleTap, now_ms, out);
                }
                GestureEvent::Pinch(update) => {
                    self.apply_pager(PagerCommand::Pinch(update), now_ms, out);
                }
                GestureEvent::PinchBegan | GestureEvent::PinchEnded => {}
            }
        }
    }

    fn apply_pager(&mut self, cmd: PagerCommand, now_ms: u64, out: &mut Vec<ViewerEvent>) {
        let effects = self.pager.apply(cmd, now_ms);
        out.extend(effects.into_iter().map(map_effect));
    }
}

fn map_effect(effect: PagerEffect) -> ViewerEvent {
    match effect {
        PagerEffect::ScaleChanged(scale) => ViewerEvent::ScaleChanged(scale),
        PagerEffect::PageChanged { page, total } => ViewerEvent::PageChanged { page, total },
        PagerEffect::PageSingleTap { page, x, y } => ViewerEvent::PageSingleTap { page, x, y },
        PagerEffect::ScrollToOffset(offset) => ViewerEvent::ScrollToOffset(offset),
        PagerEffect::ScrollToIndex(index) => ViewerEvent::ScrollToIndex(index),
    }
}
