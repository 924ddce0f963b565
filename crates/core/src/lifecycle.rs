//! Mount, frame loop and unmount for the animated field.
//!
//! The host (a window, a canvas element, the CLI) owns the shared state: the
//! cursor cell, the theme cell and an event queue its listeners push into.
//! [`FieldMount`] ties an animator, a camera and a [`Renderer`] to those
//! handles for exactly one mounted lifetime. [`FrameLoop`] drives it from a
//! [`FrameScheduler`] until the scheduler runs dry or its [`StopToken`] is
//! cancelled; [`FieldMount::unmount`] then tears everything down together.

use crate::animator::{FieldAnimator, FrameInput};
use crate::camera::Camera;
use crate::config::FieldConfig;
use crate::cursor::{Cursor, CursorHandle};
use crate::error::FieldError;
use crate::surface::{Renderer, Surface};
use crate::theme::{Theme, ThemeHandle};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Input the host forwards to a mounted field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Pointer position in viewport pixels.
    PointerMove { client_x: f32, client_y: f32 },
    Resize { width: u32, height: u32 },
    ThemeChanged(Theme),
}

#[derive(Debug, Default)]
struct QueueState {
    events: VecDeque<HostEvent>,
    attached: bool,
}

/// Single-threaded queue standing in for the host's event listeners.
///
/// Events are only accepted while a mount has its listeners attached; after
/// unmount, pushes are refused so no callback can reach a torn-down surface.
#[derive(Debug, Clone, Default)]
pub struct EventQueue(Rc<RefCell<QueueState>>);

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `event`. Returns false if no mount is listening.
    pub fn push(&self, event: HostEvent) -> bool {
        let mut state = self.0.borrow_mut();
        if state.attached {
            state.events.push_back(event);
        }
        state.attached
    }

    pub fn is_attached(&self) -> bool {
        self.0.borrow().attached
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().events.len()
    }

    fn attach(&self) {
        self.0.borrow_mut().attached = true;
    }

    /// Detaches and drops anything still queued. Returns the dropped count.
    fn detach(&self) -> usize {
        let mut state = self.0.borrow_mut();
        state.attached = false;
        let dropped = state.events.len();
        state.events.clear();
        dropped
    }

    fn pop(&self) -> Option<HostEvent> {
        self.0.borrow_mut().events.pop_front()
    }
}

/// Cancellation flag for a frame loop. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Rc<Cell<bool>>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Source of frame timestamps: the display's refresh signal.
pub trait FrameScheduler {
    /// Waits for the next frame and returns its timestamp in seconds, or
    /// `None` when the host will deliver no more frames.
    fn next_frame(&mut self) -> Option<f64>;
}

/// Deterministic scheduler ticking at a fixed rate, for headless runs.
#[derive(Debug, Clone)]
pub struct FixedRateScheduler {
    interval: f64,
    issued: u64,
    limit: Option<u64>,
}

impl FixedRateScheduler {
    /// Ticks at `fps` frames per second, starting at timestamp 0.
    ///
    /// Returns `FieldError::InvalidConfig` for a non-positive or non-finite rate.
    pub fn new(fps: f64) -> Result<Self, FieldError> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "frame rate must be positive, got {fps}"
            )));
        }
        Ok(Self {
            interval: 1.0 / fps,
            issued: 0,
            limit: None,
        })
    }

    /// Stops after `frames` timestamps.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        if self.limit.is_some_and(|limit| self.issued >= limit) {
            return None;
        }
        let ts = self.issued as f64 * self.interval;
        self.issued += 1;
        Some(ts)
    }
}

/// Shared host state a mount reads from.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    pub cursor: CursorHandle,
    pub theme: ThemeHandle,
    pub events: EventQueue,
}

impl HostContext {
    pub fn new(theme: Theme) -> Self {
        Self {
            cursor: CursorHandle::new(),
            theme: ThemeHandle::new(theme),
            events: EventQueue::new(),
        }
    }
}

/// What unmounting released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Teardown {
    pub frames_rendered: u64,
    /// Events still queued at unmount, discarded with the listeners.
    pub events_dropped: usize,
}

/// A field animator mounted on a surface.
pub struct FieldMount<R: Renderer> {
    animator: FieldAnimator,
    camera: Camera,
    renderer: R,
    surface: Surface,
    host: HostContext,
    stop: StopToken,
    started_at: Option<f64>,
    torn_down: bool,
}

impl<R: Renderer> FieldMount<R> {
    /// Builds the animator, camera and renderer and attaches listeners.
    ///
    /// With no surface there is nothing to draw on: returns `Ok(None)`
    /// without touching the host context.
    pub fn mount<F>(
        surface: Option<Surface>,
        config: FieldConfig,
        seed: u64,
        host: HostContext,
        make_renderer: F,
    ) -> Result<Option<Self>, FieldError>
    where
        F: FnOnce(Surface) -> Result<R, FieldError>,
    {
        let Some(surface) = surface else {
            log::debug!("no mount surface; field not started");
            return Ok(None);
        };
        let camera = Camera::new(&config.camera, surface.width, surface.height);
        let animator = FieldAnimator::new(config, seed, host.theme.get())?;
        let renderer = make_renderer(surface)?;
        host.events.attach();
        log::debug!(
            "mounted {} particles on {}x{} surface",
            animator.particles().len(),
            surface.width,
            surface.height
        );
        Ok(Some(Self {
            animator,
            camera,
            renderer,
            surface,
            host,
            stop: StopToken::new(),
            started_at: None,
            torn_down: false,
        }))
    }

    /// Token that cancels any [`FrameLoop`] driving this mount.
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Applies one host event to the shared state or the surface.
    pub fn dispatch(&mut self, event: HostEvent) -> Result<(), FieldError> {
        match event {
            HostEvent::PointerMove { client_x, client_y } => {
                self.host.cursor.set(Cursor::from_pointer(
                    client_x,
                    client_y,
                    self.surface.width as f32,
                    self.surface.height as f32,
                ));
            }
            HostEvent::Resize { width, height } => {
                let Ok(surface) = Surface::new(width, height) else {
                    log::warn!("ignoring resize to {width}x{height}");
                    return Ok(());
                };
                self.surface = surface;
                self.camera.set_viewport(width, height);
                self.renderer.resize(surface)?;
                log::debug!("resized to {width}x{height}, aspect {:.3}", self.camera.aspect());
            }
            HostEvent::ThemeChanged(theme) => self.host.theme.set(theme),
        }
        Ok(())
    }

    /// Dispatches every queued event in arrival order.
    pub fn pump_events(&mut self) -> Result<(), FieldError> {
        while let Some(event) = self.host.events.pop() {
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Animates and renders the frame at `timestamp` seconds.
    ///
    /// The first frame defines time zero.
    pub fn frame(&mut self, timestamp: f64) -> Result<(), FieldError> {
        let start = *self.started_at.get_or_insert(timestamp);
        let input = FrameInput {
            elapsed: (timestamp - start).max(0.0) as f32,
            cursor: self.host.cursor.get(),
            theme: self.host.theme.get(),
        };
        self.animator.advance(&input);
        self.renderer.render(&self.animator.frame_view(), &self.camera)
    }

    pub fn animator(&self) -> &FieldAnimator {
        &self.animator
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    /// Detaches listeners, cancels the frame loop and disposes the renderer.
    pub fn unmount(mut self) -> Teardown {
        self.teardown()
    }

    fn teardown(&mut self) -> Teardown {
        let events_dropped = if self.torn_down {
            0
        } else {
            self.torn_down = true;
            self.stop.cancel();
            let dropped = self.host.events.detach();
            self.renderer.dispose();
            dropped
        };
        let frames_rendered = self.animator.frame_count();
        log::debug!("unmounted after {frames_rendered} frames");
        Teardown {
            frames_rendered,
            events_dropped,
        }
    }
}

impl<R: Renderer> Drop for FieldMount<R> {
    fn drop(&mut self) {
        if !self.torn_down {
            self.teardown();
        }
    }
}

/// Cancellable loop feeding scheduler timestamps to a mount.
pub struct FrameLoop<S> {
    scheduler: S,
    stop: StopToken,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S, stop: StopToken) -> Self {
        Self { scheduler, stop }
    }

    /// Loop bound to `mount`'s own stop token.
    pub fn for_mount<R: Renderer>(mount: &FieldMount<R>, scheduler: S) -> Self {
        Self::new(scheduler, mount.stop_token())
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Runs until cancelled or the scheduler stops. Returns frames rendered.
    ///
    /// Cancellation is checked before each frame is requested, so a cancel
    /// issued while handling events or rendering takes effect on the next
    /// iteration.
    pub fn run<R: Renderer>(&mut self, mount: &mut FieldMount<R>) -> Result<u64, FieldError> {
        let mut frames = 0;
        while !self.stop.is_cancelled() {
            let Some(timestamp) = self.scheduler.next_frame() else {
                break;
            };
            mount.pump_events()?;
            mount.frame(timestamp)?;
            frames += 1;
        }
        Ok(frames)
    }
}
