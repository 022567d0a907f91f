//! Rendering surface and logical coordinate transform
//!
//! Logical space has its origin at the centre of the surface with Y pointing
//! up. One logical unit spans `scale * unit_scale` device pixels.
//!
//! Device pixels are physical pixels of the backing store; host layout
//! pixels (what pointer events report) are device pixels divided by the
//! device pixel ratio.

use crate::config::SurfaceConfig;
use crate::diagnostics::DiagnosticsLogger;
use stagehand_core::{FrameInfo, Participant, Point, Result, Size};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Device/logical mapping for one surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Zoom relative to `unit_scale`
    pub scale: f64,
    pub device_width: f64,
    pub device_height: f64,
    pub dpi_ratio: f64,
    /// Multiplier that keeps a size constant on screen regardless of zoom
    /// and pixel density
    pub scale_cancel_ratio: f64,
    /// Device pixels per logical unit at scale 1
    pub unit_scale: f64,
    pub reference_scale: f64,
}

impl Transform {
    pub fn new(config: &SurfaceConfig) -> Self {
        let mut transform = Self {
            scale: 1.0,
            device_width: config.width * config.device_pixel_ratio,
            device_height: config.height * config.device_pixel_ratio,
            dpi_ratio: config.device_pixel_ratio,
            scale_cancel_ratio: 1.0,
            unit_scale: config.unit_scale,
            reference_scale: config.reference_scale,
        };
        transform.recompute_scale_cancel();
        transform
    }

    pub fn recompute_scale_cancel(&mut self) {
        self.scale_cancel_ratio = self.dpi_ratio * self.reference_scale / self.scale;
    }

    /// Device pixels per logical unit
    pub fn pixels_per_unit(&self) -> f64 {
        self.scale * self.unit_scale
    }

    pub fn device_size(&self) -> Size {
        Size::new(self.device_width, self.device_height)
    }

    /// Affine matrix `[a, b, c, d, e, f]` mapping logical units to device
    /// pixels, in the order 2D canvas APIs take it
    pub fn affine(&self) -> [f64; 6] {
        let s = self.pixels_per_unit();
        [
            s,
            0.0,
            0.0,
            -s,
            self.device_width / 2.0,
            self.device_height / 2.0,
        ]
    }

    pub fn logical_to_device(&self, p: Point) -> Point {
        let s = self.pixels_per_unit();
        Point::new(
            self.device_width / 2.0 + p.x * s,
            self.device_height / 2.0 - p.y * s,
        )
    }

    pub fn device_to_logical(&self, p: Point) -> Point {
        let s = self.pixels_per_unit();
        Point::new(
            (p.x - self.device_width / 2.0) / s,
            (self.device_height / 2.0 - p.y) / s,
        )
    }

    /// Convert a host layout-pixel position, relative to the surface's
    /// layout origin, into logical units
    pub fn screen_to_logical(&self, screen: Point, origin: Point) -> Point {
        self.device_to_logical((screen - origin) * self.dpi_ratio)
    }

    pub fn is_portrait(&self, threshold: f64) -> bool {
        self.device_size().aspect_ratio() < threshold
    }

    /// `scale_cancel_ratio` for fixed-size elements, 1 otherwise
    pub fn scale_for(&self, fixed: bool) -> f64 {
        if fixed {
            self.scale_cancel_ratio
        } else {
            1.0
        }
    }

    /// Logical size that renders as `size` regardless of zoom
    pub fn fixed_size(&self, size: f64) -> f64 {
        size * self.scale_cancel_ratio
    }

    /// Logical distance expressed in fixed-size units, for hit testing
    /// elements drawn with [`Transform::fixed_size`]
    pub fn distance(&self, a: Point, b: Point) -> f64 {
        a.distance(b) / self.scale_cancel_ratio
    }
}

/// Callback that reallocates the backing store, given device pixel dimensions
pub type BackingResize = Box<dyn FnMut(u32, u32)>;

struct SurfaceState {
    transform: Transform,
    origin: Point,
    portrait_threshold: f64,
    resize_pending: bool,
    backing_size: Option<(u32, u32)>,
    backing_resizes: u64,
    on_resize: Option<BackingResize>,
    diagnostics: Option<DiagnosticsLogger>,
}

/// The rendering surface participant
///
/// Clones share state, so drawing code and the input latch can hold a handle
/// while the scheduler owns another.
#[derive(Clone)]
pub struct Surface {
    state: Rc<RefCell<SurfaceState>>,
}

impl Surface {
    pub fn new(config: &SurfaceConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                transform: Transform::new(config),
                origin: Point::ZERO,
                portrait_threshold: config.portrait_threshold,
                resize_pending: true,
                backing_size: None,
                backing_resizes: 0,
                on_resize: None,
                diagnostics: None,
            })),
        }
    }

    /// Report scale values into diagnostics every frame
    pub fn with_diagnostics(self, logger: DiagnosticsLogger) -> Self {
        self.state.borrow_mut().diagnostics = Some(logger);
        self
    }

    /// Called with the new device size whenever a resize is applied
    pub fn on_backing_resize(&self, callback: impl FnMut(u32, u32) + 'static) {
        self.state.borrow_mut().on_resize = Some(Box::new(callback));
    }

    /// Record a new layout size; the backing store follows on the next frame
    pub fn resize(&self, layout_width: f64, layout_height: f64, device_pixel_ratio: f64) {
        let mut state = self.state.borrow_mut();
        let t = &mut state.transform;
        t.dpi_ratio = device_pixel_ratio;
        t.device_width = layout_width * device_pixel_ratio;
        t.device_height = layout_height * device_pixel_ratio;
        state.resize_pending = true;
    }

    /// Set the size of one logical unit in device pixels
    pub fn set_scale(&self, pixels_per_unit: f64) {
        let mut state = self.state.borrow_mut();
        let scale = pixels_per_unit / state.transform.unit_scale;
        if !(scale.is_finite() && scale > 0.0) {
            tracing::warn!(pixels_per_unit, "ignoring non-positive surface scale");
            return;
        }
        state.transform.scale = scale;
    }

    /// Position of the surface's top-left corner in host layout pixels
    pub fn set_origin(&self, origin: Point) {
        self.state.borrow_mut().origin = origin;
    }

    pub fn origin(&self) -> Point {
        self.state.borrow().origin
    }

    pub fn transform(&self) -> Transform {
        self.state.borrow().transform
    }

    pub fn scale_cancel_ratio(&self) -> f64 {
        self.state.borrow().transform.scale_cancel_ratio
    }

    pub fn logical_to_device(&self, p: Point) -> Point {
        self.state.borrow().transform.logical_to_device(p)
    }

    pub fn device_to_logical(&self, p: Point) -> Point {
        self.state.borrow().transform.device_to_logical(p)
    }

    /// Convert a host pointer position using the current surface origin
    pub fn screen_to_logical(&self, screen: Point) -> Point {
        let state = self.state.borrow();
        state.transform.screen_to_logical(screen, state.origin)
    }

    pub fn is_portrait(&self) -> bool {
        let state = self.state.borrow();
        state.transform.is_portrait(state.portrait_threshold)
    }

    pub fn scale_for(&self, fixed: bool) -> f64 {
        self.state.borrow().transform.scale_for(fixed)
    }

    pub fn fixed_size(&self, size: f64) -> f64 {
        self.state.borrow().transform.fixed_size(size)
    }

    pub fn distance(&self, a: Point, b: Point) -> f64 {
        self.state.borrow().transform.distance(a, b)
    }

    pub fn resize_pending(&self) -> bool {
        self.state.borrow().resize_pending
    }

    /// Device size of the backing store, once the first resize is applied
    pub fn backing_size(&self) -> Option<(u32, u32)> {
        self.state.borrow().backing_size
    }

    /// Number of times the backing store has been resized
    pub fn backing_resizes(&self) -> u64 {
        self.state.borrow().backing_resizes
    }

    fn apply_pending_resize(&self) {
        let (width, height, callback) = {
            let mut state = self.state.borrow_mut();
            if !state.resize_pending {
                return;
            }
            state.resize_pending = false;
            let width = state.transform.device_width.round().max(0.0) as u32;
            let height = state.transform.device_height.round().max(0.0) as u32;
            state.backing_size = Some((width, height));
            state.backing_resizes += 1;
            (width, height, state.on_resize.take())
        };
        tracing::debug!(width, height, "applied surface resize");

        if let Some(mut callback) = callback {
            callback(width, height);
            let mut state = self.state.borrow_mut();
            if state.on_resize.is_none() {
                state.on_resize = Some(callback);
            }
        }
    }
}

impl Participant for Surface {
    fn name(&self) -> &str {
        "surface"
    }

    fn update(&mut self, _frame: &FrameInfo) -> Result<()> {
        self.apply_pending_resize();

        let mut state = self.state.borrow_mut();
        state.transform.recompute_scale_cancel();
        if let Some(log) = &state.diagnostics {
            log.log_value("scale", state.transform.pixels_per_unit());
            log.log_value("scale_cancel_ratio", state.transform.scale_cancel_ratio);
        }
        Ok(())
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Surface")
            .field("transform", &state.transform)
            .field("origin", &state.origin)
            .field("resize_pending", &state.resize_pending)
            .field("backing_size", &state.backing_size)
            .finish()
    }
}
