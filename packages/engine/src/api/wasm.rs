//! Browser mount: owns the canvas, the two image loads, the interval timer and
//! the pointer listeners for one effect instance.
//!
//! Everything mutable sits in one `Rc<RefCell<Mount>>`. The JS-facing
//! `RippleCanvas` holds the only strong reference; every callback holds a
//! `Weak` and silently does nothing once the mount is gone or busy.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, ImageData, MouseEvent, Window};

use crate::core::PixelBuffer;
use crate::domain::{RippleConfig, DEFAULT_ALT_TEXT};
use crate::error::{Result, RippleError};
use crate::simulation::{client_to_canvas, ClientRect, Lifecycle, Phase, PerfStats, RippleCore, TickScheduler};
use crate::systems::logo_rect;

const POINTER_EVENTS: [&str; 2] = ["pointermove", "click"];
const ENTER_EVENT: &str = "pointerenter";

fn dom_err(err: JsValue) -> RippleError {
    RippleError::Canvas(format!("{err:?}"))
}

/// `setInterval` on the window, firing the mount's tick closure
struct IntervalScheduler {
    window: Window,
    tick: Closure<dyn FnMut()>,
}

impl TickScheduler for IntervalScheduler {
    type Handle = i32;

    fn schedule(&mut self, period_ms: i32) -> Result<i32> {
        self.window
            .set_interval_with_callback_and_timeout_and_arguments_0(self.tick.as_ref().unchecked_ref(), period_ms)
            .map_err(dom_err)
    }

    fn cancel(&mut self, handle: i32) {
        self.window.clear_interval_with_handle(handle);
    }
}

struct ImageSlot {
    element: HtmlImageElement,
    src: String,
    on_load: Closure<dyn FnMut()>,
    on_error: Closure<dyn FnMut()>,
}

impl ImageSlot {
    fn new(element: HtmlImageElement, src: &str, weak: &Weak<RefCell<Mount>>) -> Self {
        let on_load = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move || with_mount(&weak, Mount::asset_loaded)) as Box<dyn FnMut()>)
        };
        let on_error = {
            let src = src.to_string();
            Closure::wrap(Box::new(move || {
                log::warn!("ripple image failed to load, staying in placeholder: {src}");
            }) as Box<dyn FnMut()>)
        };
        Self { element, src: src.to_string(), on_load, on_error }
    }

    /// Install handlers, then start the request
    fn attach(&self) {
        self.element.set_onload(Some(self.on_load.as_ref().unchecked_ref()));
        self.element.set_onerror(Some(self.on_error.as_ref().unchecked_ref()));
        // Needed to read the composite back with getImageData
        self.element.set_cross_origin(Some("anonymous"));
        self.element.set_src(&self.src);
    }

    fn detach(&self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
    }
}

type Listener = (&'static str, Closure<dyn FnMut(MouseEvent)>);

struct Mount {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    // Detached; images are decoded here so the visible canvas only ever
    // receives complete frames
    scratch: CanvasRenderingContext2d,
    config: RippleConfig,
    background: ImageSlot,
    logo: ImageSlot,
    listeners: Vec<Listener>,
    lifecycle: Lifecycle<IntervalScheduler>,
    core: Option<RippleCore>,
}

/// Run `f` on the mount if it is still alive and not already borrowed
fn with_mount(weak: &Weak<RefCell<Mount>>, f: impl FnOnce(&mut Mount)) {
    let Some(mount) = weak.upgrade() else { return };
    let Ok(mut mount) = mount.try_borrow_mut() else { return };
    f(&mut mount);
}

impl Mount {
    fn asset_loaded(&mut self) {
        if !self.lifecycle.asset_loaded() {
            return;
        }
        if let Err(err) = self.start() {
            log::warn!("ripple effect failed to start: {err}");
        }
    }

    fn start(&mut self) -> Result<()> {
        let side = self.config.canvas_size;
        let background = capture(&self.scratch, &self.background.element, side, side)?;
        let (_, _, logo_side) = logo_rect(&self.config, side, side);
        let logo = capture(&self.scratch, &self.logo.element, logo_side, logo_side)?;

        let core = RippleCore::new(self.config.clone(), &background, &logo)?;
        self.lifecycle.start(core.tick_interval_ms())?;
        if let Err(err) = blit(&self.ctx, core.pixels()) {
            log::trace!("first blit skipped: {err}");
        }
        self.core = Some(core);

        self.canvas.set_attribute("data-state", "running").map_err(dom_err)?;
        log::info!("ripple effect running at {side}x{side}");
        Ok(())
    }

    fn tick(&mut self) {
        if !self.lifecycle.is_running() {
            return;
        }
        let Some(core) = self.core.as_mut() else { return };
        core.tick();
        if let Err(err) = blit(&self.ctx, core.pixels()) {
            log::trace!("blit skipped: {err}");
        }
    }

    fn pointer(&mut self, event: &MouseEvent) {
        if !self.lifecycle.is_running() {
            return;
        }
        let Some(core) = self.core.as_mut() else { return };
        let r = self.canvas.get_bounding_client_rect();
        let rect = ClientRect { left: r.left(), top: r.top(), width: r.width(), height: r.height() };
        let client = (event.client_x() as f64, event.client_y() as f64);
        if let Some((x, y)) = client_to_canvas(client.0, client.1, rect, core.width(), core.height()) {
            core.pointer_at(x, y);
        }
    }

    fn pointer_enter(&mut self) {
        if !self.lifecycle.is_running() {
            return;
        }
        if let Some(core) = self.core.as_mut() {
            core.pointer_enter();
        }
    }

    fn teardown(&mut self) {
        if !self.lifecycle.teardown() {
            return;
        }
        for (event, listener) in self.listeners.iter() {
            if let Err(err) = self
                .canvas
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                log::trace!("removing {event} listener failed: {err:?}");
            }
        }
        self.listeners.clear();
        self.background.detach();
        self.logo.detach();
        self.core = None;
        log::debug!("ripple effect torn down");
    }
}

/// Draw `image` scaled to `width x height` and read the pixels back
fn capture(
    ctx: &CanvasRenderingContext2d,
    image: &HtmlImageElement,
    width: u32,
    height: u32,
) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Ok(PixelBuffer::new(width, height));
    }
    let (w, h) = (width as f64, height as f64);
    ctx.clear_rect(0.0, 0.0, w, h);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, w, h)
        .map_err(dom_err)?;
    let data = ctx.get_image_data(0.0, 0.0, w, h).map_err(dom_err)?;
    PixelBuffer::from_rgba(width, height, data.data().0)
}

/// One putImageData for the whole frame
fn blit(ctx: &CanvasRenderingContext2d, pixels: &PixelBuffer) -> Result<()> {
    let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_bytes()), pixels.width(), pixels.height())
        .map_err(dom_err)?;
    ctx.put_image_data(&data, 0.0, 0.0).map_err(dom_err)
}

/// 2d context on a canvas that is never attached to the document
fn scratch_context(document: &Document, side: u32) -> Result<CanvasRenderingContext2d> {
    let canvas = document
        .create_element("canvas")
        .map_err(dom_err)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| RippleError::Canvas("scratch element is not a canvas".into()))?;
    canvas.set_width(side);
    canvas.set_height(side);
    context_2d(&canvas)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(dom_err)?
        .ok_or_else(|| RippleError::Canvas("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| RippleError::Canvas("context is not 2d".into()))
}

/// Ripple effect mounted on a canvas element.
///
/// Stays in the loading placeholder (`data-state="loading"`) until both
/// images have loaded, then ticks at the configured rate until `destroy()`
/// or until the handle is freed.
#[wasm_bindgen]
pub struct RippleCanvas {
    mount: Rc<RefCell<Mount>>,
}

#[wasm_bindgen]
impl RippleCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        background_src: &str,
        logo_src: &str,
        alt: Option<String>,
        canvas_size: Option<u32>,
        config_json: Option<String>,
    ) -> std::result::Result<RippleCanvas, JsValue> {
        Ok(Self::mount(canvas, background_src, logo_src, alt, canvas_size, config_json)?)
    }

    /// Cancel the timer, remove listeners and image handlers. Idempotent.
    pub fn destroy(&mut self) {
        if let Ok(mut mount) = self.mount.try_borrow_mut() {
            mount.teardown();
        }
    }

    /// "loading", "running" or "destroyed"
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        let phase = match self.mount.try_borrow() {
            Ok(mount) => mount.lifecycle.phase(),
            Err(_) => return "running".to_string(),
        };
        match phase {
            Phase::Loading { .. } => "loading",
            Phase::Running => "running",
            Phase::TornDown => "destroyed",
        }
        .to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 {
        self.mount
            .try_borrow()
            .ok()
            .and_then(|mount| mount.core.as_ref().map(RippleCore::frame))
            .unwrap_or(0)
    }

    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        if let Ok(mut mount) = self.mount.try_borrow_mut() {
            if let Some(core) = mount.core.as_mut() {
                core.enable_perf_metrics(enabled);
            }
        }
    }

    pub fn get_perf_stats(&self) -> PerfStats {
        self.mount
            .try_borrow()
            .ok()
            .and_then(|mount| mount.core.as_ref().map(RippleCore::get_perf_stats))
            .unwrap_or_default()
    }
}

impl RippleCanvas {
    fn mount(
        canvas: HtmlCanvasElement,
        background_src: &str,
        logo_src: &str,
        alt: Option<String>,
        canvas_size: Option<u32>,
        config_json: Option<String>,
    ) -> Result<Self> {
        let mut config = match config_json {
            Some(json) => RippleConfig::from_json(&json)?,
            None => RippleConfig::default(),
        };
        if let Some(size) = canvas_size {
            config.canvas_size = size;
            config.validate()?;
        }

        let window = web_sys::window().ok_or_else(|| RippleError::Canvas("no window".into()))?;
        let document = window.document().ok_or_else(|| RippleError::Canvas("no document".into()))?;
        let ctx = context_2d(&canvas)?;
        let scratch = scratch_context(&document, config.canvas_size)?;

        canvas.set_width(config.canvas_size);
        canvas.set_height(config.canvas_size);
        let alt = alt.unwrap_or_else(|| DEFAULT_ALT_TEXT.to_string());
        for (name, value) in [("data-state", "loading"), ("role", "img"), ("aria-label", alt.as_str())] {
            canvas.set_attribute(name, value).map_err(dom_err)?;
        }

        let background_img = HtmlImageElement::new().map_err(dom_err)?;
        let logo_img = HtmlImageElement::new().map_err(dom_err)?;

        let mount = Rc::new_cyclic(|weak: &Weak<RefCell<Mount>>| {
            let tick = {
                let weak = weak.clone();
                Closure::wrap(Box::new(move || with_mount(&weak, Mount::tick)) as Box<dyn FnMut()>)
            };

            let mut listeners: Vec<Listener> = Vec::with_capacity(POINTER_EVENTS.len() + 1);
            for event in POINTER_EVENTS {
                let weak = weak.clone();
                let listener = Closure::wrap(Box::new(move |e: MouseEvent| {
                    with_mount(&weak, |m| m.pointer(&e));
                }) as Box<dyn FnMut(MouseEvent)>);
                listeners.push((event, listener));
            }
            let weak_enter = weak.clone();
            let enter = Closure::wrap(Box::new(move |_: MouseEvent| {
                with_mount(&weak_enter, Mount::pointer_enter);
            }) as Box<dyn FnMut(MouseEvent)>);
            listeners.push((ENTER_EVENT, enter));

            RefCell::new(Mount {
                canvas: canvas.clone(),
                ctx,
                scratch,
                config,
                background: ImageSlot::new(background_img, background_src, weak),
                logo: ImageSlot::new(logo_img, logo_src, weak),
                listeners,
                lifecycle: Lifecycle::new(IntervalScheduler { window, tick }),
                core: None,
            })
        });

        {
            let m = mount.borrow();
            for (event, listener) in m.listeners.iter() {
                canvas
                    .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                    .map_err(dom_err)?;
            }
            m.background.attach();
            m.logo.attach();
        }
        log::debug!("ripple effect mounted, loading {background_src} and {logo_src}");

        Ok(Self { mount })
    }
}

impl Drop for RippleCanvas {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    #[wasm_bindgen_test]
    fn scratch_drawing_never_reaches_the_visible_canvas() {
        let doc = document();
        let visible = doc.create_element("canvas").unwrap().dyn_into::<HtmlCanvasElement>().unwrap();
        visible.set_width(16);
        visible.set_height(16);
        let ctx = context_2d(&visible).unwrap();
        let scratch = scratch_context(&doc, 16).unwrap();

        scratch.set_fill_style_str("#ff0000");
        scratch.fill_rect(0.0, 0.0, 16.0, 16.0);

        let drawn = scratch.get_image_data(0.0, 0.0, 16.0, 16.0).unwrap().data().0;
        assert_eq!(&drawn[..4], &[255, 0, 0, 255]);
        let shown = ctx.get_image_data(0.0, 0.0, 16.0, 16.0).unwrap().data().0;
        assert!(shown.iter().all(|&b| b == 0));

        let scratch_canvas = scratch.canvas().unwrap();
        assert_eq!((scratch_canvas.width(), scratch_canvas.height()), (16, 16));
        assert!(scratch_canvas.parent_node().is_none());
    }

    #[wasm_bindgen_test]
    fn blit_writes_the_whole_frame() {
        let scratch = scratch_context(&document(), 4).unwrap();
        let frame = PixelBuffer::filled(4, 4, [10, 20, 30, 255]);
        blit(&scratch, &frame).unwrap();
        let read = scratch.get_image_data(0.0, 0.0, 4.0, 4.0).unwrap().data().0;
        assert_eq!(read, frame.as_bytes());
    }
}
