//! Hero scene: CSS 3D renderer and animation frame loop

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use super::Listener;
use crate::device::DeviceProfileSelector;
use crate::error::{ConfigError, Result};
use crate::scene::{Camera, EntityId, Frame, Renderer, SceneAnimator, portfolio_scene};
use crate::settings::DeviceConfig;

/// Renders each entity as an absolutely positioned node with a 3D transform
pub struct CssRenderer {
    container: HtmlElement,
    nodes: HashMap<EntityId, HtmlElement>,
    shown: HashSet<EntityId>,
    /// Pixels per scene unit at the origin plane
    unit_px: f32,
}

impl CssRenderer {
    pub fn new(
        document: &Document,
        container: HtmlElement,
        animator: &SceneAnimator,
    ) -> Result<Self> {
        let mut nodes = HashMap::new();
        for (id, entity) in animator.entities() {
            let node = document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                .ok_or_else(|| ConfigError::Unsupported("cannot create scene nodes".into()))?;
            let _ = node.set_attribute("data-scene-entity", &id.0.to_string());
            node.set_class_name(&format!("scene-entity scene-{}", entity.kind.as_str()));
            node.set_title(&entity.name);
            let style = node.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("left", "50%");
            let _ = style.set_property("top", "50%");
            let _ = style.set_property("display", "none");
            let _ = style.set_property("background-color", &entity.css_color());
            let _ = container.append_child(&node);
            nodes.insert(id, node);
        }

        let style = container.style();
        let _ = style.set_property("position", "relative");
        let _ = style.set_property("transform-style", "preserve-3d");

        Ok(Self {
            container,
            nodes,
            shown: HashSet::new(),
            unit_px: 100.0,
        })
    }

    fn set_shown(&mut self, id: EntityId, shown: bool) {
        let changed = if shown { self.shown.insert(id) } else { self.shown.remove(&id) };
        if changed {
            if let Some(node) = self.nodes.get(&id) {
                let _ = node.style().set_property("display", if shown { "block" } else { "none" });
            }
        }
    }

    fn remove_nodes(&mut self) {
        for node in self.nodes.values() {
            node.remove();
        }
        self.nodes.clear();
        self.shown.clear();
    }
}

impl Renderer for CssRenderer {
    fn configure_camera(&mut self, camera: &Camera) {
        // Pinhole camera: CSS perspective is the focal length for this FOV
        let half_height = self.container.client_height().max(1) as f32 / 2.0;
        let focal_px = half_height / (camera.field_of_view.to_radians() / 2.0).tan();
        self.unit_px = focal_px / camera.position.z.max(0.01);
        let _ = self
            .container
            .style()
            .set_property("perspective", &format!("{}px", focal_px));
    }

    fn submit(&mut self, frame: &Frame) {
        let visible: HashSet<EntityId> = frame.poses.iter().map(|p| p.id).collect();
        let ids: Vec<EntityId> = self.nodes.keys().copied().collect();
        for id in ids {
            self.set_shown(id, visible.contains(&id));
        }

        let u = self.unit_px;
        for entity in &frame.poses {
            let Some(node) = self.nodes.get(&entity.id) else {
                continue;
            };
            let p = entity.pose.position;
            let r = entity.pose.rotation;
            let s = entity.pose.scale;
            let transform = format!(
                "translate(-50%, -50%) translate3d({}px, {}px, {}px) \
                 rotateX({}rad) rotateY({}rad) rotateZ({}rad) scale3d({}, {}, {})",
                p.x * u,
                -p.y * u,
                p.z * u,
                r.x,
                r.y,
                r.z,
                s.x,
                s.y,
                s.z,
            );
            let _ = node.style().set_property("transform", &transform);
        }
    }
}

/// Animator, renderer and frame loop for the hero scene
pub struct SceneBinding {
    animator: SceneAnimator,
    renderer: CssRenderer,
    selector: DeviceProfileSelector,
    start_ms: Option<f64>,
    raf_handle: Option<i32>,
    frame_callback: Option<Closure<dyn FnMut(f64)>>,
    _resize: Option<Listener>,
}

impl SceneBinding {
    pub fn mount(
        document: &Document,
        container: Element,
        config: &DeviceConfig,
    ) -> Result<Rc<RefCell<Self>>> {
        let window =
            web_sys::window().ok_or_else(|| ConfigError::Unsupported("no window".into()))?;
        let container = container.dyn_into::<HtmlElement>().map_err(|_| {
            ConfigError::Unsupported("scene container is not an HTML element".into())
        })?;

        let mut selector = DeviceProfileSelector::new(*config)?;
        let profile = selector.update(viewport_width(&window)).unwrap_or_default();
        let animator = SceneAnimator::with_entities(profile, portfolio_scene());
        let renderer = CssRenderer::new(document, container, &animator)?;

        let binding = Rc::new(RefCell::new(Self {
            animator,
            renderer,
            selector,
            start_ms: None,
            raf_handle: None,
            frame_callback: None,
            _resize: None,
        }));

        let weak = Rc::downgrade(&binding);
        let resize = Listener::new(&window, "resize", move |_| {
            let Some(binding) = weak.upgrade() else {
                return;
            };
            let Some(window) = web_sys::window() else {
                return;
            };
            let mut b = binding.borrow_mut();
            if let Some(profile) = b.selector.update(viewport_width(&window)) {
                b.animator.set_profile(profile);
            }
        });

        let weak = Rc::downgrade(&binding);
        let frame_callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(binding) = weak.upgrade() {
                Self::on_frame(&binding, time);
            }
        });

        {
            let mut b = binding.borrow_mut();
            b._resize = Some(resize);
            b.frame_callback = Some(frame_callback);
        }
        Self::request_frame(&binding);
        log::info!("Hero scene mounted ({} entities)", binding.borrow().animator.entity_count());
        Ok(binding)
    }

    fn request_frame(binding: &Rc<RefCell<Self>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut b = binding.borrow_mut();
        let requested = match b.frame_callback.as_ref() {
            Some(callback) => window.request_animation_frame(callback.as_ref().unchecked_ref()),
            None => return,
        };
        match requested {
            Ok(handle) => b.raf_handle = Some(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn on_frame(binding: &Rc<RefCell<Self>>, time_ms: f64) {
        {
            let mut b = binding.borrow_mut();
            b.raf_handle = None;
            let start = *b.start_ms.get_or_insert(time_ms);
            let elapsed = (time_ms - start) / 1000.0;
            let Self { animator, renderer, .. } = &mut *b;
            animator.tick(elapsed, renderer);
        }
        Self::request_frame(binding);
    }

    /// Cancel the frame loop and resize listener, and remove scene nodes
    pub fn stop(&mut self) {
        if let (Some(handle), Some(window)) = (self.raf_handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
        self.frame_callback = None;
        self._resize = None;
        self.renderer.remove_nodes();
    }
}

fn viewport_width(window: &web_sys::Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(f64::INFINITY)
}
