//! Browser platform bindings
//!
//! Connects the pure core to the page:
//! - Typing text via `setTimeout` (gloo `Timeout`)
//! - Reveal regions via `IntersectionObserver`
//! - Card tilt via `mousemove`/`mouseleave`
//! - Scene via `requestAnimationFrame` and CSS 3D transforms
//!
//! Every part mounts independently; a missing element or bad setting only
//! disables that part. `unmount` cancels every timer, observer, listener and
//! frame request.

pub mod reveal;
pub mod scene;
pub mod tilt;
pub mod timers;
pub mod typing;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget};

use crate::settings::MotionSettings;

/// Element that receives the typed text
pub const TYPING_ELEMENT_ID: &str = "typing-text";
/// Regions revealed on scroll
pub const REVEAL_SELECTOR: &str = "[data-reveal]";
/// Class added once a region is revealed
pub const REVEAL_CLASS: &str = "active";
/// Cards that tilt under the pointer
pub const TILT_SELECTOR: &str = ".card-3d";
/// Container for the hero scene
pub const SCENE_ELEMENT_ID: &str = "hero-scene";

/// DOM event listener removed on drop
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Self {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let result =
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        if let Err(e) = result {
            log::warn!("Could not listen for {}: {:?}", event, e);
        }
        Self {
            target: target.clone(),
            event,
            callback,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        let _ = self.target.remove_event_listener_with_callback(self.event, callback);
    }
}

/// Everything mounted on the page
struct App {
    typing: Option<Rc<RefCell<typing::TypingBinding>>>,
    reveal: Option<Rc<RefCell<reveal::RevealBinding>>>,
    tilt: Option<tilt::TiltBinding>,
    scene: Option<Rc<RefCell<scene::SceneBinding>>>,
}

impl App {
    fn mount(document: &Document, settings: &MotionSettings) -> Self {
        let typing = document
            .get_element_by_id(TYPING_ELEMENT_ID)
            .and_then(|el| match typing::TypingBinding::mount(el, &settings.typing) {
                Ok(binding) => Some(binding),
                Err(e) => {
                    log::warn!("Typing effect disabled: {}", e);
                    None
                }
            });

        let reveal = match reveal::RevealBinding::mount(document, settings.reveal_threshold) {
            Ok(binding) => Some(binding),
            Err(e) => {
                log::warn!("Scroll reveal disabled: {}", e);
                None
            }
        };

        let tilt = match tilt::TiltBinding::mount(document, &settings.tilt) {
            Ok(binding) => Some(binding),
            Err(e) => {
                log::warn!("Card tilt disabled: {}", e);
                None
            }
        };

        let scene = document
            .get_element_by_id(SCENE_ELEMENT_ID)
            .and_then(|el| match scene::SceneBinding::mount(document, el, &settings.device) {
                Ok(binding) => Some(binding),
                Err(e) => {
                    log::warn!("Hero scene disabled: {}", e);
                    None
                }
            });

        Self {
            typing,
            reveal,
            tilt,
            scene,
        }
    }

    fn teardown(self) {
        if let Some(typing) = self.typing {
            typing.borrow_mut().teardown();
        }
        if let Some(reveal) = self.reveal {
            reveal.borrow_mut().dispose();
        }
        drop(self.tilt);
        if let Some(scene) = self.scene {
            scene.borrow_mut().stop();
        }
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Install logging and the panic hook
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Err only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Mount every effect on the current document with default settings
#[wasm_bindgen]
pub fn mount() {
    mount_settings(&MotionSettings::default());
}

/// Mount with settings JSON supplied by the page; partial JSON fills defaults
#[wasm_bindgen]
pub fn mount_with_settings(json: &str) -> Result<(), JsValue> {
    let settings =
        MotionSettings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    mount_settings(&settings);
    Ok(())
}

/// Mount (remounting if needed)
fn mount_settings(settings: &MotionSettings) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document; motion effects disabled");
        return;
    };

    unmount();
    let app = App::mount(&document, settings);
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    log::info!("Portfolio FX mounted");
}

/// Cancel all timers, observers, listeners and frame requests
#[wasm_bindgen]
pub fn unmount() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if let Some(app) = app {
        app.teardown();
        log::info!("Portfolio FX unmounted");
    }
}
