//! Card tilt via mouse events

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use super::{Listener, TILT_SELECTOR};
use crate::error::Result;
use crate::settings::TiltConfig;
use crate::tilt::{BoundingBox, CardId, PointerTiltTracker, Tilt};

/// Listeners for every tilt card; dropping removes them
pub struct TiltBinding {
    _tracker: Rc<RefCell<PointerTiltTracker>>,
    _listeners: Vec<Listener>,
}

impl TiltBinding {
    pub fn mount(document: &Document, config: &TiltConfig) -> Result<Self> {
        let tracker = Rc::new(RefCell::new(PointerTiltTracker::from_config(config)?));
        let perspective = config.perspective_px;
        let mut listeners = Vec::new();

        if let Ok(list) = document.query_selector_all(TILT_SELECTOR) {
            for i in 0..list.length() {
                let Some(card) = list.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                    continue;
                };
                let id = tracker.borrow_mut().register();
                listeners.push(on_move(&card, id, &tracker, perspective));
                listeners.push(on_leave(&card, id, &tracker, perspective));
            }
        }

        log::info!("Tilt enabled on {} cards", tracker.borrow().card_count());
        Ok(Self {
            _tracker: tracker,
            _listeners: listeners,
        })
    }
}

fn on_move(
    card: &HtmlElement,
    id: CardId,
    tracker: &Rc<RefCell<PointerTiltTracker>>,
    perspective: f32,
) -> Listener {
    let tracker = Rc::clone(tracker);
    let el = card.clone();
    Listener::new(card, "mousemove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let rect = el.get_bounding_client_rect();
        let bbox = BoundingBox::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        );
        let tilt = tracker
            .borrow_mut()
            .on_pointer_move(id, event.client_x() as f32, event.client_y() as f32, bbox);
        if let Some(tilt) = tilt {
            apply(&el, tilt, perspective);
        }
    })
}

fn on_leave(
    card: &HtmlElement,
    id: CardId,
    tracker: &Rc<RefCell<PointerTiltTracker>>,
    perspective: f32,
) -> Listener {
    let tracker = Rc::clone(tracker);
    let el = card.clone();
    Listener::new(card, "mouseleave", move |_| {
        if let Some(tilt) = tracker.borrow_mut().on_pointer_leave(id) {
            apply(&el, tilt, perspective);
        }
    })
}

fn apply(el: &Element, tilt: Tilt, perspective: f32) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_property("transform", &tilt.to_css(perspective));
    }
}
