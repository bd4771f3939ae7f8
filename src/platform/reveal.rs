//! Scroll reveal via `IntersectionObserver`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use super::{REVEAL_CLASS, REVEAL_SELECTOR};
use crate::error::{ConfigError, Result};
use crate::reveal::{IntersectionHost, RegionId, ViewportRevealTracker};

/// Attribute carrying the region id back from observer entries
const REGION_ATTR: &str = "data-reveal-id";

/// One observer shared by every region
pub struct ObserverHost {
    observer: IntersectionObserver,
    elements: HashMap<RegionId, Element>,
}

impl IntersectionHost for ObserverHost {
    type Element = Element;

    fn observe(&mut self, id: RegionId, element: &Element) -> bool {
        if !element.is_connected() {
            return false;
        }
        let _ = element.set_attribute(REGION_ATTR, &id.raw().to_string());
        self.observer.observe(element);
        self.elements.insert(id, element.clone());
        true
    }

    fn unobserve(&mut self, id: RegionId) {
        if let Some(element) = self.elements.remove(&id) {
            self.observer.unobserve(&element);
        }
    }
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

pub struct RevealBinding {
    tracker: ViewportRevealTracker,
    host: ObserverHost,
    _callback: ObserverCallback,
}

impl RevealBinding {
    pub fn mount(document: &Document, threshold: f32) -> Result<Rc<RefCell<Self>>> {
        let tracker = ViewportRevealTracker::new(threshold)?;

        // The observer callback needs the binding, which needs the observer
        let slot: Rc<RefCell<Weak<RefCell<Self>>>> = Rc::new(RefCell::new(Weak::new()));
        let callback = {
            let slot = Rc::clone(&slot);
            ObserverCallback::new(move |entries: js_sys::Array, _: IntersectionObserver| {
                let Some(binding) = slot.borrow().upgrade() else {
                    return;
                };
                let mut binding = binding.borrow_mut();
                for entry in entries.iter() {
                    binding.on_entry(&entry.unchecked_into::<IntersectionObserverEntry>());
                }
            })
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(f64::from(threshold)));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|e| ConfigError::Unsupported(format!("IntersectionObserver: {:?}", e)))?;

        let binding = Rc::new(RefCell::new(Self {
            tracker,
            host: ObserverHost {
                observer,
                elements: HashMap::new(),
            },
            _callback: callback,
        }));
        *slot.borrow_mut() = Rc::downgrade(&binding);

        let elements = select_all(document, REVEAL_SELECTOR);
        {
            let mut b = binding.borrow_mut();
            let Self { tracker, host, .. } = &mut *b;
            let observed = tracker.observe(elements, host);
            log::info!("Observing {} reveal regions", observed.len());
        }
        Ok(binding)
    }

    fn on_entry(&mut self, entry: &IntersectionObserverEntry) {
        let target = entry.target();
        let Some(id) = target
            .get_attribute(REGION_ATTR)
            .and_then(|raw| raw.parse().ok())
            .map(RegionId::new)
        else {
            return;
        };
        let fraction = self
            .tracker
            .sample_fraction(entry.is_intersecting(), entry.intersection_ratio() as f32);
        if self.tracker.on_intersection(id, fraction, &mut self.host).is_some() {
            let _ = target.class_list().add_1(REVEAL_CLASS);
        }
    }

    pub fn dispose(&mut self) {
        self.tracker.dispose(&mut self.host);
        self.host.observer.disconnect();
    }
}

/// Elements matching `selector`; entries that are not elements come back as `None`
fn select_all(document: &Document, selector: &str) -> Vec<Option<Element>> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .map(|i| list.get(i).and_then(|node| node.dyn_into::<Element>().ok()))
        .collect()
}
