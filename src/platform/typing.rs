//! Typing effect bound to a text element

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use web_sys::Element;

use super::timers::BrowserTimers;
use crate::error::Result;
use crate::settings::TypingConfig;
use crate::timer::TimerId;
use crate::typing::TypingEffect;

pub struct TypingBinding {
    effect: TypingEffect,
    timers: BrowserTimers,
    element: Element,
}

impl TypingBinding {
    pub fn mount(element: Element, config: &TypingConfig) -> Result<Rc<RefCell<Self>>> {
        let effect = TypingEffect::new(config)?;

        let binding = Rc::new_cyclic(|weak: &Weak<RefCell<Self>>| {
            let weak = weak.clone();
            let timers = BrowserTimers::new(move |id| {
                if let Some(binding) = weak.upgrade() {
                    binding.borrow_mut().on_timer(id);
                }
            });
            RefCell::new(Self {
                effect,
                timers,
                element,
            })
        });

        {
            let mut b = binding.borrow_mut();
            b.render();
            let Self { effect, timers, .. } = &mut *b;
            effect.start(timers);
        }
        log::info!("Typing effect mounted ({} phrases)", config.phrases.len());
        Ok(binding)
    }

    fn on_timer(&mut self, id: TimerId) {
        self.timers.acknowledge(id);
        if self.effect.fire(id, &mut self.timers) {
            self.render();
        }
    }

    fn render(&self) {
        self.element.set_text_content(Some(self.effect.displayed()));
    }

    pub fn teardown(&mut self) {
        self.effect.teardown(&mut self.timers);
        log::debug!("Typing effect torn down ({} timers left)", self.timers.pending_count());
    }
}
