//! `setTimeout`-backed timer host

use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

use crate::timer::{TimerHost, TimerId};

/// Schedules wake-ups on the browser task queue
///
/// Fired ids are delivered to `on_fire`. A fired `Timeout` cannot be dropped
/// from inside its own callback, so it is parked in `retired` and released on
/// the next delivery.
pub struct BrowserTimers {
    next_id: u64,
    pending: HashMap<TimerId, Timeout>,
    retired: Vec<Timeout>,
    on_fire: Rc<dyn Fn(TimerId)>,
}

impl BrowserTimers {
    pub fn new(on_fire: impl Fn(TimerId) + 'static) -> Self {
        Self {
            next_id: 0,
            pending: HashMap::new(),
            retired: Vec::new(),
            on_fire: Rc::new(on_fire),
        }
    }

    /// Mark `id` as delivered; call first thing from the fire handler
    pub fn acknowledge(&mut self, id: TimerId) {
        self.retired.clear();
        if let Some(timeout) = self.pending.remove(&id) {
            self.retired.push(timeout);
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl TimerHost for BrowserTimers {
    fn schedule(&mut self, delay_ms: u32) -> TimerId {
        self.next_id += 1;
        let id = TimerId::new(self.next_id);
        let on_fire = Rc::clone(&self.on_fire);
        self.pending.insert(id, Timeout::new(delay_ms, move || on_fire(id)));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        // Dropping a Timeout clears it
        self.pending.remove(&id);
    }
}
