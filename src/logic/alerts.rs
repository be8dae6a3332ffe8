//! Non-fatal alert side channel for data-quality problems found while generating a round.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives data-quality alerts. Alerts never stop round generation.
pub trait AlertSink {
    fn alert(&mut self, message: String);
}

/// Default sink: forwards alerts to the `log` facade as warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAlerts;

impl AlertSink for LogAlerts {
    fn alert(&mut self, message: String) {
        log::warn!("{}", message);
    }
}

/// Collects alerts in memory. Clones share the same buffer, so a caller can keep one handle
/// and give the other to the engine.
#[derive(Clone, Debug, Default)]
pub struct CollectedAlerts(Rc<RefCell<Vec<String>>>);

impl CollectedAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl AlertSink for CollectedAlerts {
    fn alert(&mut self, message: String) {
        self.0.borrow_mut().push(message);
    }
}
