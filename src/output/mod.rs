pub mod console;

use parking_lot::Mutex;

use crate::probe::{Outcome, ProbeObserver, ProbeResult};

pub use console::{Console, ConsoleReporter, Tone};

/// Keeps every event, in completion order.
pub struct CollectingObserver<C, D> {
    events: Mutex<Vec<ProbeResult<C, D>>>,
}

impl<C: Clone, D: Clone> CollectingObserver<C, D> {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    pub fn events(&self) -> Vec<ProbeResult<C, D>> {
        self.events.lock().clone()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.events.lock().iter().filter(|e| e.outcome() == outcome).count()
    }
}

impl<C: Clone, D: Clone> Default for CollectingObserver<C, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> ProbeObserver<C, D> for CollectingObserver<C, D>
where
    C: Clone + Send + Sync,
    D: Clone + Send + Sync,
{
    fn on_event(&self, result: &ProbeResult<C, D>) {
        self.events.lock().push(result.clone());
    }
}
