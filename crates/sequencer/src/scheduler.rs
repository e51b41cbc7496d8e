//! Registry of live animation sequences.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::host::HostClock;
use crate::sequence::{Sequence, SequenceHandle};

/// Identity of a sequence, unique for the lifetime of its scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(pub u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq#{}", self.0)
    }
}

#[derive(Default)]
pub(crate) struct Registry {
    last_id: u64,
    live: BTreeMap<SequenceId, SequenceHandle>,
}

impl Registry {
    fn allocate(&mut self) -> SequenceId {
        self.last_id += 1;
        SequenceId(self.last_id)
    }

    /// Removes `id` without cancelling it. Returns whether it was live.
    pub(crate) fn complete(&mut self, id: SequenceId) -> bool {
        self.live.remove(&id).is_some()
    }
}

/// Creates sequences and tracks the ones still live.
///
/// Cloning yields another handle onto the same registry. Identities are
/// allocated monotonically and never reused.
#[derive(Clone)]
pub struct AnimationScheduler {
    registry: Rc<RefCell<Registry>>,
    host: Rc<dyn HostClock>,
}

impl AnimationScheduler {
    pub fn new(host: Rc<dyn HostClock>) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            host,
        }
    }

    pub fn host(&self) -> &Rc<dyn HostClock> {
        &self.host
    }

    /// Allocates an identity and registers a new idle sequence under it.
    pub fn create_sequence(&self) -> Sequence {
        let mut registry = self.registry.borrow_mut();
        let id = registry.allocate();
        let sequence = Sequence::new(id, Rc::clone(&self.host), Rc::downgrade(&self.registry));
        registry.live.insert(id, sequence.handle());

        trace!(target: "sequencer", %id, "sequence created");
        sequence
    }

    /// Cancels and deregisters `id`. Unknown identities are ignored, since
    /// concurrent cleanup paths routinely cancel the same sequence twice.
    pub fn cancel_sequence(&self, id: SequenceId) -> bool {
        let handle = self.registry.borrow_mut().live.remove(&id);

        match handle {
            Some(handle) => {
                handle.cancel();
                debug!(target: "sequencer", %id, "sequence cancelled");
                true
            }
            None => {
                trace!(target: "sequencer", %id, "cancel for unknown sequence ignored");
                false
            }
        }
    }

    /// Deregisters `id` without cancelling it.
    pub fn complete_sequence(&self, id: SequenceId) -> bool {
        self.registry.borrow_mut().complete(id)
    }

    /// Cancels every live sequence and returns how many there were.
    pub fn cancel_all(&self) -> usize {
        let handles: Vec<SequenceHandle> = std::mem::take(&mut self.registry.borrow_mut().live)
            .into_values()
            .collect();

        for handle in &handles {
            handle.cancel();
        }
        if !handles.is_empty() {
            debug!(target: "sequencer", count = handles.len(), "cancelled all sequences");
        }
        handles.len()
    }

    pub fn is_live(&self, id: SequenceId) -> bool {
        self.registry.borrow().live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.registry.borrow().live.len()
    }

    pub fn live_ids(&self) -> Vec<SequenceId> {
        self.registry.borrow().live.keys().copied().collect()
    }
}

impl fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("live", &self.live_ids())
            .finish()
    }
}
