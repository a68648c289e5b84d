//! Id allocation and event broadcasting.
//!
//! [`SimContext`] replaces any global simulation manager: the scheduler owns
//! one, hands out agent ids from it and pushes every state change through
//! [`SimContext::emit`].  Subscribers are plain closures, called
//! synchronously in registration order.

use glam::Vec3;

use fw_core::{AgentId, MapId, Tick};

/// A state change broadcast to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    Spawned { agent: AgentId, position: Vec3 },
    Despawned { agent: AgentId },
    PositionChanged { agent: AgentId, old: Vec3, new: Vec3 },
    OrientationChanged { agent: AgentId, old: f32, new: f32 },
    /// Number of other agents within the crowding radius changed.
    CrowdingChanged { agent: AgentId, old: u32, new: u32 },
    DestinationPicked { agent: AgentId, destination: Vec3, walk_back: bool },
    /// A normalization pass completed.  `change` is `None` when the pass
    /// left the field unchanged.
    FieldNormalized { map: MapId, change: Option<f32> },
    FieldConverged { map: MapId },
}

impl SimEvent {
    /// The agent the event concerns, if any.
    pub fn agent(&self) -> Option<AgentId> {
        match *self {
            SimEvent::Spawned { agent, .. }
            | SimEvent::Despawned { agent }
            | SimEvent::PositionChanged { agent, .. }
            | SimEvent::OrientationChanged { agent, .. }
            | SimEvent::CrowdingChanged { agent, .. }
            | SimEvent::DestinationPicked { agent, .. } => Some(agent),
            SimEvent::FieldNormalized { .. } | SimEvent::FieldConverged { .. } => None,
        }
    }
}

/// Handle returned by [`SimContext::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(Tick, &SimEvent)>;

pub struct SimContext {
    next_agent: u32,
    next_sub:   u64,
    tick:       Tick,
    listeners:  Vec<(Subscription, Listener)>,
}

impl SimContext {
    /// A context whose first allocated id is `first_free`.
    pub fn new(first_free: AgentId) -> Self {
        Self { next_agent: first_free.0, next_sub: 0, tick: Tick::ZERO, listeners: Vec::new() }
    }

    /// Allocate a fresh agent id.  Ids are never reused.
    pub fn next_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent);
        self.next_agent = id.next().0;
        id
    }

    /// The id [`next_id`](Self::next_id) will return next.
    #[inline]
    pub fn peek_id(&self) -> AgentId {
        AgentId(self.next_agent)
    }

    /// Tick stamped on emitted events.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub(crate) fn set_tick(&mut self, tick: Tick) {
        self.tick = tick;
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Tick, &SimEvent) + 'static) -> Subscription {
        let sub = Subscription(self.next_sub);
        self.next_sub += 1;
        self.listeners.push((sub, Box::new(listener)));
        sub
    }

    /// Remove a listener.  Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != sub);
        self.listeners.len() != before
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `event` to every listener.
    pub fn emit(&mut self, event: SimEvent) {
        let tick = self.tick;
        for (_, listener) in &mut self.listeners {
            listener(tick, &event);
        }
    }
}

impl std::fmt::Debug for SimContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimContext")
            .field("next_agent", &self.next_agent)
            .field("tick", &self.tick)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
