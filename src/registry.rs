// SPDX-License-Identifier: MPL-2.0
//! Notification registry: the single source of truth for request state.
//!
//! The registry is a synchronous state machine. It performs no locking of
//! its own; the owning [`NotificationCenter`](crate::center::NotificationCenter)
//! wraps it in a mutex and holds the lock for the duration of each mutation,
//! including promotion bookkeeping. Mutations return *effects* (timers to
//! start or cancel, kinds whose active set changed) that the owner applies:
//! timer starts inside the same critical section, host notification after
//! the lock is released.

use std::collections::VecDeque;
use std::time::Duration;

use log::debug;

use crate::config::DurationDefaults;
use crate::policy::DisplayPolicy;
use crate::request::{
    Kind, Notification, NotificationAction, NotificationId, NotificationRequest, RequestState,
};

/// One kind's scheduling lane: its policy, active set, and pending queue.
#[derive(Debug)]
struct Lane {
    policy: DisplayPolicy,
    /// Currently active notifications, oldest first.
    active: Vec<Notification>,
    /// Enqueued notifications waiting for capacity, oldest first.
    pending: VecDeque<Notification>,
}

impl Lane {
    fn new(policy: DisplayPolicy) -> Self {
        Self {
            policy,
            active: Vec::new(),
            pending: VecDeque::new(),
        }
    }
}

/// Timers the owner must start, as `(id, delay)` pairs.
pub(crate) type TimerStarts = Vec<(NotificationId, Duration)>;

/// Result of an enqueue, applied by the owner.
#[derive(Debug)]
pub(crate) struct EnqueueEffect {
    /// ID assigned to the new request.
    pub id: NotificationId,
    /// Dismissal timers to start inside the same critical section.
    pub timers: TimerStarts,
    /// Whether the kind's active set changed (i.e. the request was promoted).
    pub active_changed: bool,
}

/// Result of a dismissal, applied by the owner.
#[derive(Debug, Default)]
pub(crate) struct DismissEffect {
    /// Whether a live request was actually removed.
    pub removed: bool,
    /// Kind of the removed request, if any.
    pub kind: Option<Kind>,
    /// Timers to cancel (the removed request's, when it was active).
    pub cancel_timers: Vec<NotificationId>,
    /// Timers to start for requests promoted by the removal.
    pub timers: TimerStarts,
    /// Whether the kind's active set changed.
    pub active_changed: bool,
}

/// Result of a bulk dismissal, applied by the owner.
#[derive(Debug, Default)]
pub(crate) struct DismissAllEffect {
    /// Timers to cancel for every removed active request.
    pub cancel_timers: Vec<NotificationId>,
    /// Kinds whose active set changed.
    pub changed: Vec<Kind>,
}

/// Mutable request state for both kinds.
///
/// Invariant: per kind, `active.len() <= policy.capacity()` at every
/// observable instant; promotion is strictly FIFO by enqueue order.
#[derive(Debug)]
pub(crate) struct Registry {
    toast: Lane,
    snackbar: Lane,
    durations: DurationDefaults,
}

impl Registry {
    pub(crate) fn new(
        toast_policy: DisplayPolicy,
        snackbar_policy: DisplayPolicy,
        durations: DurationDefaults,
    ) -> Self {
        Self {
            toast: Lane::new(toast_policy),
            snackbar: Lane::new(snackbar_policy),
            durations,
        }
    }

    fn lane(&self, kind: Kind) -> &Lane {
        match kind {
            Kind::Toast => &self.toast,
            Kind::Snackbar => &self.snackbar,
        }
    }

    fn lane_mut(&mut self, kind: Kind) -> &mut Lane {
        match kind {
            Kind::Toast => &mut self.toast,
            Kind::Snackbar => &mut self.snackbar,
        }
    }

    /// Enqueues a request: assigns its ID and creation time, inserts it as
    /// pending, and immediately attempts promotion.
    ///
    /// Never drops a request; beyond capacity it simply stays pending.
    pub(crate) fn enqueue(&mut self, request: NotificationRequest) -> EnqueueEffect {
        let duration = request
            .duration()
            .unwrap_or_else(|| self.durations.for_severity(request.severity()));
        let posted = Notification::post(request, duration);
        let id = posted.id();
        let kind = posted.kind();

        debug!("enqueue {} ({:?}, {:?})", id, kind, posted.severity());
        let lane = self.lane_mut(kind);
        lane.pending.push_back(posted);

        let timers = Self::promote(lane);
        // Promotion may activate an `Indefinite` request, which starts no
        // timer, so active membership is checked directly.
        let active_changed = lane.active.iter().any(|n| n.id() == id);
        EnqueueEffect {
            id,
            timers,
            active_changed,
        }
    }

    /// Dismisses a request by ID. Idempotent: unknown or already-removed
    /// IDs are a no-op.
    pub(crate) fn dismiss(&mut self, id: NotificationId) -> DismissEffect {
        for kind in [Kind::Toast, Kind::Snackbar] {
            let lane = self.lane_mut(kind);

            if let Some(pos) = lane.active.iter().position(|n| n.id() == id) {
                let gone = lane.active.remove(pos);
                debug!("dismiss {} (active {:?}) after {:?}", id, kind, gone.age());
                let timers = Self::promote(lane);
                return DismissEffect {
                    removed: true,
                    kind: Some(kind),
                    cancel_timers: vec![id],
                    timers,
                    active_changed: true,
                };
            }

            if let Some(pos) = lane.pending.iter().position(|n| n.id() == id) {
                debug!("dismiss {} (pending {:?})", id, kind);
                lane.pending.remove(pos);
                // Pending requests have no timer and never held a slot, so
                // removal has no promotion side effects.
                return DismissEffect {
                    removed: true,
                    kind: Some(kind),
                    ..DismissEffect::default()
                };
            }
        }

        DismissEffect::default()
    }

    /// Dismisses every active and pending request, optionally filtered by
    /// kind. Used for screen or navigation teardown.
    pub(crate) fn dismiss_all(&mut self, kind: Option<Kind>) -> DismissAllEffect {
        let mut effect = DismissAllEffect::default();
        let kinds: &[Kind] = match kind {
            Some(Kind::Toast) => &[Kind::Toast],
            Some(Kind::Snackbar) => &[Kind::Snackbar],
            None => &[Kind::Toast, Kind::Snackbar],
        };

        for &kind in kinds {
            let lane = self.lane_mut(kind);
            if !lane.active.is_empty() {
                effect
                    .cancel_timers
                    .extend(lane.active.iter().map(Notification::id));
                effect.changed.push(kind);
            }
            lane.active.clear();
            lane.pending.clear();
        }

        effect
    }

    /// Promotes pending requests while capacity remains, oldest first.
    /// Returns the dismissal timers to start for finite-duration promotions.
    fn promote(lane: &mut Lane) -> TimerStarts {
        let mut timers = TimerStarts::new();
        while lane.active.len() < lane.policy.capacity() {
            let Some(next) = lane.pending.pop_front() else {
                break;
            };
            debug!("promote {} to active", next.id());
            if let Some(delay) = next.duration().finite() {
                timers.push((next.id(), delay));
            }
            lane.active.push(next);
        }
        timers
    }

    /// Read-only snapshot of the active set for a kind, oldest first.
    pub(crate) fn active_snapshot(&self, kind: Kind) -> Vec<Notification> {
        self.lane(kind).active.clone()
    }

    pub(crate) fn active_count(&self, kind: Kind) -> usize {
        self.lane(kind).active.len()
    }

    pub(crate) fn pending_count(&self, kind: Kind) -> usize {
        self.lane(kind).pending.len()
    }

    /// Returns the state of a request. No tombstones are retained, so
    /// `Removed` covers both dismissed IDs and IDs this registry never saw;
    /// since IDs are never reused, the answer is accurate for any ID a
    /// `show` call once returned.
    pub(crate) fn state_of(&self, id: NotificationId) -> RequestState {
        for kind in [Kind::Toast, Kind::Snackbar] {
            let lane = self.lane(kind);
            if lane.active.iter().any(|n| n.id() == id) {
                return RequestState::Active;
            }
            if lane.pending.iter().any(|n| n.id() == id) {
                return RequestState::Pending;
            }
        }
        RequestState::Removed
    }

    /// Returns a live request's action, if it has one.
    pub(crate) fn action_of(&self, id: NotificationId) -> Option<NotificationAction> {
        self.find(id).and_then(|n| n.action().cloned())
    }

    /// Returns whether a live request may be dismissed by the user.
    pub(crate) fn is_dismissible(&self, id: NotificationId) -> Option<bool> {
        self.find(id).map(Notification::dismissible)
    }

    fn find(&self, id: NotificationId) -> Option<&Notification> {
        for kind in [Kind::Toast, Kind::Snackbar] {
            let lane = self.lane(kind);
            if let Some(n) = lane.active.iter().find(|n| n.id() == id) {
                return Some(n);
            }
            if let Some(n) = lane.pending.iter().find(|n| n.id() == id) {
                return Some(n);
            }
        }
        None
    }
}
