//! Interaction State Machine
//!
//! Per-surface event filter driving gesture handlers. Each state maps event
//! predicates to an ordered list of callbacks and a single next state.
//! Supports:
//! - Shared transitions: handlers asking for the same (state, predicate)
//!   append callbacks to one entry
//! - Cursor shapes bound to states
//! - Re-entrant transitions from inside callbacks
//!
//! State `0` ([`START_STATE`]) always exists. States are only ever added.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::error::{FilterError, Result};
use crate::events::{Event, EventKind};
use crate::predicate::EventMatch;

/// Identifier for a state within an event filter
pub type StateId = u32;

/// The permanent idle state
pub const START_STATE: StateId = 0;

/// Pointer cursor shapes a filter can request from its host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorShape {
    #[default]
    Arrow,
    Cross,
    PointingHand,
    OpenHand,
    ClosedHand,
    SizeAll,
}

/// The surface an [`EventFilter`] is installed on
pub trait FilterHost {
    fn set_cursor(&mut self, cursor: CursorShape);
}

/// A transition callback.
///
/// Receives the filter itself so it can override the automatically chosen
/// state with [`EventFilter::transition_to`].
pub type Callback<H> = Rc<dyn Fn(&mut EventFilter<H>, &mut H, &Event)>;

struct Transition<H: ?Sized> {
    callbacks: SmallVec<[Callback<H>; 2]>,
    next_state: StateId,
}

type TransitionTable<H> = IndexMap<EventMatch, Transition<H>, FxBuildHasher>;

/// Event filter state machine
pub struct EventFilter<H: ?Sized> {
    /// Indexed by state id; entries keep registration order
    states: Vec<TransitionTable<H>>,
    cursors: FxHashMap<StateId, CursorShape>,
    current_state: StateId,
    /// Union of every registered predicate's event kinds
    relevant_kinds: FxHashSet<EventKind>,
}

impl<H: ?Sized> EventFilter<H> {
    pub fn new() -> Self {
        Self {
            states: vec![TransitionTable::default()],
            cursors: FxHashMap::default(),
            current_state: START_STATE,
            relevant_kinds: FxHashSet::default(),
        }
    }

    /// Get the current state
    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: StateId) -> bool {
        self.current_state == state
    }

    /// Highest allocated state id
    pub fn max_state(&self) -> StateId {
        (self.states.len() - 1) as StateId
    }

    pub fn contains_state(&self, state: StateId) -> bool {
        (state as usize) < self.states.len()
    }

    /// Whether any registered predicate cares about `kind`
    pub fn is_relevant(&self, kind: EventKind) -> bool {
        self.relevant_kinds.contains(&kind)
    }

    /// Allocate a fresh state with no outgoing transitions
    pub fn new_state(&mut self) -> StateId {
        self.states.push(TransitionTable::default());
        self.max_state()
    }

    /// Register `callback` for `predicate` in `state`.
    ///
    /// An existing entry keeps its next state and gains the callback; an
    /// explicit `next_state` must then agree with it. A new entry leads to
    /// `next_state`, or to a freshly allocated state when none is given.
    /// Returns the resolved next state.
    pub fn try_register_transition<F>(
        &mut self,
        state: StateId,
        predicate: EventMatch,
        callback: F,
        next_state: Option<StateId>,
    ) -> Result<StateId>
    where
        F: Fn(&mut EventFilter<H>, &mut H, &Event) + 'static,
    {
        if !self.contains_state(state) {
            return Err(FilterError::UnknownState(state));
        }
        if let Some(next) = next_state {
            if !self.contains_state(next) {
                return Err(FilterError::UnknownState(next));
            }
        }

        if let Some(entry) = self.states[state as usize].get_mut(&predicate) {
            if let Some(requested) = next_state {
                if requested != entry.next_state {
                    return Err(FilterError::ConflictingTransition {
                        state,
                        existing: entry.next_state,
                        requested,
                    });
                }
            }
            entry.callbacks.push(Rc::new(callback));
            return Ok(entry.next_state);
        }

        let resolved = match next_state {
            Some(next) => next,
            None => self.new_state(),
        };
        self.relevant_kinds.extend(predicate.relevant_kinds());
        let mut callbacks: SmallVec<[Callback<H>; 2]> = SmallVec::new();
        callbacks.push(Rc::new(callback));
        self.states[state as usize].insert(
            predicate,
            Transition {
                callbacks,
                next_state: resolved,
            },
        );
        Ok(resolved)
    }

    /// Same as [`try_register_transition`](Self::try_register_transition).
    ///
    /// # Panics
    ///
    /// On a wiring error (unknown state or conflicting next state).
    pub fn register_transition<F>(
        &mut self,
        state: StateId,
        predicate: EventMatch,
        callback: F,
        next_state: Option<StateId>,
    ) -> StateId
    where
        F: Fn(&mut EventFilter<H>, &mut H, &Event) + 'static,
    {
        match self.try_register_transition(state, predicate, callback, next_state) {
            Ok(next) => next,
            Err(err) => panic!("invalid transition registration: {err}"),
        }
    }

    /// Next state registered for `predicate` in `state`
    pub fn next_state_of(&self, state: StateId, predicate: &EventMatch) -> Option<StateId> {
        self.states
            .get(state as usize)?
            .get(predicate)
            .map(|t| t.next_state)
    }

    /// Number of callbacks sharing the (state, predicate) entry
    pub fn callback_count(&self, state: StateId, predicate: &EventMatch) -> usize {
        self.states
            .get(state as usize)
            .and_then(|table| table.get(predicate))
            .map_or(0, |t| t.callbacks.len())
    }

    /// Associate a cursor shape with each of `states`
    pub fn bind_cursor(&mut self, cursor: CursorShape, states: impl IntoIterator<Item = StateId>) {
        for state in states {
            self.cursors.insert(state, cursor);
        }
    }

    pub fn cursor_for(&self, state: StateId) -> Option<CursorShape> {
        self.cursors.get(&state).copied()
    }
}

impl<H: ?Sized + FilterHost> EventFilter<H> {
    /// Feed one event through the current state.
    ///
    /// Every matching entry first moves the filter to its next state, then
    /// runs its callbacks in registration order. The event is never consumed.
    pub fn dispatch(&mut self, host: &mut H, event: &Event) {
        if !self.relevant_kinds.contains(&event.kind) {
            return;
        }

        // Snapshot so callbacks can freely transition or register.
        let fired: SmallVec<[(StateId, SmallVec<[Callback<H>; 2]>); 2]> = self.states
            [self.current_state as usize]
            .iter()
            .filter(|(predicate, _)| predicate.matches(event))
            .map(|(_, t)| (t.next_state, t.callbacks.clone()))
            .collect();

        for (next, callbacks) in fired {
            self.transition_to(next, host);
            for callback in &callbacks {
                callback(self, host, event);
            }
        }
    }

    /// Move to `state`, applying its bound cursor if any. No-op if unchanged.
    pub fn try_transition_to(&mut self, state: StateId, host: &mut H) -> Result<()> {
        if !self.contains_state(state) {
            return Err(FilterError::UnknownState(state));
        }
        if state == self.current_state {
            return Ok(());
        }
        tracing::trace!(from = self.current_state, to = state, "filter transition");
        self.current_state = state;
        if let Some(cursor) = self.cursors.get(&state) {
            host.set_cursor(*cursor);
        }
        Ok(())
    }

    /// Same as [`try_transition_to`](Self::try_transition_to).
    ///
    /// # Panics
    ///
    /// If `state` was never allocated by this filter.
    pub fn transition_to(&mut self, state: StateId, host: &mut H) {
        if let Err(err) = self.try_transition_to(state, host) {
            panic!("invalid transition: {err}");
        }
    }
}

impl<H: ?Sized> Default for EventFilter<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for EventFilter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFilter")
            .field("current_state", &self.current_state)
            .field("states", &self.states.len())
            .field("cursors", &self.cursors)
            .field("relevant_kinds", &self.relevant_kinds)
            .finish()
    }
}
