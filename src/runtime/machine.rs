//! Tick-driven state machine.

use super::config::{DuplicatePolicy, MachineConfig};
use super::observer::{ObserverId, Observers};
use crate::builder::StateBuilder;
use crate::core::{Hook, State, StateChange, StateHistory, Transition};
use crate::error::MachineError;
use crate::snapshot::MachineSnapshot;
use std::collections::HashMap;
use std::fmt;

/// Whether the machine has been initialized, and if so which state is current.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Active { current: String },
}

/// A finite state machine driven by an external loop.
///
/// States are registered by name, one of them is designated the start
/// state, and the caller drives the machine with [`tick`](Self::tick) and
/// moves it with [`to`](Self::to). Every operation runs to completion on
/// the caller's thread.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use tickfsm::core::{State, Transition};
/// use tickfsm::runtime::Machine;
///
/// let mut machine = Machine::new();
/// machine
///     .add_start(State::builder("idle").on_enter(|| {}).on_exit(|| {}).build().unwrap())
///     .unwrap();
/// machine
///     .add(State::builder("run").on_enter(|| {}).build().unwrap())
///     .unwrap();
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// machine.subscribe(move |change| {
///     sink.lock().unwrap().push((change.state.clone(), change.transition));
/// });
///
/// machine.tick().unwrap();
/// machine.to("run").unwrap();
///
/// assert_eq!(
///     *seen.lock().unwrap(),
///     vec![
///         ("idle".to_string(), Transition::Enter),
///         ("idle".to_string(), Transition::Exit),
///         ("run".to_string(), Transition::Enter),
///     ]
/// );
/// ```
pub struct Machine {
    config: MachineConfig,
    states: HashMap<String, State>,
    start: Option<String>,
    lifecycle: Lifecycle,
    observers: Observers,
    history: StateHistory,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Create an empty machine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Create an empty machine with the given configuration.
    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            history: StateHistory::with_limit(config.history_limit),
            config,
            states: HashMap::new(),
            start: None,
            lifecycle: Lifecycle::Uninitialized,
            observers: Observers::new(),
        }
    }

    /// Build a state from `builder` and register it.
    ///
    /// When `is_start` is set the state becomes the start state, replacing
    /// any earlier designation.
    pub fn register(&mut self, builder: StateBuilder, is_start: bool) -> Result<(), MachineError> {
        let state = builder.build()?;
        self.insert(state, is_start)
    }

    /// Register a state.
    pub fn add(&mut self, state: State) -> Result<(), MachineError> {
        self.insert(state, false)
    }

    /// Register a state and designate it the start state.
    pub fn add_start(&mut self, state: State) -> Result<(), MachineError> {
        self.insert(state, true)
    }

    fn insert(&mut self, state: State, is_start: bool) -> Result<(), MachineError> {
        let name = state.name().to_string();

        if self.states.contains_key(&name) {
            match self.config.duplicates {
                DuplicatePolicy::Reject => return Err(MachineError::DuplicateState { name }),
                DuplicatePolicy::Replace => {
                    tracing::debug!(state = %name, "replacing registered state");
                }
            }
        }

        tracing::debug!(
            state = %name,
            enter = state.has_enter(),
            update = state.has_update(),
            exit = state.has_exit(),
            is_start,
            "registered state"
        );

        self.states.insert(name.clone(), state);
        if is_start {
            self.start = Some(name);
        }
        Ok(())
    }

    /// Run the current state's update action once.
    ///
    /// The first tick of an uninitialized machine resets it to the start
    /// state before updating, so a missing start state surfaces here as
    /// `NoStartState`.
    pub fn tick(&mut self) -> Result<(), MachineError> {
        let current = match &self.lifecycle {
            Lifecycle::Active { current } => current.clone(),
            Lifecycle::Uninitialized => {
                tracing::debug!("first tick on uninitialized machine, resetting");
                self.enter_start()?
            }
        };

        tracing::trace!(state = %current, "tick");
        self.run_hook(&current, Hook::Update)?;
        Ok(())
    }

    /// Leave the current state and enter `name`.
    ///
    /// Runs the current state's exit action (emitting `Exit` if it exists),
    /// then makes `name` current and runs its enter action (emitting `Enter`
    /// if it exists).
    ///
    /// The target is resolved before the exit action runs. An unknown name
    /// fails with `UnknownState` without running the current state's exit
    /// action or emitting `Exit`, rather than exiting first and failing on
    /// the lookup afterwards.
    pub fn to(&mut self, name: &str) -> Result<(), MachineError> {
        let Lifecycle::Active { current } = &self.lifecycle else {
            return Err(MachineError::NotInitialized);
        };
        if !self.states.contains_key(name) {
            return Err(MachineError::UnknownState {
                name: name.to_string(),
            });
        }

        let exiting = current.clone();
        tracing::debug!(from = %exiting, to = %name, "transition");

        if self.run_hook(&exiting, Hook::Exit)? {
            self.emit(&exiting, Transition::Exit);
        }

        self.lifecycle = Lifecycle::Active {
            current: name.to_string(),
        };

        if self.run_hook(name, Hook::Enter)? {
            self.emit(name, Transition::Enter);
        }
        Ok(())
    }

    /// Make the start state current and run its enter action.
    ///
    /// This is a hard re-initialization: the previously current state's
    /// exit action does not run and no `Exit` is emitted.
    pub fn reset(&mut self) -> Result<(), MachineError> {
        self.enter_start().map(|_| ())
    }

    /// Make the start state current, run its enter action and return its name.
    fn enter_start(&mut self) -> Result<String, MachineError> {
        let start = match &self.start {
            Some(start) if self.states.contains_key(start) => start.clone(),
            other => {
                return Err(MachineError::NoStartState {
                    start: other.clone(),
                })
            }
        };

        tracing::debug!(state = %start, "reset");
        self.lifecycle = Lifecycle::Active {
            current: start.clone(),
        };

        if self.run_hook(&start, Hook::Enter)? {
            self.emit(&start, Transition::Enter);
        }
        Ok(start)
    }

    fn run_hook(&mut self, name: &str, hook: Hook) -> Result<bool, MachineError> {
        let state = self
            .states
            .get_mut(name)
            .ok_or_else(|| MachineError::UnknownState {
                name: name.to_string(),
            })?;
        state.run(hook)
    }

    fn emit(&mut self, state: &str, transition: Transition) {
        let change = StateChange::new(state, transition);
        self.history.record(change.clone());
        self.observers.dispatch(&change);
    }

    /// Subscribe to state-change notifications.
    ///
    /// Observers only see notifications emitted after they subscribe.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.observers.subscribe(observer)
    }

    /// Remove an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Whether `tick` or `reset` has succeeded in making a state current.
    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Active { .. })
    }

    /// Name of the current state, or `None` before initialization.
    pub fn current_state_name(&self) -> Option<&str> {
        match &self.lifecycle {
            Lifecycle::Active { current } => Some(current),
            Lifecycle::Uninitialized => None,
        }
    }

    /// The current state, or `None` before initialization.
    pub fn current_state(&self) -> Option<&State> {
        self.current_state_name().and_then(|name| self.states.get(name))
    }

    /// Name of the designated start state, if any.
    ///
    /// The name is only checked against the registered states when the
    /// machine resets.
    pub fn start_state_name(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Look up a registered state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// Whether a state is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Registered states, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.values()
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no states are registered.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Recent state-change notifications.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// The configuration the machine was created with.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Capture a serializable view of the machine.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot::capture(self)
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("states", &self.states.len())
            .field("start", &self.start)
            .field("current", &self.current_state_name())
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn logging_state(name: &'static str, log: &Log) -> State {
        let (enter, update, exit) = (Arc::clone(log), Arc::clone(log), Arc::clone(log));
        State::builder(name)
            .on_enter(move || enter.lock().unwrap().push(format!("{name}:enter")))
            .on_update(move || update.lock().unwrap().push(format!("{name}:update")))
            .on_exit(move || exit.lock().unwrap().push(format!("{name}:exit")))
            .build()
            .unwrap()
    }

    fn two_state_machine(log: &Log) -> Machine {
        let mut machine = Machine::new();
        machine.add_start(logging_state("a", log)).unwrap();
        machine.add(logging_state("b", log)).unwrap();
        machine
    }

    #[test]
    fn new_machine_is_empty_and_uninitialized() {
        let machine = Machine::new();
        assert!(machine.is_empty());
        assert!(!machine.is_initialized());
        assert!(machine.current_state().is_none());
        assert!(machine.start_state_name().is_none());
    }

    #[test]
    fn first_tick_resets_then_updates() {
        let log = Log::default();
        let mut machine = two_state_machine(&log);

        machine.tick().unwrap();
        machine.tick().unwrap();

        assert_eq!(machine.current_state_name(), Some("a"));
        assert_eq!(*log.lock().unwrap(), vec!["a:enter", "a:update", "a:update"]);
    }

    #[test]
    fn to_runs_exit_then_enter() {
        let log = Log::default();
        let mut machine = two_state_machine(&log);

        machine.reset().unwrap();
        machine.to("b").unwrap();
        machine.tick().unwrap();

        assert_eq!(machine.current_state_name(), Some("b"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:enter", "a:exit", "b:enter", "b:update"]
        );
    }

    #[test]
    fn to_unknown_state_leaves_machine_untouched() {
        let log = Log::default();
        let mut machine = two_state_machine(&log);
        machine.reset().unwrap();

        let err = machine.to("missing").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
        assert_eq!(machine.current_state_name(), Some("a"));
        assert_eq!(*log.lock().unwrap(), vec!["a:enter"]);
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn to_before_initialization_fails() {
        let log = Log::default();
        let mut machine = two_state_machine(&log);

        let err = machine.to("b").unwrap_err();
        assert!(matches!(err, MachineError::NotInitialized));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn reset_skips_exit_of_current_state() {
        let log = Log::default();
        let mut machine = two_state_machine(&log);
        machine.reset().unwrap();
        machine.to("b").unwrap();
        log.lock().unwrap().clear();

        machine.reset().unwrap();

        assert_eq!(machine.current_state_name(), Some("a"));
        assert_eq!(*log.lock().unwrap(), vec!["a:enter"]);
    }

    #[test]
    fn reset_with_dangling_start_fails() {
        let mut machine = Machine::new();
        machine
            .register(StateBuilder::new().name("a").on_update(|| {}), false)
            .unwrap();

        let err = machine.reset().unwrap_err();
        assert!(matches!(err, MachineError::NoStartState { start: None }));
        assert!(!machine.is_initialized());
    }

    #[test]
    fn duplicate_names_are_rejected_by_default() {
        let mut machine = Machine::new();
        machine
            .add(State::builder("a").on_update(|| {}).build().unwrap())
            .unwrap();

        let err = machine
            .add(State::builder("a").on_enter(|| {}).build().unwrap())
            .unwrap_err();

        assert!(matches!(err, MachineError::DuplicateState { ref name } if name == "a"));
        assert!(machine.state("a").unwrap().has_update());
        assert!(!machine.state("a").unwrap().has_enter());
    }

    #[test]
    fn duplicate_names_replace_when_configured() {
        let mut machine =
            Machine::with_config(MachineConfig::default().duplicates(DuplicatePolicy::Replace));
        machine
            .add(State::builder("a").on_update(|| {}).build().unwrap())
            .unwrap();
        machine
            .add(State::builder("a").on_enter(|| {}).build().unwrap())
            .unwrap();

        assert_eq!(machine.len(), 1);
        assert!(machine.state("a").unwrap().has_enter());
        assert!(!machine.state("a").unwrap().has_update());
    }

    #[test]
    fn failing_exit_keeps_current_state() {
        let mut machine = Machine::new();
        machine
            .add_start(
                State::builder("a")
                    .try_on_exit(|| Err("stuck".into()))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        machine
            .add(State::builder("b").on_enter(|| {}).build().unwrap())
            .unwrap();
        machine.reset().unwrap();

        let err = machine.to("b").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ActionFailed);
        assert_eq!(machine.current_state_name(), Some("a"));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn failing_enter_leaves_target_current_without_notification() {
        let mut machine = Machine::new();
        machine
            .add_start(State::builder("a").on_exit(|| {}).build().unwrap())
            .unwrap();
        machine
            .add(
                State::builder("b")
                    .try_on_enter(|| Err("broken".into()))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        machine.reset().unwrap();

        let err = machine.to("b").unwrap_err();

        assert!(matches!(
            err,
            MachineError::ActionFailed { ref state, hook: Hook::Enter, .. } if state == "b"
        ));
        assert_eq!(machine.current_state_name(), Some("b"));
        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.history().last().unwrap().transition, Transition::Exit);
    }

    #[test]
    fn failing_enter_during_reset_leaves_start_current() {
        let mut machine = Machine::new();
        machine
            .add_start(
                State::builder("a")
                    .try_on_enter(|| Err("no assets".into()))
                    .on_exit(|| {})
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        machine.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = machine.reset().unwrap_err();

        assert!(matches!(
            err,
            MachineError::ActionFailed { ref state, hook: Hook::Enter, .. } if state == "a"
        ));
        assert_eq!(machine.current_state_name(), Some("a"));
        assert!(machine.is_initialized());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn failing_enter_on_first_tick_skips_update() {
        let updates = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&updates);
        let mut machine = Machine::new();
        machine
            .add_start(
                State::builder("a")
                    .try_on_enter(|| Err("no assets".into()))
                    .on_update(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert!(machine.tick().is_err());
        assert_eq!(updates.load(Ordering::SeqCst), 0);

        machine.tick().unwrap();
        assert_eq!(updates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_update_propagates_from_tick() {
        let mut machine = Machine::new();
        machine
            .add_start(
                State::builder("a")
                    .try_on_update(|| Err("bad frame".into()))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let err = machine.tick().unwrap_err();
        assert!(matches!(err, MachineError::ActionFailed { hook: Hook::Update, .. }));
        assert!(machine.is_initialized());
    }

    #[test]
    fn late_observers_miss_earlier_notifications() {
        let log = Log::default();
        let mut machine = two_state_machine(&log);
        machine.tick().unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        machine.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        machine.to("b").unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribed_observers_stop_receiving() {
        let log = Log::default();
        let mut machine = two_state_machine(&log);

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let id = machine.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        machine.tick().unwrap();
        assert!(machine.unsubscribe(id));
        machine.to("b").unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(machine.observer_count(), 0);
    }

    #[test]
    fn history_respects_configured_limit() {
        let log = Log::default();
        let mut machine = Machine::with_config(MachineConfig::default().history_limit(2));
        machine.add_start(logging_state("a", &log)).unwrap();
        machine.add(logging_state("b", &log)).unwrap();

        machine.tick().unwrap();
        machine.to("b").unwrap();

        let kinds: Vec<_> = machine.history().changes().map(|c| c.transition).collect();
        assert_eq!(kinds, vec![Transition::Exit, Transition::Enter]);
    }
}
