//! Scripted in-memory [`ChannelSignals`] implementation shared by the
//! sequencing and driver tests.
//!
//! Reads are scripted per channel position: a finite queue of responses is
//! consumed first, then an optional default repeats forever. Writes succeed
//! unless a one-shot failure has been queued. Every call is recorded so
//! tests can assert on hardware access (ordering, absence after terminal
//! states, exact key pulse shapes).

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::signals::{ChannelSignals, SignalError, SignalLevel};

/// One recorded hardware access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    SetPowerSupply(usize, SignalLevel),
    GetPowerSupply(usize),
    SetPowerKey(usize, SignalLevel),
    GetStatus(usize),
}

#[derive(Default)]
struct ReadScript {
    queued: VecDeque<Result<SignalLevel, SignalError>>,
    default: Option<Result<SignalLevel, SignalError>>,
}

impl ReadScript {
    fn next(&mut self, what: &str, position: usize) -> Result<SignalLevel, SignalError> {
        self.queued
            .pop_front()
            .or_else(|| self.default.clone())
            .unwrap_or_else(|| panic!("unscripted {what} read for channel {position}"))
    }
}

#[derive(Default)]
struct State {
    status: HashMap<usize, ReadScript>,
    supply: HashMap<usize, ReadScript>,
    set_key_failures: HashMap<usize, VecDeque<SignalError>>,
    set_supply_failures: HashMap<usize, VecDeque<SignalError>>,
    calls: Vec<Call>,
}

/// Scripted hardware signals for one fake board.
#[derive(Default)]
pub(crate) struct ScriptedSignals {
    state: RefCell<State>,
}

impl ScriptedSignals {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues finite status responses for `position`.
    pub(crate) fn script_status(
        &self,
        position: usize,
        levels: impl IntoIterator<Item = SignalLevel>,
    ) {
        let mut state = self.state.borrow_mut();
        let script = state.status.entry(position).or_default();
        script.queued.extend(levels.into_iter().map(Ok));
    }

    /// Sets the status response repeated once the queue is drained.
    pub(crate) fn status_default(&self, position: usize, level: SignalLevel) {
        self.state
            .borrow_mut()
            .status
            .entry(position)
            .or_default()
            .default = Some(Ok(level));
    }

    /// Queues finite power-supply responses for `position`.
    pub(crate) fn script_supply(
        &self,
        position: usize,
        levels: impl IntoIterator<Item = SignalLevel>,
    ) {
        let mut state = self.state.borrow_mut();
        let script = state.supply.entry(position).or_default();
        script.queued.extend(levels.into_iter().map(Ok));
    }

    /// Sets the power-supply response repeated once the queue is drained.
    pub(crate) fn supply_default(&self, position: usize, level: SignalLevel) {
        self.state
            .borrow_mut()
            .supply
            .entry(position)
            .or_default()
            .default = Some(Ok(level));
    }

    /// Makes the next status read for `position` fail.
    pub(crate) fn fail_next_status(&self, position: usize, err: SignalError) {
        self.state
            .borrow_mut()
            .status
            .entry(position)
            .or_default()
            .queued
            .push_back(Err(err));
    }

    /// Makes the next power-supply write for `position` fail.
    pub(crate) fn fail_next_set_supply(&self, position: usize, err: SignalError) {
        self.state
            .borrow_mut()
            .set_supply_failures
            .entry(position)
            .or_default()
            .push_back(err);
    }

    /// Makes the next power-key write for `position` fail.
    pub(crate) fn fail_next_set_key(&self, position: usize, err: SignalError) {
        self.state
            .borrow_mut()
            .set_key_failures
            .entry(position)
            .or_default()
            .push_back(err);
    }

    /// Recorded hardware accesses in call order.
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }
}

impl ChannelSignals for ScriptedSignals {
    fn set_power_supply(&self, position: usize, level: SignalLevel) -> Result<(), SignalError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SetPowerSupply(position, level));
        match state
            .set_supply_failures
            .get_mut(&position)
            .and_then(VecDeque::pop_front)
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn power_supply(&self, position: usize) -> Result<SignalLevel, SignalError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::GetPowerSupply(position));
        state
            .supply
            .entry(position)
            .or_default()
            .next("power supply", position)
    }

    fn set_power_key(&self, position: usize, level: SignalLevel) -> Result<(), SignalError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SetPowerKey(position, level));
        match state
            .set_key_failures
            .get_mut(&position)
            .and_then(VecDeque::pop_front)
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn status(&self, position: usize) -> Result<SignalLevel, SignalError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::GetStatus(position));
        state
            .status
            .entry(position)
            .or_default()
            .next("status", position)
    }
}
