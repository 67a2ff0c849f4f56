//! Control loop
//!
//! [`Controller`] owns the actuators, the key-binding store and the
//! persisted settings, and advances the motor-control state machine by
//! exactly one step per tick. All replies for a tick are written to the
//! caller's output sink as CRLF-terminated lines.

use core::fmt::Write;

use volctrl_hal::FlashStorage;

use super::registration::{RegistrationWait, WaitPoll};
use super::reply::{reply, reply_fmt};
use crate::command::{peek_motion, Line};
use crate::config::{ControlConfig, Settings};
use crate::keys::{IrKey, KeyBindingStore, KeyCode, RegError};
use crate::safety::{FaultKind, FaultMonitor};
use crate::state::{ControlState, MotionRequest, Reaction};
use crate::sync::Sample;
use crate::traits::{Indicator, Indicators, MotorActuator, MotorFault, MotorState, RunTimer};

/// Direction of a timed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Up,
    Down,
}

impl Run {
    fn at_limit(self, config: &ControlConfig, position: u16) -> bool {
        match self {
            Run::Up => config.at_high_limit(position),
            Run::Down => config.at_low_limit(position),
        }
    }

    fn drive<M: MotorActuator>(self, motor: &mut M) {
        match self {
            Run::Up => motor.clockwise(),
            Run::Down => motor.counter_clockwise(),
        }
    }

    fn entry_state(self) -> ControlState {
        match self {
            Run::Up => ControlState::VolUp,
            Run::Down => ControlState::VolDown,
        }
    }

    fn active_state(self) -> ControlState {
        match self {
            Run::Up => ControlState::VolUpActive,
            Run::Down => ControlState::VolDownActive,
        }
    }

    fn limit_message(self) -> &'static str {
        match self {
            Run::Up => "Motor @ upper lim.!",
            Run::Down => "Motor @ lower lim.!",
        }
    }
}

/// Where a pending input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Key,
    Line,
}

/// Volume controller state and collaborators
pub struct Controller<M, T, I, S> {
    pub(super) config: ControlConfig,
    pub(super) motor: M,
    pub(super) timer: T,
    pub(super) indicators: I,
    pub(super) storage: S,
    pub(super) state: ControlState,
    /// Position sought by a volume search
    pub(super) target_level: u16,
    pub(super) settings: Settings,
    pub(super) keys: KeyBindingStore,
    pub(super) faults: FaultMonitor,
    pub(super) registration: Option<RegistrationWait>,
    pub(super) pending_line: Option<Line>,
    pub(super) pending_key: Option<IrKey>,
}

impl<M, T, I, S> Controller<M, T, I, S>
where
    M: MotorActuator,
    T: RunTimer,
    I: Indicators,
    S: FlashStorage,
{
    /// Create a controller from restored settings and bindings
    pub fn new(
        config: ControlConfig,
        motor: M,
        timer: T,
        indicators: I,
        storage: S,
        settings: Settings,
        keys: KeyBindingStore,
    ) -> Self {
        Self {
            config,
            motor,
            timer,
            indicators,
            storage,
            state: ControlState::Init,
            target_level: 0,
            settings,
            keys,
            faults: FaultMonitor::new(),
            registration: None,
            pending_line: None,
            pending_key: None,
        }
    }

    /// Drive all outputs to their restored state
    ///
    /// Motor off, error indicator off, supply indicators and run-timer
    /// duration from the persisted settings.
    pub fn restore_outputs(&mut self) {
        self.motor.off();
        self.indicators.set(Indicator::Error, false);
        self.indicators.set(Indicator::Supply5v, self.settings.led_5v);
        self.indicators.set(Indicator::Supply3v3, self.settings.led_3v3);
        self.timer.set_duration(self.settings.inc_duration_ms);
    }

    /// Current state
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Current volume search target
    pub fn target_level(&self) -> u16 {
        self.target_level
    }

    /// Settings in use
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Stored key bindings
    pub fn keys(&self) -> &KeyBindingStore {
        &self.keys
    }

    /// Fault latch
    pub fn faults(&self) -> &FaultMonitor {
        &self.faults
    }

    /// Check if a new line can be submitted
    ///
    /// Only one line is held at a time; further lines stay with the
    /// sender until this one is consumed.
    pub fn can_accept_line(&self) -> bool {
        self.pending_line.is_none()
    }

    /// Hand over a received line
    ///
    /// Returns the line back if one is already pending.
    pub fn submit_line(&mut self, line: Line) -> Result<(), Line> {
        if self.pending_line.is_some() {
            return Err(line);
        }
        self.pending_line = Some(line);
        Ok(())
    }

    /// Hand over a decoded key, replacing any unconsumed one
    pub fn submit_key(&mut self, key: IrKey) {
        self.pending_key = Some(key);
    }

    /// Advance the state machine by one tick
    ///
    /// The motor pins are read once at the start of the tick; an invalid
    /// pin pattern latches a fault and forces the idle state.
    pub fn step<W: Write>(&mut self, sample: Sample, now_ms: u32, out: &mut W) {
        let motor = match self.motor.state() {
            Ok(motor) => motor,
            Err(MotorFault::InvalidPinState) => {
                self.fault_stop(FaultKind::InvalidMotorPins);
                return;
            }
        };

        match self.state {
            ControlState::Init => self.run_idle(sample, now_ms, out),
            ControlState::VolUp => self.enter_run(Run::Up, sample, motor, out),
            ControlState::VolDown => self.enter_run(Run::Down, sample, motor, out),
            ControlState::VolUpActive => self.run_active(Run::Up, sample, out),
            ControlState::VolDownActive => self.run_active(Run::Down, sample, out),
            ControlState::SetVol => self.enter_search(sample),
            ControlState::SetVolActive => self.run_search(sample, motor, now_ms, out),
            ControlState::AwaitingKeyPress => self.poll_registration(now_ms, out),
        }
    }

    fn run_idle<W: Write>(&mut self, sample: Sample, now_ms: u32, out: &mut W) {
        if let Some(line) = self.pending_line.take() {
            self.execute_serial(&line, sample, now_ms, out);
        }

        // A key arriving with a motion command is left to the new state
        if !self.state.is_idle() {
            return;
        }

        if let Some(key) = self.pending_key.take() {
            if self.config.verbose {
                report_frame(&key, out);
            }
            if key.repeat {
                return;
            }
            if let Some(line) = self.bound_line(&key.code) {
                self.execute(&line, sample, now_ms, out);
            }
        }
    }

    fn enter_run<W: Write>(&mut self, run: Run, sample: Sample, motor: MotorState, out: &mut W) {
        if run.at_limit(&self.config, sample.position) {
            reply(out, run.limit_message());
            self.stop();
            return;
        }

        if sample.timer_active {
            self.timer.restart();
            run.drive(&mut self.motor);
        } else {
            self.timer.start();
            if motor != MotorState::Off {
                self.fault_stop(FaultKind::RunWithoutTimer);
                return;
            }
            run.drive(&mut self.motor);
        }

        self.state = run.active_state();
    }

    fn run_active<W: Write>(&mut self, run: Run, sample: Sample, out: &mut W) {
        if !sample.timer_active {
            self.motor.off();
            self.state = ControlState::Init;
            return;
        }

        if let Some((source, request)) = self.peek_pending() {
            match self.state.react(request) {
                Reaction::Retrigger(next) => {
                    self.take_pending(source);
                    self.state = next;
                    if next != run.entry_state() {
                        return;
                    }
                }
                _ => {
                    self.stop();
                    return;
                }
            }
        }

        if run.at_limit(&self.config, sample.position) {
            reply(out, run.limit_message());
            self.stop();
        }
    }

    fn enter_search(&mut self, sample: Sample) {
        if self.within_tolerance(sample.position) {
            self.motor.off();
            self.state = ControlState::Init;
            return;
        }

        if sample.position < self.target_level {
            self.motor.clockwise();
        } else {
            self.motor.counter_clockwise();
        }
        self.state = ControlState::SetVolActive;
    }

    fn run_search<W: Write>(&mut self, sample: Sample, motor: MotorState, now_ms: u32, out: &mut W) {
        let expected = match sample.position.cmp(&self.target_level) {
            core::cmp::Ordering::Greater => Some(MotorState::CounterClockwise),
            core::cmp::Ordering::Less => Some(MotorState::Clockwise),
            core::cmp::Ordering::Equal => None,
        };
        if expected.is_some_and(|dir| dir != motor) {
            self.motor.off();
            reply(out, "Volume search error!");
            self.faults.raise(FaultKind::VolumeSearch, &mut self.indicators);
            self.state = ControlState::Init;
            return;
        }

        if self.within_tolerance(sample.position) {
            self.motor.off();
            self.state = ControlState::Init;
            return;
        }

        if let Some((source, request)) = self.peek_pending() {
            match self.state.react(request) {
                Reaction::Dismiss => self.take_pending(source),
                Reaction::Execute => match source {
                    Source::Line => {
                        if let Some(line) = self.pending_line.take() {
                            self.execute_serial(&line, sample, now_ms, out);
                        }
                    }
                    Source::Key => {
                        let line = self
                            .pending_key
                            .take()
                            .and_then(|key| self.bound_line(&key.code));
                        if let Some(line) = line {
                            self.execute(&line, sample, now_ms, out);
                        }
                    }
                },
                _ => {
                    self.motor.off();
                    self.state = ControlState::Init;
                }
            }
        }
    }

    fn poll_registration<W: Write>(&mut self, now_ms: u32, out: &mut W) {
        let key = self.pending_key.take();
        let poll = match self.registration.as_mut() {
            Some(wait) => wait.poll(key, now_ms, &self.config, out),
            None => {
                self.state = ControlState::Init;
                return;
            }
        };

        match poll {
            WaitPoll::Waiting => {}
            WaitPoll::TimedOut => {
                self.registration = None;
                self.state = ControlState::Init;
                let _ = out.write_str("\r\n");
                reply(out, RegError::Timeout.message());
            }
            WaitPoll::Received(code) => self.finish_registration(code, out),
        }
    }

    fn finish_registration<W: Write>(&mut self, code: KeyCode, out: &mut W) {
        self.state = ControlState::Init;
        let Some(wait) = self.registration.take() else {
            return;
        };

        let _ = out.write_str("\r\n");
        reply(out, "Keypress registered");
        reply(out, "Write to flash...");
        match self.keys.commit(wait.into_pending(), code, &mut self.storage) {
            Ok(_) => reply(out, "Key register successful!"),
            Err(e) => reply(out, e.message()),
        }
    }

    /// Classify the pending input without consuming it; keys first
    fn peek_pending(&self) -> Option<(Source, MotionRequest)> {
        if let Some(key) = &self.pending_key {
            let command = self.keys.lookup_by_ir(&key.code).map(|b| b.command);
            return Some((Source::Key, MotionRequest::from(command)));
        }
        self.pending_line
            .as_ref()
            .map(|line| (Source::Line, MotionRequest::from(peek_motion(line))))
    }

    fn take_pending(&mut self, source: Source) {
        match source {
            Source::Key => self.pending_key = None,
            Source::Line => self.pending_line = None,
        }
    }

    fn bound_line(&self, code: &KeyCode) -> Option<Line> {
        self.keys.lookup_by_ir(code).map(|b| b.command_line())
    }

    fn within_tolerance(&self, position: u16) -> bool {
        position.abs_diff(self.target_level) < self.config.tolerance
    }

    /// Stop the motor and the run-timer and return to idle
    pub(super) fn stop(&mut self) {
        self.timer.stop();
        self.motor.off();
        self.state = ControlState::Init;
    }

    fn fault_stop(&mut self, kind: FaultKind) {
        self.stop();
        self.registration = None;
        self.faults.raise(kind, &mut self.indicators);
    }
}

fn report_frame<W: Write>(key: &IrKey, out: &mut W) {
    reply_fmt(
        out,
        format_args!(
            "protocol: 0x{:02X}   address: 0x{:04X}   command: 0x{:04X}   flags: 0x{:02X}",
            key.code.protocol,
            key.code.address,
            key.code.command,
            key.flags()
        ),
    );
}
