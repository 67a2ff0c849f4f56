//! Command handlers
//!
//! Every line, typed or rebuilt from a key binding, goes through
//! [`Controller::execute`]: tokenize, check the argument count against the
//! command's arity (extra arguments are ignored), then run the handler.
//! Validation failures are reported and leave all state untouched.

use core::fmt::Write;

use volctrl_hal::{FlashError, FlashStorage, StorageKey};

use super::controller::Controller;
use super::registration::RegistrationWait;
use super::reply::{reply, reply_fmt};
use crate::command::{
    check_arity, parse, Arg, ArityError, ArityPolicy, CommandId, ParseError, ParsedLine, COMMANDS,
};
use crate::config::{target_for_step, Settings, SettingsError, MAX_INC_DURATION_MS};
use crate::keys::{DelError, RegError, SHOWREM_HEADER};
use crate::safety::FaultKind;
use crate::state::ControlState;
use crate::sync::Sample;
use crate::traits::{Indicator, Indicators, MotorActuator, RunTimer};

/// Errors from executing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Line could not be tokenized or resolved
    Parse(ParseError),
    /// Too few arguments
    Arity(ArityError),
    /// Argument is not a valid literal for this command
    InvalidArgument,
    /// Numeric argument outside the command's range
    OutOfRange,
    /// Key learning request rejected
    Registration(RegError),
    /// Key deletion failed
    Deletion(DelError),
    /// Setting could not be persisted
    Settings(SettingsError),
}

impl DispatchError {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            DispatchError::Parse(e) => e.message(),
            DispatchError::Arity(e) => e.message(),
            DispatchError::InvalidArgument => "Invalid Argument!",
            DispatchError::OutOfRange => "Argument out of range!",
            DispatchError::Registration(e) => e.message(),
            DispatchError::Deletion(e) => e.message(),
            DispatchError::Settings(_) => "ERROR: Setting could not be written to flash!",
        }
    }
}

impl From<ParseError> for DispatchError {
    fn from(e: ParseError) -> Self {
        DispatchError::Parse(e)
    }
}

impl From<ArityError> for DispatchError {
    fn from(e: ArityError) -> Self {
        DispatchError::Arity(e)
    }
}

impl From<RegError> for DispatchError {
    fn from(e: RegError) -> Self {
        DispatchError::Registration(e)
    }
}

impl From<DelError> for DispatchError {
    fn from(e: DelError) -> Self {
        DispatchError::Deletion(e)
    }
}

impl From<SettingsError> for DispatchError {
    fn from(e: SettingsError) -> Self {
        DispatchError::Settings(e)
    }
}

fn parse_int(arg: &Arg) -> Result<i32, DispatchError> {
    arg.parse().map_err(|_| DispatchError::InvalidArgument)
}

fn parse_switch(arg: &Arg) -> Result<bool, DispatchError> {
    match arg.as_str() {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(DispatchError::InvalidArgument),
    }
}

impl<M, T, I, S> Controller<M, T, I, S>
where
    M: MotorActuator,
    T: RunTimer,
    I: Indicators,
    S: FlashStorage,
{
    /// Execute a line typed on the serial link, echoing it first if enabled
    pub(super) fn execute_serial<W: Write>(
        &mut self,
        raw: &str,
        sample: Sample,
        now_ms: u32,
        out: &mut W,
    ) {
        if self.config.echo {
            reply(out, raw);
        }
        self.execute(raw, sample, now_ms, out);
    }

    /// Execute a command line and report any failure
    ///
    /// Blank lines are ignored without a reply.
    pub(super) fn execute<W: Write>(&mut self, raw: &str, sample: Sample, now_ms: u32, out: &mut W) {
        let result = parse(raw)
            .map_err(DispatchError::from)
            .and_then(|parsed| self.dispatch(&parsed, sample, now_ms, out));

        match result {
            Ok(()) | Err(DispatchError::Parse(ParseError::Empty)) => {}
            Err(e) => reply(out, e.message()),
        }
    }

    fn dispatch<W: Write>(
        &mut self,
        parsed: &ParsedLine,
        sample: Sample,
        now_ms: u32,
        out: &mut W,
    ) -> Result<(), DispatchError> {
        let args = parsed.args.as_slice();
        check_arity(parsed.command, args.len(), ArityPolicy::AtLeast)?;

        if self.config.verbose {
            reply_fmt(out, format_args!("argc: {}", args.len()));
            for arg in args {
                reply_fmt(out, format_args!("argv: {}", arg));
            }
        }

        match parsed.command {
            CommandId::VolUp => {
                reply(out, "volup");
                self.state = ControlState::VolUp;
            }
            CommandId::VolDown => {
                reply(out, "voldown");
                self.state = ControlState::VolDown;
            }
            CommandId::SetVol => self.set_volume(&args[0], out)?,
            CommandId::GetAdcVal => reply_fmt(out, format_args!("ADC Value: {}", sample.position)),
            CommandId::RegRem => self.register_key(args, now_ms, out)?,
            CommandId::DelRem => self.delete_key(&args[0], out)?,
            CommandId::ShowRem => self.show_keys(out),
            CommandId::Set5vLed => self.set_led(Indicator::Supply5v, &args[0], out)?,
            CommandId::Set3v3Led => self.set_led(Indicator::Supply3v3, &args[0], out)?,
            CommandId::SetIncDur => self.set_inc_duration(&args[0], out)?,
            CommandId::GetIncDur => self.report_inc_duration(out),
            CommandId::ClrErr => {
                self.faults.clear(&mut self.indicators);
                reply(out, "Error cleared!");
            }
            CommandId::Help => {
                for spec in COMMANDS.iter() {
                    reply_fmt(out, format_args!(" {:<10} {} arg(s)", spec.name, spec.arity));
                }
            }
        }
        Ok(())
    }

    fn set_volume<W: Write>(&mut self, arg: &Arg, out: &mut W) -> Result<(), DispatchError> {
        reply(out, "setvol");
        let step = parse_int(arg)?;
        let target = target_for_step(step).ok_or(DispatchError::OutOfRange)?;

        if self.config.verbose {
            reply_fmt(out, format_args!("Target ADC value: {}", target));
        }
        self.target_level = target;
        self.state = ControlState::SetVol;
        Ok(())
    }

    fn register_key<W: Write>(
        &mut self,
        args: &[Arg],
        now_ms: u32,
        out: &mut W,
    ) -> Result<(), DispatchError> {
        let pending = self.keys.prepare(&args[0], &args[1], &args[2..])?;

        reply(out, "Press the desired key on the ir-remote");
        // Only a press made after the prompt counts
        self.pending_key = None;
        self.registration = Some(RegistrationWait::new(pending, now_ms));
        self.state = ControlState::AwaitingKeyPress;
        Ok(())
    }

    fn delete_key<W: Write>(&mut self, arg: &Arg, out: &mut W) -> Result<(), DispatchError> {
        if self.keys.is_empty() {
            return Err(DelError::EmptyStore.into());
        }
        reply_fmt(out, format_args!("Delete Key with index: {}", arg));

        let index = usize::try_from(parse_int(arg)?).map_err(|_| DelError::IndexOutOfRange)?;
        self.keys.delete(index, &mut self.storage)?;
        reply(out, "Deleted!");
        Ok(())
    }

    fn show_keys<W: Write>(&mut self, out: &mut W) {
        reply(out, SHOWREM_HEADER);
        for row in self.keys.rows(&mut self.storage) {
            reply_fmt(out, format_args!("{}", row));
        }
    }

    fn set_led<W: Write>(
        &mut self,
        indicator: Indicator,
        arg: &Arg,
        out: &mut W,
    ) -> Result<(), DispatchError> {
        let on = parse_switch(arg)?;
        let (key, label) = match indicator {
            Indicator::Supply3v3 => (StorageKey::Led3v3, "3V3"),
            _ => (StorageKey::Led5v, "5V"),
        };

        Settings::store_led(&mut self.storage, key, on)?;
        match key {
            StorageKey::Led3v3 => self.settings.led_3v3 = on,
            _ => self.settings.led_5v = on,
        }
        self.indicators.set(indicator, on);

        let state = if on { "ON" } else { "OFF" };
        reply_fmt(out, format_args!("{} LED {}!", label, state));
        Ok(())
    }

    fn set_inc_duration<W: Write>(&mut self, arg: &Arg, out: &mut W) -> Result<(), DispatchError> {
        let duration = u16::try_from(parse_int(arg)?)
            .ok()
            .filter(|d| *d <= MAX_INC_DURATION_MS)
            .ok_or(DispatchError::OutOfRange)?;

        Settings::store_inc_duration(&mut self.storage, duration)?;
        self.settings.inc_duration_ms = duration;
        self.timer.set_duration(duration);
        reply(out, "INC_DURATION value updated");
        Ok(())
    }

    fn report_inc_duration<W: Write>(&mut self, out: &mut W) {
        let in_use = self.settings.inc_duration_ms;
        let stored = match Settings::read_inc_duration(&mut self.storage) {
            Ok(value) => Some(value),
            Err(SettingsError::Flash(FlashError::NotFound)) => Some(Settings::new().inc_duration_ms),
            Err(_) => None,
        };

        if stored != Some(in_use) {
            reply(out, "ERROR: INC_DUR FLASH RAM MISMATCH!");
            self.faults.raise(FaultKind::SettingsMismatch, &mut self.indicators);
        }
        reply_fmt(out, format_args!("INC_DURATION VALUE = {}ms", in_use));
    }
}
