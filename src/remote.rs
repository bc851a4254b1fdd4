//! The remote node's sleep/wake duty cycle.
//!
//! The node sits in deep sleep with the radio powered down. A pin-change
//! interrupt on either encoder line only calls [`WakeCountdown::arm()`].
//! Back in the main loop, [`SleepCycleController`] powers the radio up,
//! samples the encoder once per tick until the countdown runs out, then
//! powers the radio down and sleeps again.
use core::{
    cell::Cell,
    convert::Infallible,
    fmt::{Display, Formatter, Result as FmtResult},
};

use critical_section::Mutex;
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin},
};

use crate::encoder::EncoderDecoder;
use crate::protocol::{Command, CommandLink};
use crate::radio::prelude::{EsbFifo, EsbPipe, EsbPower, EsbRadio};

/// Ticks the node stays awake after the last pin change (about 2 seconds).
pub const WAKE_TICKS: u16 = 2000;
/// Time between two encoder samples, in microseconds.
pub const TICK_INTERVAL_US: u32 = 1000;

/// The only state shared between the pin-change interrupt and the main loop.
///
/// Can be placed in a `static`:
///
/// ```
/// use volume_link::remote::{WakeCountdown, WAKE_TICKS};
///
/// static COUNTDOWN: WakeCountdown = WakeCountdown::new(WAKE_TICKS);
/// ```
pub struct WakeCountdown {
    remaining: Mutex<Cell<u16>>,
    reload: u16,
}

impl WakeCountdown {
    /// A countdown that starts expired and reloads to `reload` ticks.
    pub const fn new(reload: u16) -> Self {
        Self {
            remaining: Mutex::new(Cell::new(0)),
            reload,
        }
    }

    /// (Re)start the awake window. Safe to call from an interrupt handler.
    ///
    /// This is a plain store of the reload value, so it can only extend the
    /// remaining window.
    pub fn arm(&self) {
        critical_section::with(|cs| self.remaining.borrow(cs).set(self.reload));
    }

    /// Consume one tick and return what is left.
    pub fn tick(&self) -> u16 {
        critical_section::with(|cs| {
            let remaining = self.remaining.borrow(cs);
            let left = remaining.get().saturating_sub(1);
            remaining.set(left);
            left
        })
    }

    pub fn remaining(&self) -> u16 {
        critical_section::with(|cs| self.remaining.borrow(cs).get())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() == 0
    }
}

/// The CPU's deep sleep primitive.
///
/// `sleep_unless()` evaluates `wake_pending` with interrupts masked and, if
/// it returns `false`, enters sleep without unmasking in between. A wake-up
/// interrupt that lands after the check must then end the sleep instead of
/// being missed. On AVR that is `cli`, the check, then `sei` directly
/// followed by `sleep`; on Cortex-M it is `cpsid i`, the check, `wfi`, then
/// `cpsie i`.
///
/// The sleep blocks until an enabled interrupt fires. With the radio
/// powered down that is the pin-change interrupt of the encoder lines.
pub trait DeepSleep {
    fn sleep_unless<F: FnOnce() -> bool>(&mut self, wake_pending: F);
}

/// Runs the sleep instruction inside a critical section.
///
/// Only for cores whose sleep instruction still wakes on an interrupt that
/// is pending while masked, such as Cortex-M `WFI`:
///
/// ```ignore
/// let cpu = MaskedSleep(cortex_m::asm::wfi);
/// ```
pub struct MaskedSleep<F>(pub F);

impl<F: FnMut()> DeepSleep for MaskedSleep<F> {
    fn sleep_unless<W: FnOnce() -> bool>(&mut self, wake_pending: W) {
        critical_section::with(|_| {
            if !wake_pending() {
                (self.0)();
            }
        });
    }
}

/// Where the remote node is in its duty cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Radio powered down, CPU in deep sleep between steps.
    Asleep,
    /// Radio listening, encoder sampled every tick.
    Awake,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for Phase {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Phase::Asleep => defmt::write!(f, "Asleep"),
            Phase::Awake => defmt::write!(f, "Awake"),
        }
    }
}

/// Errors that stop the remote node's loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RemoteError<R, P> {
    /// The radio failed.
    Radio(R),
    /// An encoder line could not be read.
    Pin(P),
}

impl<R, P> Display for RemoteError<R, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RemoteError::Radio(_) => write!(f, "radio failed"),
            RemoteError::Pin(_) => write!(f, "encoder line read failed"),
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl<R, P> defmt::Format for RemoteError<R, P> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RemoteError::Radio(_) => defmt::write!(fmt, "radio failed"),
            RemoteError::Pin(_) => defmt::write!(fmt, "encoder line read failed"),
        }
    }
}

/// Main loop of the remote node.
pub struct SleepCycleController<'a, R, P, S, D> {
    link: CommandLink<R>,
    decoder: EncoderDecoder,
    line_a: P,
    line_b: P,
    countdown: &'a WakeCountdown,
    sleeper: S,
    delay: D,
    phase: Phase,
}

type StepError<R, P> = RemoteError<<R as EsbRadio>::RadioErrorType, <P as ErrorType>::Error>;

impl<'a, R, P, S, D> SleepCycleController<'a, R, P, S, D>
where
    R: EsbRadio
        + EsbFifo<FifoErrorType = <R as EsbRadio>::RadioErrorType>
        + EsbPower<PowerErrorType = <R as EsbRadio>::RadioErrorType>
        + EsbPipe<PipeErrorType = <R as EsbRadio>::RadioErrorType>,
    P: InputPin,
    S: DeepSleep,
    D: DelayNs,
{
    /// The `link` must already be configured for
    /// [`Role::Remote`](crate::protocol::Role::Remote) and its radio powered down.
    pub fn new(
        link: CommandLink<R>,
        line_a: P,
        line_b: P,
        countdown: &'a WakeCountdown,
        sleeper: S,
        delay: D,
    ) -> Self {
        Self {
            link,
            decoder: EncoderDecoder::new(),
            line_a,
            line_b,
            countdown,
            sleeper,
            delay,
            phase: Phase::Asleep,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn link(&mut self) -> &mut CommandLink<R> {
        &mut self.link
    }

    /// Give back the owned parts: `(link, line_a, line_b, sleeper, delay)`.
    pub fn release(self) -> (CommandLink<R>, P, P, S, D) {
        (self.link, self.line_a, self.line_b, self.sleeper, self.delay)
    }

    /// One iteration of the loop. Returns the command transmitted, if any.
    ///
    /// - asleep, countdown expired: enter deep sleep, unless the countdown
    ///   was armed after all by the time interrupts are masked.
    /// - asleep, countdown armed: power the radio up and start listening.
    /// - awake, countdown expired: power the radio down.
    /// - awake: sample both lines, transmit on a detent edge, wait one tick.
    pub fn step(&mut self) -> Result<Option<Command>, StepError<R, P>> {
        match self.phase {
            Phase::Asleep if self.countdown.is_expired() => {
                let countdown = self.countdown;
                self.sleeper.sleep_unless(|| !countdown.is_expired());
            }
            Phase::Asleep => {
                let radio = self.link.radio();
                radio.power_up(None).map_err(RemoteError::Radio)?;
                radio.start_listening().map_err(RemoteError::Radio)?;
                self.phase = Phase::Awake;
                #[cfg(feature = "defmt")]
                #[cfg(target_os = "none")]
                defmt::debug!("awake for {=u16} ticks", self.countdown.remaining());
            }
            Phase::Awake if self.countdown.is_expired() => {
                self.link.radio().power_down().map_err(RemoteError::Radio)?;
                self.phase = Phase::Asleep;
                #[cfg(feature = "defmt")]
                #[cfg(target_os = "none")]
                defmt::debug!("going back to sleep");
            }
            Phase::Awake => {
                let a = self.line_a.is_high().map_err(RemoteError::Pin)?;
                let b = self.line_b.is_high().map_err(RemoteError::Pin)?;
                let mut sent = None;
                if let Some(event) = self.decoder.update(EncoderDecoder::sample(a, b)) {
                    sent = self.link.handle_edge(event).map_err(RemoteError::Radio)?;
                }
                self.delay.delay_us(TICK_INTERVAL_US);
                self.countdown.tick();
                return Ok(sent);
            }
        }
        Ok(None)
    }

    /// Run [`SleepCycleController::step()`] forever. Only returns on error.
    pub fn run(&mut self) -> Result<Infallible, StepError<R, P>> {
        loop {
            self.step()?;
        }
    }
}
