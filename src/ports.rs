//! Port traits — the boundary between protocol logic and the outside world.
//!
//! Driven adapters (real GPIO pins, simulated pins, telemetry stores)
//! implement these traits.  The codec and the controller consume them, so
//! neither ever touches hardware directly.

use core::convert::Infallible;

use embedded_hal::digital::StatefulOutputPin;

// ───────────────────────────────────────────────────────────────
// Switch pin port (codec → hardware)
// ───────────────────────────────────────────────────────────────

/// A single binary-state switch control line.
///
/// `get` must read back the *actual* pin state, not a cached copy of the
/// last `set` — verification replies are built from these read-backs.
pub trait SwitchPin {
    /// Drive the pin high (`true`) or low (`false`).
    fn set(&mut self, high: bool);

    /// Read the current pin state.
    fn get(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Metadata sink port (controller → telemetry)
// ───────────────────────────────────────────────────────────────

/// Optional telemetry recorder the controller reports observation modes to
/// after every switch operation.
pub trait MetadataSink {
    fn record(&mut self, key: &str, value: &str);
}

// ───────────────────────────────────────────────────────────────
// embedded-hal adapter
// ───────────────────────────────────────────────────────────────

/// Adapter from an infallible `embedded-hal` output pin to [`SwitchPin`].
///
/// Real GPIO pins on the supported targets cannot fail, so the bound is on
/// `Error = Infallible`; the impossible error is matched away rather than
/// unwrapped.
pub struct HalPin<P>(pub P);

fn infallible<T>(r: Result<T, Infallible>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => match e {},
    }
}

impl<P> SwitchPin for HalPin<P>
where
    P: StatefulOutputPin<Error = Infallible>,
{
    fn set(&mut self, high: bool) {
        if high {
            infallible(self.0.set_high());
        } else {
            infallible(self.0.set_low());
        }
    }

    fn get(&mut self) -> bool {
        infallible(self.0.is_set_high())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorType, OutputPin};

    struct FakeGpio {
        high: bool,
    }

    impl ErrorType for FakeGpio {
        type Error = Infallible;
    }

    impl OutputPin for FakeGpio {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for FakeGpio {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    #[test]
    fn hal_pin_bridges_embedded_hal() {
        let mut pin = HalPin(FakeGpio { high: false });
        assert!(!pin.get());
        pin.set(true);
        assert!(pin.get());
        pin.set(false);
        assert!(!pin.get());
    }
}
