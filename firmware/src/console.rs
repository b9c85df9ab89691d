use core::cell::RefCell;

use critical_section::Mutex;
use embassy_nrf::uarte;

static TX: Mutex<RefCell<Option<uarte::UarteTx<'static>>>> = Mutex::new(RefCell::new(None));

/// Hand the UART transmitter to the console. Output before this is dropped.
pub fn init(tx: uarte::UarteTx<'static>) {
    critical_section::with(|cs| {
        TX.borrow_ref_mut(cs).replace(tx);
    });
}

pub fn stdout() -> Console {
    Console
}

/// Blocking console writer shared by the logger and the tasks. Every write
/// holds a critical section.
pub struct Console;

impl Console {
    fn blocking_write(&self, buf: &[u8]) -> Result<(), uarte::Error> {
        critical_section::with(|cs| match TX.borrow_ref_mut(cs).as_mut() {
            Some(tx) => tx.blocking_write(buf),
            None => Ok(()),
        })
    }
}

impl embedded_io::ErrorType for Console {
    type Error = uarte::Error;
}

impl embedded_io::Write for Console {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.blocking_write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl core::fmt::Write for Console {
    // terminals want CR LF
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for (i, line) in s.split('\n').enumerate() {
            if i > 0 {
                self.blocking_write(b"\r\n").map_err(|_| core::fmt::Error)?;
            }
            self.blocking_write(line.as_bytes())
                .map_err(|_| core::fmt::Error)?;
        }
        Ok(())
    }
}
