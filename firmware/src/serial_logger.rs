use core::fmt::Write as _;

use embassy_time::Instant;
use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::console;

/// Console verbosity. `Debug` also shows the driver's band and seek traces.
const LEVEL: LevelFilter = LevelFilter::Debug;

struct SerialLogger;

impl log::Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LEVEL
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let millis = Instant::now().as_millis();
        let _ = writeln!(
            console::stdout(),
            "[{:>6}.{:03}] {:<5} {}: {}",
            millis / 1000,
            millis % 1000,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LEVEL))
}
