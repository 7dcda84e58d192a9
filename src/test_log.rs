// Captures log records per test thread so tests can assert on diagnostics
// without seeing each other's output.
use log::{Level, LevelFilter, Metadata, Record};
use std::cell::RefCell;
use std::sync::Once;

thread_local! {
    static RECORDS: RefCell<Option<Vec<(Level, String)>>> =
        const { RefCell::new(None) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            if let Some(records) = records.borrow_mut().as_mut() {
                records.push((record.level(), format!("{}", record.args())));
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<(Level, String)>) {
    INIT.call_once(|| {
        _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });

    RECORDS.with(|records| *records.borrow_mut() = Some(Vec::new()));
    let result = f();
    let records = RECORDS
        .with(|records| records.borrow_mut().take())
        .unwrap_or_default();
    (result, records)
}
