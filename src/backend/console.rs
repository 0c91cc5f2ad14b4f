//! Console sink: standard output for routine records, standard error for
//! ERROR and above. One process-wide mutex keeps lines from interleaving,
//! including writes made outside the worker thread. Write failures are
//! ignored.

use std::io::{self, Write as _};

use parking_lot::Mutex;

use crate::backend::format::format_record;
use crate::levels::Level;
use crate::record::Record;

static CONSOLE_LOCK: Mutex<()> = Mutex::new(());

pub(crate) fn write_record(record: &Record, use_color: bool) {
    let line = format_record(record, use_color);
    let _guard = CONSOLE_LOCK.lock();
    if record.level >= Level::Error {
        let _ = writeln!(io::stderr(), "{line}");
    } else {
        let _ = writeln!(io::stdout(), "{line}");
    }
}
