//! The single consumer thread.
//!
//! Wakes on queue activity, moves up to a batch of records out of the queue,
//! and dispatches each with the queue lock released: console first, then
//! file. On stop it drains whatever is left in one final pass.

use std::sync::Arc;

use crate::backend::{console, file};
use crate::levels::{COLOR_OUT, CONSOLE_OUT, FILE_OUT};
use crate::logger::Core;
use crate::record::Record;

/// Upper bound on records moved out of the queue per wake. Dispatch runs
/// outside the queue lock either way; this only bounds producer lock
/// latency during long backlogs.
pub(crate) const BATCH_CAP: usize = 100;

pub(crate) fn run(core: Arc<Core>) {
    while !core.stop_requested() {
        let batch = core.queue.pop_batch(BATCH_CAP, core.stop_flag());
        for record in &batch {
            dispatch(&core, record);
        }
    }

    for record in core.queue.drain_all() {
        dispatch(&core, &record);
    }
}

fn dispatch(core: &Core, record: &Record) {
    let mode = core.output_mode();
    if mode & CONSOLE_OUT != 0 {
        console::write_record(record, mode & COLOR_OUT != 0);
    }
    if mode & FILE_OUT != 0 {
        file::write_to_file(core, record);
    }
}
