#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

use circulate::{DelimitedRecordSource, RecordSource};

fuzz_target!(|data: &[u8]| {
    if let Ok(mut source) = DelimitedRecordSource::from_reader(Cursor::new(data), "===") {
        // Fuzz record parsing - malformed input must error, never panic
        while let Ok(Some(_)) = source.next_record() {}
    }
});
