#![no_main]

use libfuzzer_sys::fuzz_target;

use circulate::Snapshot;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzz snapshot decoding - this should never panic
        if let Ok(snapshot) = serde_json::from_str::<Snapshot>(content) {
            // anything that decodes must re-encode
            let _ = serde_json::to_string(&snapshot);
        }
    }
});
