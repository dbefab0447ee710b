#![no_main]

use jwks_manager::KeyRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Store files are attacker-influenced only if the directory is, but
    // a corrupted record must still fail decode without panicking
    if let Ok(record) = serde_json::from_slice::<KeyRecord>(data) {
        let _ = record.signing_key();
        let _ = record.credentials();
        let _ = record.is_expired(90);
    }
});
