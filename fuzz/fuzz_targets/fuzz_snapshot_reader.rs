//! Fuzz target for snapshot reading.
//!
//! Snapshots may come from untrusted sources; parsing must handle arbitrary
//! input without panicking.

#![no_main]

use arm_snapshot::SnapshotReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = SnapshotReader::from_bytes(data.to_vec());
});
