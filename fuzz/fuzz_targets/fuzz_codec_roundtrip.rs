//! Fuzz target for the item codec.
//!
//! Compression must either fail cleanly (character outside the alphabet) or
//! round-trip exactly; decompression of arbitrary bytes must never panic.

#![no_main]

use arm_codec::ItemCodec;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, &[u8])| {
    let (item, bytes) = input;
    let codec = ItemCodec::new(Some("0123456789abcdefghijklmnopqrstuvwxyz ,=."));

    if let Ok(compressed) = codec.compress(&item) {
        let decompressed = codec.decompress(&compressed).unwrap();
        assert_eq!(decompressed, item);
    }

    // Arbitrary bytes: decoding may fail, never panic.
    let _ = codec.decompress(bytes);
});
