#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header parsing must either succeed or fail gracefully on arbitrary
    // text - it should NEVER panic.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(metadata) = speccube::header::AcquisitionMetadata::parse(text) {
        // Exercise the serializer too; adversarial camera keys may shadow
        // header labels on reparse, so only graceful failure is required.
        let formatted = metadata.to_header_text();
        let _ = speccube::header::AcquisitionMetadata::parse(&formatted);
    }
});
