#![no_main]

use libfuzzer_sys::fuzz_target;
use modmenu_json::{decode, encode};

// Decode arbitrary text; anything that parses must re-encode and parse
// again without error.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(value) = decode(text) {
        let encoded = encode(&value).expect("decoded value must re-encode");
        decode(&encoded).expect("encoded text must re-decode");
    }
});
