#![no_main]

use aisp::{ErrorCode, Registry, AISP_MAX_DEPTH};
use libfuzzer_sys::fuzz_target;

const DELIMITERS: [(&str, &str); 5] = [("⟦", "⟧"), ("⟨", "⟩"), ("{", "}"), ("(", ")"), ("[", "]")];

fuzz_target!(|shape: Vec<u8>| {
    let mut registry = Registry::new();

    let depth = shape.len() % 64;
    let mut source = String::from("x ≜ 1");
    for byte in shape.iter().take(depth) {
        let (open, close) = DELIMITERS[*byte as usize % DELIMITERS.len()];
        source = format!("{}{}{}", open, source, close);
    }

    match registry.parse(source.as_bytes()) {
        Ok(_) => assert!(depth <= AISP_MAX_DEPTH),
        Err(e) => assert!(depth > AISP_MAX_DEPTH && e.code() == ErrorCode::Overflow),
    }
});
