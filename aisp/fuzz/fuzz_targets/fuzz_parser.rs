#![no_main]

use aisp::Registry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut registry = Registry::new();

    if let Ok(handle) = registry.parse(data) {
        let _ = registry.validate(handle);
        let density = registry.density(handle).unwrap_or(0.0);
        let ambiguity = registry.ambiguity(handle).unwrap_or(0.0);
        assert!((0.0..=1.0).contains(&density));
        assert!((0.0..=1.0).contains(&ambiguity));
    }
});
