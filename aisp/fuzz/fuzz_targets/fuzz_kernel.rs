#![no_main]

use aisp::Kernel;
use libfuzzer_sys::fuzz_target;

// Random call sequences against random handles
fuzz_target!(|input: (Vec<u8>, Vec<(u8, i8)>)| {
    let (source, calls) = input;
    let mut kernel = Kernel::new();
    kernel.init();

    let parsed = kernel.parse(&source);
    for (call, handle) in calls {
        let handle = if call & 0x80 != 0 { parsed } else { handle as i32 };
        match call % 6 {
            0 => assert!(kernel.validate(handle) <= 0),
            1 => assert!(kernel.tier(handle) <= 4),
            2 => assert!(kernel.density(handle) <= 1.0),
            3 => assert!(kernel.ambig(handle) <= 1.0),
            4 => assert!(kernel.check_ambiguity(handle, 0.5) <= 0),
            _ => assert!(kernel.release(handle) <= 0),
        }
        assert!(kernel.error_code() <= 0);
    }
});
