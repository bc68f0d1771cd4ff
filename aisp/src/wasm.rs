use crate::{DocumentReport, Kernel};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmKernel {
    kernel: Kernel,
}

impl Default for WasmKernel {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmKernel {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();

        let mut kernel = Kernel::new();
        kernel.init();
        WasmKernel { kernel }
    }

    #[wasm_bindgen(js_name = init)]
    pub fn init(&mut self) -> i32 {
        self.kernel.init()
    }

    #[wasm_bindgen(js_name = parse)]
    pub fn parse(&mut self, source: &[u8]) -> i32 {
        self.kernel.parse(source)
    }

    #[wasm_bindgen(js_name = validate)]
    pub fn validate(&mut self, handle: i32) -> i32 {
        self.kernel.validate(handle)
    }

    #[wasm_bindgen(js_name = tier)]
    pub fn tier(&mut self, handle: i32) -> i32 {
        self.kernel.tier(handle)
    }

    #[wasm_bindgen(js_name = ambig)]
    pub fn ambig(&mut self, handle: i32) -> f32 {
        self.kernel.ambig(handle)
    }

    #[wasm_bindgen(js_name = density)]
    pub fn density(&mut self, handle: i32) -> f32 {
        self.kernel.density(handle)
    }

    #[wasm_bindgen(js_name = checkAmbiguity)]
    pub fn check_ambiguity(&mut self, handle: i32, ceiling: f32) -> i32 {
        self.kernel.check_ambiguity(handle, ceiling)
    }

    #[wasm_bindgen(js_name = release)]
    pub fn release(&mut self, handle: i32) -> i32 {
        self.kernel.release(handle)
    }

    #[wasm_bindgen(js_name = errorCode)]
    pub fn error_code(&self) -> i32 {
        self.kernel.error_code()
    }

    #[wasm_bindgen(js_name = errorOffset)]
    pub fn error_offset(&self) -> u32 {
        self.kernel.error_offset()
    }

    /// JSON report for a handle, or `{"error": ...}`
    #[wasm_bindgen(js_name = report)]
    pub fn report(&mut self, handle: i32) -> String {
        let report = match self.kernel.registry_mut() {
            Some(registry) => registry.report(handle),
            None => return r#"{"error":"kernel not initialized"}"#.to_string(),
        };

        match report {
            Ok(report) => to_json(&report),
            Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
        }
    }
}

fn to_json(report: &DocumentReport) -> String {
    serde_json::to_string(report)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}
