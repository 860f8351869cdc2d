mod series;

use dickson::rings::Fp;
use dickson::pattern::exhaustive_cardinality_two;
use wasm_bindgen::prelude::*;

/// Sets the panic hook to display useful error messages.
#[wasm_bindgen(js_name = "setPanicHook")]
pub fn set_panic_hook() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}

/// The sorted values of D_n(1, x) mod p.
#[wasm_bindgen(js_name = "valueSet")]
pub fn value_set(n: u64, p: u64) -> Result<Vec<u64>, String> {
    let vs = dickson::compute_value_set(n, p).map_err(|e| e.to_string())?;
    Ok(vs.values().iter().copied().collect())
}

/// The n < p^2 for which D_n(1, x) mod p takes exactly two values.
#[wasm_bindgen(js_name = "cardinalityTwoIndices")]
pub fn cardinality_two_indices(p: u64) -> Result<Vec<u64>, String> {
    let r = Fp::new(p).map_err(|e| e.to_string())?;
    Ok(exhaustive_cardinality_two(&r))
}
