use dickson::pattern::{Label, classify, exhaustive_cardinality_two};
use dickson::primes::odd_primes;
use dickson::rings::Fp;
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

/// The classified cardinality-2 indices of all odd primes up to
/// `maxPrime`, for the interactive chart.
///
/// Every element is an object `{ p, n, pattern }`, where `pattern` is 1, 2
/// or 3, or 0 for an index that matches none of the closed forms.
#[wasm_bindgen(js_name = "patternSeries")]
pub fn pattern_series(
    #[wasm_bindgen(js_name = "maxPrime")]
    max_prime: u64,
) -> Result<Array, String> {
    let points = Array::new();
    for p in odd_primes(3..=max_prime) {
        let r = Fp::new(p).map_err(|e| e.to_string())?;
        let indices = exhaustive_cardinality_two(&r);
        for (n, label) in classify(p, &indices) {
            let pattern = match label {
                Label::Pattern(pattern) => pattern.number(),
                Label::Residual => 0,
            };
            points.push(&point(p, n, pattern)?);
        }
    }
    Ok(points)
}

fn point(p: u64, n: u64, pattern: usize) -> Result<JsValue, String> {
    let obj = Object::new();
    let set = |key: &str, value: f64| {
        Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_f64(value))
            .map_err(|_| format!("failed to set '{key}'"))
    };
    set("p", p as f64)?;
    set("n", n as f64)?;
    set("pattern", pattern as f64)?;
    Ok(obj.into())
}
