#![no_main]

use libfuzzer_sys::fuzz_target;
use paramguard_core::{Filter, Params, ParamsConfig};

// Input layout: filter list (JSON), a NUL byte, then the request body (JSON).
fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|b| *b == 0) else {
        return;
    };
    let (filters, body) = (&data[..split], &data[split + 1..]);

    let Ok(filters) = serde_json::from_slice::<serde_json::Value>(filters) else {
        return;
    };
    let Ok(filters) = Filter::parse_list(&filters) else {
        return;
    };
    let Ok(body) = std::str::from_utf8(body) else {
        return;
    };
    let Ok(params) = Params::from_json_str(body) else {
        return;
    };

    let _ = params.check(&filters);
    if let Ok(Some(out)) = params.permit_with(&filters, &ParamsConfig::strict()) {
        assert!(out.is_permitted());
    }
});
