use std::sync::OnceLock;

use chatmark_core::{Citation, MathRenderer, RenderOptions, TypstMath};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsRenderOptions {
    link_display_limit: Option<usize>,
    math: Option<bool>,
    sanitized: Option<bool>,
}

static MATH: OnceLock<TypstMath> = OnceLock::new();

/// Renders `text` to HTML. `citations` is an array of descriptors and
/// `options` a plain object; both may be `null` or `undefined`.
#[wasm_bindgen]
pub fn render_html(text: &str, citations: JsValue, options: JsValue) -> Result<String, JsValue> {
    let citations = citations_from_js(citations)?;
    let (options, sanitized) = options_from_js(options)?;
    let math = options
        .math
        .then(|| MATH.get_or_init(TypstMath::new) as &dyn MathRenderer);

    Ok(if sanitized {
        chatmark_core::render_sanitized_with_options(text, &citations, &options, math)
    } else {
        chatmark_core::render_with_options(text, &citations, &options, math)
    })
}

fn citations_from_js(value: JsValue) -> Result<Vec<Citation>, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(Vec::new());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(value: JsValue) -> Result<(RenderOptions, bool), JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok((RenderOptions::default(), false));
    }
    let parsed: JsRenderOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let mut out = RenderOptions::default();
    if let Some(limit) = parsed.link_display_limit {
        out.link_display_limit = limit;
    }
    if let Some(math) = parsed.math {
        out.math = math;
    }
    Ok((out, parsed.sanitized.unwrap_or(false)))
}
