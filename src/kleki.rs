//! Page scripts for the Kleki painter
//!
//! Kleki exposes `KL.draw(points)`, which strokes one continuous path through
//! an array of `{x, y}` canvas coordinates with the current brush.

use crate::stroke::Point;
use crate::transform::CanvasSize;
use crate::{Error, Result};
use serde::Deserialize;
use std::fmt::Write;

/// Evaluates to `true` once `KL.draw` is callable.
pub const READY_PROBE: &str = "!!(window.KL && typeof KL.draw === 'function')";

/// `KL.draw([...]);` for one stroke, coordinates rounded to two decimals.
pub fn draw_call(points: &[Point]) -> String {
    let mut js = String::with_capacity(16 + points.len() * 24);
    js.push_str("KL.draw([");
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            js.push(',');
        }
        let _ = write!(js, "{{x:{:.2},y:{:.2}}}", p.x, p.y);
    }
    js.push_str("]);");
    js
}

/// Wrap `statements` so a thrown exception comes back as its message.
///
/// The wrapped script evaluates to `null` on success and to `String(e)` when
/// the page threw. Read the result with [`check_guarded`].
pub fn guarded(statements: &str) -> String {
    format!("(function(){{try{{{statements}return null;}}catch(e){{return String(e);}}}})()")
}

/// [`draw_call`] inside [`guarded`].
pub fn guarded_draw_call(points: &[Point]) -> String {
    guarded(&draw_call(points))
}

/// Turn the value of a [`guarded`] script into a result.
pub fn check_guarded(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Null => Ok(()),
        serde_json::Value::String(msg) => Err(Error::ExternalCall(format!("page script threw: {}", msg))),
        other => Err(Error::ExternalCall(format!("unexpected page script result {}", other))),
    }
}

/// Script returning `{"width":..,"height":..}` as a JSON string, or `null`
/// when no element matches `selector`.
pub fn canvas_size_script(selector: &str) -> String {
    // serde_json gives a correctly escaped JS string literal
    let sel = serde_json::to_string(selector).unwrap_or_else(|_| "\"canvas\"".to_string());
    format!(
        "(function(){{const c=document.querySelector({sel});return c?JSON.stringify({{width:c.width,height:c.height}}):null;}})()"
    )
}

#[derive(Deserialize)]
struct RawSize {
    width: f64,
    height: f64,
}

/// Decode the value returned by [`canvas_size_script`].
pub fn parse_canvas_size(value: &serde_json::Value) -> Result<CanvasSize> {
    let text = value
        .as_str()
        .ok_or_else(|| Error::ExternalCall(format!("canvas not found (probe returned {})", value)))?;
    let raw: RawSize = serde_json::from_str(text)
        .map_err(|e| Error::ExternalCall(format!("unexpected canvas size payload {:?}: {}", text, e)))?;

    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(raw.width) || !usable(raw.height) {
        return Err(Error::ExternalCall(format!("unusable canvas size {}x{}", raw.width, raw.height)));
    }
    Ok(CanvasSize::new(raw.width, raw.height))
}
