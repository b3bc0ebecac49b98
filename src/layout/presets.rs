use crate::foundation::{
    core::CanvasSize,
    error::{TilerError, TilerResult},
};

const LETTER72: CanvasSize = CanvasSize {
    width: 612,
    height: 792,
};
const LETTER200: CanvasSize = CanvasSize {
    width: 1700,
    height: 2200,
};
const LETTER300: CanvasSize = CanvasSize {
    width: 2550,
    height: 3300,
};

/// Commonly used output sizes: US letter at 72/200/300 DPI, portrait and
/// landscape (`h` prefix).
pub const SIZE_PRESETS: &[(&str, CanvasSize)] = &[
    ("letter72", LETTER72),
    ("letter200", LETTER200),
    ("letter300", LETTER300),
    ("hletter72", LETTER72.landscape()),
    ("hletter200", LETTER200.landscape()),
    ("hletter300", LETTER300.landscape()),
];

/// Preset used when none is requested.
pub const DEFAULT_SIZE_PRESET: &str = "letter300";

/// Look up a named canvas size.
pub fn size_preset(name: &str) -> TilerResult<CanvasSize> {
    SIZE_PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, size)| *size)
        .ok_or_else(|| {
            let known = SIZE_PRESETS
                .iter()
                .map(|(n, _)| *n)
                .collect::<Vec<_>>()
                .join(", ");
            TilerError::validation(format!("unknown size preset \"{name}\" (known: {known})"))
        })
}

/// Resolve a canvas size given either as a preset name or as explicit
/// `WIDTHxHEIGHT` pixels (e.g. `"1200x1800"`).
pub fn resolve_size(value: &str) -> TilerResult<CanvasSize> {
    let value = value.trim();
    if let Some((w, h)) = value.split_once(['x', 'X'])
        && let (Ok(w), Ok(h)) = (w.trim().parse::<u32>(), h.trim().parse::<u32>())
    {
        return CanvasSize::new(w, h);
    }
    size_preset(value)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/presets.rs"]
mod tests;
