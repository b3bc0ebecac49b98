use super::*;

#[test]
fn letter_presets_match_print_sizes() {
    assert_eq!(size_preset("letter72").unwrap(), CanvasSize { width: 612, height: 792 });
    assert_eq!(size_preset("letter200").unwrap(), CanvasSize { width: 1700, height: 2200 });
    assert_eq!(size_preset("letter300").unwrap(), CanvasSize { width: 2550, height: 3300 });
}

#[test]
fn landscape_presets_swap_axes() {
    for dpi in ["72", "200", "300"] {
        let portrait = size_preset(&format!("letter{dpi}")).unwrap();
        let landscape = size_preset(&format!("hletter{dpi}")).unwrap();
        assert_eq!(portrait.landscape(), landscape);
    }
}

#[test]
fn default_preset_exists() {
    assert!(size_preset(DEFAULT_SIZE_PRESET).is_ok());
}

#[test]
fn unknown_preset_lists_known_names() {
    let err = size_preset("a4").unwrap_err();
    assert!(matches!(err, TilerError::Validation(_)));
    assert!(err.to_string().contains("letter300"));
}

#[test]
fn explicit_dimensions_are_accepted() {
    assert_eq!(resolve_size("1200x1800").unwrap(), CanvasSize { width: 1200, height: 1800 });
    assert_eq!(resolve_size(" 640X480 ").unwrap(), CanvasSize { width: 640, height: 480 });
    assert_eq!(resolve_size("hletter72").unwrap(), CanvasSize { width: 792, height: 612 });
    assert!(resolve_size("0x10").is_err());
    assert!(resolve_size("axb").is_err());
}
