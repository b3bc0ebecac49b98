use super::*;

#[test]
fn named_colors_resolve_case_insensitively() {
    assert_eq!(parse_color("white").unwrap(), Rgba([255, 255, 255, 255]));
    assert_eq!(parse_color("Black").unwrap(), Rgba([0, 0, 0, 255]));
    assert_eq!(
        parse_color("  CornflowerBlue ").unwrap(),
        Rgba([0x64, 0x95, 0xed, 255])
    );
}

#[test]
fn every_table_entry_is_reachable() {
    for (name, [r, g, b]) in NAMED_COLORS {
        assert_eq!(parse_color(name).unwrap(), Rgba([*r, *g, *b, 255]), "{name}");
    }
}

#[test]
fn hex_colors_parse_with_and_without_alpha() {
    assert_eq!(parse_color("#ff3366").unwrap(), Rgba([0xff, 0x33, 0x66, 255]));
    assert_eq!(parse_color("#FF336680").unwrap(), Rgba([0xff, 0x33, 0x66, 0x80]));
}

#[test]
fn unknown_and_malformed_colors_are_validation_errors() {
    assert!(matches!(
        parse_color("notacolor"),
        Err(TilerError::Validation(_))
    ));
    assert!(matches!(parse_color("#12345"), Err(TilerError::Validation(_))));
    assert!(matches!(parse_color("#zzzzzz"), Err(TilerError::Validation(_))));
}
