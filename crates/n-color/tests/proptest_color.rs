//! Property tests for hex canonicalization and HSL/HSV round-trips.

use n_color::{Color, Hsla, Rgba};
use proptest::prelude::*;

fn hex_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(b"0123456789abcdefABCDEF".to_vec()),
        len,
    )
    .prop_map(|bytes| String::from_utf8(bytes).unwrap_or_default())
}

fn any_hex() -> impl Strategy<Value = String> {
    prop_oneof![hex_string(3), hex_string(4), hex_string(6), hex_string(8)]
}

/// Expand a short form to the 8-digit lowercase canonical form by hand.
fn canonical(hex: &str) -> String {
    let lower = hex.to_ascii_lowercase();
    match lower.len() {
        3 => lower.chars().flat_map(|c| [c, c]).chain("ff".chars()).collect(),
        4 => lower.chars().flat_map(|c| [c, c]).collect(),
        6 => format!("{lower}ff"),
        _ => lower,
    }
}

fn channels_close(a: Color, b: Color) -> bool {
    let (ar, ag, ab, aa) = a.to_rgba8();
    let (br, bg, bb, ba) = b.to_rgba8();
    [(ar, br), (ag, bg), (ab, bb), (aa, ba)]
        .iter()
        .all(|&(x, y)| (i16::from(x) - i16::from(y)).abs() <= 1)
}

proptest! {
    #[test]
    fn to_hex_of_from_hex_is_canonical(hex in any_hex()) {
        let color = Color::from_hex(&hex).unwrap();
        prop_assert_eq!(color.to_hex(), canonical(&hex));
    }

    #[test]
    fn leading_hash_is_optional(hex in any_hex()) {
        let with_hash = Color::from_hex(&format!("#{hex}")).unwrap();
        let without = Color::from_hex(&hex).unwrap();
        prop_assert_eq!(with_hash, without);
    }

    #[test]
    fn hsla_roundtrip_within_one(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255, a in 0.0f64..=1.0) {
        let color = Color::rgba8(r, g, b, a);
        let back = Color::from(Rgba::from(color.hsla()));
        prop_assert!(channels_close(color, back), "{color:?} vs {back:?}");
    }

    #[test]
    fn hsva_roundtrip_within_one(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
        let color = Color::rgba8(r, g, b, 1.0);
        let back = Color::from(Rgba::from(color.hsva()));
        prop_assert!(channels_close(color, back), "{color:?} vs {back:?}");
    }

    #[test]
    fn darken_then_lighten_follows_formula(
        h in 0.0f64..360.0,
        s in 0.0f64..=1.0,
        l in 0.0f64..=1.0,
        f in 0.0f64..=1.0,
    ) {
        let color = Color::from(Hsla::new(h, s, l, 1.0));
        let back = color.darken(f).lighten(f);
        let expected = (l * (1.0 - f) * (1.0 + f)).clamp(0.0, 1.0);
        prop_assert!((back.hsla().l() - expected).abs() < 1e-9);
    }

    #[test]
    fn malformed_lengths_are_rejected(hex in hex_string(5)) {
        prop_assert!(Color::from_hex(&hex).is_err());
    }
}
