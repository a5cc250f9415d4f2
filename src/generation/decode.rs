//! La detección del relleno intercalado es heurística: un texto corto que
//! alterna espacios de forma natural puede dar un falso positivo.

const UNICODE_MARKER: &str = "UNICODE";
const SAMPLE_LIMIT: usize = 100;
const MIN_SPACED_LEN: usize = 10;
const INTERLEAVE_RATIO: f64 = 0.8;

pub fn decode_text(raw: &str) -> String {
    let text = raw.strip_prefix(UNICODE_MARKER).unwrap_or(raw).trim();
    let bytes = text.as_bytes();

    // Un nulo nunca aparece en texto legítimo, así que no exige muestra mínima.
    if odd_ratio(bytes, |byte| byte == 0) > INTERLEAVE_RATIO {
        let kept: Vec<u8> = even_bytes(bytes).filter(|byte| *byte != 0).collect();
        return String::from_utf8_lossy(&kept).into_owned();
    }

    if bytes.len() >= MIN_SPACED_LEN && odd_ratio(bytes, |byte| byte == b' ') > INTERLEAVE_RATIO {
        let kept: Vec<u8> = even_bytes(bytes).collect();
        return String::from_utf8_lossy(&kept).into_owned();
    }

    text.to_string()
}

fn odd_ratio(bytes: &[u8], matches: impl Fn(u8) -> bool) -> f64 {
    let sample = &bytes[..bytes.len().min(SAMPLE_LIMIT)];
    let mut total = 0_usize;
    let mut hits = 0_usize;
    for byte in sample.iter().skip(1).step_by(2) {
        total += 1;
        if matches(*byte) {
            hits += 1;
        }
    }

    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

fn even_bytes(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes.iter().step_by(2).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_ascii_is_unchanged() {
        let text = "masterpiece, best quality, 1girl";
        assert_eq!(decode_text(text), text);
    }

    #[test]
    fn null_interleaved_text_is_collapsed() {
        assert_eq!(decode_text("a\0b\0c\0"), "abc");
        assert_eq!(decode_text("S\0t\0e\0p\0s\0:\0 \x002\x000\0"), "Steps: 20");
    }

    #[test]
    fn unicode_marker_is_stripped_before_detection() {
        let encoded: String = "cat girl, smiling"
            .chars()
            .flat_map(|c| [c, '\0'])
            .collect();
        let raw = format!("UNICODE {encoded}");
        assert_eq!(decode_text(&raw), "cat girl, smiling");
    }

    #[test]
    fn space_interleaved_text_drops_filler() {
        assert_eq!(decode_text("c a t   g i r l"), "cat girl");
    }

    #[test]
    fn short_spaced_text_is_left_alone() {
        assert_eq!(decode_text("a b c"), "a b c");
    }

    #[test]
    fn marker_and_whitespace_are_trimmed() {
        assert_eq!(decode_text("UNICODE   hello there  "), "hello there");
    }
}
