//! Full-width punctuation normalization applied before text is executed.

/// Maps a full-width punctuation character to its ASCII counterpart.
fn half_width(ch: char) -> Option<char> {
    let ascii = match ch {
        '＜' => '<',
        '＞' => '>',
        '＝' => '=',
        '，' => ',',
        '（' => '(',
        '）' => ')',
        '［' => '[',
        '］' => ']',
        '：' => ':',
        '；' => ';',
        _ => return None,
    };
    Some(ascii)
}

/// Replaces full-width `＜ ＞ ＝ ， （ ） ［ ］ ： ；` with ASCII. Every other
/// character passes through unchanged.
pub fn normalize_punctuation(text: &str) -> String {
    text.chars().map(|ch| half_width(ch).unwrap_or(ch)).collect()
}
