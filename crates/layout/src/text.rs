//! Folding arbitrary text into what a WinAnsi-encoded standard font can show.

/// Normalizes `text` for drawing, keeping newlines.
///
/// - `\r\n` and lone `\r` become `\n`, tabs become a space
/// - non-breaking and other unicode spaces become a plain space
/// - typographic quotes, dashes, ellipsis and bullets become ASCII
/// - anything else outside printable ASCII and Latin-1 (0xA1..=0xFF) is dropped
pub fn sanitize(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' | '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => {
                out.push(' ')
            }
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{00B4}' => {
                out.push('\'')
            }
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
            | '\u{00BB}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' | '\u{00B7}' => out.push('*'),
            ' '..='~' | '\u{00A1}'..='\u{00FF}' => out.push(c),
            _ => {}
        }
    }
    out
}

/// Like [`sanitize`] but for a single line: newlines are dropped too.
pub fn sanitize_line(text: &str) -> String {
    let mut line = sanitize(text);
    line.retain(|c| c != '\n');
    line
}

/// Encodes already-sanitized text as WinAnsi bytes. Latin-1 code points map
/// to the same byte; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}
