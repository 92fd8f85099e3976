use crate::metrics::{FontFace, FontMetrics};
use crate::text::sanitize;

/// One output line of the wrapper. An empty `text` is a blank line that still
/// takes up vertical space.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub width: f32,
}

/// Greedy word wrap of a single paragraph (no newlines).
///
/// Words are appended while the candidate line fits in `max_width`. A word that
/// is wider than `max_width` on its own is placed alone on its line rather than
/// split.
pub fn wrap_paragraph<M: FontMetrics + ?Sized>(
    paragraph: &str,
    max_width: f32,
    metrics: &M,
    face: FontFace,
    size: f32,
) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in paragraph.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        let candidate_width = metrics.measure_width(&candidate, face, size);

        if candidate_width > max_width && !current.is_empty() {
            lines.push(WrappedLine {
                text: std::mem::take(&mut current),
                width: current_width,
            });
            current_width = metrics.measure_width(word, face, size);
            current = word.to_string();
        } else {
            current = candidate;
            current_width = candidate_width;
        }
    }

    lines.push(WrappedLine {
        text: current,
        width: current_width,
    });
    lines
}

/// Sanitizes `text`, splits it on newlines into paragraphs and wraps each one.
/// Empty paragraphs produce a single blank line so authored spacing survives.
pub fn wrap_text<M: FontMetrics + ?Sized>(
    text: &str,
    max_width: f32,
    metrics: &M,
    face: FontFace,
    size: f32,
) -> Vec<WrappedLine> {
    sanitize(text)
        .split('\n')
        .flat_map(|paragraph| wrap_paragraph(paragraph, max_width, metrics, face, size))
        .collect()
}
