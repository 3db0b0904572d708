use super::metrics::FontMetrics;

/// Break `text` into lines no wider than `max_width`.
///
/// Newlines are hard breaks and blank lines are kept. Within a paragraph
/// words are packed greedily and joined by a single space; a word that is
/// wider than a whole line is split between characters.
pub fn wrap_text<M: FontMetrics + ?Sized>(
    text: &str,
    max_width: f32,
    font_size: f32,
    metrics: &M,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph.trim_end_matches('\r'), max_width, font_size, metrics, &mut lines);
    }
    lines
}

fn wrap_paragraph<M: FontMetrics + ?Sized>(
    paragraph: &str,
    max_width: f32,
    font_size: f32,
    metrics: &M,
    lines: &mut Vec<String>,
) {
    let fits = |s: &str| metrics.text_width(s, font_size) <= max_width;
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        if !fits(word) {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = split_word(word, max_width, font_size, metrics);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if fits(&candidate) {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    lines.push(current);
}

fn split_word<M: FontMetrics + ?Sized>(
    word: &str,
    max_width: f32,
    font_size: f32,
    metrics: &M,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && metrics.text_width(&piece, font_size) > max_width {
            piece.pop();
            pieces.push(std::mem::replace(&mut piece, c.to_string()));
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
