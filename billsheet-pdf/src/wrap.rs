//! Greedy word wrapping shared by table cells and free text blocks.
//!
//! Width measurement is supplied by the caller so the same routine
//! serves point-based table layout and page-unit canvases.

/// Word-wrap `text` into lines no wider than `avail_width`.
///
/// Explicit `\n` starts a new paragraph; blank paragraphs produce an
/// empty line. Words wider than the whole line are broken between
/// characters. Always returns at least one (possibly empty) line.
pub fn wrap_text(text: &str, avail_width: f64, measure: &dyn Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    for para in text.split('\n') {
        wrap_paragraph(para.trim(), avail_width, measure, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_paragraph(
    text: &str,
    avail_width: f64,
    measure: &dyn Fn(&str) -> f64,
    out: &mut Vec<String>,
) {
    if text.is_empty() {
        out.push(String::new());
        return;
    }
    let space_w = measure(" ");
    let mut current = String::new();
    let mut line_width = 0.0_f64;

    for word in text.split_whitespace() {
        let word_w = measure(word);
        let needed = if current.is_empty() {
            word_w
        } else {
            line_width + space_w + word_w
        };

        if needed <= avail_width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            line_width = needed;
            continue;
        }

        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if word_w <= avail_width {
            current.push_str(word);
            line_width = word_w;
            continue;
        }

        // Word wider than a full line: emit every full piece, keep the
        // tail open so the next word can share its line.
        let mut pieces = break_word(word, avail_width, measure);
        let tail = pieces.pop().unwrap_or_default();
        out.extend(pieces);
        line_width = measure(&tail);
        current = tail;
    }
    if !current.is_empty() {
        out.push(current);
    }
}

/// Split a single word into pieces that each fit `avail_width`.
/// A piece always holds at least one character.
fn break_word(word: &str, avail_width: f64, measure: &dyn Fn(&str) -> f64) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if measure(&piece) > avail_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is one unit wide.
    fn mono(s: &str) -> f64 {
        s.chars().count() as f64
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text("hello world", 20.0, &mono), vec!["hello world"]);
    }

    #[test]
    fn wraps_at_word_boundary() {
        assert_eq!(
            wrap_text("alpha beta gamma", 10.0, &mono),
            vec!["alpha beta", "gamma"]
        );
    }

    #[test]
    fn newline_starts_paragraph_and_trims() {
        assert_eq!(wrap_text("  one \n two", 20.0, &mono), vec!["one", "two"]);
    }

    #[test]
    fn blank_paragraph_is_kept() {
        assert_eq!(wrap_text("a\n\nb", 20.0, &mono), vec!["a", "", "b"]);
    }

    #[test]
    fn long_word_is_broken() {
        assert_eq!(
            wrap_text("abcdefghij xy", 4.0, &mono),
            vec!["abcd", "efgh", "ij", "xy"]
        );
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10.0, &mono), vec![String::new()]);
    }
}
