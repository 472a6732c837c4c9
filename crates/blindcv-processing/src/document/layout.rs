//! Page geometry and line wrapping for the rendered PDF.
//!
//! All measurements are in PDF points (1/72 inch).

const POINTS_PER_INCH: f32 = 72.0;

/// Fixed formatting rules of an anonymized document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub leading: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::letter()
    }
}

impl PageLayout {
    /// US Letter, 0.75 in margins, 10 pt body text on 14 pt leading.
    pub fn letter() -> Self {
        Self {
            page_width: 8.5 * POINTS_PER_INCH,
            page_height: 11.0 * POINTS_PER_INCH,
            margin: 0.75 * POINTS_PER_INCH,
            font_size: 10.0,
            leading: 14.0,
        }
    }

    pub fn text_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn available_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    /// Baseline of the first line.
    pub fn first_baseline(&self) -> f32 {
        self.page_height - self.margin - self.font_size
    }

    pub fn content_height(&self, line_count: usize) -> f32 {
        line_count as f32 * self.leading
    }

    pub fn fits(&self, line_count: usize) -> bool {
        self.content_height(line_count) <= self.available_height()
    }

    /// Width of `text` set in Helvetica at this layout's font size.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars().map(helvetica_width).sum::<u32>() as f32 * self.font_size / 1000.0
    }

    /// Split `text` into rendered lines.
    ///
    /// Every `\n` is a hard break (empty lines are kept); longer lines are
    /// wrapped at spaces, and words wider than a full line are broken.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let max_width = self.text_width();
        let mut lines = Vec::new();

        for raw_line in text.split('\n') {
            let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if raw_line.trim().is_empty() {
                lines.push(String::new());
                continue;
            }

            let mut current = String::new();
            for word in raw_line.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };

                if self.measure(&candidate) <= max_width {
                    current = candidate;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }

                if self.measure(word) <= max_width {
                    current = word.to_string();
                } else {
                    let mut pieces = self.break_word(word);
                    current = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                }
            }
            lines.push(current);
        }

        lines
    }

    fn break_word(&self, word: &str) -> Vec<String> {
        let max_width = self.text_width();
        let mut pieces = Vec::new();
        let mut piece = String::new();
        for ch in word.chars() {
            piece.push(ch);
            if self.measure(&piece) > max_width && piece.chars().count() > 1 {
                piece.pop();
                pieces.push(std::mem::take(&mut piece));
                piece.push(ch);
            }
        }
        pieces.push(piece);
        pieces
    }
}

/// Helvetica advance width in 1/1000 em.
fn helvetica_width(ch: char) -> u32 {
    match ch {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | 'I' | '[' | '\\' | ']' | 'f' | 't' => 278,
        '"' => 355,
        '#' | '$' | '0'..='9' | '?' | 'L' | '_' | 'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n'
        | 'o' | 'p' | 'q' | 'u' => 556,
        '%' => 889,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        '\'' => 191,
        '(' | ')' | '-' | '`' | 'r' => 333,
        '*' => 389,
        '+' | '<' | '=' | '>' | '~' => 584,
        '@' => 1015,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 722,
        'F' | 'T' | 'Z' => 611,
        'G' | 'O' | 'Q' => 778,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
        'M' | 'm' => 833,
        'W' => 944,
        '^' => 469,
        'i' | 'j' | 'l' => 222,
        '{' | '}' => 334,
        '|' => 260,
        '\t' => 278 * 4,
        // accented Latin letters and everything else: average lowercase width
        _ => 556,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_geometry() {
        let layout = PageLayout::letter();
        assert_eq!(layout.page_width, 612.0);
        assert_eq!(layout.page_height, 792.0);
        assert_eq!(layout.margin, 54.0);
        assert_eq!(layout.text_width(), 504.0);
        assert_eq!(layout.available_height(), 684.0);
    }

    #[test]
    fn test_fits() {
        let layout = PageLayout::letter();
        // 684 / 14 = 48.86
        assert!(layout.fits(48));
        assert!(!layout.fits(49));
    }

    #[test]
    fn test_measure() {
        let layout = PageLayout::letter();
        // "Hi" = 722 + 222
        assert!((layout.measure("Hi") - 9.44).abs() < 0.001);
        assert_eq!(layout.measure(""), 0.0);
    }

    #[test]
    fn test_wrap_keeps_hard_breaks_and_blank_lines() {
        let layout = PageLayout::letter();
        let lines = layout.wrap("EXPERIÊNCIA\r\n\nRust, Python");
        assert_eq!(lines, vec!["EXPERIÊNCIA", "", "Rust, Python"]);
    }

    #[test]
    fn test_wrap_long_line_at_word_boundaries() {
        let layout = PageLayout::letter();
        let text = "palavra ".repeat(60);
        let lines = layout.wrap(text.trim_end());

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(layout.measure(line) <= layout.text_width());
            assert!(!line.starts_with(' '));
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text.trim_end());
    }

    #[test]
    fn test_wrap_breaks_oversized_word() {
        let layout = PageLayout::letter();
        let word = "W".repeat(200);
        let lines = layout.wrap(&word);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(layout.measure(line) <= layout.text_width());
        }
    }
}
