//! Static font-metric tables for the PDF standard fonts used by the portable-page export.
//!
//! Character widths are in em units (relative to font size), taken from the Adobe AFM files
//! for Helvetica and Helvetica-Bold. Tables cover ASCII 0x20..=0x7E (95 printable characters);
//! index = (char as usize) - 32. Anything else measures as `average_char_width`.
//!
//! Measurement feeds the greedy word wrap used to decide how many lines a bullet occupies
//! before it is placed on a page.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font faces
// ────────────────────────────────────────────────────────────────────────────

/// The two faces the PDF export writes with. Both are PDF standard-14 fonts, so nothing is
/// embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
}

impl FontFace {
    /// PostScript name written into the font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used by content-stream `Tf` operators.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Rendered width of `s` in points at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Greedy word wrap of `text` into lines no wider than `max_width_pt` at `size_pt`.
    ///
    /// Explicit line breaks in `text` always start a new line; blank source lines are dropped.
    /// Words are re-joined with single spaces. A word wider than the whole line is broken
    /// between characters. Blank text yields no lines.
    pub fn wrap(&self, text: &str, max_width_pt: f32, size_pt: f32) -> Vec<String> {
        let max_width = max_width_pt / size_pt;
        text.lines()
            .flat_map(|line| self.wrap_line(line, max_width))
            .collect()
    }

    /// Wraps one source line. `max_width` is in em units.
    fn wrap_line(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_w = self.measure_str(word);
            let space_w = if current.is_empty() {
                0.0
            } else {
                self.space_width
            };

            if current_width + space_w + word_w <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += space_w + word_w;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_w <= max_width {
                current.push_str(word);
                current_width = word_w;
            } else {
                // Hard-break an over-long word; the last fragment stays open for the next word.
                for c in word.chars() {
                    let w = self.char_width(c);
                    if !current.is_empty() && current_width + w > max_width {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                    }
                    current.push(c);
                    current_width += w;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.611,
    space_width: 0.278,
};

/// Returns the static metric table for a given face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Helvetica => &HELVETICA_TABLE,
        FontFace::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontFace::Helvetica);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFace::Helvetica);
        // "Rust" = R(0.722) + u(0.556) + s(0.500) + t(0.278) = 2.056
        let width = metrics.measure_str("Rust");
        assert!((width - 2.056).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = get_metrics(FontFace::Helvetica);
        let width = metrics.measure_str("é");
        assert!((width - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_not_narrower_than_regular() {
        let text = "Professional Experience";
        let regular = get_metrics(FontFace::Helvetica).measure_str(text);
        let bold = get_metrics(FontFace::HelveticaBold).measure_str(text);
        assert!(bold >= regular);
    }

    #[test]
    fn test_width_pt_scales_with_size() {
        let metrics = get_metrics(FontFace::Helvetica);
        let w10 = metrics.width_pt("abc", 10.0);
        let w20 = metrics.width_pt("abc", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_blank_text_has_no_lines() {
        let metrics = get_metrics(FontFace::Helvetica);
        assert!(metrics.wrap("", 400.0, 10.0).is_empty());
        assert!(metrics.wrap("   ", 400.0, 10.0).is_empty());
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let metrics = get_metrics(FontFace::Helvetica);
        assert_eq!(
            metrics.wrap("Kubernetes on EKS", 400.0, 10.0),
            vec!["Kubernetes on EKS".to_string()]
        );
    }

    #[test]
    fn test_wrap_respects_width_and_keeps_words() {
        let metrics = get_metrics(FontFace::Helvetica);
        let text = "Migrated forty services from hand-rolled VMs to a managed Kubernetes \
                    platform with GitOps delivery and automated rollback on failed health checks";
        let lines = metrics.wrap(text, 200.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.width_pt(line, 10.0) <= 200.0 + 1e-3, "too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_breaks_over_long_word() {
        let metrics = get_metrics(FontFace::Helvetica);
        let word = "x".repeat(200);
        let lines = metrics.wrap(&word, 100.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(metrics.width_pt(line, 10.0) <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn test_wrap_keeps_explicit_line_breaks() {
        let metrics = get_metrics(FontFace::Helvetica);
        let lines = metrics.wrap("B.E. 2020\nM.Tech 2022\r\n\n  PhD", 500.0, 10.0);
        assert_eq!(lines, vec!["B.E. 2020", "M.Tech 2022", "PhD"]);
    }

    #[test]
    fn test_faces_map_to_distinct_resources() {
        assert_eq!(FontFace::Helvetica.resource_name(), "F1");
        assert_eq!(FontFace::HelveticaBold.base_font(), "Helvetica-Bold");
    }
}
