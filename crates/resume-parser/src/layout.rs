//! Rebuilds line structure from positioned text fragments.

use crate::models::LayoutHint;

/// Fragments whose vertical positions differ by at most this much share a line.
const SAME_LINE_TOLERANCE: f32 = 2.0;
/// A gap this many times the median line gap marks a paragraph break.
const PARAGRAPH_GAP_FACTOR: f32 = 1.8;

struct Line {
    y: f32,
    parts: Vec<String>,
}

fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Joins fragments into lines, in the order given, and separates paragraphs
/// with a blank line.
pub fn reflow(hints: &[LayoutHint]) -> String {
    let mut lines: Vec<Line> = Vec::new();
    for hint in hints {
        let value = hint.value.trim();
        if value.is_empty() || !hint.y.is_finite() {
            continue;
        }
        match lines.last_mut() {
            Some(line) if (line.y - hint.y).abs() <= SAME_LINE_TOLERANCE => {
                line.parts.push(value.to_string());
            }
            _ => lines.push(Line {
                y: hint.y,
                parts: vec![value.to_string()],
            }),
        }
    }

    let gaps: Vec<f32> = lines.windows(2).map(|w| (w[1].y - w[0].y).abs()).collect();
    let threshold = median(&mut gaps.clone()).map(|m| m * PARAGRAPH_GAP_FACTOR);

    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push('\n');
            if threshold.is_some_and(|t| gaps[index - 1] > t) {
                out.push('\n');
            }
        }
        out.push_str(&line.parts.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(value: &str, y: f32) -> LayoutHint {
        LayoutHint {
            value: value.to_string(),
            y,
        }
    }

    #[test]
    fn test_fragments_on_same_baseline_join() {
        let hints = [hint("Jane", 700.0), hint("Doe", 701.5), hint("jane@example.com", 688.0)];
        assert_eq!(reflow(&hints), "Jane Doe\njane@example.com");
    }

    #[test]
    fn test_large_gap_inserts_blank_line() {
        let hints = [
            hint("Jane Doe", 700.0),
            hint("jane@example.com", 688.0),
            hint("Austin, TX", 676.0),
            hint("EXPERIENCE", 640.0),
            hint("Engineer at Acme Inc", 628.0),
        ];
        assert_eq!(
            reflow(&hints),
            "Jane Doe\njane@example.com\nAustin, TX\n\nEXPERIENCE\nEngineer at Acme Inc"
        );
    }

    #[test]
    fn test_empty_hints() {
        assert_eq!(reflow(&[]), "");
        assert_eq!(reflow(&[hint("  ", 10.0), hint("x", f32::NAN)]), "");
    }
}
