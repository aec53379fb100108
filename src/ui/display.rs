// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Display formatting for the terminal console
//!
//! This module provides testable formatting functions. They return lines
//! rather than writing directly to stdout.

use super::Level;

/// Icon printed in front of a status message
pub fn level_icon(level: Level) -> &'static str {
    match level {
        Level::Info => "•",
        Level::Success => "✓",
        Level::Warning => "⚠",
        Level::Error => "✗",
    }
}

/// Lines of the startup banner
pub fn banner_lines(model_name: &str) -> Vec<String> {
    vec![
        "⚡ JUNO AI Assistant ⚡".to_string(),
        "CLI code assist agent for your projects".to_string(),
        format!("Model: {}", model_name),
        "Type 'help' for commands, 'quit' to exit".to_string(),
        "Tip: Use 'load @' + Tab for file suggestions".to_string(),
    ]
}

/// Render a two column table with a header row and a rule under it
pub fn format_table(headers: (&str, &str), rows: &[(&str, &str)]) -> Vec<String> {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .chain(std::iter::once(headers.0.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("{:<width$}  {}", headers.0, headers.1, width = width));
    lines.push(format!(
        "{}  {}",
        "─".repeat(width),
        "─".repeat(headers.1.chars().count().max(11))
    ));
    for (left, right) in rows {
        lines.push(format!("{:<width$}  {}", left, right, width = width));
    }
    lines
}

/// Prefix each line with a right-aligned line number
pub fn number_lines(lines: &[String]) -> Vec<String> {
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$} │ {}", i + 1, line, width = width))
        .collect()
}

/// Terminal rows taken by a line of `width` characters on a `columns` wide
/// terminal
pub fn wrapped_height(width: usize, columns: usize) -> usize {
    width.max(1).div_ceil(columns.max(1))
}

/// The part of a list of lines that fits at the bottom of a screen area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailFit {
    /// Index of the first line shown whole
    pub first: usize,
    /// Characters to keep from the end of line `first - 1`, when it is
    /// shown cut
    pub partial: Option<usize>,
}

impl TailFit {
    /// Whether any line is hidden or cut, so a marker row is drawn
    pub fn truncated(&self) -> bool {
        self.first > 0
    }
}

/// Fit lines of the given display `widths` into `budget` terminal rows,
/// keeping the newest ones.
///
/// When not everything fits, one row is left for a marker and the oldest
/// line that only partly fits is cut from the left.
pub fn fit_tail(widths: &[usize], columns: usize, budget: usize) -> TailFit {
    let total: usize = widths.iter().map(|w| wrapped_height(*w, columns)).sum();
    if total <= budget {
        return TailFit {
            first: 0,
            partial: None,
        };
    }

    let available = budget.saturating_sub(1);
    let mut used = 0;
    let mut first = widths.len();
    while first > 0 {
        let height = wrapped_height(widths[first - 1], columns);
        if used + height > available {
            break;
        }
        used += height;
        first -= 1;
    }

    let remaining = available - used;
    let partial = (first > 0 && remaining > 0).then(|| remaining * columns.max(1));
    TailFit { first, partial }
}

/// Interpret an answer to a yes/no question.
///
/// `None` means the answer was not understood.
pub fn parse_confirmation(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Suffix shown after a yes/no question
pub fn confirmation_hint(default: bool) -> &'static str {
    if default {
        "[Y/n]"
    } else {
        "[y/N]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_names_model() {
        let lines = banner_lines("deepseek-coder");
        assert!(lines[0].contains("JUNO"));
        assert!(lines.iter().any(|l| l == "Model: deepseek-coder"));
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let lines = format_table(
            ("Command", "Description"),
            &[("save", "Save changes"), ("edit <instruction>", "Edit")],
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("save                "));
        assert!(lines[3].starts_with("edit <instruction>  Edit"));
    }

    #[test]
    fn test_number_lines_pads_to_widest_number() {
        let lines: Vec<String> = (0..10).map(|i| format!("l{}", i)).collect();
        let numbered = number_lines(&lines);
        assert_eq!(numbered[0], " 1 │ l0");
        assert_eq!(numbered[9], "10 │ l9");
    }

    #[test]
    fn test_wrapped_height() {
        assert_eq!(wrapped_height(0, 80), 1);
        assert_eq!(wrapped_height(80, 80), 1);
        assert_eq!(wrapped_height(81, 80), 2);
        assert_eq!(wrapped_height(402, 80), 6);
    }

    #[test]
    fn test_fit_tail_everything_fits() {
        let fit = fit_tail(&[10, 20, 30], 80, 3);
        assert_eq!(
            fit,
            TailFit {
                first: 0,
                partial: None
            }
        );
        assert!(!fit.truncated());
    }

    #[test]
    fn test_fit_tail_counts_wrapped_rows() {
        // Three lines of three rows each into eight rows: marker, a cut
        // line of one row, then the last two lines whole
        let fit = fit_tail(&[200, 200, 200], 80, 8);
        assert_eq!(fit.first, 1);
        assert_eq!(fit.partial, Some(80));
        assert!(fit.truncated());
    }

    #[test]
    fn test_fit_tail_single_long_line_is_cut() {
        let fit = fit_tail(&[4000], 80, 5);
        assert_eq!(fit.first, 1);
        assert_eq!(fit.partial, Some(4 * 80));
    }

    #[test]
    fn test_fit_tail_never_exceeds_budget() {
        for budget in 1..30 {
            let widths = [400; 30];
            let fit = fit_tail(&widths, 80, budget);
            let shown: usize = widths[fit.first..]
                .iter()
                .map(|w| wrapped_height(*w, 80))
                .sum();
            let cut = fit.partial.map(|n| wrapped_height(n, 80)).unwrap_or(0);
            let marker = usize::from(fit.truncated());
            assert!(shown + cut + marker <= budget.max(1), "budget {}", budget);
        }
    }

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(parse_confirmation("", true), Some(true));
        assert_eq!(parse_confirmation("", false), Some(false));
        assert_eq!(parse_confirmation(" Yes ", false), Some(true));
        assert_eq!(parse_confirmation("n", true), Some(false));
        assert_eq!(parse_confirmation("maybe", true), None);
    }
}
