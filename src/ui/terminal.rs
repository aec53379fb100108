// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! crossterm-backed console

use std::io::{self, BufRead, Stdout, Write};

use crossterm::{
    cursor::MoveUp,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use super::display::{
    banner_lines, confirmation_hint, fit_tail, format_table, level_icon, number_lines,
    parse_confirmation, wrapped_height,
};
use super::highlight::highlight_lines;
use super::{Console, Level, Panel, PanelBody, PanelStyle};
use crate::error::Result;

/// Rows kept free under the live view
const LIVE_MARGIN_ROWS: usize = 3;

/// Width of the `│ ` border in front of each body row
const BORDER_WIDTH: usize = 2;

/// A body line as drawn and as plain text
#[derive(Debug, Clone, PartialEq)]
struct Row {
    rendered: String,
    plain: String,
}

impl Row {
    fn plain(text: String) -> Self {
        Self {
            rendered: text.clone(),
            plain: text,
        }
    }

    /// Printable width including the border
    fn width(&self) -> usize {
        self.plain.chars().count() + BORDER_WIDTH
    }

    /// Keep only the last `width` printable characters, border included
    fn cut_to(&self, width: usize) -> Self {
        let keep = width.saturating_sub(BORDER_WIDTH);
        let count = self.plain.chars().count();
        Row::plain(self.plain.chars().skip(count.saturating_sub(keep)).collect())
    }
}

fn header(panel: &Panel) -> String {
    format!("╭─ {} ", panel.title)
}

fn footer(panel: &Panel) -> String {
    match &panel.subtitle {
        Some(subtitle) => format!("╰─ {} ", subtitle),
        None => "╰─".to_string(),
    }
}

/// Terminal rows taken by a panel's header and footer
fn frame_height(panel: &Panel, columns: usize) -> usize {
    wrapped_height(header(panel).chars().count(), columns)
        + wrapped_height(footer(panel).chars().count(), columns)
}

/// Terminal rows taken by a panel with the given body
fn panel_height(panel: &Panel, body: &[Row], columns: usize) -> usize {
    frame_height(panel, columns)
        + body
            .iter()
            .map(|row| wrapped_height(row.width(), columns))
            .sum::<usize>()
}

/// Newest body rows of `panel` that fit a `columns` x `rows` terminal,
/// leaving room for the frame and the prompt below
fn live_body(panel: &Panel, columns: usize, rows: usize) -> Vec<Row> {
    let budget = rows
        .saturating_sub(LIVE_MARGIN_ROWS + frame_height(panel, columns))
        .max(1);
    let body = TerminalConsole::body_rows(panel);
    let widths: Vec<usize> = body.iter().map(Row::width).collect();
    let fit = fit_tail(&widths, columns, budget);
    if !fit.truncated() {
        return body;
    }

    let mut out = Vec::with_capacity(body.len() - fit.first + 2);
    let marker = format!("… {} more lines", fit.first);
    out.push(Row::plain(marker).cut_to(columns));
    if let Some(width) = fit.partial {
        out.push(body[fit.first - 1].cut_to(width));
    }
    out.extend(body.into_iter().skip(fit.first));
    out
}

/// Console writing to the user's terminal
pub struct TerminalConsole {
    stdout: Stdout,
    /// Terminal rows occupied by the live view
    live_rows: usize,
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            live_rows: 0,
        }
    }

    fn level_color(level: Level) -> Color {
        match level {
            Level::Info => Color::Cyan,
            Level::Success => Color::Green,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
        }
    }

    fn border_color(style: PanelStyle) -> Color {
        match style {
            PanelStyle::Code => Color::Green,
            PanelStyle::Response => Color::Blue,
            PanelStyle::Raw => Color::Yellow,
        }
    }

    fn terminal_size() -> (usize, usize) {
        terminal::size()
            .map(|(w, h)| (w.max(1) as usize, h.max(1) as usize))
            .unwrap_or((80, 24))
    }

    /// Body rows of a panel
    fn body_rows(panel: &Panel) -> Vec<Row> {
        match &panel.body {
            PanelBody::Code { content, language } => {
                let plain: Vec<String> = content.lines().map(str::to_string).collect();
                let numbered = number_lines(&plain);
                let highlighted = highlight_lines(content, *language);
                let digits = plain.len().to_string().len();

                numbered
                    .into_iter()
                    .zip(highlighted)
                    .enumerate()
                    .map(|(i, (plain_line, colored))| Row {
                        rendered: format!("{:>digits$} │ {}", i + 1, colored, digits = digits),
                        plain: plain_line,
                    })
                    .collect()
            }
            PanelBody::Text(text) => text.lines().map(|line| Row::plain(line.to_string())).collect(),
        }
    }

    /// Draw a panel with the given body, returning the number of terminal
    /// rows it used
    fn draw_panel(&mut self, panel: &Panel, body: &[Row]) -> io::Result<usize> {
        let (columns, _) = Self::terminal_size();
        let border = Self::border_color(panel.style);

        queue!(
            self.stdout,
            SetForegroundColor(border),
            SetAttribute(Attribute::Bold),
            Print(header(panel)),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print("\r\n")
        )?;

        for row in body {
            queue!(
                self.stdout,
                SetForegroundColor(border),
                Print("│ "),
                ResetColor,
                Print(&row.rendered),
                ResetColor,
                Print("\r\n")
            )?;
        }

        queue!(
            self.stdout,
            SetForegroundColor(border),
            Print(footer(panel)),
            ResetColor,
            Print("\r\n")
        )?;

        self.stdout.flush()?;
        Ok(panel_height(panel, body, columns))
    }

    fn erase_live(&mut self) -> io::Result<()> {
        if self.live_rows > 0 {
            queue!(
                self.stdout,
                MoveUp(self.live_rows.min(u16::MAX as usize) as u16),
                Clear(ClearType::FromCursorDown)
            )?;
            self.stdout.flush()?;
            self.live_rows = 0;
        }
        Ok(())
    }

    fn write_message(&mut self, level: Level, text: &str) -> io::Result<()> {
        queue!(
            self.stdout,
            SetForegroundColor(Self::level_color(level)),
            Print(format!("{} {}", level_icon(level), text)),
            ResetColor,
            Print("\n")
        )?;
        self.stdout.flush()
    }

    fn write_banner(&mut self, model_name: &str) -> io::Result<()> {
        let lines = banner_lines(model_name);
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let colors = [
            Color::Magenta,
            Color::Cyan,
            Color::DarkGrey,
            Color::Yellow,
            Color::Green,
        ];

        queue!(
            self.stdout,
            SetForegroundColor(Color::Magenta),
            Print(format!("╭{}╮\n", "─".repeat(width + 2)))
        )?;
        for (line, color) in lines.iter().zip(colors.iter().cycle()) {
            let pad = width - line.chars().count();
            queue!(
                self.stdout,
                SetForegroundColor(Color::Magenta),
                Print("│ "),
                SetForegroundColor(*color),
                Print(line),
                Print(" ".repeat(pad)),
                SetForegroundColor(Color::Magenta),
                Print(" │\n")
            )?;
        }
        queue!(
            self.stdout,
            Print(format!("╰{}╯\n", "─".repeat(width + 2))),
            ResetColor
        )?;
        self.stdout.flush()
    }

    fn write_table(
        &mut self,
        title: &str,
        headers: (&str, &str),
        rows: &[(&str, &str)],
    ) -> io::Result<()> {
        queue!(
            self.stdout,
            SetAttribute(Attribute::Bold),
            Print(format!("{}\n", title)),
            SetAttribute(Attribute::Reset)
        )?;
        for (i, line) in format_table(headers, rows).iter().enumerate() {
            let color = if i < 2 { Color::Blue } else { Color::Yellow };
            queue!(
                self.stdout,
                SetForegroundColor(color),
                Print(line),
                ResetColor,
                Print("\n")
            )?;
        }
        self.stdout.flush()
    }

    fn prompt(&mut self, prompt: &str) -> Result<String> {
        queue!(
            self.stdout,
            SetForegroundColor(Color::Cyan),
            Print(prompt),
            ResetColor
        )?;
        self.stdout.flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            // End of input
            println!();
        }
        Ok(input.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl Console for TerminalConsole {
    fn message(&mut self, level: Level, text: &str) {
        if let Err(e) = self.write_message(level, text) {
            tracing::debug!("Failed to write to terminal: {}", e);
        }
    }

    fn line(&mut self, text: &str) {
        println!("{}", text);
    }

    fn banner(&mut self, model_name: &str) {
        if let Err(e) = self.write_banner(model_name) {
            tracing::debug!("Failed to write banner: {}", e);
        }
    }

    fn table(&mut self, title: &str, headers: (&str, &str), rows: &[(&str, &str)]) {
        if let Err(e) = self.write_table(title, headers, rows) {
            tracing::debug!("Failed to write table: {}", e);
        }
    }

    fn panel(&mut self, panel: &Panel) {
        if let Err(e) = self.draw_panel(panel, &Self::body_rows(panel)) {
            tracing::debug!("Failed to draw panel: {}", e);
        }
    }

    fn live_update(&mut self, panel: &Panel) {
        let (columns, rows) = Self::terminal_size();
        let body = live_body(panel, columns, rows);

        let result = self
            .erase_live()
            .and_then(|_| self.draw_panel(panel, &body));
        match result {
            Ok(used) => self.live_rows = used,
            Err(e) => tracing::debug!("Failed to refresh live view: {}", e),
        }
    }

    fn live_clear(&mut self) {
        if let Err(e) = self.erase_live() {
            tracing::debug!("Failed to clear live view: {}", e);
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompt(prompt)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let question = format!("{} {} ", prompt, confirmation_hint(default));
        loop {
            let answer = self.prompt(&question)?;
            match parse_confirmation(&answer, default) {
                Some(choice) => return Ok(choice),
                None => self.warn("Please enter y or n"),
            }
        }
    }
}
