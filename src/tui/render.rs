//! Drawing the demo workspace

use super::workspace::{Grid, View};
use modal_layout::host::StatusAlignment;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const LOG_HEIGHT: u16 = 8;

mod colors {
    use ratatui::style::Color;

    pub const BORDER: Color = Color::Rgb(100, 110, 130);
    pub const SELECTED: Color = Color::Rgb(100, 180, 220);
    pub const SURFACE: Color = Color::Rgb(30, 32, 40);
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 230);
    pub const TEXT_DIM: Color = Color::Rgb(130, 135, 150);
    pub const MODAL_BG: Color = Color::Rgb(25, 27, 35);
    pub const ACCENT_WARNING: Color = Color::Rgb(200, 160, 80);
}

/// Render the whole screen
pub fn render(frame: &mut Frame<'_>, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(LOG_HEIGHT),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_panes(frame, &view.grid, chunks[0]);
    render_log(frame, &view.log, chunks[1]);
    render_status_bar(frame, view, chunks[2]);

    if view.overlay {
        render_quick_open(frame);
    }
}

fn render_panes(frame: &mut Frame<'_>, grid: &Grid, area: Rect) {
    let row_count = u32::try_from(grid.rows.len()).unwrap_or(1).max(1);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(grid.rows.iter().map(|_| Constraint::Ratio(1, row_count)))
        .split(area);

    for (row_idx, (panes, row_area)) in grid.rows.iter().zip(rows.iter()).enumerate() {
        let col_count = u32::try_from(panes.len()).unwrap_or(1).max(1);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(panes.iter().map(|_| Constraint::Ratio(1, col_count)))
            .split(*row_area);

        for (col_idx, (pane, pane_area)) in panes.iter().zip(cols.iter()).enumerate() {
            let focused = grid.focus == (row_idx, col_idx);
            let border = if focused {
                Style::default()
                    .fg(colors::SELECTED)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors::BORDER)
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", pane.id));
            let body = Paragraph::new(pane.text.as_str())
                .style(Style::default().fg(colors::TEXT_PRIMARY))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(body, *pane_area);
        }
    }
}

fn render_log(frame: &mut Frame<'_>, log: &[String], area: Rect) {
    let visible = usize::from(area.height.saturating_sub(2));
    let start = log.len().saturating_sub(visible);
    let lines: Vec<Line<'_>> = log[start..]
        .iter()
        .map(|line| Line::from(Span::styled(line.as_str(), Style::default().fg(colors::TEXT_DIM))))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::BORDER))
        .title(" Activity ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame<'_>, view: &View, area: Rect) {
    let hints = " ctrl+b prefix | ctrl+o quick open | ctrl+q quit ";
    let right_text = view
        .status
        .iter()
        .filter(|entry| entry.alignment == StatusAlignment::Right)
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join("  ");
    let pending = right_text.contains("[C-");
    let right_style = if pending {
        Style::default()
            .fg(colors::ACCENT_WARNING)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(colors::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    };

    let right_width = u16::try_from(right_text.chars().count().saturating_add(2))
        .unwrap_or(0)
        .min(area.width);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    let left = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(colors::TEXT_DIM),
    )))
    .style(Style::default().bg(colors::SURFACE));
    frame.render_widget(left, chunks[0]);

    let right = Paragraph::new(Line::from(Span::styled(format!(" {right_text} "), right_style)))
        .style(Style::default().bg(colors::SURFACE))
        .alignment(Alignment::Right);
    frame.render_widget(right, chunks[1]);
}

fn render_quick_open(frame: &mut Frame<'_>) {
    let area = centered_rect(50, 3, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::SELECTED))
        .title(" Quick Open ")
        .style(Style::default().bg(colors::MODAL_BG));
    let body = Paragraph::new("keys go to the overlay; ctrl+o to close")
        .style(Style::default().fg(colors::TEXT_DIM))
        .block(block);
    frame.render_widget(Clear, area);
    frame.render_widget(body, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = height.saturating_add(2).min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
