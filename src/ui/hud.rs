use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::renderer::COLOR_SNAKE_HEAD;

/// Renders the one-line HUD and returns the remaining area above it.
#[must_use]
pub fn render_hud<R>(frame: &mut Frame<'_>, area: Rect, app: &App<R>) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let engine = app.engine();
    let line = info_line(
        engine.score(),
        app.high_score(),
        engine.snake().len(),
        app.tick_interval().as_millis(),
        usize::from(hud_area.width),
    );
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center),
        hud_area,
    );

    play_area
}

/// Builds `Score | Hi | Length | Tick`, dropping trailing fields that do not fit.
fn info_line(
    score: u32,
    high_score: u32,
    length: usize,
    interval_ms: u128,
    max_width: usize,
) -> Line<'static> {
    let fields = [
        ("Score", score.to_string()),
        ("Hi", high_score.to_string()),
        ("Length", length.to_string()),
        ("Tick", format!("{interval_ms}ms")),
    ];

    let label_style = Style::new().fg(Color::DarkGray);
    let value_style = Style::new()
        .fg(COLOR_SNAKE_HEAD)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    let mut used = 0;
    for (index, (label, value)) in fields.into_iter().enumerate() {
        let separator = if index == 0 { "" } else { "  " };
        let label = format!("{separator}{label} ");
        let width = label.width() + value.width();
        if used + width > max_width {
            break;
        }

        used += width;
        spans.push(Span::styled(label, label_style));
        spans.push(Span::styled(value, value_style));
    }

    Line::from(spans)
}
