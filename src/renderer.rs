use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::app::App;
use crate::config::GridSize;
use crate::game::GameStatus;
use crate::input::Direction;
use crate::snake::Cell;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Terminal columns per grid cell; keeps cells roughly square.
const CELL_WIDTH: u16 = 2;

pub const COLOR_SNAKE_HEAD: Color = Color::Rgb(0x4C, 0xAF, 0x50);
pub const COLOR_SNAKE_BODY: Color = Color::Rgb(0x8B, 0xC3, 0x4A);
pub const COLOR_FOOD: Color = Color::Rgb(0xFF, 0x57, 0x22);
pub const COLOR_PLAY_BG: Color = Color::Rgb(0xF0, 0xF0, 0xF0);
pub const COLOR_EYES: Color = Color::Black;

const GLYPH_EMPTY: &str = "  ";
const GLYPH_FOOD: &str = "()";
const GLYPH_BODY: &str = "  ";

/// Renders the full game frame from immutable state.
pub fn render<R>(frame: &mut Frame<'_>, app: &App<R>) {
    let engine = app.engine();
    let area = frame.area();
    let field_area = render_hud(frame, area, app);

    let play_area = centered_field(field_area, engine.grid());
    let block = Block::bordered().border_style(Style::new().fg(COLOR_SNAKE_HEAD));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_background(frame, inner, engine.grid());
    render_food(frame, inner, engine.grid(), engine.food());
    render_snake(frame, inner, app);

    if app.is_start_screen() {
        render_start_menu(frame, play_area, app.high_score());
        return;
    }

    if app.is_paused() {
        render_pause_menu(frame, play_area);
        return;
    }

    if engine.status() == GameStatus::Over {
        render_game_over_menu(
            frame,
            play_area,
            engine.score(),
            app.previous_best(),
            engine.over_reason(),
        );
    }
}

fn centered_field(area: Rect, grid: GridSize) -> Rect {
    let width = grid
        .width
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid.height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_background(frame: &mut Frame<'_>, inner: Rect, grid: GridSize) {
    let style = Style::new().bg(COLOR_PLAY_BG);
    let buffer = frame.buffer_mut();

    for y in 0..i32::from(grid.height) {
        for x in 0..i32::from(grid.width) {
            if let Some((column, row)) = logical_to_terminal(inner, grid, Cell::new(x, y)) {
                buffer.set_string(column, row, GLYPH_EMPTY, style);
            }
        }
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, grid: GridSize, food: Cell) {
    let Some((x, y)) = logical_to_terminal(inner, grid, food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(COLOR_FOOD).bg(COLOR_PLAY_BG));
}

fn render_snake<R>(frame: &mut Frame<'_>, inner: Rect, app: &App<R>) {
    let engine = app.engine();
    let grid = engine.grid();
    let head = engine.snake().head();

    let buffer = frame.buffer_mut();
    for segment in engine.snake().segments().skip(1) {
        let Some((x, y)) = logical_to_terminal(inner, grid, *segment) else {
            continue;
        };
        buffer.set_string(x, y, GLYPH_BODY, Style::new().bg(COLOR_SNAKE_BODY));
    }

    if let Some((x, y)) = logical_to_terminal(inner, grid, head) {
        buffer.set_string(
            x,
            y,
            head_glyph(engine.heading()),
            Style::new().fg(COLOR_EYES).bg(COLOR_SNAKE_HEAD),
        );
    }
}

/// Eyes face the direction of travel.
fn head_glyph(heading: Option<Direction>) -> &'static str {
    match heading {
        Some(Direction::Up) => "˙˙",
        Some(Direction::Down) => "..",
        Some(Direction::Left) => ": ",
        Some(Direction::Right) => " :",
        None => "••",
    }
}

/// Maps a grid cell to the terminal coordinate of its left column.
fn logical_to_terminal(inner: Rect, bounds: GridSize, cell: Cell) -> Option<(u16, u16)> {
    if !cell.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::config::GridSize;
    use crate::snake::Cell;

    use super::{centered_field, logical_to_terminal};

    #[test]
    fn cells_map_to_double_width_columns() {
        let inner = Rect::new(1, 1, 40, 20);
        let grid = GridSize::square(20);

        assert_eq!(logical_to_terminal(inner, grid, Cell::new(0, 0)), Some((1, 1)));
        assert_eq!(logical_to_terminal(inner, grid, Cell::new(19, 19)), Some((39, 20)));
        assert_eq!(logical_to_terminal(inner, grid, Cell::new(0, -1)), None);
        assert_eq!(logical_to_terminal(inner, grid, Cell::new(20, 0)), None);
    }

    #[test]
    fn cells_beyond_a_small_terminal_are_clipped() {
        let inner = Rect::new(0, 0, 10, 5);
        let grid = GridSize::square(20);

        assert_eq!(logical_to_terminal(inner, grid, Cell::new(4, 4)), Some((8, 4)));
        assert_eq!(logical_to_terminal(inner, grid, Cell::new(5, 0)), None);
        assert_eq!(logical_to_terminal(inner, grid, Cell::new(0, 5)), None);
    }

    #[test]
    fn field_is_centered_and_fits_the_area() {
        let field = centered_field(Rect::new(0, 0, 80, 30), GridSize::square(20));
        assert_eq!(field, Rect::new(19, 4, 42, 22));

        let squeezed = centered_field(Rect::new(0, 0, 30, 10), GridSize::square(20));
        assert_eq!(squeezed, Rect::new(0, 0, 30, 10));
    }
}
