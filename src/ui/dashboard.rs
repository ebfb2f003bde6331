use crate::source::ModelSource;
use crate::ui::app::{App, FocusPanel, MAX_VISIBLE_COLUMNS};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

// Brandbook colors
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C); // #1f2f3c
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0); // #c3d3e0
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68); // #829a68
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C); // #9e683c
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65); // #716565

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const COUNT_COLOR: Color = BRAND_GREEN;

pub fn draw_dashboard<S: ModelSource>(frame: &mut Frame, app: &App<'_, S>) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Main content
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let title = format!(
        " BIM Explorer | {} | {} categories ",
        app.handle.name,
        app.categories.len()
    );
    draw_header(frame, chunks[0], title);

    let main = Layout::horizontal([
        Constraint::Percentage(35), // Categories
        Constraint::Percentage(65), // Parameters
    ])
    .split(chunks[1]);
    draw_categories(frame, main[0], app);
    draw_parameters(frame, main[1], app);

    draw_footer(
        frame,
        chunks[2],
        " ←→ Panel | ↑↓ Select | Space Toggle | a All | Enter Table | q Quit ",
        app.status.as_deref(),
    );
}

fn draw_header(frame: &mut Frame, area: Rect, title: String) {
    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn focus_border(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

fn draw_categories<S: ModelSource>(frame: &mut Frame, area: Rect, app: &App<'_, S>) {
    let is_focused = app.focus_panel == FocusPanel::Categories;

    let items: Vec<ListItem> = app
        .categories
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let is_selected = i == app.selected_category;
            let style = if is_selected && is_focused {
                SELECTED_STYLE
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if is_selected && is_focused { " ◄" } else { "" };

            ListItem::new(Line::from(vec![
                Span::styled(name.as_str(), style),
                Span::styled(marker, Style::default().fg(BRAND_ORANGE)),
            ]))
        })
        .collect();

    let title = format!(" Categories ({}) ", app.categories.len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_border(is_focused)),
    );

    frame.render_widget(list, area);
}

fn draw_parameters<S: ModelSource>(frame: &mut Frame, area: Rect, app: &App<'_, S>) {
    let is_focused = app.focus_panel == FocusPanel::Parameters;
    let visible = area.height.saturating_sub(2) as usize;
    app.parameters_page.set(visible);

    // After a resize the stored offset may leave the cursor below the window
    let offset = if app.selected_parameter >= app.parameters_scroll_offset + visible.max(1) {
        app.selected_parameter + 1 - visible.max(1)
    } else {
        app.parameters_scroll_offset
    };

    let items: Vec<ListItem> = app
        .parameters
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, choice)| {
            let is_cursor = i == app.selected_parameter && is_focused;
            let check = if choice.selected { "[x] " } else { "[ ] " };
            let style = if is_cursor {
                SELECTED_STYLE
            } else if choice.selected {
                Style::default()
            } else {
                Style::default().fg(BRAND_MUTED)
            };

            ListItem::new(Line::from(vec![
                Span::styled(check, Style::default().fg(COUNT_COLOR)),
                Span::styled(choice.name.as_str(), style),
            ]))
        })
        .collect();

    let selected = app.parameters.iter().filter(|p| p.selected).count();
    let title = format!(
        " Parameters of {} ({selected}/{}) ",
        app.current_category().unwrap_or("-"),
        app.parameters.len()
    );
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_border(is_focused)),
    );

    frame.render_widget(list, area);
}

pub fn draw_table_view<S: ModelSource>(frame: &mut Frame, app: &App<'_, S>) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(5),    // Table
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let Some(table) = &app.table else {
        return;
    };

    let title = format!(
        " {} | {} | {} rows × {} columns ",
        app.handle.name,
        app.current_category().unwrap_or("-"),
        table.row_count(),
        table.column_count()
    );
    draw_header(frame, chunks[0], title);

    let columns: Vec<_> = table
        .columns()
        .iter()
        .skip(app.table_column_offset)
        .take(MAX_VISIBLE_COLUMNS)
        .collect();

    let header = Row::new(
        columns
            .iter()
            .map(|c| Cell::from(c.name.as_str()).style(HEADER_STYLE)),
    );

    let visible_rows = chunks[1].height.saturating_sub(3) as usize;
    let rows: Vec<Row> = (app.table_row_offset..table.row_count())
        .take(visible_rows)
        .map(|row| {
            Row::new(columns.iter().map(|c| {
                let text = c.cells.get(row).map(ToString::to_string).unwrap_or_default();
                Cell::from(text)
            }))
        })
        .collect();

    let widths = vec![Constraint::Fill(1); columns.len().max(1)];
    let mut block_title = format!(
        " Columns {}-{} ",
        app.table_column_offset + 1,
        app.table_column_offset + columns.len()
    );
    if app.has_hidden_columns() {
        block_title.push_str(&format!("of {} (←→ to scroll) ", table.column_count()));
    }

    let widget = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(block_title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BRAND_ORANGE)),
    );
    frame.render_widget(widget, chunks[1]);

    draw_footer(
        frame,
        chunks[2],
        " ↑↓ Rows | ←→ Columns | c Export CSV | Esc Back | q Quit ",
        app.status.as_deref(),
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str, status: Option<&str>) {
    let mut spans = vec![Span::styled(help, Style::default().fg(BRAND_MUTED))];
    if let Some(status) = status {
        spans.push(Span::styled(
            format!(" {status} "),
            Style::default().fg(BRAND_ORANGE),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
