use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::ProductForm;
use crate::ui::app::{App, InputMode};
use crate::ui::theme;
use crate::ui::util::{format_price, truncate};

/// Five form lines plus the border.
pub(crate) const FORM_HEIGHT: u16 = ProductForm::FIELD_COUNT as u16 + 2;

const LABEL_WIDTH: usize = 10;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(3)])
        .split(area);

    render_form(f, chunks[0], app);
    render_table(f, chunks[1], app);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Form;
    let lines: Vec<Line> = ProductForm::labels()
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let focused = editing && i == app.form_field;
            let value_style = if focused {
                Style::default().fg(theme::YELLOW)
            } else {
                theme::normal_style()
            };
            Line::from(vec![
                Span::styled(
                    format!(" {label:<width$}", width = LABEL_WIDTH),
                    theme::title_style(focused),
                ),
                Span::styled(app.form.field(i).to_string(), value_style),
            ])
        })
        .collect();

    let hint = if editing {
        " Product (Tab next field, Esc done) "
    } else {
        " Product (e edit, a add, u update, c add category) "
    };
    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(editing))
            .title(Span::styled(hint, theme::title_style(editing))),
    );
    f.render_widget(form, area);

    if editing {
        let value_len = app.form.field(app.form_field).chars().count();
        let x = area.x + 2 + LABEL_WIDTH as u16 + value_len as u16;
        let y = area.y + 1 + app.form_field as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), y));
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let title = match &app.active_search {
        Some(term) => format!(
            " Products ({} of {}) search: '{term}' ",
            app.products.len(),
            app.product_count
        ),
        None => format!(" Products ({}) ", app.products.len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(false))
        .title(Span::styled(title, theme::title_style(false)));

    if app.products.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No products yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press e to fill in the form, then a to add",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["ID", "Name", "Quantity", "Price", "Category"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .products
        .iter()
        .enumerate()
        .skip(app.product_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, product)| {
            let style = if i == app.product_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let quantity = Span::styled(
                product.quantity.to_string(),
                theme::quantity_style(product.quantity),
            );
            Row::new(vec![
                Cell::from(product.id.to_string()),
                Cell::from(truncate(&product.name, 40)),
                Cell::from(quantity),
                Cell::from(format_price(product.price)),
                Cell::from(product.category_or("—").to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
