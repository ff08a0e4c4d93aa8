use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::Category;
use crate::ui::app::App;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(true))
        .title(Span::styled(
            format!(" Categories ({}) ", app.categories.len()),
            theme::title_style(true),
        ));

    if app.categories.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No categories yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Products need one. Create it with :category <name>",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    // Mark the category the form currently points at.
    let in_form = Category::find_by_name(&app.categories, app.form.category.trim());

    let items: Vec<ListItem> = app
        .categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, cat)| {
            let marked = in_form.is_some_and(|c| c.id == cat.id);
            let style = if i == app.category_index {
                theme::selected_style()
            } else if marked {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::normal_style()
            };
            let prefix = if marked { "\u{2022} " } else { "  " };
            ListItem::new(Line::from(Span::styled(
                format!("{prefix}{:>4}  {}", cat.id.unwrap_or(0), cat.name),
                style,
            )))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
