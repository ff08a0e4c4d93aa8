use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::error::CatalogError;
use crate::models::ProductForm;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database) -> Result<()> {
    let mut app = startup_app(db);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

/// First frame state: a schema failure or failed initial load opens as an
/// error notice instead of aborting.
fn startup_app(db: &Database) -> App {
    let mut app = App::new();
    if let Some(msg) = db.schema_error() {
        app.notify("Error", msg);
    } else if let Err(e) = app.refresh_all(db) {
        log::error!("Initial load failed: {e}");
        app.notify("Error", e.to_string());
    }
    app
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(key, app, db)?;
        }
    }
    Ok(())
}

/// Route one key press. Popups swallow the key that closes them.
pub(crate) fn handle_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if app.notice.is_some() {
        app.notice = None;
        return Ok(());
    }
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, db)?,
        InputMode::Command => handle_command_input(key, app, db)?,
        InputMode::Search => handle_search_input(key, app, db),
        InputMode::Form => handle_form_input(key, app, db),
        InputMode::Confirm => handle_confirm_input(key, app, db),
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Products),
        KeyCode::Char('2') => switch_screen(app, db, Screen::Categories),
        KeyCode::Tab | KeyCode::BackTab => {
            let next = match app.screen {
                Screen::Products => Screen::Categories,
                Screen::Categories => Screen::Products,
            };
            switch_screen(app, db, next);
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('e') => {
            app.screen = Screen::Products;
            app.input_mode = InputMode::Form;
        }
        KeyCode::Char('a') => commands::add_product(app, db),
        KeyCode::Char('u') => commands::update_product(app, db),
        KeyCode::Char('c') => {
            let name = app.form.category.clone();
            commands::add_category(&name, app, db);
        }
        KeyCode::Char('D') if app.screen == Screen::Products => commands::request_delete(app),
        KeyCode::Char('X') => commands::request_delete_all(app),
        KeyCode::Char('x') => commands::clear_form(app),
        KeyCode::Enter => handle_enter(app, db),
        KeyCode::Esc if app.active_search.is_some() => commands::run_search("", app, db),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: KeyEvent, app: &mut App, db: &mut Database) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            let term = app.search_input.clone();
            commands::run_search(&term, app, db);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_form_input(key: KeyEvent, app: &mut App, db: &mut Database) {
    let last = ProductForm::FIELD_COUNT - 1;
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            check_form_category(app, db);
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form_field = if app.form_field >= last { 0 } else { app.form_field + 1 };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_field = if app.form_field == 0 { last } else { app.form_field - 1 };
        }
        KeyCode::Backspace => {
            app.form.field_mut(app.form_field).pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.field_mut(app.form_field).clear();
        }
        KeyCode::Char(c) => {
            app.form.field_mut(app.form_field).push(c);
        }
        _ => {}
    }
}

/// Warn early when the typed category would be rejected on add/update.
fn check_form_category(app: &mut App, db: &Database) {
    let name = app.form.category.trim();
    if name.is_empty() {
        return;
    }
    match db.resolve_category(name) {
        Ok(_) => app.set_status(""),
        Err(CatalogError::UnknownCategory(name)) => {
            app.set_status(format!("Category '{name}' does not exist yet; press c to add it"));
        }
        Err(e) => app.set_status(e.to_string()),
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, db: &mut Database) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            commands::confirm_pending(app, db);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            commands::cancel_pending(app);
        }
        _ => {}
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) {
    app.screen = screen;
    let refreshed = match screen {
        Screen::Products if app.active_search.is_some() => Ok(()),
        Screen::Products => app.refresh_products(db),
        Screen::Categories => app.refresh_categories(db),
    };
    match refreshed {
        Ok(()) => app.set_status(format!("{screen}")),
        Err(e) => app.notify("Error", e.to_string()),
    }
}

fn handle_enter(app: &mut App, db: &Database) {
    match app.screen {
        Screen::Products => commands::load_selected(app, db),
        Screen::Categories => {
            if let Some(cat) = app.categories.get(app.category_index) {
                app.form.category = cat.name.clone();
                app.set_status(format!("Form category set to '{}'", app.form.category));
                app.screen = Screen::Products;
            }
        }
    }
}

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Products => {
            let page = app.product_page();
            scroll_down(
                &mut app.product_index,
                &mut app.product_scroll,
                app.products.len(),
                page,
            );
        }
        Screen::Categories => {
            let page = app.category_page();
            scroll_down(
                &mut app.category_index,
                &mut app.category_scroll,
                app.categories.len(),
                page,
            );
        }
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Products => scroll_up(&mut app.product_index, &mut app.product_scroll),
        Screen::Categories => scroll_up(&mut app.category_index, &mut app.category_scroll),
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Products => scroll_to_top(&mut app.product_index, &mut app.product_scroll),
        Screen::Categories => scroll_to_top(&mut app.category_index, &mut app.category_scroll),
    }
}

fn handle_goto_bottom(app: &mut App) {
    match app.screen {
        Screen::Products => {
            let page = app.product_page();
            scroll_to_bottom(
                &mut app.product_index,
                &mut app.product_scroll,
                app.products.len(),
                page,
            );
        }
        Screen::Categories => {
            let page = app.category_page();
            scroll_to_bottom(
                &mut app.category_index,
                &mut app.category_scroll,
                app.categories.len(),
                page,
            );
        }
    }
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
