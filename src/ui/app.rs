use crate::db::Database;
use crate::error::CatalogResult;
use crate::models::{Category, ProductForm, ProductView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Products,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Products, Self::Categories]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Products => write!(f, "Products"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteProduct { id: i64, name: String },
    DeleteAll,
}

/// Modal message box. Any key dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) title: String,
    pub(crate) message: String,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) notice: Option<Notice>,

    // Form
    pub(crate) form: ProductForm,
    pub(crate) form_field: usize,

    // Products
    pub(crate) products: Vec<ProductView>,
    pub(crate) product_index: usize,
    pub(crate) product_scroll: usize,
    pub(crate) product_count: i64,
    /// Term whose matches are on screen, if the table is filtered.
    pub(crate) active_search: Option<String>,

    // Categories
    pub(crate) categories: Vec<Category>,
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Products,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            notice: None,

            form: ProductForm::default(),
            form_field: 0,

            products: Vec::new(),
            product_index: 0,
            product_scroll: 0,
            product_count: 0,
            active_search: None,

            categories: Vec::new(),
            category_index: 0,
            category_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Reload the full product listing, dropping any search filter.
    pub(crate) fn refresh_products(&mut self, db: &Database) -> CatalogResult<()> {
        let rows = db.list_products()?;
        self.active_search = None;
        self.show_products(rows);
        self.product_count = db.product_count()?;
        Ok(())
    }

    /// Replace the table contents, keeping the cursor in range.
    pub(crate) fn show_products(&mut self, rows: Vec<ProductView>) {
        self.products = rows;
        if self.product_index >= self.products.len() {
            self.product_index = self.products.len().saturating_sub(1);
        }
        if self.product_scroll > self.product_index {
            self.product_scroll = self.product_index;
        }
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> CatalogResult<()> {
        self.categories = db.get_categories()?;
        if self.category_index >= self.categories.len() {
            self.category_index = self.categories.len().saturating_sub(1);
        }
        if self.category_scroll > self.category_index {
            self.category_scroll = self.category_index;
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> CatalogResult<()> {
        self.refresh_products(db)?;
        self.refresh_categories(db)?;
        Ok(())
    }

    pub(crate) fn selected_product(&self) -> Option<&ProductView> {
        self.products.get(self.product_index)
    }

    /// Rows of the product table that fit below the form panel.
    pub(crate) fn product_page(&self) -> usize {
        self.visible_rows.saturating_sub(super::screens::products::FORM_HEIGHT as usize + 3).max(1)
    }

    pub(crate) fn category_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn notify(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.into(),
            message: message.into(),
        });
    }
}
