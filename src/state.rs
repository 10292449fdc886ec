//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default page size for roster fetches.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Rows of headroom before the end of the loaded roster that still count
/// as "near the end" for prefetching the next page.
pub const PREFETCH_ROWS: u64 = 4;

/// One record from the collection endpoint.
///
/// `pokedex_number` is the stable selection key; `id` keys list rows and may
/// differ across overlapping pages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pokemon {
    pub id: u32,
    pub pokedex_number: u16,
    pub name: String,
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

/// The next page to fetch. `offset` advances by exactly `limit` after each
/// successful load; `limit` is fixed for the session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageCursor {
    pub offset: u32,
    pub limit: u32,
}

impl PageCursor {
    pub fn new(limit: u32) -> Self {
        Self { offset: 0, limit }
    }

    pub fn advance(&mut self) {
        self.offset += self.limit;
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Which screen is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum Route {
    #[default]
    Login,
    Register,
    Home,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum CredentialField {
    #[default]
    Username,
    Password,
}

impl CredentialField {
    pub fn toggle(&self) -> Self {
        match self {
            CredentialField::Username => CredentialField::Password,
            CredentialField::Password => CredentialField::Username,
        }
    }
}

/// Shared shape of the login and register forms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CredentialForm {
    pub username: String,
    pub password: String,
    pub field: CredentialField,
    pub error: Option<String>,
    /// Guards against double submit while the request is in flight.
    pub submitting: bool,
}

impl CredentialForm {
    pub fn input(&mut self, ch: char) {
        match self.field {
            CredentialField::Username => self.username.push(ch),
            CredentialField::Password => self.password.push(ch),
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            CredentialField::Username => {
                self.username.pop();
            }
            CredentialField::Password => {
                self.password.pop();
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Active screen
    #[debug(section = "Session", label = "Route", debug_fmt)]
    pub route: Route,

    /// Session token from a successful login
    #[debug(section = "Session", label = "Token", debug_fmt)]
    pub token: Option<String>,

    /// Backend base URL (from the CLI)
    #[debug(skip)]
    pub base_url: String,

    // --- Roster pagination ---
    /// Accumulated records in arrival order (append-only, no dedup)
    #[debug(skip)]
    pub roster: Vec<Pokemon>,

    /// Offset/limit of the next page to fetch
    #[debug(section = "Roster", label = "Cursor", debug_fmt)]
    pub cursor: PageCursor,

    /// True exactly while one page fetch is outstanding
    #[debug(section = "Roster", label = "Loading")]
    pub page_loading: bool,

    /// Set once the server returns a short page; no further fetches
    #[debug(section = "Roster", label = "Exhausted")]
    pub exhausted: bool,

    /// Highlighted roster row
    #[debug(section = "Roster", label = "Index")]
    pub list_index: usize,

    /// Selected pokedex number while the detail overlay is open
    #[debug(section = "Roster", label = "Detail", debug_fmt)]
    pub detail: Option<u16>,

    /// Last fetch error or status notice (observability only)
    #[debug(section = "Status", label = "Message", debug_fmt)]
    pub message: Option<String>,

    // --- Screens ---
    #[debug(skip)]
    pub login: CredentialForm,

    #[debug(skip)]
    pub register: CredentialForm,

    #[debug(skip)]
    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(base_url: String, page_size: u32) -> Self {
        Self {
            route: Route::Login,
            token: None,
            base_url,
            roster: Vec::new(),
            cursor: PageCursor::new(page_size),
            page_loading: false,
            exhausted: false,
            list_index: 0,
            detail: None,
            message: None,
            login: CredentialForm::default(),
            register: CredentialForm::default(),
            terminal_size: (80, 24),
        }
    }

    /// Record matching the open detail key, if it has been loaded.
    /// Lookup goes by `pokedex_number`, not list position.
    pub fn selected_pokemon(&self) -> Option<&Pokemon> {
        let key = self.detail?;
        self.roster.iter().find(|p| p.pokedex_number == key)
    }

    /// Move the highlight, clamping to the loaded roster.
    /// Returns whether the index actually changed.
    pub fn set_list_index(&mut self, index: usize) -> bool {
        if self.roster.is_empty() {
            self.list_index = 0;
            return false;
        }
        let bounded = index.min(self.roster.len() - 1);
        if bounded != self.list_index {
            self.list_index = bounded;
            return true;
        }
        false
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new("http://localhost:3000".into(), DEFAULT_PAGE_SIZE)
    }
}
