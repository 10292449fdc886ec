//! Actions with automatic category inference

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::Pokemon;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== Login screen =====
    LoginInput(char),
    LoginBackspace,
    LoginFieldNext,
    LoginSubmit,
    /// Result: credentials accepted, carries the session token
    LoginDidSucceed(String),
    LoginDidError(String),
    LoginGotoRegister,

    // ===== Register screen =====
    RegisterInput(char),
    RegisterBackspace,
    RegisterFieldNext,
    RegisterSubmit,
    RegisterDidSucceed,
    RegisterDidError(String),
    RegisterGotoLogin,

    // ===== Pagination =====
    /// Intent: request the next roster page (no-op while one is in flight)
    PageRequest,
    /// Result: page fetched, records in arrival order
    PageDidLoad(Vec<Pokemon>),
    /// Result: fetch failed; cursor and roster stay untouched
    PageDidError(String),

    // ===== Roster navigation =====
    RosterMove(i16),
    RosterPage(i16),
    RosterSelect(usize),
    RosterJumpTop,
    RosterJumpBottom,

    // ===== Detail overlay =====
    DetailOpen(u16),
    DetailClose,

    // ===== Uncategorized (global) =====
    UiTerminalResize(u16, u16),
    /// Force a re-render
    Render,
    Quit,
}
