//! Reducer - pure function: (state, action) -> DispatchResult
//!
//! The pagination state machine lives here: `request_next_page` is the single
//! entry point for every trigger (initial mount, roster movement), and the
//! `page_loading` flag enforces at most one in-flight fetch.

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, Route, PREFETCH_ROWS};
use crate::trigger::{ScrollTrigger, ViewportGeometry};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => DispatchResult::changed(),

        // ===== Login screen =====
        Action::LoginInput(ch) => {
            state.login.input(ch);
            DispatchResult::changed()
        }

        Action::LoginBackspace => {
            state.login.backspace();
            DispatchResult::changed()
        }

        Action::LoginFieldNext => {
            state.login.field = state.login.field.toggle();
            DispatchResult::changed()
        }

        Action::LoginSubmit => {
            if state.login.submitting {
                return DispatchResult::unchanged();
            }
            if state.login.username.is_empty() || state.login.password.is_empty() {
                state.login.error = Some("Username and password are required".into());
                return DispatchResult::changed();
            }
            state.login.submitting = true;
            state.login.error = None;
            state.message = None;
            DispatchResult::changed_with(Effect::Login {
                base_url: state.base_url.clone(),
                username: state.login.username.clone(),
                password: state.login.password.clone(),
            })
        }

        Action::LoginDidSucceed(token) => {
            state.login.clear();
            state.token = Some(token);
            state.route = Route::Home;
            state.message = None;
            // First activation of the roster requests page one exactly once.
            let mut result = request_next_page(state);
            result.changed = true;
            result
        }

        Action::LoginDidError(error) => {
            state.login.submitting = false;
            state.login.error = Some(error);
            DispatchResult::changed()
        }

        Action::LoginGotoRegister => {
            state.route = Route::Register;
            state.register.clear();
            DispatchResult::changed()
        }

        // ===== Register screen =====
        Action::RegisterInput(ch) => {
            state.register.input(ch);
            DispatchResult::changed()
        }

        Action::RegisterBackspace => {
            state.register.backspace();
            DispatchResult::changed()
        }

        Action::RegisterFieldNext => {
            state.register.field = state.register.field.toggle();
            DispatchResult::changed()
        }

        Action::RegisterSubmit => {
            if state.register.submitting {
                return DispatchResult::unchanged();
            }
            if state.register.username.is_empty() || state.register.password.is_empty() {
                state.register.error = Some("Username and password are required".into());
                return DispatchResult::changed();
            }
            state.register.submitting = true;
            state.register.error = None;
            DispatchResult::changed_with(Effect::Register {
                base_url: state.base_url.clone(),
                username: state.register.username.clone(),
                password: state.register.password.clone(),
            })
        }

        Action::RegisterDidSucceed => {
            state.register.clear();
            state.route = Route::Login;
            state.message = Some("Registration successful. Please log in.".into());
            DispatchResult::changed()
        }

        Action::RegisterDidError(error) => {
            state.register.submitting = false;
            state.register.error = Some(error);
            DispatchResult::changed()
        }

        Action::RegisterGotoLogin => {
            state.route = Route::Login;
            state.login.clear();
            DispatchResult::changed()
        }

        // ===== Pagination =====
        Action::PageRequest => request_next_page(state),

        Action::PageDidLoad(page) => {
            state.page_loading = false;
            state.message = None;
            if (page.len() as u32) < state.cursor.limit {
                state.exhausted = true;
            }
            state.cursor.advance();
            state.roster.extend(page);
            DispatchResult::changed()
        }

        Action::PageDidError(error) => {
            // Cursor and roster stay untouched so the next qualifying
            // trigger retries the same page.
            state.page_loading = false;
            state.message = Some(format!("Page fetch error: {error}"));
            DispatchResult::changed()
        }

        // ===== Roster navigation =====
        Action::RosterMove(delta) => move_selection(state, delta as i32),

        Action::RosterPage(delta) => {
            let page = list_viewport_rows(state) as i32;
            move_selection(state, delta as i32 * page)
        }

        Action::RosterSelect(index) => {
            let moved = state.set_list_index(index);
            with_page_trigger(state, moved)
        }

        Action::RosterJumpTop => {
            let moved = state.set_list_index(0);
            with_page_trigger(state, moved)
        }

        Action::RosterJumpBottom => {
            let last = state.roster.len().saturating_sub(1);
            let moved = state.set_list_index(last);
            with_page_trigger(state, moved)
        }

        // ===== Detail overlay =====
        Action::DetailOpen(key) => {
            if state.detail == Some(key) {
                return DispatchResult::unchanged();
            }
            state.detail = Some(key);
            DispatchResult::changed()
        }

        Action::DetailClose => {
            if state.detail.is_none() {
                return DispatchResult::unchanged();
            }
            state.detail = None;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Request the next roster page: a no-op while a fetch is outstanding or
/// once the server has signalled end-of-data with a short page.
fn request_next_page(state: &mut AppState) -> DispatchResult<Effect> {
    if state.page_loading || state.exhausted {
        return DispatchResult::unchanged();
    }
    state.page_loading = true;
    DispatchResult::changed_with(Effect::FetchPage {
        base_url: state.base_url.clone(),
        offset: state.cursor.offset,
        limit: state.cursor.limit,
    })
}

fn move_selection(state: &mut AppState, delta: i32) -> DispatchResult<Effect> {
    let target = (state.list_index as i32).saturating_add(delta).max(0) as usize;
    let moved = state.set_list_index(target);
    with_page_trigger(state, moved)
}

/// Every movement event re-evaluates scroll proximity, even when the
/// highlight is already pinned at the bottom - that is what lets a failed
/// page be retried by scrolling again.
fn with_page_trigger(state: &mut AppState, moved: bool) -> DispatchResult<Effect> {
    let mut result = if moved {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    };
    if roster_near_end(state) {
        let fetch = request_next_page(state);
        if fetch.changed {
            result.changed = true;
            result.effects.extend(fetch.effects);
        }
    }
    result
}

/// Roster geometry in rows: the window top is derived from the highlight
/// position, content height is the loaded roster length. An empty roster
/// counts as near its end, so a failed first page stays retryable.
fn roster_near_end(state: &AppState) -> bool {
    let content = state.roster.len() as u64;
    let viewport = list_viewport_rows(state) as u64;
    let scroll_offset = (state.list_index as u64 + 1).saturating_sub(viewport);
    let geometry = ViewportGeometry {
        scroll_offset,
        viewport_height: viewport,
        content_height: content,
    };
    ScrollTrigger::new(PREFETCH_ROWS).near_end(&geometry)
}

/// Rows available to the roster list (terminal height minus chrome).
fn list_viewport_rows(state: &AppState) -> u16 {
    state.terminal_size.1.saturating_sub(6).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Pokemon;

    fn record(key: u16) -> Pokemon {
        Pokemon {
            id: key as u32,
            pokedex_number: key,
            name: format!("mon-{key}"),
            hp: 10,
            attack: 10,
            defense: 10,
            sp_attack: 10,
            sp_defense: 10,
            speed: 10,
        }
    }

    fn page(keys: std::ops::Range<u16>) -> Vec<Pokemon> {
        keys.map(record).collect()
    }

    fn logged_in_state() -> AppState {
        let mut state = AppState::default();
        state.login.username = "ash".into();
        state.login.password = "pika".into();
        reducer(&mut state, Action::LoginSubmit);
        reducer(&mut state, Action::LoginDidSucceed("tok".into()));
        state
    }

    #[test]
    fn test_login_success_requests_first_page() {
        let state = logged_in_state();
        assert_eq!(state.route, Route::Home);
        assert_eq!(state.token.as_deref(), Some("tok"));
        assert!(state.page_loading);
        assert_eq!(state.cursor.offset, 0);
    }

    #[test]
    fn test_login_success_emits_initial_fetch_effect() {
        let mut state = AppState::default();
        state.login.username = "ash".into();
        state.login.password = "pika".into();
        reducer(&mut state, Action::LoginSubmit);
        let result = reducer(&mut state, Action::LoginDidSucceed("tok".into()));
        assert_eq!(result.effects.len(), 1);
        assert_eq!(
            result.effects[0],
            Effect::FetchPage {
                base_url: state.base_url.clone(),
                offset: 0,
                limit: 10,
            }
        );
    }

    #[test]
    fn test_page_request_noop_while_loading() {
        let mut state = logged_in_state();
        assert!(state.page_loading);
        // N redundant triggers while one fetch is outstanding: zero effects.
        for _ in 0..5 {
            let result = reducer(&mut state, Action::PageRequest);
            assert!(!result.changed);
            assert!(result.effects.is_empty());
        }
        assert_eq!(state.cursor.offset, 0);
    }

    #[test]
    fn test_page_did_load_appends_in_arrival_order() {
        let mut state = logged_in_state();
        reducer(&mut state, Action::PageDidLoad(page(1..11)));
        assert!(!state.page_loading);
        assert_eq!(state.cursor.offset, 10);

        reducer(&mut state, Action::PageRequest);
        reducer(&mut state, Action::PageDidLoad(page(11..21)));

        let keys: Vec<u16> = state.roster.iter().map(|p| p.pokedex_number).collect();
        assert_eq!(keys, (1..21).collect::<Vec<u16>>());
        assert_eq!(state.cursor.offset, 20);
    }

    #[test]
    fn test_offset_is_monotonic_despite_redundant_triggers() {
        let mut state = logged_in_state();
        for k in 0..3u16 {
            // redundant triggers while each fetch is in flight
            reducer(&mut state, Action::PageRequest);
            reducer(&mut state, Action::PageRequest);
            reducer(&mut state, Action::PageDidLoad(page(k * 10..k * 10 + 10)));
        }
        // three successful fetches with limit 10, however many triggers
        assert_eq!(state.cursor.offset, 30);
        assert_eq!(state.roster.len(), 30);
    }

    #[test]
    fn test_failed_fetch_leaves_cursor_and_roster_unchanged() {
        let mut state = logged_in_state();
        reducer(&mut state, Action::PageDidLoad(page(1..11)));
        let roster_before = state.roster.clone();
        let offset_before = state.cursor.offset;

        reducer(&mut state, Action::PageRequest);
        let result = reducer(&mut state, Action::PageDidError("boom".into()));

        assert!(result.changed);
        assert!(!state.page_loading);
        assert_eq!(state.cursor.offset, offset_before);
        assert_eq!(state.roster, roster_before);
        assert!(state.message.as_deref().unwrap().contains("boom"));

        // The same page is requested again by the next trigger.
        let retry = reducer(&mut state, Action::PageRequest);
        assert_eq!(
            retry.effects[0],
            Effect::FetchPage {
                base_url: state.base_url.clone(),
                offset: offset_before,
                limit: 10,
            }
        );
    }

    #[test]
    fn test_failed_initial_page_is_retried_by_next_movement() {
        let mut state = logged_in_state();
        let result = reducer(&mut state, Action::PageDidError("boom".into()));
        assert!(result.changed);
        assert!(!state.page_loading);
        assert!(state.roster.is_empty());

        // The empty roster is near its own end, so any movement event
        // re-requests the same page.
        let retry = reducer(&mut state, Action::RosterMove(1));
        assert_eq!(
            retry.effects,
            vec![Effect::FetchPage {
                base_url: state.base_url.clone(),
                offset: 0,
                limit: 10,
            }]
        );
        assert!(state.page_loading);
    }

    #[test]
    fn test_jump_top_reevaluates_the_page_trigger() {
        let mut state = logged_in_state();
        reducer(&mut state, Action::PageDidError("boom".into()));

        let result = reducer(&mut state, Action::RosterJumpTop);
        assert_eq!(result.effects.len(), 1);
        assert!(state.page_loading);
    }

    #[test]
    fn test_successful_load_clears_stale_fetch_error() {
        let mut state = logged_in_state();
        reducer(&mut state, Action::PageDidError("boom".into()));
        assert!(state.message.is_some());

        reducer(&mut state, Action::PageRequest);
        reducer(&mut state, Action::PageDidLoad(page(1..11)));
        assert!(state.message.is_none());
        assert_eq!(state.roster.len(), 10);
    }

    #[test]
    fn test_short_page_marks_exhausted_and_stops_triggering() {
        let mut state = logged_in_state();
        reducer(&mut state, Action::PageDidLoad(page(1..11)));
        reducer(&mut state, Action::PageRequest);
        reducer(&mut state, Action::PageDidLoad(page(11..14))); // 3 < limit
        assert!(state.exhausted);

        let result = reducer(&mut state, Action::PageRequest);
        assert!(!result.changed);
        assert!(result.effects.is_empty());

        // Scrolling to the bottom moves the highlight but fetches nothing.
        let result = reducer(&mut state, Action::RosterJumpBottom);
        assert!(result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_scroll_near_end_triggers_next_page() {
        let mut state = logged_in_state();
        state.terminal_size = (80, 9); // 3 visible rows
        reducer(&mut state, Action::PageDidLoad(page(1..11)));

        // Highlight far from the end of 10 loaded rows: no fetch.
        let result = reducer(&mut state, Action::RosterMove(1));
        assert!(result.effects.is_empty());
        assert_eq!(state.list_index, 1);

        // Jumping to the bottom crosses the proximity threshold.
        let result = reducer(&mut state, Action::RosterJumpBottom);
        assert_eq!(result.effects.len(), 1);
        assert_eq!(
            result.effects[0],
            Effect::FetchPage {
                base_url: state.base_url.clone(),
                offset: 10,
                limit: 10,
            }
        );
        assert!(state.page_loading);

        // Further scroll events during the fetch are no-ops.
        let result = reducer(&mut state, Action::RosterMove(1));
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_mount_then_scroll_scenario() {
        // limit=10, one fetch at offset 0, ten records,
        // scroll near bottom, second fetch at offset 10, twenty records.
        let mut state = logged_in_state();
        state.terminal_size = (80, 12);
        reducer(&mut state, Action::PageDidLoad(page(1..11)));
        assert_eq!(state.roster.len(), 10);

        let result = reducer(&mut state, Action::RosterJumpBottom);
        assert_eq!(result.effects.len(), 1);
        reducer(&mut state, Action::PageDidLoad(page(11..21)));

        assert_eq!(state.roster.len(), 20);
        let keys: Vec<u16> = state.roster.iter().map(|p| p.pokedex_number).collect();
        assert_eq!(keys, (1..21).collect::<Vec<u16>>());
    }

    #[test]
    fn test_login_submit_guard_and_validation() {
        let mut state = AppState::default();
        // empty credentials rejected locally
        let result = reducer(&mut state, Action::LoginSubmit);
        assert!(result.effects.is_empty());
        assert!(state.login.error.is_some());

        state.login.username = "ash".into();
        state.login.password = "pika".into();
        let result = reducer(&mut state, Action::LoginSubmit);
        assert_eq!(result.effects.len(), 1);
        assert!(state.login.submitting);

        // double submit while in flight is a no-op
        let result = reducer(&mut state, Action::LoginSubmit);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_login_error_surfaces_inline() {
        let mut state = AppState::default();
        state.login.username = "ash".into();
        state.login.password = "wrong".into();
        reducer(&mut state, Action::LoginSubmit);
        reducer(&mut state, Action::LoginDidError("Invalid credentials".into()));
        assert!(!state.login.submitting);
        assert_eq!(state.login.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(state.route, Route::Login);
    }

    #[test]
    fn test_register_success_routes_to_login() {
        let mut state = AppState::default();
        reducer(&mut state, Action::LoginGotoRegister);
        assert_eq!(state.route, Route::Register);

        state.register.username = "misty".into();
        state.register.password = "staryu".into();
        let result = reducer(&mut state, Action::RegisterSubmit);
        assert!(matches!(result.effects[0], Effect::Register { .. }));

        reducer(&mut state, Action::RegisterDidSucceed);
        assert_eq!(state.route, Route::Login);
        assert!(state.message.is_some());
    }

    #[test]
    fn test_detail_open_close_transitions() {
        let mut state = logged_in_state();
        reducer(&mut state, Action::PageDidLoad(page(1..11)));

        let result = reducer(&mut state, Action::DetailOpen(5));
        assert!(result.changed);
        assert_eq!(state.detail, Some(5));
        assert_eq!(state.selected_pokemon().map(|p| p.pokedex_number), Some(5));

        // reopening the same key is a no-op
        let result = reducer(&mut state, Action::DetailOpen(5));
        assert!(!result.changed);

        // a key that has not been loaded yet opens but resolves to nothing
        reducer(&mut state, Action::DetailClose);
        reducer(&mut state, Action::DetailOpen(150));
        assert!(state.selected_pokemon().is_none());

        let result = reducer(&mut state, Action::DetailClose);
        assert!(result.changed);
        assert_eq!(state.detail, None);
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut state = AppState::default();
        for ch in "ash".chars() {
            reducer(&mut state, Action::LoginInput(ch));
        }
        reducer(&mut state, Action::LoginFieldNext);
        for ch in "pika".chars() {
            reducer(&mut state, Action::LoginInput(ch));
        }
        reducer(&mut state, Action::LoginBackspace);
        assert_eq!(state.login.username, "ash");
        assert_eq!(state.login.password, "pik");
    }
}
