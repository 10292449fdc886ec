//! Pokemon collection browser TUI

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use poketerm::action::Action;
use poketerm::api;
use poketerm::components::{
    Component, DetailOverlay, DetailOverlayProps, LoginForm, LoginFormProps, RegisterForm,
    RegisterFormProps, Roster, RosterProps,
};
use poketerm::effect::Effect;
use poketerm::reducer::reducer;
use poketerm::state::{AppState, Route, DEFAULT_PAGE_SIZE};

/// Pokemon collection browser - pages a REST backend into a scrollable roster
#[derive(Parser, Debug)]
#[command(name = "poketerm")]
#[command(about = "Browse a paginated pokemon collection with stat radars")]
struct Args {
    /// Backend base URL
    #[arg(long, default_value = "http://localhost:3000")]
    base_url: String,

    /// Records per page fetch (minimum 1)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokeComponentId {
    Login,
    Register,
    Roster,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokeContext {
    Login,
    Register,
    Roster,
    Detail,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        match self.route {
            Route::Login => Some(PokeComponentId::Login),
            Route::Register => Some(PokeComponentId::Register),
            Route::Home => {
                if self.detail.is_some() {
                    Some(PokeComponentId::Detail)
                } else {
                    Some(PokeComponentId::Roster)
                }
            }
        }
    }

    fn modal(&self) -> Option<PokeComponentId> {
        if self.route == Route::Home && self.detail.is_some() {
            Some(PokeComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::Login => PokeContext::Login,
            PokeComponentId::Register => PokeContext::Register,
            PokeComponentId::Roster => PokeContext::Roster,
            PokeComponentId::Detail => PokeContext::Detail,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::Roster
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        base_url,
        page_size,
        debug: debug_args,
    } = Args::parse();

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(base_url, page_size))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct PokeUi {
    login: LoginForm,
    register: RegisterForm,
    roster: Roster,
    detail: DetailOverlay,
}

impl PokeUi {
    fn new() -> Self {
        Self {
            login: LoginForm,
            register: RegisterForm,
            roster: Roster::new(),
            detail: DetailOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        event_ctx.component_areas.remove(&PokeComponentId::Login);
        event_ctx.component_areas.remove(&PokeComponentId::Register);
        event_ctx.component_areas.remove(&PokeComponentId::Roster);
        event_ctx.component_areas.remove(&PokeComponentId::Detail);

        match state.route {
            Route::Login => {
                event_ctx.set_component_area(PokeComponentId::Login, area);
                self.login.render(
                    frame,
                    area,
                    LoginFormProps {
                        form: &state.login,
                        notice: state.message.as_deref(),
                        is_focused: render_ctx.is_focused(),
                    },
                );
            }
            Route::Register => {
                event_ctx.set_component_area(PokeComponentId::Register, area);
                self.register.render(
                    frame,
                    area,
                    RegisterFormProps {
                        form: &state.register,
                        is_focused: render_ctx.is_focused(),
                    },
                );
            }
            Route::Home => {
                event_ctx.set_component_area(PokeComponentId::Roster, area);
                self.roster.render(
                    frame,
                    area,
                    RosterProps {
                        roster: &state.roster,
                        selected: state.list_index,
                        page_loading: state.page_loading,
                        exhausted: state.exhausted,
                        message: state.message.as_deref(),
                        is_focused: render_ctx.is_focused() && state.detail.is_none(),
                    },
                );

                if let Some(key) = state.detail {
                    let modal_area = centered_rect(56, 18, area);
                    event_ctx.set_component_area(PokeComponentId::Detail, modal_area);
                    self.detail.render(
                        frame,
                        area,
                        DetailOverlayProps {
                            key,
                            pokemon: state.selected_pokemon(),
                            is_focused: render_ctx.is_focused(),
                        },
                    );
                }
            }
        }
    }

    fn handle_login_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = LoginFormProps {
            form: &state.login,
            notice: state.message.as_deref(),
            is_focused: true,
        };
        handler_response(self.login.handle_event(event, props).into_iter().collect())
    }

    fn handle_register_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = RegisterFormProps {
            form: &state.register,
            is_focused: true,
        };
        handler_response(
            self.register
                .handle_event(event, props)
                .into_iter()
                .collect(),
        )
    }

    fn handle_roster_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = RosterProps {
            roster: &state.roster,
            selected: state.list_index,
            page_loading: state.page_loading,
            exhausted: state.exhausted,
            message: state.message.as_deref(),
            is_focused: true,
        };
        handler_response(self.roster.handle_event(event, props).into_iter().collect())
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(key) = state.detail else {
            return HandlerResponse::ignored();
        };
        let props = DetailOverlayProps {
            key,
            pokemon: state.selected_pokemon(),
            is_focused: true,
        };
        handler_response(self.detail.handle_event(event, props).into_iter().collect())
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_login = Rc::clone(&ui);
    bus.register(PokeComponentId::Login, move |event, state| {
        ui_login.borrow_mut().handle_login_event(&event.kind, state)
    });

    let ui_register = Rc::clone(&ui);
    bus.register(PokeComponentId::Register, move |event, state| {
        ui_register
            .borrow_mut()
            .handle_register_event(&event.kind, state)
    });

    let ui_roster = Rc::clone(&ui);
    bus.register(PokeComponentId::Roster, move |event, state| {
        ui_roster
            .borrow_mut()
            .handle_roster_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokeComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchPage {
            base_url,
            offset,
            limit,
        } => {
            ctx.tasks().spawn(TaskKey::new("page"), async move {
                match api::fetch_page(&base_url, offset, limit).await {
                    Ok(page) => Action::PageDidLoad(page),
                    Err(err) => Action::PageDidError(err.to_string()),
                }
            });
        }
        Effect::Login {
            base_url,
            username,
            password,
        } => {
            ctx.tasks().spawn(TaskKey::new("login"), async move {
                match api::login(&base_url, &username, &password).await {
                    Ok(token) => Action::LoginDidSucceed(token),
                    Err(err) => Action::LoginDidError(err.to_string()),
                }
            });
        }
        Effect::Register {
            base_url,
            username,
            password,
        } => {
            ctx.tasks().spawn(TaskKey::new("register"), async move {
                match api::register(&base_url, &username, &password).await {
                    Ok(()) => Action::RegisterDidSucceed,
                    Err(err) => Action::RegisterDidError(err.to_string()),
                }
            });
        }
    }
}
