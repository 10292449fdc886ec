use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle, StatusBar, StatusBarHint, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use super::Component;
use crate::action::Action;
use crate::state::Pokemon;

pub struct RosterProps<'a> {
    pub roster: &'a [Pokemon],
    pub selected: usize,
    pub page_loading: bool,
    pub exhausted: bool,
    pub message: Option<&'a str>,
    pub is_focused: bool,
}

/// The incrementally loaded pokemon list.
pub struct Roster {
    list: SelectList,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(roster: &[Pokemon]) -> Vec<Line<'static>> {
        roster
            .iter()
            .map(|p| Line::from(format!("#{:>4}  {}", p.pokedex_number, p.name)))
            .collect()
    }

    fn list_style() -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: None,
                fg: None,
            },
            selection: SelectionStyle::default(),
            scrollbar: ScrollbarStyle::default(),
        }
    }
}

impl Component<Action> for Roster {
    type Props<'a> = RosterProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Enter => props
                    .roster
                    .get(props.selected)
                    .map(|p| Action::DetailOpen(p.pokedex_number))
                    .into_iter()
                    .collect(),
                KeyCode::PageDown => vec![Action::RosterPage(1)],
                KeyCode::PageUp => vec![Action::RosterPage(-1)],
                KeyCode::Home | KeyCode::Char('g') => vec![Action::RosterJumpTop],
                KeyCode::End | KeyCode::Char('G') => vec![Action::RosterJumpBottom],
                KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
                _ => {
                    let items = Self::items(props.roster);
                    let list_props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: props.selected.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: Self::list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::RosterSelect,
                        render_item: &|item| item.clone(),
                    };
                    self.list.handle_event(event, list_props).into_iter().collect()
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::RosterMove((*delta * 3) as i16)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(3),    // list
            Constraint::Length(1), // status line
            Constraint::Length(1), // hints
        ])
        .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" POKEMON ({}) ", props.roster.len()));
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);

        if props.roster.is_empty() {
            let placeholder = if props.page_loading {
                "Loading..."
            } else {
                "Nothing loaded."
            };
            frame.render_widget(
                Paragraph::new(placeholder).style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        } else {
            let items = Self::items(props.roster);
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.selected.min(items.len().saturating_sub(1)),
                is_focused: props.is_focused,
                style: Self::list_style(),
                behavior: SelectListBehavior {
                    show_scrollbar: true,
                    wrap_navigation: false,
                },
                on_select: Action::RosterSelect,
                render_item: &|item| item.clone(),
            };
            self.list.render(frame, inner, list_props);
        }

        let (status, style) = if props.page_loading {
            ("Loading more...".to_string(), Style::default().fg(Color::Yellow))
        } else if let Some(message) = props.message {
            (message.to_string(), Style::default().fg(Color::Red))
        } else if props.exhausted {
            ("End of list.".to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (String::new(), Style::default())
        };
        frame.render_widget(Paragraph::new(status).style(style), chunks[1]);

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("↑/↓", "move"),
                    StatusBarHint::new("enter", "details"),
                    StatusBarHint::new("G", "bottom"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
