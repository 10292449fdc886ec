use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::Component;
use crate::action::Action;
use crate::state::{CredentialField, CredentialForm};

pub struct LoginFormProps<'a> {
    pub form: &'a CredentialForm,
    /// Status notice (e.g. after a successful registration)
    pub notice: Option<&'a str>,
    pub is_focused: bool,
}

/// The login screen: two fields, inline error, no UI beyond that.
#[derive(Default)]
pub struct LoginForm;

impl Component<Action> for LoginForm {
    type Props<'a> = LoginFormProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::LoginGotoRegister)
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => Some(Action::LoginFieldNext),
            KeyCode::Enter => Some(Action::LoginSubmit),
            KeyCode::Backspace => Some(Action::LoginBackspace),
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char(ch) => Some(Action::LoginInput(ch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 30 || area.height < 10 {
            return;
        }

        let box_area = centered_rect(44, 11, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Login ")
            .title_alignment(Alignment::Center);
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // notice
            Constraint::Length(1),
            Constraint::Length(1), // username
            Constraint::Length(1),
            Constraint::Length(1), // password
            Constraint::Length(1),
            Constraint::Length(1), // error / status
        ])
        .split(inner);

        if let Some(notice) = props.notice {
            frame.render_widget(
                Paragraph::new(notice)
                    .style(Style::default().fg(Color::Green))
                    .alignment(Alignment::Center),
                rows[0],
            );
        }

        frame.render_widget(
            field_line("Username", &props.form.username, false, props.form.field == CredentialField::Username),
            rows[2],
        );
        frame.render_widget(
            field_line("Password", &props.form.password, true, props.form.field == CredentialField::Password),
            rows[4],
        );

        let status = if props.form.submitting {
            Paragraph::new("Signing in...").style(Style::default().fg(Color::Yellow))
        } else if let Some(error) = props.form.error.as_deref() {
            Paragraph::new(error).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new("")
        };
        frame.render_widget(status.alignment(Alignment::Center), rows[6]);

        render_hint_bar(frame, area, "ctrl+r", "register");
    }
}

/// One labeled input row; the password value renders masked.
pub(crate) fn field_line(label: &str, value: &str, mask: bool, focused: bool) -> Paragraph<'static> {
    let shown = if mask {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "_" } else { "" };
    let value_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Paragraph::new(Line::from(vec![
        Span::styled(format!("{label:>9}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{shown}{cursor}"), value_style),
    ]))
}

pub(crate) fn render_hint_bar(frame: &mut Frame, area: Rect, switch_key: &str, switch_label: &str) {
    let bar_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };
    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        bar_area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&[
                StatusBarHint::new("tab", "switch field"),
                StatusBarHint::new("enter", "submit"),
                StatusBarHint::new(switch_key, switch_label),
                StatusBarHint::new("esc", "quit"),
            ]),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use tui_dispatch::testing::*;

    fn props(form: &CredentialForm) -> LoginFormProps<'_> {
        LoginFormProps {
            form,
            notice: None,
            is_focused: true,
        }
    }

    #[test]
    fn test_typing_emits_input() {
        let mut component = LoginForm;
        let form = CredentialForm::default();
        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("a")), props(&form))
            .into_iter()
            .collect();
        actions.assert_first(Action::LoginInput('a'));
    }

    #[test]
    fn test_enter_submits() {
        let mut component = LoginForm;
        let form = CredentialForm::default();
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
                props(&form),
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::LoginSubmit);
    }

    #[test]
    fn test_ctrl_r_goes_to_register() {
        let mut component = LoginForm;
        let form = CredentialForm::default();
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
                props(&form),
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::LoginGotoRegister);
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut component = LoginForm;
        let form = CredentialForm::default();
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("a")),
                LoginFormProps {
                    form: &form,
                    notice: None,
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_masks_password() {
        let mut render = RenderHarness::new(60, 24);
        let mut component = LoginForm;
        let form = CredentialForm {
            username: "ash".into(),
            password: "pikapass".into(),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            component.render(frame, frame.area(), props(&form));
        });

        assert!(output.contains("ash"));
        assert!(output.contains("********"));
        assert!(!output.contains("pikapass"));
    }

    #[test]
    fn test_render_shows_error() {
        let mut render = RenderHarness::new(60, 24);
        let mut component = LoginForm;
        let form = CredentialForm {
            error: Some("Invalid credentials".into()),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            component.render(frame, frame.area(), props(&form));
        });

        assert!(output.contains("Invalid credentials"));
    }
}
