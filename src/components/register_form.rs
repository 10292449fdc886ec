use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::centered_rect;

use super::login_form::{field_line, render_hint_bar};
use super::Component;
use crate::action::Action;
use crate::state::{CredentialField, CredentialForm};

pub struct RegisterFormProps<'a> {
    pub form: &'a CredentialForm,
    pub is_focused: bool,
}

/// The registration screen. Esc returns to login.
#[derive(Default)]
pub struct RegisterForm;

impl Component<Action> for RegisterForm {
    type Props<'a> = RegisterFormProps<'a>;

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
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => Some(Action::RegisterFieldNext),
            KeyCode::Enter => Some(Action::RegisterSubmit),
            KeyCode::Backspace => Some(Action::RegisterBackspace),
            KeyCode::Esc => Some(Action::RegisterGotoLogin),
            KeyCode::Char(ch) => Some(Action::RegisterInput(ch)),
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
            .title(" Register ")
            .title_alignment(Alignment::Center);
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let rows = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1), // username
            Constraint::Length(1),
            Constraint::Length(1), // password
            Constraint::Length(1),
            Constraint::Length(1), // error / status
        ])
        .split(inner);

        frame.render_widget(
            field_line(
                "Username",
                &props.form.username,
                false,
                props.form.field == CredentialField::Username,
            ),
            rows[1],
        );
        frame.render_widget(
            field_line(
                "Password",
                &props.form.password,
                true,
                props.form.field == CredentialField::Password,
            ),
            rows[3],
        );

        let status = if props.form.submitting {
            Paragraph::new("Registering...").style(Style::default().fg(Color::Yellow))
        } else if let Some(error) = props.form.error.as_deref() {
            Paragraph::new(error).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new("")
        };
        frame.render_widget(status.alignment(Alignment::Center), rows[5]);

        render_hint_bar(frame, area, "esc", "back to login");
    }
}
