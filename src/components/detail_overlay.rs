use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::Component;
use crate::action::Action;
use crate::projection::{axis_points, project, radar_points, StatProjection};
use crate::state::Pokemon;

/// Short axis tags printed at the radar spoke tips.
const AXIS_TAGS: [&str; 6] = ["HP", "ATK", "DEF", "SAT", "SDF", "SPD"];

pub struct DetailOverlayProps<'a> {
    /// The selected pokedex number.
    pub key: u16,
    /// The matching record, if it has been loaded. `None` renders an empty
    /// body (lookup fails silently).
    pub pokemon: Option<&'a Pokemon>,
    pub is_focused: bool,
}

/// Modal overlay with the stat radar for the selected entry.
pub struct DetailOverlay {
    modal: Modal,
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

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
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::DetailClose),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 40 || area.height < 14 {
            return;
        }

        let modal_area = centered_rect(56, 18, area);
        let projection = props.pokemon.map(project);
        let key = props.key;

        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let Some(projection) = projection.as_ref() else {
                // Selection references a key that is not loaded: nothing to show.
                frame.render_widget(
                    Paragraph::new(format!("Pokemon #{key}"))
                        .style(Style::default().fg(Color::DarkGray)),
                    content_area,
                );
                return;
            };

            let columns = Layout::horizontal([
                Constraint::Percentage(45),
                Constraint::Percentage(55),
            ])
            .split(content_area);

            frame.render_widget(
                Paragraph::new(stat_lines(key, projection)).wrap(Wrap { trim: false }),
                columns[0],
            );

            let chart = Canvas::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", projection.name)),
                )
                .marker(symbols::Marker::Braille)
                .x_bounds([-1.4, 1.4])
                .y_bounds([-1.4, 1.4])
                .paint(|ctx| draw_radar(ctx, projection));
            frame.render_widget(chart, columns[1]);
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(25, 25, 35)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DetailClose,
                render_content: &mut render_content,
            },
        );
    }
}

fn stat_lines(key: u16, projection: &StatProjection) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!("Pokedex Number: {key}")),
        Line::from(format!("Name: {}", projection.name)),
        Line::from(""),
    ];
    for (label, value) in projection.axes() {
        let bar_len = (value as usize / 10).clamp(1, 20);
        let bar = "#".repeat(bar_len);
        lines.push(Line::from(format!("{label:>15} {value:>3} {bar}")));
    }
    lines
}

/// The radar is redrawn from scratch every frame, so the previous chart can
/// never leak stale values into the next selection.
fn draw_radar(ctx: &mut Context<'_>, projection: &StatProjection) {
    let frame_color = Color::DarkGray;
    let data_color = Color::Cyan;

    let spokes = axis_points(1.0);
    for (i, &(x, y)) in spokes.iter().enumerate() {
        ctx.draw(&CanvasLine {
            x1: 0.0,
            y1: 0.0,
            x2: x,
            y2: y,
            color: frame_color,
        });
        ctx.print(x * 1.25, y * 1.25, AXIS_TAGS[i].to_string());
    }
    // outer hexagon frame
    for i in 0..spokes.len() {
        let (x1, y1) = spokes[i];
        let (x2, y2) = spokes[(i + 1) % spokes.len()];
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: frame_color,
        });
    }

    let points = radar_points(&projection.values, 1.0);
    for i in 0..points.len() {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % points.len()];
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: data_color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn pikachu() -> Pokemon {
        Pokemon {
            id: 1,
            pokedex_number: 25,
            name: "pikachu".into(),
            hp: 35,
            attack: 55,
            defense: 40,
            sp_attack: 50,
            sp_defense: 50,
            speed: 90,
        }
    }

    #[test]
    fn test_esc_closes_overlay() {
        let mut component = DetailOverlay::new();
        let pokemon = pikachu();
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
                DetailOverlayProps {
                    key: 25,
                    pokemon: Some(&pokemon),
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailClose);
    }

    #[test]
    fn test_render_shows_stats_in_axis_order() {
        let mut render = RenderHarness::new(80, 24);
        let mut component = DetailOverlay::new();
        let pokemon = pikachu();

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                DetailOverlayProps {
                    key: 25,
                    pokemon: Some(&pokemon),
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("pikachu"));
        assert!(output.contains("Pokedex Number: 25"));
        // fixed axis order with the record's values
        let hp = output.find("HP").unwrap();
        let speed = output.rfind("Speed").unwrap();
        assert!(hp < speed);
        assert!(output.contains("90"));
    }

    #[test]
    fn test_render_missing_record_shows_no_stats() {
        let mut render = RenderHarness::new(80, 24);
        let mut component = DetailOverlay::new();

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                DetailOverlayProps {
                    key: 150,
                    pokemon: None,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Pokemon #150"));
        assert!(!output.contains("Speed"));
    }
}
