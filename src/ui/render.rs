use crate::menu::{ItemKind, ERROR_TITLE};
use crate::ui::navigator::{DetailView, Mode, Navigator, PromptSession};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;
const LIST_BORDER_ROWS: u16 = 2;

/// Terminal rows taken by everything except the list rows themselves.
pub const CHROME_ROWS: u16 = HEADER_HEIGHT + FOOTER_HEIGHT + LIST_BORDER_ROWS;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const EMPTY_PLACEHOLDER: &str = "<no items>";
const EMPTY_FILTER_PLACEHOLDER: &str = "<no matching items>";

/// List rows visible in a terminal `height` rows tall.
pub fn list_rows(height: u16) -> usize {
    height.saturating_sub(CHROME_ROWS).max(1) as usize
}

pub fn render(frame: &mut Frame, nav: &Navigator, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    render_header(frame, nav, theme, chunks[0]);
    render_items(frame, nav, theme, chunks[1]);
    render_footer(frame, nav, theme, chunks[2]);

    match nav.mode() {
        Mode::Collecting(session) => render_prompt(frame, session, theme),
        Mode::ShowingDetail(view) => render_detail(frame, view, theme),
        Mode::Loading { origin } => render_loading(frame, origin, nav.spinner_frame, theme),
        Mode::Browsing | Mode::Quitting => {}
    }
}

fn render_header(frame: &mut Frame, nav: &Navigator, theme: &Theme, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", crate::menu::ROOT_TITLE),
        Style::default()
            .fg(theme.border)
            .add_modifier(Modifier::BOLD),
    )];
    if !nav.current().is_root() {
        for segment in nav.breadcrumb().split(crate::menu::SEPARATOR) {
            spans.push(Span::styled(" › ", Style::default().fg(theme.muted)));
            spans.push(Span::styled(
                segment.to_string(),
                Style::default().fg(theme.highlight),
            ));
        }
    }

    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().bg(theme.bg));

    frame.render_widget(header, area);
}

fn render_items(frame: &mut Frame, nav: &Navigator, theme: &Theme, area: Rect) {
    let screen = nav.current();
    let visible = screen.visible_items();
    let rows = area.height.saturating_sub(LIST_BORDER_ROWS) as usize;

    let items: Vec<ListItem> = if visible.is_empty() {
        let placeholder = if screen.filter().is_empty() {
            EMPTY_PLACEHOLDER
        } else {
            EMPTY_FILTER_PLACEHOLDER
        };
        vec![ListItem::new(placeholder).style(Style::default().fg(theme.muted))]
    } else {
        visible
            .iter()
            .enumerate()
            .skip(screen.offset())
            .take(rows.max(1))
            .map(|(i, item)| {
                let marker = match item.kind() {
                    ItemKind::SubMenu(_) | ItemKind::DynamicSubMenu(_) => "▶",
                    ItemKind::Prompt(_) | ItemKind::MultiPrompt(_) => "✎",
                    ItemKind::Detail(_) => "ℹ",
                    ItemKind::Dispatch | ItemKind::Action(_) => "•",
                    ItemKind::Info => " ",
                };
                let title_style = if item.title == ERROR_TITLE {
                    Style::default().fg(theme.error)
                } else {
                    Style::default().fg(theme.text)
                };
                let mut spans = vec![
                    Span::raw(format!(" {} ", marker)),
                    Span::styled(item.title.clone(), title_style),
                ];
                if !item.description.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", item.description),
                        Style::default().fg(theme.muted),
                    ));
                }
                let line = Line::from(spans);
                if i == screen.selected() {
                    ListItem::new(line).style(
                        Style::default()
                            .fg(theme.selected_fg)
                            .bg(theme.selected_bg)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    ListItem::new(line)
                }
            })
            .collect()
    };

    let title = if nav.filtering || !screen.filter().is_empty() {
        format!(" Filter: {}▏", screen.filter())
    } else {
        format!(" {} items ", visible.len())
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().bg(theme.bg));

    frame.render_widget(list, area);
}

fn render_footer(frame: &mut Frame, nav: &Navigator, theme: &Theme, area: Rect) {
    let help_text = match nav.mode() {
        Mode::Browsing if nav.filtering => {
            "[type] Filter  [↑↓] Navigate  [Enter] Select  [Esc] Clear filter"
        }
        Mode::Browsing => {
            "[↑↓/jk] Navigate  [Enter/l] Select  [Esc/h] Back  [/] Filter  [Q] Quit"
        }
        Mode::Collecting(_) => "[Enter] Confirm  [Esc] Cancel  [Ctrl+C] Quit",
        Mode::ShowingDetail(_) => "[↑↓/jk] Scroll  [Esc/h/q] Close",
        Mode::Loading { .. } => "Loading...  [Q] Quit",
        Mode::Quitting => "",
    };

    let footer = Paragraph::new(help_text).style(Style::default().fg(theme.muted));
    frame.render_widget(footer, area);
}

fn render_prompt(frame: &mut Frame, session: &PromptSession, theme: &Theme) {
    let area = centered_rect(60, 7, frame.area());
    let (step, total) = session.progress();

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{}: ", session.label()),
            Style::default().fg(theme.highlight),
        ),
        Span::styled(
            format!("{}▏", session.display_input()),
            Style::default().fg(theme.text),
        ),
    ])];
    if total > 1 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Step {} of {}", step, total),
            Style::default().fg(theme.muted),
        )));
    }

    let prompt = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", session.title))
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().bg(theme.bg));

    frame.render_widget(Clear, area);
    frame.render_widget(prompt, area);
}

fn render_detail(frame: &mut Frame, view: &DetailView, theme: &Theme) {
    let outer = frame.area();
    let area = centered_rect(80, outer.height.saturating_sub(4), outer);
    let heading_color = if view.heading == ERROR_TITLE {
        theme.error
    } else {
        theme.highlight
    };

    let body: Vec<Line> = view
        .body
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();

    let detail = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" {} ", view.heading),
                    Style::default()
                        .fg(heading_color)
                        .add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().fg(theme.text).bg(theme.bg))
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0));

    frame.render_widget(Clear, area);
    frame.render_widget(detail, area);
}

fn render_loading(frame: &mut Frame, origin: &str, spinner_frame: usize, theme: &Theme) {
    let area = centered_rect(40, 3, frame.area());
    let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];

    let loading = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", spinner), Style::default().fg(theme.highlight)),
        Span::styled(
            format!("Loading {}...", origin),
            Style::default().fg(theme.text),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    )
    .style(Style::default().bg(theme.bg));

    frame.render_widget(Clear, area);
    frame.render_widget(loading, area);
}

/// A rectangle `percent_x` wide and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x.min(100) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Item, Screen};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc::unbounded_channel;

    fn draw(nav: &Navigator) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|f| render(f, nav, Theme::default_theme()))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_list_rows() {
        assert_eq!(list_rows(CHROME_ROWS + 10), 10);
        assert_eq!(list_rows(2), 1);
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(60, 7, area);
        assert_eq!(rect, Rect::new(20, 16, 60, 7));
        let tiny = centered_rect(60, 50, Rect::new(0, 0, 10, 5));
        assert_eq!(tiny.height, 5);
    }

    #[test]
    fn test_render_shows_breadcrumb_and_items() {
        let (tx, _rx) = unbounded_channel();
        let root = Screen::root(vec![Item::submenu(
            "Vault",
            "Secrets",
            vec![Item::dispatch("List", "List secrets")],
        )]);
        let mut nav = Navigator::new(root, tx);
        nav.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));

        let content = draw(&nav);
        assert!(content.contains("OpsDeck"));
        assert!(content.contains("Vault"));
        assert!(content.contains("List secrets"));
    }

    #[test]
    fn test_render_masks_password_prompt() {
        let (tx, _rx) = unbounded_channel();
        let root = Screen::root(vec![Item::prompt("Login", "", "Password")]);
        let mut nav = Navigator::new(root, tx);
        nav.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
        for c in "secret".chars() {
            nav.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty()));
        }

        let content = draw(&nav);
        assert!(content.contains("******"));
        assert!(!content.contains("secret"));
    }
}
