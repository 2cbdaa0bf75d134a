//! Page rendering.

use super::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};
use waveportal::view::{
    CANCEL_BUTTON, CONNECT_BUTTON, ComposeForm, Page, SEND_BUTTON, WAVE_BUTTON, WaveCard,
};

/// Draws the whole page.
pub(crate) fn draw(app: &App, f: &mut Frame<'_>) {
    let page = app.controller.page();

    let form_height = if page.compose_form.is_some() { 4 } else { 0 };
    let [intro, buttons, form, cards, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(form_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(f.area());

    draw_intro(f, intro, &page);
    draw_buttons(f, buttons, &page);
    if let Some(form_state) = &page.compose_form {
        draw_compose_form(f, form, form_state);
    }
    draw_cards(f, cards, &page.cards, app.scroll);
    draw_footer(f, footer, &page);

    if let Some(alert) = page.alert {
        draw_alert(f, alert);
    }
}

fn draw_intro(f: &mut Frame<'_>, area: Rect, page: &Page<'_>) {
    let text = Text::from(vec![
        Line::from(page.header).bold(),
        Line::from(""),
        Line::from(page.bio),
    ]);
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn draw_buttons(f: &mut Frame<'_>, area: Rect, page: &Page<'_>) {
    let mut spans = Vec::with_capacity(3);
    if page.wave_button {
        spans.push(button('w', WAVE_BUTTON));
    }
    if page.connect_button {
        if !spans.is_empty() {
            spans.push(Span::raw("   "));
        }
        spans.push(button('c', CONNECT_BUTTON));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_compose_form(f: &mut Frame<'_>, area: Rect, form: &ComposeForm<'_>) {
    let [input, actions] =
        Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);

    let text = if form.draft.is_empty() {
        Line::from(form.placeholder).add_modifier(Modifier::DIM)
    } else {
        Line::from(form.draft)
    };
    f.render_widget(Paragraph::new(text).block(Block::bordered().title(" Message ")), input);

    let line = Line::from(vec![
        Span::styled("[Enter] ", Style::new().add_modifier(Modifier::DIM)),
        Span::raw(SEND_BUTTON),
        Span::raw("   "),
        Span::styled("[Esc] ", Style::new().add_modifier(Modifier::DIM)),
        Span::raw(CANCEL_BUTTON),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), actions);
}

fn draw_cards(f: &mut Frame<'_>, area: Rect, cards: &[WaveCard], scroll: usize) {
    let mut lines = Vec::with_capacity(cards.len().saturating_sub(scroll) * 4);
    for card in cards.iter().skip(scroll) {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(field("Address", &card.address));
        lines.push(field("Time", &card.time));
        lines.push(field("Message", &card.message));
    }

    let title = match cards.len() {
        0 => " Waves ".to_string(),
        n => format!(" Waves ({}/{n}) ", (scroll + 1).min(n)),
    };
    let paragraph =
        Paragraph::new(lines).block(Block::bordered().title(title)).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, page: &Page<'_>) {
    let hints = if page.alert.is_some() {
        "[Enter/Esc]: dismiss"
    } else if page.compose_form.is_some() {
        "[Enter]: send | [Esc]: cancel | [ctrl + c]: quit"
    } else if page.connect_button {
        "[w]: wave | [c]: connect | [j/k]: scroll | [g/G]: first/last | [r]: reload | [q]: quit"
    } else {
        "[w]: wave | [j/k]: scroll | [g/G]: first/last | [r]: reload | [q]: quit"
    };
    let line = Line::from(Span::styled(hints, Style::new().add_modifier(Modifier::DIM)));
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_alert(f: &mut Frame<'_>, alert: &str) {
    let area = centered(f.area(), 40, 5);
    let text = Text::from(vec![
        Line::from(alert).bold(),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Style::new().add_modifier(Modifier::DIM))),
    ]);
    let block = Block::bordered().title(" Alert ").border_style(Style::new().fg(Color::Yellow));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(text).block(block).alignment(Alignment::Center), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(area);
    area
}

fn button(key: char, label: &str) -> Span<'static> {
    Span::styled(format!("[{key}] {label}"), Style::new().fg(Color::Cyan).bold())
}

fn field<'a>(name: &'static str, value: &'a str) -> Line<'a> {
    Line::from(vec![Span::styled(format!("{name}: "), Style::new().bold()), Span::raw(value)])
}
