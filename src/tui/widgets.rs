//! Shared UI primitives: modal frame, blocking alert and labelled input.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    fields::Theme,
    tui::{
        colors::{alert_colors, input_colors},
        input::InputField,
        utils::centered_rect,
    },
};

/// Clear a centred area, draw a titled frame and return its inner area.
pub fn render_modal(f: &mut Frame, area: Rect, title: &str, percent_x: u16, percent_y: u16, border: Color) -> Rect {
    let area = centered_rect(percent_x, percent_y, area);
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(Span::styled(format!(" {title} "), Style::default().add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}

/// Draw a blocking notification over everything else.
pub fn render_alert(f: &mut Frame, area: Rect, message: &str, theme: Theme) {
    let (bg, border) = alert_colors(theme);
    let fg = match theme {
        Theme::Light => Color::Black,
        Theme::Dark => Color::White,
    };
    let area = centered_rect(50, 25, area);
    f.render_widget(Clear, area);
    let text = vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("Press Enter or Esc to dismiss", Style::default().add_modifier(Modifier::ITALIC))),
    ];
    let alert = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Alert ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .style(Style::default().bg(bg).fg(fg))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(alert, area);
}

/// Label line followed by the field's value, with the cursor drawn when the
/// field is active.
pub fn input_lines(label: &str, field: &InputField, theme: Theme) -> Vec<Line<'static>> {
    let (bg, fg) = input_colors(theme);
    let label_style = if field.active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value_style = Style::default().bg(bg).fg(fg);

    let value = if field.value.is_empty() {
        let mut spans = Vec::new();
        if field.active {
            spans.push(Span::styled(" ", value_style.add_modifier(Modifier::REVERSED)));
        }
        spans.push(Span::styled(field.placeholder.to_string(), Style::default().bg(bg).fg(Color::Gray)));
        Line::from(spans)
    } else if field.active {
        let chars: Vec<char> = field.value.chars().collect();
        let before: String = chars[..field.cursor.min(chars.len())].iter().collect();
        let at = chars.get(field.cursor).map_or(" ".to_string(), |c| c.to_string());
        let after: String = chars.iter().skip(field.cursor + 1).collect();
        Line::from(vec![
            Span::styled(before, value_style),
            Span::styled(at, value_style.add_modifier(Modifier::REVERSED)),
            Span::styled(after, value_style),
        ])
    } else {
        Line::from(Span::styled(field.value.clone(), value_style))
    };

    vec![Line::from(Span::styled(label.to_string(), label_style)), value]
}
