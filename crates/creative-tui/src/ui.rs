use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use creative_core::state::CampaignPhase;
use creative_core::{ChatRole, PromptInput};

use crate::app::{App, Tab};
use crate::markup::{html_to_paragraphs, parse_markdown_line};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, tabs, body, footer
    let [header_area, tabs_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_tabs(app, frame, tabs_area);

    match app.tab {
        Tab::Email => render_campaign_screen(app, frame, body_area),
        Tab::Image => render_image_screen(app, frame, body_area),
        Tab::Chat => render_chat_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Gemini Creative Suite ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("AI-Powered Tools for Modern Creators ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<String> = Tab::all()
        .iter()
        .map(|tab| format!(" {} ", tab.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");

    frame.render_widget(tabs, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mode_style = if app.is_loading() {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().bg(Color::Blue).fg(Color::White)
    };
    let mode_text = if app.is_loading() { " WORKING " } else { " READY " };

    let mut hints = vec![
        Span::styled(mode_text, mode_style),
        Span::styled(" ", label_style),
        Span::styled(" Enter ", key_style),
        Span::styled(if app.tab == Tab::Chat { " send " } else { " generate " }, label_style),
        Span::styled(" Tab ", key_style),
        Span::styled(" switch ", label_style),
    ];

    if app.tab != Tab::Image {
        hints.extend(vec![
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
        ]);
    }
    if app.tab == Tab::Image && app.image.image().is_some() {
        hints.extend(vec![
            Span::styled(" Ctrl+S ", key_style),
            Span::styled(" download ", label_style),
        ]);
    }
    hints.extend(vec![
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    if let Some(notice) = &app.notice {
        hints.push(Span::styled(format!("  {}", notice), Style::default().fg(Color::Green)));
    }

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

/// Single-line prompt box with horizontal scrolling that keeps the cursor visible
fn render_input(frame: &mut Frame, area: Rect, input: &PromptInput, title: &str, placeholder: &str, locked: bool) {
    let border_color = if locked { Color::DarkGray } else { Color::Yellow };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title));

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = input.cursor();

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let paragraph = if input.text().is_empty() {
        Paragraph::new(placeholder).style(Style::default().fg(Color::DarkGray))
    } else {
        let visible_text: String = input
            .text()
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(paragraph.block(block), area);

    if !locked {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_error(frame: &mut Frame, area: Rect, error: Option<&str>) {
    if let Some(message) = error {
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn thinking(frame: u8) -> String {
    format!("Thinking{}", ".".repeat(frame as usize + 1))
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let error_height = if app.chat.error().is_some() { 1 } else { 0 };
    let [chat_area, error_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(error_height),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Gemini Chat ");

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.chat.messages() {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(msg.text.as_str()));
            }
            ChatRole::Model => {
                lines.push(Line::from(Span::styled(
                    "AI:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                for line in msg.text.lines() {
                    lines.push(parse_markdown_line(line));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.chat.is_loading() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            thinking(app.animation_frame),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    render_error(frame, error_area, app.chat.error());
    render_input(
        frame,
        input_area,
        &app.chat.input,
        "Message",
        "Ask me anything...",
        app.chat.is_loading(),
    );
}

fn render_image_screen(app: &App, frame: &mut Frame, area: Rect) {
    let error_height = if app.image.error().is_some() { 2 } else { 0 };
    let [input_area, error_area, image_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(error_height),
        Constraint::Min(0),
    ])
    .areas(area);

    render_input(
        frame,
        input_area,
        &app.image.input,
        "Image Generator",
        "A futuristic cityscape at sunset...",
        app.image.is_loading(),
    );
    render_error(frame, error_area, app.image.error());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Result ");

    let text = if app.image.is_loading() {
        Text::from(Span::styled(
            format!("Generating image{}", ".".repeat(app.animation_frame as usize + 1)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ))
    } else if app.image.image().is_some() {
        let size = app.image.image_size().unwrap_or("unknown size");
        Text::from(vec![
            Line::from(Span::styled(
                "Image ready",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(format!("\"{}\"", app.image.generated_for())),
            Line::from(Span::styled(
                format!("JPEG, 16:9, {}", size),
                Style::default().fg(Color::Gray),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Press Ctrl+S to download",
                Style::default().fg(Color::Cyan),
            )),
        ])
    } else {
        Text::from(Span::styled(
            "Your generated image will appear here",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let panel = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, image_area);
}

fn render_campaign_screen(app: &App, frame: &mut Frame, area: Rect) {
    let error_height = if app.campaign.error().is_some() { 2 } else { 0 };
    let [intro_area, input_area, error_area, preview_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(error_height),
        Constraint::Min(0),
    ])
    .areas(area);

    let intro = Paragraph::new(
        "Describe your product, offer, or event, and we'll generate a complete email campaign with a subject, body, and a custom visual.",
    )
    .style(Style::default().fg(Color::Gray));
    frame.render_widget(intro, intro_area);

    render_input(
        frame,
        input_area,
        &app.campaign.input,
        "Email Campaign Generator",
        "e.g., A 25% off flash sale on all winter jackets...",
        app.campaign.is_loading(),
    );
    render_error(frame, error_area, app.campaign.error());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Preview ");

    let dots = ".".repeat(app.animation_frame as usize + 1);
    let label = Style::default().fg(Color::Gray);
    let pending = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);

    let lines: Vec<Line> = match app.campaign.phase() {
        CampaignPhase::Idle | CampaignPhase::Failed(_) => vec![Line::from(Span::styled(
            "Your email campaign preview will appear here",
            Style::default().fg(Color::DarkGray),
        ))],
        CampaignPhase::TextPending => vec![
            Line::from(vec![
                Span::styled("Subject: ", label),
                Span::styled(format!("Generating{}", dots), pending),
            ]),
            Line::default(),
            Line::from(Span::styled(format!("Writing copy{}", dots), pending)),
        ],
        CampaignPhase::ImagePending(campaign) | CampaignPhase::Done(campaign) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Subject: ", label),
                    Span::styled(
                        campaign.subject.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::default(),
            ];

            match &campaign.image {
                Some(_) => {
                    let size = app.campaign.image_size().unwrap_or("unknown size");
                    lines.push(Line::from(Span::styled(
                        format!("[Campaign visual: JPEG, 16:9, {}]", size),
                        Style::default().fg(Color::Green),
                    )));
                }
                None => lines.push(Line::from(Span::styled(
                    format!("[Generating visual{}]", dots),
                    pending,
                ))),
            }
            lines.push(Line::default());

            for paragraph in html_to_paragraphs(&campaign.body) {
                lines.push(Line::from(paragraph));
                lines.push(Line::default());
            }
            lines
        }
    };

    let preview = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.campaign_scroll, 0));
    frame.render_widget(preview, preview_area);
}
