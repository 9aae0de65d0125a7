use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::ChatReply(result) => {
            app.chat.finish(result);
            app.scroll_chat_to_bottom();
        }
        AppEvent::ImageReady(result) => app.image.finish(result),
        AppEvent::Campaign(update) => app.campaign.apply(update),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Global keys
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('s') if ctrl => app.download_image(),

        // View switching
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),

        // Result scrolling
        KeyCode::PageUp | KeyCode::Up => app.scroll_up(),
        KeyCode::PageDown | KeyCode::Down => app.scroll_down(),

        KeyCode::Enter => app.submit(),

        // Prompt editing; the input stays locked while a request is pending
        _ if app.is_loading() => {}
        KeyCode::Backspace => app.input_mut().backspace(),
        KeyCode::Delete => app.input_mut().delete(),
        KeyCode::Left => app.input_mut().move_left(),
        KeyCode::Right => app.input_mut().move_right(),
        KeyCode::Home => app.input_mut().move_home(),
        KeyCode::End => app.input_mut().move_end(),
        KeyCode::Char(c) if !ctrl => app.input_mut().insert(c),
        _ => {}
    }
}
