use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::runtime::SpellEvent;
use crate::session::Action;

/// Translate a key press. Ctrl+C and Esc quit, Ctrl+D deletes the current
/// word; no control character ever reaches the drill as spelling input.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('d') if ctrl => Some(Action::DeleteCurrent),
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(c) if !c.is_control() => Some(Action::Key(c)),
        _ => None,
    }
}

/// Map a runtime event onto the drill's input, if it has one.
pub fn action_for(event: SpellEvent) -> Option<Action> {
    match event {
        SpellEvent::Key(key) => action_for_key(key),
        SpellEvent::TimerExpired(id) => Some(Action::TimerExpired(id)),
        SpellEvent::Definition { word, result } => {
            Some(Action::DefinitionResolved { word, result })
        }
        SpellEvent::Closed => Some(Action::Quit),
        SpellEvent::Resize | SpellEvent::Tick => None,
    }
}
