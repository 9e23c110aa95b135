use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::InputMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    NextTab,
    PrevTab,
    MoveUp,
    MoveDown,
    Open,
    Back,
    Refresh,
    ShowHelp,
    HideHelp,
    // Admin login
    LoginStart,
    LoginChar(char),
    LoginBackspace,
    LoginConfirm,
    LoginCancel,
    Logout,
    // Admin actions
    NewArticle,
    EditArticle,
    DeleteArticle,
    // Editor
    EditorChar(char),
    EditorNewline,
    EditorBackspace,
    EditorSwitchField,
    EditorSave,
    EditorCancel,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    match mode {
        InputMode::Login => match key.code {
            KeyCode::Enter => Some(AppAction::LoginConfirm),
            KeyCode::Esc => Some(AppAction::LoginCancel),
            KeyCode::Backspace => Some(AppAction::LoginBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(AppAction::LoginChar(c))
            }
            _ => None,
        },

        InputMode::Editor => match (key.code, key.modifiers) {
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => Some(AppAction::EditorSave),
            (KeyCode::Esc, _) => Some(AppAction::EditorCancel),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => Some(AppAction::EditorSwitchField),
            (KeyCode::Enter, _) => Some(AppAction::EditorNewline),
            (KeyCode::Backspace, _) => Some(AppAction::EditorBackspace),
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                Some(AppAction::EditorChar(c))
            }
            _ => None,
        },

        InputMode::Normal => match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => Some(AppAction::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

            (KeyCode::Tab, _) | (KeyCode::Right, _) | (KeyCode::Char('l'), _) => {
                Some(AppAction::NextTab)
            }
            (KeyCode::BackTab, _) | (KeyCode::Left, _) | (KeyCode::Char('h'), _) => {
                Some(AppAction::PrevTab)
            }
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

            (KeyCode::Enter, _) => Some(AppAction::Open),
            (KeyCode::Esc, _) | (KeyCode::Backspace, _) => Some(AppAction::Back),
            (KeyCode::Char('r'), _) => Some(AppAction::Refresh),

            (KeyCode::Char('a'), _) => Some(AppAction::LoginStart),
            (KeyCode::Char('x'), _) => Some(AppAction::Logout),
            (KeyCode::Char('n'), _) => Some(AppAction::NewArticle),
            (KeyCode::Char('e'), _) => Some(AppAction::EditArticle),
            (KeyCode::Char('d'), _) => Some(AppAction::DeleteArticle),

            (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

            _ => None,
        },
    }
}
