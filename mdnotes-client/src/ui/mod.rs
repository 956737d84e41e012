//! Terminal views. All of them read from [`NotesState`](crate::state::NotesState);
//! none of them talk to the server.

pub mod editor;
pub mod preview;
pub mod shell;
mod wrap;

use ratatui::style::{Color, Style};

/// Which field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    List,
    Title,
    Content,
}

impl Focus {
    pub const fn next(self) -> Self {
        match self {
            Self::Search => Self::List,
            Self::List => Self::Title,
            Self::Title => Self::Content,
            Self::Content => Self::Search,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::Search => Self::Content,
            Self::List => Self::Search,
            Self::Title => Self::List,
            Self::Content => Self::Title,
        }
    }
}

fn focused_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
