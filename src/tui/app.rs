use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::app::UIConfig;
use crate::constants::UI_DEFAULT_VIEWPORT_HEIGHT;
use crate::dialogue::SlotSet;
use crate::session::{Assistant, Session, SharedSession, Turn};

/// Who a chat line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRole {
    User,
    Assistant,
    /// Apology for a failed completion
    Failed,
    System,
}

/// A message as shown in the chat pane
#[derive(Debug, Clone)]
pub struct DisplayMessage {
    pub role: DisplayRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

/// Commands typed into the input line with a leading `:`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiCommand {
    Clear,
    Examples,
    Slots,
    Help,
    Quit,
}

impl TuiCommand {
    pub const ALL: [(&'static str, &'static str); 5] = [
        (":clear", "Start the conversation over"),
        (":examples", "Fill the input with an example request"),
        (":slots", "Toggle the preferences sidebar"),
        (":help", "Show command help"),
        (":quit", "Quit the application"),
    ];

    pub fn parse(input: &str) -> Option<Self> {
        let name = input.trim().strip_prefix(':')?;
        match name.split_whitespace().next()? {
            "clear" => Some(Self::Clear),
            "examples" | "example" | "ex" => Some(Self::Examples),
            "slots" | "sb" => Some(Self::Slots),
            "help" | "h" => Some(Self::Help),
            "quit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Application state
pub struct App {
    pub assistant: Arc<Assistant>,
    pub session: SharedSession,
    /// Slot state as of the last finished turn
    pub slots: SlotSet,
    /// Transcript as of the last finished turn
    pub turns: Vec<Turn>,
    /// Local notices, keyed by how many turns existed when shown
    notices: Vec<(usize, DisplayMessage)>,
    /// Utterance whose turn is in flight
    pub pending: Option<String>,
    /// User input buffer
    pub input: String,
    /// Is the app running?
    pub running: bool,
    /// Is a completion in flight?
    pub is_generating: bool,
    /// Scroll offset for chat view
    pub scroll_offset: u16,
    /// Show slot sidebar
    pub show_slots: bool,
    /// Prompt used by `:examples`
    pub example_prompt: String,
    /// Model name for display
    pub model_name: String,
    /// Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new app instance
    pub fn new(assistant: Arc<Assistant>, session: SharedSession, ui: &UIConfig) -> Self {
        let model_name = assistant.model_name();
        Self {
            assistant,
            session,
            slots: SlotSet::new(),
            turns: Vec::new(),
            notices: Vec::new(),
            pending: None,
            input: String::new(),
            running: true,
            is_generating: false,
            scroll_offset: 0,
            show_slots: ui.show_slots,
            example_prompt: ui.example_prompt.clone(),
            model_name,
            status_message: None,
        }
    }

    /// Copy the session's state for rendering
    pub fn sync(&mut self, session: &Session) {
        self.slots = session.slots().clone();
        self.turns = session.transcript().turns().to_vec();
        self.scroll_offset = 0;
    }

    /// Forget local notices, after the session was cleared
    pub fn reset_notices(&mut self) {
        self.notices.clear();
    }

    /// Show a system message after the current turns
    pub fn add_notice(&mut self, content: impl Into<String>) {
        self.notices.push((
            self.turns.len(),
            DisplayMessage {
                role: DisplayRole::System,
                content: content.into(),
                timestamp: Local::now(),
            },
        ));
        self.scroll_offset = 0;
    }

    /// Transcript turns and notices in the order they happened
    pub fn display_messages(&self) -> Vec<DisplayMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() * 2 + self.notices.len() + 1);
        let mut notices = self.notices.iter().peekable();

        for (index, turn) in self.turns.iter().enumerate() {
            while let Some((_, notice)) = notices.next_if(|(at, _)| *at <= index) {
                messages.push(notice.clone());
            }
            messages.push(DisplayMessage {
                role: DisplayRole::User,
                content: turn.user.clone(),
                timestamp: turn.timestamp,
            });
            messages.push(DisplayMessage {
                role: if turn.failed {
                    DisplayRole::Failed
                } else {
                    DisplayRole::Assistant
                },
                content: turn.assistant.clone(),
                timestamp: turn.timestamp,
            });
        }
        messages.extend(notices.map(|(_, notice)| notice.clone()));

        if let Some(pending) = &self.pending {
            messages.push(DisplayMessage {
                role: DisplayRole::User,
                content: pending.clone(),
                timestamp: Local::now(),
            });
        }

        messages
    }

    /// Clear the input buffer
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Toggle slot sidebar visibility
    pub fn toggle_slots(&mut self) {
        self.show_slots = !self.show_slots;
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Scroll chat view up (towards older messages)
    pub fn scroll_up(&mut self, amount: u16) {
        let total_lines: usize = self
            .display_messages()
            .iter()
            // Role line, content, blank separator
            .map(|m| m.content.lines().count() + 2)
            .sum();
        let total_lines = u16::try_from(total_lines).unwrap_or(u16::MAX);
        let max_scroll = total_lines.saturating_sub(UI_DEFAULT_VIEWPORT_HEIGHT);

        self.scroll_offset = self.scroll_offset.saturating_add(amount).min(max_scroll);
    }

    /// Scroll chat view down
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}
