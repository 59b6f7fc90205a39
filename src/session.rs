use crate::definition::DefinitionResult;
use crate::error::{Result, SpellError};
use crate::timer::TimerId;
use crate::typing_policy::remaining_chars;
use std::time::Duration;

pub const DEFAULT_FLASH: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Correct completions in a row needed before moving to the next word.
    pub required_repeats: u32,
    /// How long a success/error flash stays on screen.
    pub flash: Duration,
    /// Show the whole word (dimmed) until the first keystroke.
    pub reveal_word: bool,
}

impl SessionConfig {
    pub fn new(required_repeats: i64) -> Result<Self> {
        let required_repeats = u32::try_from(required_repeats)
            .ok()
            .filter(|r| *r >= 1)
            .ok_or_else(|| {
                SpellError::InvalidConfiguration(format!(
                    "repeat count must be a positive integer, got {required_repeats}"
                ))
            })?;
        Ok(Self {
            required_repeats,
            ..Self::default()
        })
    }

    pub fn with_flash(mut self, flash: Duration) -> Self {
        self.flash = flash;
        self
    }

    pub fn with_reveal(mut self, reveal_word: bool) -> Self {
        self.reveal_word = reveal_word;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            required_repeats: 1,
            flash: DEFAULT_FLASH,
            reveal_word: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Mode {
    Typing,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Decoration {
    Plain,
    Success,
    Error,
}

/// What happens when the pending flash timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterFlash {
    /// Back to typing on the current word.
    Resume,
    /// List exhausted, end the session.
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EndReason {
    #[strum(serialize = "list exhausted")]
    Exhausted,
    #[strum(serialize = "quit")]
    Quit,
    #[strum(serialize = "list emptied")]
    ListEmptied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Index of the word being practiced, `None` once the list is exhausted.
    pub current: Option<usize>,
    /// Always a prefix of the current word while typing; empty otherwise.
    pub typed: String,
    pub mode: Mode,
    pub streak: u32,
    /// Words that reached the repeat goal this session.
    pub mastered: usize,
    /// Latest resolved definition, tagged with the word it belongs to.
    pub definition: Option<(String, DefinitionResult)>,
    /// Word of the one lookup whose result is still wanted.
    pub pending_lookup: Option<String>,
    pub pending_timer: Option<(TimerId, AfterFlash)>,
    pub ended: Option<EndReason>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current: Some(0),
            typed: String::new(),
            mode: Mode::Typing,
            streak: 0,
            mastered: 0,
            definition: None,
            pending_lookup: None,
            pending_timer: None,
            ended: None,
        }
    }
}

/// One paint request for the render sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub word: String,
    pub typed: String,
    pub decoration: Decoration,
    /// Show the full word dimmed instead of blanks.
    pub reveal: bool,
    pub definition: Option<DefinitionResult>,
    pub streak: u32,
    pub required: u32,
}

impl Frame {
    /// Blank cells after the typed prefix.
    pub fn filler(&self) -> usize {
        remaining_chars(&self.word, &self.typed)
    }

    /// Text painted on the word row.
    pub fn text(&self) -> String {
        match self.decoration {
            Decoration::Success | Decoration::Error => self.word.clone(),
            Decoration::Plain if self.reveal => self.word.clone(),
            Decoration::Plain => format!("{}{}", self.typed, " ".repeat(self.filler())),
        }
    }
}

/// Input to the drill, already stripped of terminal details.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Key(char),
    DeleteCurrent,
    Quit,
    TimerExpired(TimerId),
    DefinitionResolved {
        word: String,
        result: DefinitionResult,
    },
}

/// Side effects requested by the drill, carried out by the app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Render(Frame),
    Lookup(String),
    ArmTimer { id: TimerId, delay: Duration },
    CancelTimer(TimerId),
    Terminate(EndReason),
}
