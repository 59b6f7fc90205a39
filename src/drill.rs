use crate::definition::DefinitionResult;
use crate::session::{
    Action, AfterFlash, Decoration, Effect, EndReason, Frame, Mode, SessionConfig, SessionState,
};
use crate::timer::TimerId;
use crate::typing_policy::{judge, Verdict};
use crate::word_store::WordStore;

/// Spelling drill over a word list: consumes [`Action`]s one at a time and
/// answers each with the [`Effect`]s the caller must carry out.
///
/// The drill never sleeps, paints or touches the network. Flash delays come
/// back as [`Action::TimerExpired`] and lookups as
/// [`Action::DefinitionResolved`], which keeps every transition synchronous
/// and replayable in tests.
#[derive(Debug)]
pub struct Drill<S: WordStore> {
    store: S,
    config: SessionConfig,
    state: SessionState,
    next_timer: u64,
}

impl<S: WordStore> Drill<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        let state = SessionState {
            current: (!store.is_empty()).then_some(0),
            ..SessionState::default()
        };
        Self {
            store,
            config,
            state,
            next_timer: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_finished(&self) -> bool {
        self.state.ended.is_some()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.state.current.and_then(|i| self.store.get(i))
    }

    /// Effects for the first frame: a lookup for the first word and its prompt.
    pub fn start(&mut self) -> Vec<Effect> {
        log::info!(
            "starting drill: {} words, {} repeat(s) each",
            self.store.len(),
            self.config.required_repeats
        );
        match self.current_word().map(str::to_owned) {
            Some(word) => vec![self.request_lookup(word.clone()), self.prompt(&word)],
            None => self.end(EndReason::ListEmptied),
        }
    }

    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        if self.is_finished() {
            log::trace!("ignoring {action:?} after session end");
            return Vec::new();
        }
        match action {
            Action::Key(c) => self.on_key(c),
            Action::DeleteCurrent => self.on_delete(),
            Action::Quit => self.end(EndReason::Quit),
            Action::TimerExpired(id) => self.on_timer(id),
            Action::DefinitionResolved { word, result } => self.on_definition(word, result),
        }
    }

    fn on_key(&mut self, c: char) -> Vec<Effect> {
        if self.state.mode != Mode::Typing {
            return Vec::new();
        }
        let Some(idx) = self.state.current else {
            return Vec::new();
        };
        let Some(word) = self.store.get(idx).map(str::to_owned) else {
            return Vec::new();
        };

        self.state.typed.push(c);
        match judge(&word, &self.state.typed) {
            Verdict::Partial => vec![self.prompt(&word)],
            Verdict::Miss => {
                log::debug!("miss on {word:?}: typed {:?}", self.state.typed);
                self.state.typed.clear();
                self.state.mode = Mode::Error;
                self.state.streak = 0;
                vec![
                    Effect::Render(self.frame_for(&word, Decoration::Error)),
                    self.arm(AfterFlash::Resume),
                ]
            }
            Verdict::Complete => {
                self.state.typed.clear();
                self.state.mode = Mode::Success;
                self.state.streak += 1;
                let mut effects = vec![Effect::Render(self.frame_for(&word, Decoration::Success))];
                log::debug!(
                    "completed {word:?} ({}/{})",
                    self.state.streak,
                    self.config.required_repeats
                );

                if self.state.streak >= self.config.required_repeats {
                    self.state.streak = 0;
                    self.state.mastered += 1;
                    let next = idx + 1;
                    self.state.current = (next < self.store.len()).then_some(next);
                }

                match self.current_word().map(str::to_owned) {
                    Some(upcoming) => {
                        effects.push(self.request_lookup(upcoming));
                        effects.push(self.arm(AfterFlash::Resume));
                    }
                    None => effects.push(self.arm(AfterFlash::Finish)),
                }
                effects
            }
        }
    }

    fn on_delete(&mut self) -> Vec<Effect> {
        let Some(idx) = self.state.current else {
            return Vec::new();
        };
        if let Err(e) = self.store.delete_at(idx) {
            log::warn!("could not delete word {idx}: {e}");
            return Vec::new();
        }

        let mut effects = Vec::new();
        if let Some((id, _)) = self.state.pending_timer.take() {
            effects.push(Effect::CancelTimer(id));
        }
        self.state.typed.clear();
        self.state.streak = 0;
        self.state.mode = Mode::Typing;
        self.state.pending_lookup = None;

        if self.store.is_empty() {
            self.state.current = None;
            effects.extend(self.end(EndReason::ListEmptied));
            return effects;
        }

        let idx = if idx >= self.store.len() { 0 } else { idx };
        self.state.current = Some(idx);
        let Some(word) = self.current_word().map(str::to_owned) else {
            return effects;
        };
        effects.push(self.request_lookup(word.clone()));
        effects.push(self.prompt(&word));
        effects
    }

    fn on_timer(&mut self, id: TimerId) -> Vec<Effect> {
        let after = match self.state.pending_timer {
            Some((pending, after)) if pending == id => after,
            _ => {
                log::debug!("stale timer {id:?}");
                return Vec::new();
            }
        };
        self.state.pending_timer = None;

        match after {
            AfterFlash::Finish => self.end(EndReason::Exhausted),
            AfterFlash::Resume => {
                self.state.mode = Mode::Typing;
                self.state.typed.clear();
                match self.current_word().map(str::to_owned) {
                    Some(word) => vec![self.prompt(&word)],
                    None => self.end(EndReason::Exhausted),
                }
            }
        }
    }

    fn on_definition(&mut self, word: String, result: DefinitionResult) -> Vec<Effect> {
        // Matched by value: deletions shift indices under in-flight lookups.
        if self.state.pending_lookup.as_deref() != Some(word.as_str())
            || self.current_word() != Some(word.as_str())
        {
            log::debug!("discarding definition for {word:?}, no longer current");
            return Vec::new();
        }
        self.state.pending_lookup = None;
        self.state.definition = Some((word.clone(), result));

        if self.state.mode == Mode::Typing {
            vec![self.prompt(&word)]
        } else {
            Vec::new()
        }
    }

    fn end(&mut self, reason: EndReason) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some((id, _)) = self.state.pending_timer.take() {
            effects.push(Effect::CancelTimer(id));
        }
        self.state.pending_lookup = None;
        self.state.typed.clear();
        self.state.ended = Some(reason);
        log::info!(
            "session ended ({reason}): {} mastered, {} left",
            self.state.mastered,
            self.store.len()
        );
        effects.push(Effect::Terminate(reason));
        effects
    }

    fn request_lookup(&mut self, word: String) -> Effect {
        self.state.pending_lookup = Some(word.clone());
        Effect::Lookup(word)
    }

    fn arm(&mut self, after: AfterFlash) -> Effect {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.state.pending_timer = Some((id, after));
        Effect::ArmTimer {
            id,
            delay: self.config.flash,
        }
    }

    fn prompt(&self, word: &str) -> Effect {
        Effect::Render(self.frame_for(word, Decoration::Plain))
    }

    fn frame_for(&self, word: &str, decoration: Decoration) -> Frame {
        let definition = self
            .state
            .definition
            .as_ref()
            .filter(|(w, _)| w == word)
            .map(|(_, d)| d.clone());
        Frame {
            word: word.to_owned(),
            typed: self.state.typed.clone(),
            decoration,
            reveal: decoration == Decoration::Plain
                && self.state.typed.is_empty()
                && self.config.reveal_word,
            definition,
            streak: self.state.streak,
            required: self.config.required_repeats,
        }
    }
}
