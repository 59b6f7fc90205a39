use ratatui::{backend::Backend, Terminal};

use crate::definition::LookupDispatch;
use crate::drill::Drill;
use crate::keymap::action_for;
use crate::runtime::{Runner, SpellEvent, SpellEventSource, Ticker};
use crate::session::{Effect, EndReason, Frame};
use crate::word_store::WordStore;

/// How a finished session went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub mastered: usize,
    pub remaining: usize,
}

impl SessionSummary {
    /// One line printed after the terminal is restored.
    pub fn message(&self) -> String {
        match self.reason {
            EndReason::Exhausted => format!("All done! {} word(s) mastered.", self.mastered),
            EndReason::ListEmptied => "No more words left.".to_string(),
            EndReason::Quit => format!(
                "Stopped after {} word(s); {} in the list.",
                self.mastered, self.remaining
            ),
        }
    }
}

/// Drives a [`Drill`]: feeds it events from the runner and carries out the
/// effects it asks for.
#[derive(Debug)]
pub struct App<S: WordStore> {
    pub drill: Drill<S>,
    last_frame: Option<Frame>,
}

impl<S: WordStore> App<S> {
    pub fn new(drill: Drill<S>) -> Self {
        Self {
            drill,
            last_frame: None,
        }
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn run<B: Backend, E: SpellEventSource, T: Ticker>(
        &mut self,
        terminal: &mut Terminal<B>,
        runner: &mut Runner<E, T>,
        lookup: &dyn LookupDispatch,
    ) -> anyhow::Result<SessionSummary> {
        let effects = self.drill.start();
        let mut finished = self.apply(effects, terminal, runner, lookup)?;

        while !finished {
            let event = runner.step();
            if event == SpellEvent::Resize {
                self.redraw(terminal)?;
                continue;
            }
            let Some(action) = action_for(event) else {
                continue;
            };
            let effects = self.drill.handle(action);
            finished = self.apply(effects, terminal, runner, lookup)?;
        }

        Ok(self.summary())
    }

    pub fn summary(&self) -> SessionSummary {
        let state = self.drill.state();
        SessionSummary {
            reason: state.ended.unwrap_or(EndReason::Quit),
            mastered: state.mastered,
            remaining: self.drill.store().len(),
        }
    }

    /// Carry out `effects` in order. Returns true once the session has ended.
    fn apply<B: Backend, E: SpellEventSource, T: Ticker>(
        &mut self,
        effects: Vec<Effect>,
        terminal: &mut Terminal<B>,
        runner: &mut Runner<E, T>,
        lookup: &dyn LookupDispatch,
    ) -> anyhow::Result<bool> {
        let mut finished = false;
        for effect in effects {
            match effect {
                Effect::Render(frame) => {
                    terminal.draw(|f| f.render_widget(&frame, f.area()))?;
                    self.last_frame = Some(frame);
                }
                Effect::Lookup(word) => lookup.dispatch(word),
                Effect::ArmTimer { id, delay } => {
                    runner.timer_mut().after(delay, id);
                }
                Effect::CancelTimer(id) => {
                    runner.timer_mut().cancel(id);
                }
                Effect::Terminate(_) => {
                    runner.timer_mut().cancel_all();
                    finished = true;
                }
            }
        }
        Ok(finished)
    }

    fn redraw<B: Backend>(&self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        if let Some(frame) = &self.last_frame {
            terminal.draw(|f| f.render_widget(frame, f.area()))?;
        }
        Ok(())
    }
}
