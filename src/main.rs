use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};
use spelldrill::{
    app::{App, SessionSummary},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    definition::{DictionaryApiLookup, LookupDispatch, LookupService, NoLookup},
    drill::Drill,
    runtime::{CrosstermEventSource, FixedTicker, Runner, SpellEventSource},
    session::SessionConfig,
    word_store::{append_word, FileWordStore, WordStore},
};
use std::{
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// keystroke-by-keystroke spelling practice with repeat-until-mastered drills
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice spelling one word at a time from a plain word list. Each keystroke is checked as you type; mistakes flash red, correct words flash green and the next word comes up with its definition. Pass a word to add it to the list instead. Ctrl+D removes the current word from the list, Esc or Ctrl+C quits."
)]
pub struct Cli {
    /// word to add to the list, or a `.txt` word list to practice from
    target: Option<String>,

    /// correct spellings in a row required before moving on
    #[clap(short = 'r', long = "repeat", allow_negative_numbers = true)]
    repeat: Option<i64>,

    /// word list file (default: spellingList.txt in the current directory)
    #[clap(short = 'l', long = "list")]
    list: Option<PathBuf>,

    /// how long success/error feedback stays on screen, in milliseconds
    #[clap(long)]
    flash_ms: Option<u64>,

    /// don't show the word before typing starts
    #[clap(long)]
    blind: bool,

    /// don't fetch definitions
    #[clap(long)]
    no_definitions: bool,

    /// remember these settings as defaults
    #[clap(long)]
    save_config: bool,

    /// log verbosity (written to the state directory, RUST_LOG overrides)
    #[clap(long, default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, PartialEq)]
enum Invocation {
    AddWord { word: String, list: PathBuf },
    Practice { list: PathBuf },
}

impl Cli {
    /// Fold command-line overrides into the persisted defaults.
    fn apply_to(&self, config: &mut Config) {
        if let Some(repeat) = self.repeat {
            config.required_repeats = repeat;
        }
        if let Some(flash_ms) = self.flash_ms {
            config.flash_ms = flash_ms;
        }
        if let Some(list) = self.list.clone().or_else(|| self.list_target()) {
            config.list_file = list;
        }
        if self.blind {
            config.reveal_word = false;
        }
        if self.no_definitions {
            config.definitions = false;
        }
    }

    fn list_target(&self) -> Option<PathBuf> {
        self.target
            .as_deref()
            .filter(|t| t.ends_with(".txt"))
            .map(PathBuf::from)
    }

    /// A bare non-numeric argument that isn't a list file is a word to add.
    fn word_target(&self) -> Option<&str> {
        self.target
            .as_deref()
            .filter(|t| !t.ends_with(".txt") && t.trim().parse::<f64>().is_err())
    }

    fn invocation(&self, config: &Config) -> Invocation {
        match self.word_target() {
            Some(word) => Invocation::AddWord {
                word: word.to_string(),
                list: config.list_file.clone(),
            },
            None => Invocation::Practice {
                list: config.list_file.clone(),
            },
        }
    }
}

fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    // The TUI owns the terminal, so logs only ever go to a file.
    let log_file = AppDirs::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    match log_file {
        Some(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply_to(&mut config);

    if cli.save_config {
        // Never persist a config that cannot start a session.
        session_config_or_exit(&config);
        config_store
            .save(&config)
            .with_context(|| format!("saving {}", config_store.path().display()))?;
    }

    match cli.invocation(&config) {
        Invocation::AddWord { word, list } => {
            let added = append_word(&list, &word)?;
            println!("Added \"{added}\" to {}", list.display());
            Ok(())
        }
        Invocation::Practice { list } => practice(&config, &list),
    }
}

fn session_config_or_exit(config: &Config) -> SessionConfig {
    match config.session_config() {
        Ok(session_config) => session_config,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit();
        }
    }
}

/// Raw mode and the alternate screen, undone on drop whichever way the
/// session ends.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            log::warn!("failed to leave raw mode: {e}");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            log::warn!("failed to restore the screen: {e}");
        }
    }
}

fn practice(config: &Config, list: &Path) -> anyhow::Result<()> {
    let session_config = session_config_or_exit(config);

    let store = FileWordStore::open(list)?;
    if store.is_empty() {
        println!("The spelling list is empty.");
        return Ok(());
    }
    log::info!(
        "practicing {} words from {}",
        store.len(),
        store.path().display()
    );

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let summary = {
        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.hide_cursor()?;
        start_tui(&mut terminal, config, session_config, store)?
    };
    println!("{}", summary.message());
    Ok(())
}

fn start_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
    session_config: SessionConfig,
    store: FileWordStore,
) -> anyhow::Result<SessionSummary> {
    let events = CrosstermEventSource::new();
    let lookup: Box<dyn LookupDispatch> = if config.definitions {
        let client = DictionaryApiLookup::new(config.dictionary_url.clone())
            .with_timeout(config.lookup_timeout());
        Box::new(LookupService::new(Arc::new(client), events.sender())?)
    } else {
        Box::new(NoLookup)
    };

    let mut runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));
    let mut app = App::new(Drill::new(store, session_config));
    app.run(terminal, &mut runner, lookup.as_ref())
}
