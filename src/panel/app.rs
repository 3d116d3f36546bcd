use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::dispatch::{ClipboardUrlSource, UrlSource, encode};
use crate::editor::Editor;
use crate::model::CommandSpec;
use crate::relay::{self, RelayHandle};
use crate::store::CommandStore;

use super::PanelOptions;
use super::input::Input;
use super::view;

pub(super) fn run(opts: PanelOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("panel requires an interactive terminal (TTY)");
    }

    let store = CommandStore::open(&opts.store_dir)?;
    let relay = relay::spawn(opts.executor_url);
    relay.notify_mounted();

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut app = App::new(store, relay, Box::new(ClipboardUrlSource::new()));
    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| view::draw(f, app)).context("draw")?;
        if app.quit {
            return Ok(());
        }
        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => app.handle_key(k),
                _ => {}
            }
        }
    }
}

/// Fields the selection cursor can land on, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Field {
    Base,
    Arg(usize),
    AddArg,
    Run,
}

pub(super) struct App {
    store: CommandStore,
    relay: RelayHandle,
    url_source: Box<dyn UrlSource>,

    pub(super) spec: CommandSpec,
    pub(super) editor: Editor,
    pub(super) input: Input,
    pub(super) selected: usize,

    pub(super) status: Option<String>,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn new(
        store: CommandStore,
        relay: RelayHandle,
        url_source: Box<dyn UrlSource>,
    ) -> Self {
        let spec = store.load();
        Self {
            store,
            relay,
            url_source,
            spec,
            editor: Editor::new(),
            input: Input::default(),
            selected: 0,
            status: None,
            quit: false,
        }
    }

    pub(super) fn store_root(&self) -> &std::path::Path {
        self.store.root()
    }

    pub(super) fn fields(&self) -> Vec<Field> {
        let mut out = vec![Field::Base];
        out.extend((0..self.spec.args.len()).map(Field::Arg));
        out.push(Field::AddArg);
        out.push(Field::Run);
        out
    }

    pub(super) fn selected_field(&self) -> Field {
        let fields = self.fields();
        fields[self.selected.min(fields.len() - 1)]
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.fields().len() - 1);
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if self.editor.is_open() {
            self.handle_editor_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(self.fields().len() - 1);
            }
            KeyCode::Char('a') => self.open_editor(Field::AddArg),
            KeyCode::Char('r') => self.run_command(),
            KeyCode::Enter => {
                let field = self.selected_field();
                if field == Field::Run {
                    self.run_command();
                } else {
                    self.open_editor(field);
                }
            }
            _ => {}
        }
    }

    fn open_editor(&mut self, field: Field) {
        match field {
            Field::Base => self.editor.open_command(&self.spec),
            Field::Arg(i) => self.editor.open_argument(i, &self.spec),
            Field::AddArg => self.editor.open_new_argument(),
            Field::Run => return,
        }
        self.input.set(self.editor.value().to_string());
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editor.cancel();
                self.input.clear();
            }
            KeyCode::Enter => {
                self.editor.set_value(self.input.buf.clone());
                match self.editor.submit(&self.store) {
                    Ok(spec) => self.spec = spec,
                    Err(err) => self.status = Some(format!("save failed: {:#}", err)),
                }
                self.input.clear();
                self.clamp_selection();
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.editor.remove(&self.store) {
                    Ok(spec) => self.spec = spec,
                    Err(err) => self.status = Some(format!("remove failed: {:#}", err)),
                }
                if !self.editor.is_open() {
                    self.input.clear();
                }
                self.clamp_selection();
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    self.input.insert_char(c);
                }
            }
            _ => {}
        }
    }

    /// Resolve the active URL and hand the composed command to the
    /// relay. No URL means no dispatch (best-effort resolution, never
    /// reported as an error).
    pub(super) fn run_command(&mut self) {
        let url = self.url_source.active_url();
        let Some(payload) = encode(&self.spec, url.as_deref()) else {
            return;
        };
        self.relay.run_command(payload);
        self.status = Some(format!("dispatched {}", self.spec.base));
    }
}

#[cfg(test)]
#[path = "../tests/panel/app_tests.rs"]
mod tests;
