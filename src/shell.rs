use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::commands::Registry;
use crate::context::Context;
use crate::editor::{Editor, SystemEditor};
use crate::error::{Result, TreeError};
use crate::signals;
use crate::store::files::FileStore;
use crate::store::lock::SessionLock;
use crate::store::repo::Repo;
use crate::tree;

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Line input, output streams and the yes/no gate used by destructive commands.
pub trait Console {
    /// Show `prompt` and read one line. `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
    fn confirm(&mut self, question: &str) -> Result<bool>;
    fn out(&mut self) -> &mut dyn Write;
    fn err(&mut self) -> &mut dyn Write;
}

/// Console over any line reader and pair of writers.
pub struct LineConsole<R, W, E> {
    input: R,
    out: W,
    err: E,
}

impl<R: BufRead, W: Write, E: Write> LineConsole<R, W, E> {
    pub fn new(input: R, out: W, err: E) -> Self {
        Self { input, out, err }
    }

    pub fn into_parts(self) -> (R, W, E) {
        (self.input, self.out, self.err)
    }
}

impl<R: BufRead, W: Write, E: Write> Console for LineConsole<R, W, E> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.read_line(&format!("{question} (y/N) "))?;
        Ok(answer
            .map(|a| matches!(a.trim(), "y" | "Y"))
            .unwrap_or(false))
    }

    fn out(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn err(&mut self) -> &mut dyn Write {
        &mut self.err
    }
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Interactive session state: the store, where the user is, and the collaborators
/// handlers need.
pub struct Shell {
    store: FileStore,
    ctx: Context,
    editor: Box<dyn Editor>,
    clock: Clock,
    registry: Registry,
}

impl Shell {
    pub fn new(store: FileStore, editor: Box<dyn Editor>) -> Result<Self> {
        let ctx = Context::at_root(&store)?;
        Ok(Self {
            store,
            ctx,
            editor,
            clock: Box::new(Utc::now),
            registry: Registry::builtin(),
        })
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn store_and_context_mut(&mut self) -> (&FileStore, &mut Context) {
        (&self.store, &mut self.ctx)
    }

    pub fn editor(&self) -> &dyn Editor {
        self.editor.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Recompute derived state along the whole navigation history, then reload the
    /// current task.
    pub fn propagate(&mut self) -> Result<()> {
        tree::propagate(&self.store, &self.ctx.history_ids())?;
        self.ctx.refresh(&self.store)?;
        Ok(())
    }

    /// Run one input line. Blank lines do nothing; unknown commands print help.
    pub fn execute(&mut self, console: &mut dyn Console, line: &str) -> Result<Flow> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = tokens.collect();
        let Some(spec) = self.registry.get(name) else {
            self.registry.print_help(console.out())?;
            return Ok(Flow::Continue);
        };
        tracing::debug!(command = spec.name, ?args, "dispatching");
        (spec.handler)(self, console, &args)
    }

    /// Read and run commands until `exit`, end of input or a shutdown signal.
    ///
    /// Recovered errors are reported on the error stream and the loop goes on.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<()> {
        loop {
            if signals::shutdown_requested() {
                writeln!(console.out())?;
                return Ok(());
            }
            let prompt = format!("{}> ", self.ctx.path());
            let line = match console.read_line(&prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    writeln!(console.out())?;
                    return Ok(());
                }
                Err(_) if signals::shutdown_requested() => return Ok(()),
                Err(e) => return Err(e),
            };
            match self.execute(console, &line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(TreeError::Cancelled) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::debug!(code = e.code(), "command failed");
                    writeln!(console.err(), "error: {e}")?;
                }
            }
        }
    }
}

/// Closes every open work session when dropped, whichever way the session ends.
pub struct Finalizer {
    store: FileStore,
}

impl Finalizer {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
}

impl Drop for Finalizer {
    fn drop(&mut self) {
        match tree::close_open_sessions(&self.store, Utc::now()) {
            Ok(closed) if !closed.is_empty() => {
                tracing::info!(count = closed.len(), "closed open work sessions")
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "failed to close open work sessions"),
        }
    }
}

/// Run the interactive shell on the terminal for the task tree under `base`.
pub fn run_interactive(base: &Path) -> Result<()> {
    let repo = Repo::open(base)?;
    let session_lock = SessionLock::acquire(&repo.session_lock_path())?;
    signals::install();

    let editor = SystemEditor::new(repo.config.editor_candidates());
    let finalizer = Finalizer::new(repo.store.clone());
    let mut shell = Shell::new(repo.store, Box::new(editor))?;

    let stdin = io::stdin();
    let mut console = LineConsole::new(stdin.lock(), io::stdout(), io::stderr());
    let result = shell.run(&mut console);

    drop(finalizer);
    session_lock.release()?;
    result
}
