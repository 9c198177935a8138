use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::error::{Result, TreeError};

/// Something that lets the user edit a file in place and returns once they are done.
pub trait Editor {
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Runs the first available external editor command on the file.
pub struct SystemEditor {
    candidates: Vec<String>,
}

impl SystemEditor {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    fn launch(&self, path: &Path) -> Result<ExitStatus> {
        let mut attempted: Vec<String> = Vec::new();
        for candidate in &self.candidates {
            let parts = split_editor_command(candidate);
            let Some((program, args)) = parts.split_first() else {
                continue;
            };
            attempted.push(program.clone());
            let mut command = Command::new(program);
            command.args(args).arg(path);
            match command.status() {
                Ok(status) => return Ok(status),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(editor = %program, "editor not found, trying next");
                    continue;
                }
                Err(err) => {
                    return Err(TreeError::Editor(format!(
                        "failed to launch '{program}': {err}"
                    )));
                }
            }
        }
        let tried = if attempted.is_empty() {
            "no editor candidates".to_string()
        } else {
            attempted.join(", ")
        };
        Err(TreeError::Editor(format!(
            "no editor found (tried {tried}); set $VISUAL or $EDITOR"
        )))
    }
}

impl Editor for SystemEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let status = self.launch(path)?;
        if !status.success() {
            let detail = status
                .code()
                .map(|code| format!("exit code {code}"))
                .unwrap_or_else(|| "signal".to_string());
            return Err(TreeError::Editor(format!("editor exited with {detail}")));
        }
        Ok(())
    }
}

fn split_editor_command(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Let the user rewrite `current` in the editor. Blank output clears the description.
///
/// The temporary file is removed on every path out of this function.
pub fn edit_description(editor: &dyn Editor, current: Option<&str>) -> Result<Option<String>> {
    let mut temp = tempfile::Builder::new()
        .prefix("tasktree-descr-")
        .suffix(".txt")
        .tempfile()?;
    temp.write_all(current.unwrap_or_default().as_bytes())?;
    temp.flush()?;

    editor.edit(temp.path())?;

    let text = fs::read_to_string(temp.path())?;
    Ok((!text.trim().is_empty()).then_some(text))
}
