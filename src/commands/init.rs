use std::path::Path;

use crate::error::Result;
use crate::store::files::FileStore;

/// `tasktree init`: create the store and its root record under `base`.
pub fn run(base: &Path) -> Result<()> {
    FileStore::init(base)?;
    eprintln!("Initialized .tasks/ in {}", base.display());
    Ok(())
}
