use std::{io, path::Path};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::error::{Error, Result};

/// Walks `root` recursively in file-name order.
///
/// `should_visit` gates every entry below the root: a rejected directory is not
/// descended into and a rejected file is not processed. The root itself is always
/// entered. `process` is called for every accepted file; its first error stops the
/// walk. Entries that cannot be read are logged and skipped.
pub fn walk_tree<V, P>(root: &Path, mut should_visit: V, mut process: P) -> Result<()>
where
    V: FnMut(&Path) -> bool,
    P: FnMut(&Path) -> Result<()>,
{
    if !root.is_dir() {
        return Err(Error::io(
            root,
            io::Error::new(io::ErrorKind::NotFound, "directory does not exist"),
        ));
    }

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let visit = entry.depth() == 0 || should_visit(entry.path());
            if !visit {
                debug!(path = %entry.path().display(), "skipped");
            }
            visit
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Cannot access path: {}", err);
                continue;
            }
        };

        if entry.file_type().is_file() {
            process(entry.path())?;
        }
    }

    Ok(())
}
