//! Rendering a resolved command into a shell script and running it

use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::{Error, Result};

/// Replace `{name}` and `<name>` tokens line by line; output ends with a newline
pub fn render(content: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(content.len() + 1);
    for line in content.split('\n') {
        let mut line = line.to_string();
        for (name, value) in values {
            line = line
                .replace(&format!("{{{}}}", name), value)
                .replace(&format!("<{}>", name), value);
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Write `script` to a temp file and run it with `shell`, attached to the terminal
///
/// The file is removed once the child exits, whatever its status.
pub fn execute(script: &str, shell: &str) -> Result<ExitStatus> {
    let mut file = tempfile::Builder::new()
        .prefix("cmdwiki-exec-")
        .suffix(".sh")
        .tempfile()
        .map_err(|e| Error::io(std::env::temp_dir(), e))?;
    file.write_all(script.as_bytes())
        .map_err(|e| Error::io(file.path(), e))?;

    // Close our handle; the path is deleted when `path` drops
    let path = file.into_temp_path();
    make_executable(&path)?;

    debug!(path = %path.display(), %shell, "executing script");
    let status = Command::new(shell)
        .arg(&*path)
        .status()
        .map_err(|e| Error::io(path.to_path_buf(), e))?;
    debug!(%status, "script finished");

    path.close().map_err(|e| Error::io(std::env::temp_dir(), e))?;
    Ok(status)
}

#[cfg(unix)]
fn make_executable(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &std::path::Path) -> Result<()> {
    Ok(())
}
