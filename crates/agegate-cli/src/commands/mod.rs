pub mod init;
pub mod issue;
pub mod keygen;
pub mod prove;
pub mod refresh;
pub mod verify;

use std::path::Path;

/// Read a file argument, or treat the argument itself as inline JSON.
pub fn read_json_arg(arg: &str) -> anyhow::Result<String> {
    if Path::new(arg).exists() {
        Ok(std::fs::read_to_string(arg)?)
    } else {
        Ok(arg.to_string())
    }
}

/// Write to `path`, or stdout when no path is given.
pub fn write_output(path: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{}", contents),
    }
    Ok(())
}
