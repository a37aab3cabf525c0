/*!
 * Clipboard support for ctxmerge
 *
 * Copies the merged document to the system clipboard by piping it into
 * whichever clipboard command the platform provides.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the clipboard command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Clipboard commands, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    Tmux,
    MacOS,
    Wsl,
    Wayland,
    Xsel,
    Xclip,
    Termux,
}

impl ClipboardProvider {
    /// Program name and arguments that read the clipboard text from stdin
    pub fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Wsl => ("clip.exe", &[]),
            Self::Wayland => ("wl-copy", &[]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }

    /// Copy text through this provider
    pub fn copy(self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        debug!(command = cmd, "Copying document to clipboard");

        let mut child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

        child
            .stdin
            .take()
            .ok_or_else(|| ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd)))?
            .write_all(text.as_bytes())?;

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed(format!(
                "{} exited with status: {}",
                cmd, status
            )))
        }
    }
}

/// Copy text to the clipboard using the first available provider
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let provider = available_providers()
        .into_iter()
        .next()
        .ok_or(ClipboardError::NoClipboardFound)?;

    provider.copy(text)
}

/// Providers usable on this system, most preferred first
pub fn available_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::new();

    if env::var_os("TMUX").is_some() && command_exists("tmux") {
        providers.push(ClipboardProvider::Tmux);
    }

    let candidates: &[ClipboardProvider] = if cfg!(target_os = "macos") {
        &[ClipboardProvider::MacOS]
    } else if cfg!(target_os = "windows") || env::var_os("WSL_DISTRO_NAME").is_some() {
        &[ClipboardProvider::Wsl]
    } else if cfg!(target_os = "android") {
        &[ClipboardProvider::Termux]
    } else {
        &[
            ClipboardProvider::Wayland,
            ClipboardProvider::Xsel,
            ClipboardProvider::Xclip,
        ]
    };

    providers.extend(
        candidates
            .iter()
            .copied()
            .filter(|p| command_exists(p.command().0)),
    );

    providers
}

/// Check whether a command can be found on `PATH`
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(command).is_file()))
        .unwrap_or(false)
}
