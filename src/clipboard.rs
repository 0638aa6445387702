//! Clipboard access: reading captured images and publishing the final link.

use std::io::Write;
use std::process::{Command, Stdio};

use arboard::Clipboard;
use image::RgbaImage;
use thiserror::Error;

use crate::capture::backends::Os;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("{0}")]
    Library(#[from] arboard::Error),

    #[error("{program}: {message}")]
    Command {
        program: &'static str,
        message: String,
    },

    #[error("clipboard image has inconsistent size {width}x{height}")]
    InvalidImage { width: usize, height: usize },

    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ; "))]
    AllFailed(Vec<ClipboardError>),
}

/// Read the current clipboard image, if there is one.
///
/// An empty clipboard or one holding something other than an image yields
/// `Ok(None)`.
pub fn grab_image() -> Result<Option<RgbaImage>, ClipboardError> {
    let mut clipboard = Clipboard::new()?;
    let data = match clipboard.get_image() {
        Ok(data) => data,
        Err(arboard::Error::ContentNotAvailable) => {
            log::debug!("Clipboard does not hold an image");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let (width, height) = (data.width, data.height);
    log::debug!("Clipboard image: {}x{}", width, height);

    RgbaImage::from_raw(width as u32, height as u32, data.bytes.into_owned())
        .map(Some)
        .ok_or(ClipboardError::InvalidImage { width, height })
}

/// Command-line helpers that can take text on stdin, in order of preference.
pub fn text_copy_commands(os: Os, wayland: bool) -> Vec<&'static [&'static str]> {
    match os {
        Os::Linux | Os::Other => {
            let mut commands: Vec<&'static [&'static str]> = Vec::new();
            if wayland {
                commands.push(&["wl-copy"]);
            }
            commands.push(&["xclip", "-selection", "clipboard"]);
            commands.push(&["xsel", "--clipboard", "--input"]);
            commands
        }
        Os::MacOs => vec![&["pbcopy"][..]],
        Os::Windows => vec![&["clip"][..]],
    }
}

/// Copy text to the system clipboard.
///
/// Prefers the platform's clipboard helper commands, which keep serving the
/// selection after we exit, and falls back to arboard if none of them work.
pub fn copy_text(text: &str) -> Result<(), ClipboardError> {
    let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
    let mut failures = Vec::new();

    for command in text_copy_commands(Os::current(), wayland) {
        match copy_via_command(command, text) {
            Ok(()) => {
                log::info!("Copied link to clipboard via {}", command[0]);
                return Ok(());
            }
            Err(e) => {
                log::debug!("Clipboard helper failed: {}", e);
                failures.push(e);
            }
        }
    }

    match copy_via_library(text) {
        Ok(()) => {
            log::info!("Copied link to clipboard via arboard");
            Ok(())
        }
        Err(e) => {
            failures.push(e);
            Err(ClipboardError::AllFailed(failures))
        }
    }
}

fn copy_via_library(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Pipe `text` into a clipboard helper command.
fn copy_via_command(command: &[&'static str], text: &str) -> Result<(), ClipboardError> {
    let program = command[0];
    let fail = |message: String| ClipboardError::Command { program, message };

    // Helpers like xclip fork a child that keeps serving the selection and
    // inherits our pipes, so only stdin is piped.
    let mut child = Command::new(program)
        .args(&command[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| fail(format!("failed to spawn (is it installed?): {}", e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| fail(format!("failed to write to stdin: {}", e)))?;
    }

    let status = child
        .wait()
        .map_err(|e| fail(format!("failed to wait: {}", e)))?;

    if !status.success() {
        return Err(fail(format!("exited with {}", status)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wayland_prefers_wl_copy() {
        let commands = text_copy_commands(Os::Linux, true);
        assert_eq!(commands[0], ["wl-copy"]);
        assert_eq!(commands.len(), 3);
    }

    #[test]
    fn x11_skips_wl_copy() {
        let commands = text_copy_commands(Os::Linux, false);
        assert_eq!(commands[0], ["xclip", "-selection", "clipboard"]);
        assert!(commands.iter().all(|c| c[0] != "wl-copy"));
    }

    #[test]
    fn other_platforms_use_native_helpers() {
        assert_eq!(text_copy_commands(Os::MacOs, false), [&["pbcopy"][..]]);
        assert_eq!(text_copy_commands(Os::Windows, true), [&["clip"][..]]);
    }

    #[test]
    fn missing_helper_reports_program_name() {
        let err = copy_via_command(&["myazo-no-such-clipboard-helper"], "x").unwrap_err();
        assert!(err.to_string().starts_with("myazo-no-such-clipboard-helper:"));
    }

    #[test]
    fn combined_failure_lists_every_attempt() {
        let err = ClipboardError::AllFailed(vec![
            ClipboardError::Command {
                program: "wl-copy",
                message: "boom".into(),
            },
            ClipboardError::InvalidImage {
                width: 1,
                height: 2,
            },
        ]);
        let message = err.to_string();
        assert!(message.contains("wl-copy: boom"));
        assert!(message.contains("1x2"));
    }
}
