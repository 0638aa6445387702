//! Delivering the uploaded link to the user.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use url::Url;

use crate::capture::Os;
use crate::clipboard::{self, ClipboardError};
use crate::config::Settings;

/// Turn the upload response into the link handed to the user.
///
/// With Gyazo uploads and `gyazo_direct_link` enabled the landing page
/// `https://gyazo.com/<hash>` becomes `https://i.gyazo.com/<hash><suffix>`.
/// Everything else is passed through untouched.
pub fn final_url(settings: &Settings, response: &str, suffix: &str) -> String {
    if !(settings.use_remote_service && settings.direct_link) {
        return response.to_string();
    }

    match direct_link(response, suffix) {
        Some(url) => url,
        None => {
            log::warn!("Could not rewrite {:?} into a direct link", response);
            response.to_string()
        }
    }
}

/// Prefix the host with `i.` and append `suffix` to the path.
pub fn direct_link(landing_page: &str, suffix: &str) -> Option<String> {
    let mut url = Url::parse(landing_page.trim()).ok()?;
    let host = url.host_str()?.to_string();
    url.set_host(Some(&format!("i.{host}"))).ok()?;

    let path = format!("{}{}", url.path(), suffix);
    url.set_path(&path);
    Some(url.into())
}

/// Side effects available for a finished link.
pub trait LinkHandler {
    fn open_in_browser(&self, url: &str) -> io::Result<()>;
    fn copy_to_clipboard(&self, url: &str) -> Result<(), ClipboardError>;
}

/// Opens links with the desktop's URL handler and copies with the system clipboard.
pub struct SystemLinkHandler;

impl LinkHandler for SystemLinkHandler {
    fn open_in_browser(&self, url: &str) -> io::Result<()> {
        let mut command = browser_command(Os::current(), url);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }

    fn copy_to_clipboard(&self, url: &str) -> Result<(), ClipboardError> {
        clipboard::copy_text(url)
    }
}

/// Command that opens `url` in the default browser on `os`.
pub fn browser_command(os: Os, url: &str) -> Command {
    match os {
        Os::MacOs => {
            let mut command = Command::new("open");
            command.arg(url);
            command
        }
        Os::Windows => {
            let mut command = Command::new("explorer");
            command.arg(url);
            command
        }
        Os::Linux | Os::Other => {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        }
    }
}

/// Open, copy and print `url` according to `settings`.
///
/// The three actions are independent. Browser and clipboard failures are
/// logged and otherwise ignored; only a failure to write to `out` is returned.
pub fn dispatch(
    settings: &Settings,
    url: &str,
    handler: &dyn LinkHandler,
    out: &mut dyn Write,
) -> io::Result<()> {
    if settings.open_browser {
        match handler.open_in_browser(url) {
            Ok(()) => log::info!("Opened {} in browser", url),
            Err(e) => log::warn!("Failed to open browser: {}", e),
        }
    }

    if settings.copy_to_clipboard {
        if let Err(e) = handler.copy_to_clipboard(url) {
            log::warn!("Failed to copy link to clipboard: {}", e);
        }
    }

    if settings.print_url {
        writeln!(out, "{}", url)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingHandler {
        opened: RefCell<Vec<String>>,
        copied: RefCell<Vec<String>>,
        fail: bool,
    }

    impl LinkHandler for RecordingHandler {
        fn open_in_browser(&self, url: &str) -> io::Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no browser"));
            }
            Ok(())
        }

        fn copy_to_clipboard(&self, url: &str) -> Result<(), ClipboardError> {
            self.copied.borrow_mut().push(url.to_string());
            if self.fail {
                return Err(ClipboardError::AllFailed(Vec::new()));
            }
            Ok(())
        }
    }

    fn remote(direct_link: bool) -> Settings {
        Settings {
            use_remote_service: true,
            direct_link,
            ..Settings::default()
        }
    }

    #[test]
    fn gyazo_link_becomes_direct_image_link() {
        let url = final_url(&remote(true), "https://gyazo.com/0123abcd", ".png");
        assert_eq!(url, "https://i.gyazo.com/0123abcd.png");

        let parsed = Url::parse(&url).unwrap();
        assert!(parsed.host_str().unwrap().starts_with("i."));
        assert!(parsed.path().ends_with(".png"));
    }

    #[test]
    fn rewrite_disabled_returns_body_verbatim() {
        let body = "https://gyazo.com/0123abcd\n";
        assert_eq!(final_url(&remote(false), body, ".png"), body);
    }

    #[test]
    fn self_hosted_never_rewrites() {
        let settings = Settings {
            use_remote_service: false,
            direct_link: true,
            ..Settings::default()
        };
        let body = "https://myazo.example.com/i/abc.png";
        assert_eq!(final_url(&settings, body, ".png"), body);
    }

    #[test]
    fn unparsable_body_falls_back_to_verbatim() {
        assert_eq!(final_url(&remote(true), "not a url", ".png"), "not a url");
    }

    #[test]
    fn direct_link_ignores_trailing_newline() {
        assert_eq!(
            direct_link("https://gyazo.com/abc\n", ".png").as_deref(),
            Some("https://i.gyazo.com/abc.png")
        );
    }

    #[test]
    fn all_actions_fire_when_enabled() {
        let handler = RecordingHandler::default();
        let mut out = Vec::new();

        dispatch(&Settings::default(), "https://x.test/a", &handler, &mut out).unwrap();

        assert_eq!(*handler.opened.borrow(), ["https://x.test/a"]);
        assert_eq!(*handler.copied.borrow(), ["https://x.test/a"]);
        assert_eq!(String::from_utf8(out).unwrap(), "https://x.test/a\n");
    }

    #[test]
    fn disabled_actions_are_skipped() {
        let settings = Settings {
            open_browser: false,
            copy_to_clipboard: false,
            print_url: false,
            ..Settings::default()
        };
        let handler = RecordingHandler::default();
        let mut out = Vec::new();

        dispatch(&settings, "https://x.test/a", &handler, &mut out).unwrap();

        assert!(handler.opened.borrow().is_empty());
        assert!(handler.copied.borrow().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn side_effect_failures_do_not_stop_printing() {
        let handler = RecordingHandler {
            fail: true,
            ..RecordingHandler::default()
        };
        let mut out = Vec::new();

        dispatch(&Settings::default(), "https://x.test/a", &handler, &mut out).unwrap();

        assert_eq!(handler.copied.borrow().len(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), "https://x.test/a\n");
    }

    #[test]
    fn browser_command_per_platform() {
        let program = |os| {
            browser_command(os, "https://x.test")
                .get_program()
                .to_string_lossy()
                .into_owned()
        };
        assert_eq!(program(Os::Linux), "xdg-open");
        assert_eq!(program(Os::MacOs), "open");
        assert_eq!(program(Os::Windows), "explorer");
    }
}
