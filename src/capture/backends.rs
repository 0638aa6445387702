//! Per-platform table of external screenshot utilities.
//!
//! Each table is ordered by preference: tools that finish without extra
//! confirmation come before tools that need the user to click through.

use std::ffi::OsString;
use std::path::Path;

/// Host operating system families with a backend table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Os {
    /// The operating system this binary was built for.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name to an [`Os`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "linux" => Os::Linux,
            "macos" => Os::MacOs,
            "windows" => Os::Windows,
            _ => Os::Other,
        }
    }
}

/// Where a backend leaves the captured image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Written to the destination path passed on the command line.
    File,
    /// Placed on the system clipboard.
    Clipboard,
}

/// One argument in a backend invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    Literal(&'static str),
    /// Replaced by the artifact path.
    Destination,
}

/// An external screenshot utility and how to invoke it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backend {
    /// Executable name, looked up on `PATH`.
    pub program: &'static str,
    pub args: &'static [Arg],
    pub delivery: Delivery,
}

impl Backend {
    /// Build the argument list for capturing into `destination`.
    pub fn command_args(&self, destination: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg {
                Arg::Literal(value) => OsString::from(*value),
                Arg::Destination => destination.as_os_str().to_os_string(),
            })
            .collect()
    }
}

use Arg::{Destination, Literal};

const LINUX: &[Backend] = &[
    Backend {
        program: "gnome-screenshot",
        args: &[Literal("-a"), Literal("-f"), Destination],
        delivery: Delivery::File,
    },
    Backend {
        program: "xfce4-screenshooter",
        args: &[Literal("-r"), Literal("-s"), Destination],
        delivery: Delivery::File,
    },
    // Spectacle still asks for a confirmation click after the region is drawn.
    Backend {
        program: "spectacle",
        args: &[
            Literal("-b"),
            Literal("-n"),
            Literal("-r"),
            Literal("-o"),
            Destination,
        ],
        delivery: Delivery::File,
    },
    Backend {
        program: "scrot",
        args: &[Literal("-s"), Destination],
        delivery: Delivery::File,
    },
    // ImageMagick
    Backend {
        program: "import",
        args: &[Destination],
        delivery: Delivery::File,
    },
];

const MACOS: &[Backend] = &[Backend {
    program: "screencapture",
    args: &[Literal("-i"), Destination],
    delivery: Delivery::File,
}];

// `/clip` needs Windows 10 1703 or newer.
const WINDOWS: &[Backend] = &[Backend {
    program: "snippingtool",
    args: &[Literal("/clip")],
    delivery: Delivery::Clipboard,
}];

/// Candidate backends for `os`, most preferred first.
pub fn backends_for(os: Os) -> &'static [Backend] {
    match os {
        Os::Linux => LINUX,
        Os::MacOs => MACOS,
        Os::Windows => WINDOWS,
        Os::Other => &[],
    }
}
