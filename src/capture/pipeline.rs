use std::path::Path;

use crate::capture::{
    backends::{Backend, Delivery},
    dependencies::CaptureDependencies,
    types::{CaptureError, CaptureOutcome, CaptureResult},
};

/// Try each candidate in order and return the first one that is installed
/// and exits successfully.
///
/// Candidates after the selected one are never looked up or run.
pub fn select_backend(
    candidates: &'static [Backend],
    destination: &Path,
    dependencies: &CaptureDependencies,
) -> Option<&'static Backend> {
    for backend in candidates {
        let Some(program) = dependencies.locator.locate(backend.program) else {
            log::debug!("{} not found, skipping", backend.program);
            continue;
        };

        let args = backend.command_args(destination);
        log::debug!("Running {} {:?}", program.display(), args);

        match dependencies.runner.run(&program, &args) {
            Ok(true) => {
                log::info!("Captured screenshot with {}", backend.program);
                return Some(backend);
            }
            Ok(false) => log::info!("{} did not produce a screenshot", backend.program),
            Err(e) => log::warn!("Failed to run {}: {}", backend.program, e),
        }
    }

    None
}

/// Capture a screenshot into `destination` using the first working backend.
///
/// Succeeds only if an image file exists at `destination` afterwards.
pub fn perform_capture(
    candidates: &'static [Backend],
    destination: &Path,
    dependencies: &CaptureDependencies,
) -> Result<CaptureResult, CaptureError> {
    let Some(backend) = select_backend(candidates, destination, dependencies) else {
        log::error!("No screenshot backend succeeded");
        return Err(CaptureError::NoScreenshot);
    };

    let outcome = match backend.delivery {
        Delivery::File => CaptureOutcome::FileWritten,
        Delivery::Clipboard => save_clipboard_image(destination, dependencies)?,
    };

    if !destination.is_file() {
        log::error!(
            "{} reported success but {} does not exist",
            backend.program,
            destination.display()
        );
        return Err(CaptureError::NoScreenshot);
    }

    Ok(CaptureResult { backend, outcome })
}

fn save_clipboard_image(
    destination: &Path,
    dependencies: &CaptureDependencies,
) -> Result<CaptureOutcome, CaptureError> {
    let Some(image) = dependencies.clipboard.grab_image()? else {
        return Err(CaptureError::NoScreenshot);
    };

    let (width, height) = image.dimensions();
    image.save_with_format(destination, image::ImageFormat::Png)?;
    log::info!(
        "Saved {}x{} clipboard image to {}",
        width,
        height,
        destination.display()
    );

    Ok(CaptureOutcome::ClipboardImage { width, height })
}
