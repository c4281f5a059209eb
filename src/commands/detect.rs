// ABOUTME: Detect and languages command implementations.
// ABOUTME: Report the detected ecosystem of a directory, or list the signature catalog.

use boxrun::config::Config;
use boxrun::error::{Error, Result};
use boxrun::output::Output;
use boxrun::pipeline::ErrorKind;
use std::path::Path;

pub fn detect(config: &Config, path: &Path, output: &Output) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::SourceNotFound(path.to_path_buf()));
    }

    let result = config.detector().detect(path);
    match &result.ecosystem {
        Some(ecosystem) => {
            output.result(&format!("{ecosystem} ({})", result.method), &result);
            Ok(())
        }
        None => {
            output.result("no language detected", &result);
            Err(Error::PipelineFailed {
                kind: ErrorKind::NoLanguageDetected,
                diagnostic: format!("could not determine the language of {}", path.display()),
            })
        }
    }
}

pub fn languages(config: &Config, output: &Output) {
    let catalog = config.catalog();
    let width = catalog
        .iter()
        .map(|s| s.identifier.as_str().len())
        .max()
        .unwrap_or(0);

    let mut text = String::new();
    for signature in catalog.iter() {
        let extensions: Vec<_> = signature.extensions.iter().map(String::as_str).collect();
        let markers: Vec<_> = signature.marker_files.iter().map(String::as_str).collect();
        text.push_str(&format!(
            "{:width$}  .{}  [{}]\n",
            signature.identifier.as_str(),
            extensions.join(" ."),
            markers.join(", "),
        ));
    }

    let entries: Vec<_> = catalog.iter().collect();
    output.result(text.trim_end(), &entries);
}
