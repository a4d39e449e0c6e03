use std::cmp::Ordering;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use slidedeck_store::SlidePayload;
use tracing::debug;

use crate::SeedError;

pub const SLIDE_EXTENSION: &str = ".json";

/// Order in which slide files are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedOrder {
    /// Whatever order the filesystem lists the directory in.
    #[default]
    Listing,
    /// By the number following `slide` in the file stem, unnumbered files last.
    SlideNumber,
}

/// Lists the files of `dir` whose name ends in `.json`.
///
/// # Errors
/// Fails when the directory cannot be read, or when a `.json` file has a name that is not
/// UTF-8.
pub fn find_slide_files(dir: &Utf8Path, order: SeedOrder) -> Result<Vec<Utf8PathBuf>, SeedError> {
    let directory_error = |source| SeedError::Directory {
        path: dir.to_owned(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs_err::read_dir(dir).map_err(directory_error)? {
        let path = entry.map_err(directory_error)?.path();

        let path = match Utf8PathBuf::from_path_buf(path) {
            Ok(path) => path,
            Err(path) if has_slide_extension(&path) && path.is_file() => {
                return Err(SeedError::FileName { path });
            }
            Err(path) => {
                debug!("Skipping `{}`", path.display());
                continue;
            }
        };

        if is_slide_file(&path) {
            files.push(path);
        } else {
            debug!("Skipping `{path}`");
        }
    }

    if order == SeedOrder::SlideNumber {
        files.sort_by(|a, b| by_slide_number(a, b));
    }

    Ok(files)
}

fn is_slide_file(path: &Utf8Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.ends_with(SLIDE_EXTENSION))
        && path.is_file()
}

fn has_slide_extension(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(SLIDE_EXTENSION.as_bytes()))
}

/// Number that follows the first `slide` in the file stem that is followed by digits,
/// e.g. `12` for `deck_slide12.json`.
pub fn slide_number(path: &Utf8Path) -> Option<u64> {
    let stem = path.file_stem()?;

    stem.match_indices("slide").find_map(|(at, matched)| {
        let rest = &stem[at + matched.len()..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        rest[..end].parse().ok()
    })
}

fn by_slide_number(a: &Utf8Path, b: &Utf8Path) -> Ordering {
    let (na, nb) = (slide_number(a), slide_number(b));
    (na.is_none(), na, a.file_name()).cmp(&(nb.is_none(), nb, b.file_name()))
}

/// Reads one file and turns its single JSON value into a slide payload.
///
/// # Errors
/// Fails when the file cannot be read, is not JSON, or is not a JSON object.
pub fn load_payload(path: &Utf8Path) -> Result<SlidePayload, SeedError> {
    let contents = fs_err::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_owned(),
        source,
    })?;

    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);

    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(|source| SeedError::Parse {
            path: path.to_owned(),
            source,
        })?;

    SlidePayload::try_from(value).map_err(|source| SeedError::Payload {
        path: path.to_owned(),
        source,
    })
}
