// src/utils/paths.rs

//! Output directory layout conventions.
//!
//! ```text
//! {dest}/GeneralConference ({lang})/
//! ├── MP3/{year}/{month}/{session}/   # audio files
//! ├── Conferences/                    # playlist groups
//! ├── Speakers/
//! └── Topics/
//! ```

use std::path::PathBuf;

use crate::models::{Config, Session};

/// Root of the mirrored output tree for the configured language.
pub fn output_dir(config: &Config) -> PathBuf {
    config
        .dest_dir
        .join(format!("GeneralConference ({})", config.language))
}

/// Month folder name. Conferences are held in April and October only.
pub fn month_name(month: u8) -> &'static str {
    if month == 4 { "April" } else { "October" }
}

/// Session folder name, optionally prefixed with the ordinal for players
/// that sort folders lexically.
pub fn session_folder(session: &Session, no_numbers: bool) -> String {
    if no_numbers {
        session.title.clone()
    } else {
        format!("{}-{}", session.number, session.title)
    }
}

/// Media path for a session relative to the output root.
pub fn relative_media_path(session: &Session, no_numbers: bool) -> String {
    format!(
        "MP3/{}/{}/{}",
        session.conference.year,
        month_name(session.conference.month),
        session_folder(session, no_numbers)
    )
}
