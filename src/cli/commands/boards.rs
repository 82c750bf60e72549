//! Boards command handler

use super::{fail, load_framework, load_profile};
use crate::args::ProfileArgs;
use portal_fields::config::Config;
use portal_fields::core::taxonomy::visible_boards;
use std::path::PathBuf;

/// Print the boards visible to a user, one `code<TAB>name` per line. Without a profile
/// every board is listed.
pub fn run(profile: &ProfileArgs, framework: Option<&PathBuf>, config: &Config) {
    let framework = load_framework(framework, config).unwrap_or_else(|e| fail(&e));
    let records = if profile.profile.is_some() || profile.user.is_some() {
        load_profile(profile, config)
            .unwrap_or_else(|e| fail(&e))
            .custom_fields
    } else {
        Vec::new()
    };

    let boards = visible_boards(&framework, &records);
    if boards.is_empty() {
        println!("✗ No boards available");
        return;
    }
    for board in boards {
        println!("{}\t{}", board.code, board.name);
    }
}
