//! Companion shell script that turns the shim into cue definitions.

use std::path::Path;

use crate::layout::import_path;

/// Script that initialises `cue.mod` when missing and runs `cue get go`
/// on the package holding the shim.
pub fn cue_get_script(module: &str, out_dir: &Path) -> String {
    let package = import_path(module, out_dir);
    format!(
        "\n\
         # Init cue.mod if not setup yet\n\
         if [[ ! -d cue.mod ]]; then\n    \
         cue mod init {module}\n\
         fi\n\
         # Generate cue type defs\n\
         cue get go {package}\n"
    )
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod script_tests;
