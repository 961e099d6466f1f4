// Author: Eshan Roy
// SPDX-License-Identifier: MIT

use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Outside a git checkout (e.g. a packaged tarball) the SHA is simply absent.
    EmitBuilder::builder()
        .fail_on_error()
        .git_sha(true)
        .git_commit_date()
        .emit()
        .or_else(|_| EmitBuilder::builder().emit())?;
    Ok(())
}
