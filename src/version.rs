use crate::build;

/// Returns the long version string shown by `lognote --version`.
pub fn long_version() -> String {
    let version = build::PKG_VERSION;
    let git_sha = build::SHORT_COMMIT;
    #[allow(clippy::const_is_empty)]
    let git_branch = if build::BRANCH.is_empty() {
        option_env!("GITHUB_REF_NAME").unwrap_or("unknown")
    } else {
        build::BRANCH
    };
    let tree_state = if build::GIT_CLEAN { "clean" } else { "dirty" };
    let commit_msg = option_env!("LOGNOTE_COMMIT_MESSAGE").unwrap_or("-");

    format!(
        "{version} ({git_branch}@{git_sha}, {tree_state}: {commit_msg})
Built {} for {} on {}
{}",
        build::BUILD_TIME,
        build::BUILD_TARGET,
        build::BUILD_OS,
        build::RUST_VERSION,
    )
}
