use shadow_rs::{BuildPattern, ShadowBuilder};
use std::process::Command;

fn main() -> shadow_rs::SdResult<()> {
    ShadowBuilder::builder().build_pattern(BuildPattern::RealTime).build()?;

    // Last commit subject for the long version string
    if let Ok(output) = Command::new("git").args(["log", "-1", "--pretty=%s"]).output()
        && output.status.success()
        && let Ok(commit_msg) = String::from_utf8(output.stdout)
    {
        println!("cargo:rustc-env=LOGNOTE_COMMIT_MESSAGE={}", commit_msg.trim());
    }

    if let Ok(ref_name) = std::env::var("GITHUB_REF_NAME") {
        println!("cargo:rustc-env=GITHUB_REF_NAME={}", ref_name);
    }

    Ok(())
}
