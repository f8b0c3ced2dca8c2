use std::process::Command;

fn main() {
  embed_build_info();
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
}

/// Exposes the commit hash and date to `--version` as `HEADERGUARD_BUILD`.
/// Builds outside a git checkout report `unknown`.
fn embed_build_info() {
  let hash = git_output(&["rev-parse", "--short", "HEAD"]);
  let date = git_output(&["log", "-1", "--format=%cs"]);

  let build = match (hash, date) {
    (Some(hash), Some(date)) => format!("{hash} {date}"),
    (Some(hash), None) => hash,
    _ => "unknown".to_string(),
  };
  println!("cargo:rustc-env=HEADERGUARD_BUILD={build}");
}

fn git_output(args: &[&str]) -> Option<String> {
  let output = Command::new("git").args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let value = String::from_utf8(output.stdout).ok()?.trim().to_string();
  (!value.is_empty()).then_some(value)
}
