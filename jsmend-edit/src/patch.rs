use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Unified diff of one file in `git diff` layout. Empty when nothing changed.
pub fn render_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    let body = PatchFormatter::new().fmt_patch(&patch).to_string();
    // Hunks only; diffy's own `--- original` / `+++ modified` header is replaced above.
    let hunks = body.find("@@").map_or("", |at| &body[at..]);
    out.push_str(hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// `src/App.jsx` + `.jsmend.bak` → `src/App.jsx.jsmend.bak`.
pub fn backup_path(path: &Utf8Path, suffix: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{path}{suffix}"))
}
