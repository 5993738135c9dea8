/// Derive the identifier-safe slug used to name and cross-link a site's manifests.
///
/// Drops one leading `*.`, removes any remaining `*`, then replaces `.` with `-`.
/// Not collision-free: `*.foo.com` and `foo.com` map to the same slug.
pub fn easyname(host: &str) -> String {
    let host = host.strip_prefix("*.").unwrap_or(host);
    host.replace('*', "").replace('.', "-")
}

/// True when `name` can be used as a file stem without leaving its directory.
pub fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != ".."
}
