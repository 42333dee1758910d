/// Normalized form of a metric name used to build RRD file names:
/// every character outside [a-zA-Z0-9_] becomes an underscore.
pub fn mangle_metric_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Makes a file name safe for the perf-data storage layout: space, ':',
/// '/', and '\' become underscores, so the name stays a single path
/// component.
pub fn cleanup_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | ':' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}
