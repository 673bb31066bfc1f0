//! Small display helpers shared by the command layer.

/// Human-readable byte count ("732 B", "1.4 MB").
pub fn human_size(nbytes: u64) -> String {
    let mut size = nbytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return if unit == "B" {
                format!("{:.0} {}", size, unit)
            } else {
                format!("{:.1} {}", size, unit)
            };
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}
