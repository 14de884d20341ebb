use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Generate default output directory with format: output/ghcn-anomaly-{YYMMDD}
pub fn generate_default_output_dir() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let dirname = format!("ghcn-anomaly-{:02}{:02}{:02}", year, month, day);
    PathBuf::from("output").join(dirname)
}

/// Path of an output artifact `{name}.{extension}` inside the output directory
pub fn output_file(output_dir: &Path, name: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", name, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_output_dir() {
        let dir = generate_default_output_dir();
        let dir_str = dir.to_string_lossy();

        assert!(dir_str.starts_with("output/"));

        let parts: Vec<&str> = dir_str.split('/').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[1].starts_with("ghcn-anomaly-"));
        assert_eq!(parts[1].len(), "ghcn-anomaly-".len() + 6);
    }

    #[test]
    fn test_output_file() {
        let path = output_file(Path::new("out"), "global_anomalies", "data");
        assert_eq!(path, PathBuf::from("out/global_anomalies.data"));
    }
}
