//! Standard locations for weavess config files

use std::path::PathBuf;

/// `~/.config/weavess` (platform config dir), or `./weavess` without one
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weavess")
}

/// Path of a named config file inside [`default_config_dir`]
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_weavess() {
        assert!(default_config_dir().ends_with("weavess"));
    }

    #[test]
    fn test_config_path_includes_filename() {
        assert!(default_config_path("render.yaml").ends_with("weavess/render.yaml"));
    }
}
