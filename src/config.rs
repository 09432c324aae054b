use std::path::PathBuf;

/// Start-up settings. Compiled-in defaults; the data files are expected
/// next to the binary's working directory.
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub counties_file: String,
    pub risk_file: String,
    pub log_file: PathBuf,
    /// Initial view centre (lon, lat)
    pub center: (f64, f64),
    pub zoom: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            counties_file: "us-counties.json".to_string(),
            risk_file: "national-wildfire-risk.json".to_string(),
            log_file: PathBuf::from("firewatch.log"),
            // Central California
            center: (-119.5, 37.5),
            zoom: 12.0,
        }
    }
}

impl Config {
    pub fn counties_path(&self) -> PathBuf {
        self.data_dir.join(&self.counties_file)
    }

    pub fn risk_path(&self) -> PathBuf {
        self.data_dir.join(&self.risk_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(config.counties_path(), Path::new("data/us-counties.json"));
        assert_eq!(config.risk_path(), Path::new("data/national-wildfire-risk.json"));
    }
}
