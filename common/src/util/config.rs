use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            routing: RoutingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_netlist_file")]
    pub netlist_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            netlist_file: default_netlist_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoutingConfig {
    /// Route the sorted batch with rayon. Paths and metrics are identical
    /// either way; sequential mode exists for debugging.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default = "default_image_file")]
    pub image_file: String,
    #[serde(default = "default_cell_px")]
    pub cell_px: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_file: default_report_file(),
            image_file: default_image_file(),
            cell_px: default_cell_px(),
        }
    }
}

fn default_netlist_file() -> String {
    "inputs/routing.txt".to_string()
}
fn default_parallel() -> bool {
    true
}
fn default_report_file() -> String {
    "output/routed.txt".to_string()
}
fn default_image_file() -> String {
    "output/routed.png".to_string()
}
fn default_cell_px() -> u32 {
    16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.routing.parallel);
        assert_eq!(config.output.cell_px, 16);
        assert_eq!(config.input.netlist_file, "inputs/routing.txt");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[routing]\nparallel = false\n").unwrap();
        assert!(!config.routing.parallel);
        assert_eq!(config.output.report_file, "output/routed.txt");
    }
}
