use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "heatmap", version, about = "Summer heat map: proportional city temperatures by year")]
pub struct CliArgs {
    /// Print dataset statistics and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// GeoJSON feature collection to load
    #[arg(long, value_name = "PATH")]
    pub data: Option<String>,

    /// Property prefix of the year columns
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Radius of the smallest symbol
    #[arg(long = "min-radius", value_name = "UNITS")]
    pub min_radius: Option<f64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(data) = &self.data {
            std::env::set_var("HEATMAP_DATA", data);
        }
        if let Some(prefix) = &self.prefix {
            std::env::set_var("HEATMAP_ATTRIBUTE_PREFIX", prefix);
        }
        if let Some(radius) = self.min_radius {
            std::env::set_var("HEATMAP_MIN_RADIUS", radius.to_string());
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
