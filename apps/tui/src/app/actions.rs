use color_eyre::eyre::{eyre, Result};
use heatmap_core::{parse_dataset, Dataset, LoaderOptions, MapContext, PopupFormatter, SelectionController};
use std::path::Path;
use tracing::info;

use crate::config::AppConfig;

/// Reads and parses the feature collection. The only suspension point of the
/// application.
pub async fn load_dataset(path: &Path, options: &LoaderOptions) -> Result<Dataset> {
    info!(path = %path.display(), "loading dataset");
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| eyre!("Failed to read {}: {e}", path.display()))?;
    let dataset = parse_dataset(&text, options)?;
    Ok(dataset)
}

/// Builds the map context and its controller from a loaded dataset.
pub fn build_controller(
    dataset: Dataset,
    config: &AppConfig,
) -> heatmap_core::Result<SelectionController> {
    let context = MapContext::new(dataset, config.scaler(), PopupFormatter::default())?;
    SelectionController::new(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn load_dataset_reads_a_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("heatmap-load-{}.geojson", std::process::id()));
        let mut file = std::fs::File::create(&path)?;
        file.write_all(
            br#"{ "type": "FeatureCollection", "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [2.35, 48.85] },
                  "properties": { "City_Name": "Paris", "Temp_2018": 77.5 } }
            ] }"#,
        )?;

        let dataset = load_dataset(&path, &LoaderOptions::default()).await?;
        std::fs::remove_file(&path).ok();

        assert_eq!(dataset.features().len(), 1);
        assert_eq!(dataset.keys()[0].label(), "2018");

        let controller = build_controller(dataset, &AppConfig::default())?;
        assert_eq!(controller.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn bundled_dataset_loads() -> Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/time_series.geojson");
        let dataset = load_dataset(&path, &LoaderOptions::default()).await?;
        assert_eq!(dataset.keys().len(), 10);
        assert_eq!(dataset.rendered_features().count(), 10);

        let controller = build_controller(dataset, &AppConfig::default())?;
        assert_eq!(controller.current_key().label(), "2016");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let result = load_dataset(Path::new("does/not/exist.geojson"), &LoaderOptions::default()).await;
        let Err(error) = result else {
            panic!("expected a read error");
        };
        assert!(error.to_string().contains("does/not/exist.geojson"));
    }
}
