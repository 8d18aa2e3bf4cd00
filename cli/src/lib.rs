use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use vector_fill::{FillConfig, FillError, GeometryKind, Map, Symbol};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Fill(#[from] FillError),
    #[error("Symbol '{0}' is not in the map's palette")]
    UnknownSymbol(String),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Load a fill configuration from a TOML file
pub fn config_from_toml_file<P: AsRef<Path>>(path: P) -> Result<FillConfig, CliError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load a fill configuration from a JSON file
pub fn config_from_json_file<P: AsRef<Path>>(path: P) -> Result<FillConfig, CliError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Auto-detect file format and load configuration; defaults when no file is given
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<FillConfig, CliError> {
    let Some(path) = path else {
        return Ok(FillConfig::default());
    };
    let path_ref = path.as_ref();
    match path_ref.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => config_from_toml_file(path_ref),
        Some("json") => config_from_json_file(path_ref),
        _ => Err(CliError::UnsupportedFileFormat),
    }
}

/// Render a configuration as TOML, e.g. to seed a config file
pub fn config_to_toml(config: &FillConfig) -> Result<String, CliError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Look up a palette symbol by name
pub fn find_symbol(map: &Map, name: &str) -> Result<Symbol, CliError> {
    map.symbol(name)
        .cloned()
        .ok_or_else(|| CliError::UnknownSymbol(name.to_string()))
}

/// One palette entry as listed by `fill_cli symbols`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolSummary {
    pub name: String,
    pub kind: GeometryKind,
    pub hidden: bool,
    pub can_fill: bool,
    pub object_count: usize,
}

pub fn summarize_symbols(map: &Map) -> Vec<SymbolSummary> {
    map.symbols
        .iter()
        .map(|symbol| SymbolSummary {
            name: symbol.name.clone(),
            kind: symbol.kind,
            hidden: symbol.hidden,
            can_fill: symbol.check_fillable().is_ok(),
            object_count: map
                .objects()
                .iter()
                .filter(|o| o.symbol.name == symbol.name)
                .count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vector_fill::{MapObject, VectorPath};

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("fill_cli_{}_{}", std::process::id(), name));
        fs::write(&path, content).expect("Should write temp file");
        path
    }

    #[test]
    fn test_load_config_by_extension() {
        let toml_path = write_temp("config.toml", "pixels_per_unit = 10.0\n");
        let config = load_config(Some(&toml_path)).expect("Should load TOML");
        assert_eq!(config.pixels_per_unit, 10.0);
        assert_eq!(config.jump_factor, FillConfig::default().jump_factor);

        let json_path = write_temp("config.json", r#"{"backtrack_factor": 3.0}"#);
        let config = load_config(Some(&json_path)).expect("Should load JSON");
        assert_eq!(config.backtrack_factor, 3.0);

        let yaml_path = write_temp("config.yaml", "");
        assert!(matches!(load_config(Some(&yaml_path)), Err(CliError::UnsupportedFileFormat)));

        assert_eq!(load_config::<&Path>(None).expect("Should default"), FillConfig::default());

        for path in [toml_path, json_path, yaml_path] {
            let _ = fs::remove_file(path);
        }
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = FillConfig { pixels_per_unit: 8.0, ..FillConfig::default() };
        let text = config_to_toml(&config).expect("Should serialize");
        let parsed: FillConfig = toml::from_str(&text).expect("Should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_symbol_summaries() {
        let mut map = Map::new();
        let fence = Symbol::new("fence", GeometryKind::Line, 0.1);
        let mut ghost = Symbol::new("ghost", GeometryKind::Area, 0.0);
        ghost.hidden = true;
        map.symbols = vec![
            fence.clone(),
            Symbol::new("boulder", GeometryKind::Point, 1.0),
            ghost,
        ];
        map.add_object(MapObject::path(fence, VectorPath::from_points(&[[0.0, 0.0], [1.0, 0.0]])));

        let summaries = summarize_symbols(&map);
        let fillable: Vec<bool> = summaries.iter().map(|s| s.can_fill).collect();
        assert_eq!(fillable, vec![true, false, false]);
        assert_eq!(summaries[0].object_count, 1);

        assert!(find_symbol(&map, "fence").is_ok());
        assert!(matches!(find_symbol(&map, "lake"), Err(CliError::UnknownSymbol(_))));
    }
}
