use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::analysis::OrbitalElements;
use crate::config::{CsvExportConfig, DataConfig, JsonExportConfig, OutputPaths, OutputToggles};
use crate::dynamics::{SimulationMetadata, SimulationSample};

/// Output paths with every file resolved against the output directory.
#[derive(Debug, Clone)]
pub struct OutputArtifacts {
    pub directory: PathBuf,
    pub data_csv: PathBuf,
    pub data_json: PathBuf,
    pub trajectory_png: PathBuf,
    pub trajectory_svg: PathBuf,
    pub energy_png: PathBuf,
    pub energy_svg: PathBuf,
    pub angular_momentum_png: PathBuf,
    pub angular_momentum_svg: PathBuf,
    pub toggles: OutputToggles,
    pub data: DataConfig,
}

pub fn resolve_artifacts(paths: &OutputPaths) -> OutputArtifacts {
    let directory = paths.directory.clone();

    OutputArtifacts {
        directory: directory.clone(),
        data_csv: resolve_path(&directory, &paths.data_csv),
        data_json: resolve_path(&directory, &paths.data_json),
        trajectory_png: resolve_path(&directory, &paths.trajectory_png),
        trajectory_svg: resolve_path(&directory, &paths.trajectory_svg),
        energy_png: resolve_path(&directory, &paths.energy_png),
        energy_svg: resolve_path(&directory, &paths.energy_svg),
        angular_momentum_png: resolve_path(&directory, &paths.angular_momentum_png),
        angular_momentum_svg: resolve_path(&directory, &paths.angular_momentum_svg),
        toggles: paths.toggles,
        data: paths.data.clone(),
    }
}

fn resolve_path(base: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        base.join(relative)
    }
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create output directory {}", path.display()))?;
    }
    Ok(())
}

pub fn write_csv(
    path: &Path,
    samples: &[SimulationSample],
    config: &CsvExportConfig,
) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let fields = parse_sample_fields(&config.fields)?;
    if fields.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create CSV file {}", path.display()))?;

    writer.write_record(fields.iter().map(|field| field.header()))?;

    for sample in samples {
        let row: Vec<String> = fields.iter().map(|field| field.format(sample)).collect();
        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write sample at t={:.6}", sample.time))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV writer for {}", path.display()))
}

pub fn write_json(
    path: &Path,
    metadata: &SimulationMetadata,
    samples: &[SimulationSample],
    orbital: &OrbitalElements,
    config: &JsonExportConfig,
) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let sample_fields = if config.include_samples {
        parse_sample_fields(&config.sample_fields)?
    } else {
        Vec::new()
    };

    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let mut root = serde_json::Map::new();

    if config.include_metadata {
        root.insert(
            "metadata".into(),
            serde_json::to_value(metadata)
                .context("Failed to serialize metadata for JSON export")?,
        );
    }

    if config.include_orbital {
        root.insert(
            "orbital_elements".into(),
            serde_json::to_value(orbital)
                .context("Failed to serialize orbital elements for JSON export")?,
        );
    }

    if config.include_samples {
        if sample_fields.is_empty() {
            root.insert(
                "samples".into(),
                serde_json::to_value(samples)
                    .context("Failed to serialize samples for JSON export")?,
            );
        } else {
            let mut json_samples = Vec::with_capacity(samples.len());
            for sample in samples {
                let mut map = serde_json::Map::new();
                for field in &sample_fields {
                    map.insert(
                        field.header().into(),
                        serde_json::Number::from_f64(field.value(sample))
                            .map(serde_json::Value::Number)
                            .unwrap_or(serde_json::Value::Null),
                    );
                }
                json_samples.push(serde_json::Value::Object(map));
            }
            root.insert("samples".into(), serde_json::Value::Array(json_samples));
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Unable to create JSON file {}", path.display()))?;

    serde_json::to_writer_pretty(file, &serde_json::Value::Object(root))
        .with_context(|| format!("Failed to write JSON payload to {}", path.display()))
}

#[derive(Debug, Clone, Copy)]
enum SampleField {
    Time,
    X,
    Y,
    Vx,
    Vy,
    Radius,
    Speed,
    SpecificEnergy,
    SpecificAngularMomentum,
}

impl SampleField {
    fn from_str(field: &str) -> Option<Self> {
        match field {
            "time" => Some(Self::Time),
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "vx" => Some(Self::Vx),
            "vy" => Some(Self::Vy),
            "radius" => Some(Self::Radius),
            "speed" => Some(Self::Speed),
            "specific_energy" => Some(Self::SpecificEnergy),
            "specific_angular_momentum" => Some(Self::SpecificAngularMomentum),
            _ => None,
        }
    }

    fn header(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::X => "x",
            Self::Y => "y",
            Self::Vx => "vx",
            Self::Vy => "vy",
            Self::Radius => "radius",
            Self::Speed => "speed",
            Self::SpecificEnergy => "specific_energy",
            Self::SpecificAngularMomentum => "specific_angular_momentum",
        }
    }

    fn value(&self, sample: &SimulationSample) -> f64 {
        match self {
            Self::Time => sample.time,
            Self::X => sample.x,
            Self::Y => sample.y,
            Self::Vx => sample.vx,
            Self::Vy => sample.vy,
            Self::Radius => sample.radius,
            Self::Speed => sample.speed,
            Self::SpecificEnergy => sample.specific_energy,
            Self::SpecificAngularMomentum => sample.specific_angular_momentum,
        }
    }

    fn format(&self, sample: &SimulationSample) -> String {
        format!("{:.12e}", self.value(sample))
    }
}

fn parse_sample_fields(fields: &[String]) -> Result<Vec<SampleField>> {
    let mut parsed = Vec::with_capacity(fields.len());
    for field in fields {
        let trimmed = field.trim();
        let sample_field = SampleField::from_str(trimmed)
            .ok_or_else(|| anyhow!("Unsupported sample field '{}' in export config", trimmed))?;
        parsed.push(sample_field);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fields_parse() {
        let fields = parse_sample_fields(&["time".into(), " specific_energy ".into()]).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].header(), "specific_energy");
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(parse_sample_fields(&["theta".into()]).is_err());
    }
}
