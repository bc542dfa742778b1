use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use envelope_core::models::config::Config;
use envelope_core::models::errors::ConversionError;
use envelope_core::models::registry::MessageRegistry;
use envelope_core::models::schema::SchemaResource;
use tracing::{debug, error, info};

use crate::config::config::*;

#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Conversion error in {path}: {source}")]
    ConversionError {
        path: String,
        #[source]
        source: ConversionError,
    },
    #[error("I/O error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Worker error: {0}")]
    WorkerError(#[from] tokio::task::JoinError),
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

type ConvertResult<T> = Result<T, ConverterError>;

#[derive(Debug, Clone)]
enum Job {
    Generate(String),
    Parse,
}

/// Converts input files in fixed-size batches against one shared registry.
pub struct BatchConverter {
    registry: Arc<MessageRegistry>,
    settlement: Arc<Config>,
    schema: Option<Arc<SchemaResource>>,
    config: Arc<AppConfig>,
}

impl BatchConverter {
    pub fn new(config: AppConfig) -> ConvertResult<Self> {
        let settlement = Config::from_file(&config.configpath).map_err(ConfigError::from)?;
        let schema = config
            .schemapath
            .as_ref()
            .map(|path| Arc::new(SchemaResource::file(path.to_string_lossy().into_owned())));

        fs::create_dir_all(&config.outputdir).map_err(|e| io_error(&config.outputdir, e))?;

        Ok(Self {
            registry: Arc::new(MessageRegistry::with_default_kinds()),
            settlement: Arc::new(settlement),
            schema,
            config: Arc::new(config),
        })
    }

    pub async fn run(&self) -> ConvertResult<()> {
        let start = Instant::now();
        let job = match &self.config.command {
            Command::Generate { kind, .. } => Job::Generate(kind.clone()),
            Command::Parse { .. } => Job::Parse,
        };
        let inputs = self.config.command.inputs();
        info!(inputs = inputs.len(), batch_size = self.config.batchsize, "Starting batch converter");

        let mut failures = 0;
        for batch in inputs.chunks(self.config.batchsize) {
            failures += self.process_batch(batch, &job).await?;
        }

        info!(
            converted = inputs.len() - failures,
            failed = failures,
            duration_ms = start.elapsed().as_millis(),
            "Batch conversion finished"
        );

        if failures > 0 {
            return Err(ConverterError::ProcessingError(format!(
                "{} of {} inputs failed",
                failures,
                inputs.len()
            )));
        }
        Ok(())
    }

    /// Returns the number of inputs in the batch that failed.
    async fn process_batch(&self, batch: &[PathBuf], job: &Job) -> ConvertResult<usize> {
        debug!("Processing batch of {} inputs", batch.len());

        let tasks: Vec<_> = batch
            .iter()
            .cloned()
            .map(|input| {
                let registry = Arc::clone(&self.registry);
                let settlement = Arc::clone(&self.settlement);
                let schema = self.schema.clone();
                let config = Arc::clone(&self.config);
                let job = job.clone();
                tokio::task::spawn_blocking(move || {
                    convert_file(&registry, &settlement, schema.as_deref(), &job, &input, &config.outputdir)
                })
            })
            .collect();

        let results = futures::future::join_all(tasks).await;

        let mut failures = 0;
        for result in results {
            match result? {
                Ok(output) => debug!(output = %output.display(), "Wrote output"),
                Err(e) => {
                    error!("Failed to convert input: {}", e);
                    failures += 1;
                }
            }
        }
        Ok(failures)
    }
}

fn convert_file(
    registry: &MessageRegistry,
    settlement: &Config,
    schema: Option<&SchemaResource>,
    job: &Job,
    input: &Path,
    outputdir: &Path,
) -> ConvertResult<PathBuf> {
    let bytes = fs::read(input).map_err(|e| io_error(input, e))?;

    let (output, extension) = match job {
        Job::Generate(kind) => {
            let schema = schema.ok_or_else(|| {
                ConverterError::ProcessingError("SCHEMAPATH is required to generate messages".to_string())
            })?;
            let message = registry.decode(kind, &bytes).map_err(|e| conversion_error(input, e))?;
            let xml = registry
                .generate(schema, kind, settlement, message)
                .map_err(|e| conversion_error(input, e))?;
            (xml, "xml")
        }
        Job::Parse => {
            let message = registry.parse(&bytes).map_err(|e| conversion_error(input, e))?;
            let json = message.to_json().map_err(|e| conversion_error(input, e))?;
            (json.into_bytes(), "json")
        }
    };

    let stem = input
        .file_stem()
        .ok_or_else(|| ConverterError::ProcessingError(format!("Input has no file name: {}", input.display())))?;
    let path = outputdir.join(stem).with_extension(extension);
    fs::write(&path, output).map_err(|e| io_error(&path, e))?;
    Ok(path)
}

fn io_error(path: &Path, source: std::io::Error) -> ConverterError {
    ConverterError::IoError {
        path: path.display().to_string(),
        source,
    }
}

fn conversion_error(path: &Path, source: ConversionError) -> ConverterError {
    ConverterError::ConversionError {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../envelope-core/tests/fixtures");

    fn fixture(name: &str) -> PathBuf {
        Path::new(FIXTURES).join(name)
    }

    #[test]
    fn generates_then_parses_a_file() {
        let outputdir = tempfile::tempdir().unwrap();
        let registry = MessageRegistry::with_default_kinds();
        let settlement = Config::from_file(fixture("config.json")).unwrap();
        let schema = SchemaResource::file(fixture("outgoing.xsd").to_string_lossy().into_owned());

        let xml_path = convert_file(
            &registry,
            &settlement,
            Some(&schema),
            &Job::Generate("pacs.008.001.08".to_string()),
            &fixture("credit_transfer.json"),
            outputdir.path(),
        )
        .unwrap();
        assert_eq!(xml_path, outputdir.path().join("credit_transfer.xml"));

        let json_path =
            convert_file(&registry, &settlement, None, &Job::Parse, &xml_path, outputdir.path()).unwrap();
        let json = fs::read_to_string(json_path).unwrap();
        assert!(json.contains("\"fedNowMessage\""));
        assert!(json.contains("\"amount\": \"1000.00\""));
    }

    #[test]
    fn generate_without_schema_fails() {
        let outputdir = tempfile::tempdir().unwrap();
        let err = convert_file(
            &MessageRegistry::with_default_kinds(),
            &Config::default(),
            None,
            &Job::Generate("pacs.008.001.08".to_string()),
            &fixture("credit_transfer.json"),
            outputdir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, ConverterError::ProcessingError(_)));
    }
}
