use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub type Number = f32;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_EXTENSION: &str = "txt";
pub const DEFAULT_ARTICLES_FILE: &str = "articles.bin";
pub const DEFAULT_RECOMMENDED_FILE: &str = "recommended.bin";

#[derive(Deserialize, Default, Debug)]
pub struct DocvecConfig {
    pub output_dir: Option<String>,
    pub top_n: Option<usize>,
    pub extension: Option<String>,
    pub threads: Option<usize>,
    pub articles_file: Option<String>,
    pub recommended_file: Option<String>,
    pub verbose: Option<bool>,
}

impl DocvecConfig {
    /// Reads `docvec_config.*` from the working directory, then `DOCVEC_*` variables.
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .add_source(ConfigFile::with_name("docvec_config").required(false))
            .add_source(Environment::with_prefix("DOCVEC"))
            .build()
            .context("Failed to read docvec configuration")?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &Config) -> Self {
        DocvecConfig {
            output_dir: config.get("output_dir").ok(),
            top_n: config.get("top_n").ok(),
            extension: config.get("extension").ok(),
            threads: config.get("threads").ok(),
            articles_file: config.get("articles_file").ok(),
            recommended_file: config.get("recommended_file").ok(),
            verbose: config.get("verbose").ok(),
        }
    }
}

/// Values given on the command line. They win over the config file and environment.
#[derive(Default, Debug)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub top_n: Option<usize>,
    pub threads: Option<usize>,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct State {
    pub vocabulary_path: PathBuf,
    pub corpus_root: PathBuf,
    pub output_dir: PathBuf,
    pub top_n: usize,
    /// `None` accepts every file under the corpus root.
    pub extension: Option<String>,
    pub threads: Option<usize>,
    pub articles_path: PathBuf,
    pub recommended_path: PathBuf,
    pub verbose: bool,
}

impl State {
    pub fn new(
        vocabulary_path: &Path,
        corpus_root: &Path,
        file_config: DocvecConfig,
        overrides: Overrides,
    ) -> Result<Self> {
        let output_dir = overrides
            .output_dir
            .or_else(|| file_config.output_dir.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let top_n = overrides
            .top_n
            .or(file_config.top_n)
            .unwrap_or(DEFAULT_TOP_N);

        let extension = file_config
            .extension
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        let extension = extension.trim_start_matches('.').to_string();
        let extension = (!extension.is_empty()).then_some(extension);

        let threads = overrides.threads.or(file_config.threads);

        let articles_path = output_dir.join(
            file_config
                .articles_file
                .as_deref()
                .unwrap_or(DEFAULT_ARTICLES_FILE),
        );
        let recommended_path = output_dir.join(
            file_config
                .recommended_file
                .as_deref()
                .unwrap_or(DEFAULT_RECOMMENDED_FILE),
        );

        let verbose = overrides.verbose || file_config.verbose.unwrap_or(false);

        if top_n == 0 {
            anyhow::bail!("DOCVEC_TOP_N must be at least 1.");
        }
        if threads == Some(0) {
            anyhow::bail!("DOCVEC_THREADS must be at least 1.");
        }

        Ok(Self {
            vocabulary_path: vocabulary_path.to_path_buf(),
            corpus_root: corpus_root.to_path_buf(),
            output_dir,
            top_n,
            extension,
            threads,
            articles_path,
            recommended_path,
            verbose,
        })
    }

    pub fn print_config(&self) {
        println!("vocabulary_path={}", self.vocabulary_path.display());
        println!("corpus_root={}", self.corpus_root.display());
        println!("output_dir={}", self.output_dir.display());
        println!("top_n={}", self.top_n);
        println!("extension={}", self.extension.as_deref().unwrap_or("*"));
        match self.threads {
            Some(threads) => println!("threads={}", threads),
            None => println!("threads=auto"),
        }
        println!("articles_path={}", self.articles_path.display());
        println!("recommended_path={}", self.recommended_path.display());
        println!("verbose={}", self.verbose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(file_config: DocvecConfig, overrides: Overrides) -> Result<State> {
        State::new(
            Path::new("glove.txt"),
            Path::new("corpus"),
            file_config,
            overrides,
        )
    }

    #[test]
    fn test_defaults() {
        let state = state(DocvecConfig::default(), Overrides::default()).unwrap();
        assert_eq!(state.top_n, DEFAULT_TOP_N);
        assert_eq!(state.extension.as_deref(), Some("txt"));
        assert_eq!(state.articles_path, Path::new(".").join("articles.bin"));
        assert_eq!(state.recommended_path, Path::new(".").join("recommended.bin"));
        assert!(state.threads.is_none());
        assert!(!state.verbose);
    }

    #[test]
    fn test_overrides_win_over_file_config() {
        let file_config = DocvecConfig {
            output_dir: Some("from_file".into()),
            top_n: Some(3),
            threads: Some(2),
            ..Default::default()
        };
        let overrides = Overrides {
            output_dir: Some(PathBuf::from("from_cli")),
            top_n: Some(7),
            threads: None,
            verbose: true,
        };
        let state = state(file_config, overrides).unwrap();
        assert_eq!(state.output_dir, PathBuf::from("from_cli"));
        assert_eq!(state.top_n, 7);
        assert_eq!(state.threads, Some(2));
        assert!(state.verbose);
    }

    #[test]
    fn test_extension_normalization() {
        let dotted = DocvecConfig {
            extension: Some(".md".into()),
            ..Default::default()
        };
        assert_eq!(
            state(dotted, Overrides::default()).unwrap().extension.as_deref(),
            Some("md")
        );

        let any = DocvecConfig {
            extension: Some(String::new()),
            ..Default::default()
        };
        assert!(state(any, Overrides::default()).unwrap().extension.is_none());
    }

    #[test]
    fn test_rejects_zero_top_n() {
        let overrides = Overrides {
            top_n: Some(0),
            ..Default::default()
        };
        assert!(state(DocvecConfig::default(), overrides).is_err());
    }

    #[test]
    fn test_from_config_reads_keys() {
        let config = Config::builder()
            .set_override("top_n", 9)
            .unwrap()
            .set_override("recommended_file", "recs.bin")
            .unwrap()
            .build()
            .unwrap();
        let file_config = DocvecConfig::from_config(&config);
        assert_eq!(file_config.top_n, Some(9));
        assert_eq!(file_config.recommended_file.as_deref(), Some("recs.bin"));
        assert!(file_config.output_dir.is_none());
    }
}
