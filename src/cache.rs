//! On-disk cache of analysis results keyed by input-file identity
//!
//! The key is the MD5 of the input bytes together with the settings that
//! change the outcome (sheet, provider, model, endpoint, vocabulary mode).
//! Storing a result for an input path drops older entries for the same path,
//! so re-uploading an edited file invalidates what was cached for its
//! previous contents. Reports with failed steps are never stored.

use crate::analysis::AnalysisReport;
use crate::config::FeasibilityConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Identity of one analysis run over one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    pub digest: String,
    pub input_path: PathBuf,
}

impl CacheKey {
    pub fn for_input(path: &Path, config: &FeasibilityConfig) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        Ok(Self::from_bytes(path, &bytes, config))
    }

    pub fn from_bytes(path: &Path, bytes: &[u8], config: &FeasibilityConfig) -> Self {
        let mut context = md5::Context::new();
        context.consume(bytes);
        for field in [
            config.sheet.as_str(),
            config.provider.as_str(),
            config.model.as_str(),
            config.api_base_url.as_deref().unwrap_or_default(),
        ] {
            context.consume(b"\0");
            context.consume(field.as_bytes());
        }
        let mode: &[u8] = if config.strict_vocabulary {
            b"\0strict"
        } else {
            b"\0lenient"
        };
        context.consume(mode);

        Self {
            digest: format!("{:x}", context.compute()),
            input_path: path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedAnalysis {
    key: CacheKey,
    cached_at: String,
    report: AnalysisReport,
}

#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("{}.json", digest))
    }

    /// Returns the cached report for `key`. Unreadable entries are treated as
    /// misses and removed.
    pub fn load(&self, key: &CacheKey) -> Result<Option<AnalysisReport>> {
        let path = self.entry_path(&key.digest);
        if !path.exists() {
            debug!(digest = %key.digest, "Cache miss");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", path.display()))?;

        match serde_json::from_str::<CachedAnalysis>(&contents) {
            Ok(entry) if entry.key == *key => {
                debug!(digest = %key.digest, cached_at = %entry.cached_at, "Cache hit");
                Ok(Some(entry.report))
            }
            Ok(_) => {
                debug!(digest = %key.digest, "Cache entry belongs to another input path");
                Ok(None)
            }
            Err(e) => {
                warn!("Discarding corrupt cache entry {}: {}", path.display(), e);
                self.remove(&path)?;
                Ok(None)
            }
        }
    }

    /// Stores `report` under `key`, replacing older entries for the same input
    /// path. Returns `false` without touching the cache when any step failed,
    /// so a later run retries those steps.
    pub fn store(&self, key: &CacheKey, report: &AnalysisReport) -> Result<bool> {
        let failed = report.failed_steps();
        if failed > 0 {
            info!(
                failed_steps = failed,
                "Not caching results for {} because some steps failed",
                key.input_path.display()
            );
            return Ok(false);
        }

        self.invalidate_path(&key.input_path)?;

        let entry = CachedAnalysis {
            key: key.clone(),
            cached_at: chrono::Utc::now().to_rfc3339(),
            report: report.clone(),
        };
        let path = self.entry_path(&key.digest);
        let contents =
            serde_json::to_string_pretty(&entry).context("Failed to serialize cache entry")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache entry: {}", path.display()))?;
        debug!(digest = %key.digest, "Stored analysis in cache");
        Ok(true)
    }

    /// Removes every entry recorded for `input_path`. Returns how many were removed.
    pub fn invalidate_path(&self, input_path: &Path) -> Result<usize> {
        let mut removed = 0;
        for (path, entry) in self.entries()? {
            if entry.key.input_path == input_path {
                self.remove(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let dir = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list cache directory: {}", self.dir.display()))?;
        for entry in dir {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn entries(&self) -> Result<Vec<(PathBuf, CachedAnalysis)>> {
        let mut entries = Vec::new();
        for path in self.entry_files()? {
            let parsed = std::fs::read_to_string(&path)
                .ok()
                .and_then(|contents| serde_json::from_str::<CachedAnalysis>(&contents).ok());
            if let Some(entry) = parsed {
                entries.push((path, entry));
            }
        }
        Ok(entries)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove cache entry: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        CaseAnalysis, CaseVerdict, Feasibility, StepResult, TestCase,
    };
    use chrono::Utc;
    use genai::adapter::AdapterKind;
    use tempfile::TempDir;

    fn settings() -> FeasibilityConfig {
        let mut config = FeasibilityConfig::default();
        config.provider = AdapterKind::Ollama;
        config.model = "m".to_string();
        config.api_base_url = None;
        config.sheet = "Sheet1".to_string();
        config.strict_vocabulary = false;
        config
    }

    fn key(path: &str, bytes: &[u8]) -> CacheKey {
        CacheKey::from_bytes(Path::new(path), bytes, &settings())
    }

    fn report(model: &str) -> AnalysisReport {
        AnalysisReport {
            generated_at: Utc::now(),
            model: model.to_string(),
            cases: Vec::new(),
        }
    }

    fn report_with_failed_step() -> AnalysisReport {
        let case = TestCase::from_cells("TC-1", "Login", "1. Open login page", "ok", "ok");
        let verdict = CaseVerdict {
            id: case.id.clone(),
            description: case.description.clone(),
            total_steps: 1,
            feasibility: Feasibility::Error,
            primary_tool: "N/A".to_string(),
        };
        AnalysisReport {
            generated_at: Utc::now(),
            model: "m".to_string(),
            cases: vec![CaseAnalysis {
                case,
                steps: vec![StepResult::failed("1. Open login page", "connection refused")],
                verdict,
            }],
        }
    }

    #[test]
    fn test_key_depends_on_content_and_settings() {
        let path = Path::new("cases.csv");
        let base = CacheKey::from_bytes(path, b"a,b", &settings());

        assert_eq!(base, CacheKey::from_bytes(path, b"a,b", &settings()));
        assert_ne!(base.digest, CacheKey::from_bytes(path, b"a,c", &settings()).digest);

        let variants: [fn(&mut FeasibilityConfig); 5] = [
            |c| c.sheet = "Sheet2".to_string(),
            |c| c.model = "llama3".to_string(),
            |c| c.strict_vocabulary = true,
            |c| c.provider = AdapterKind::OpenAI,
            |c| c.api_base_url = Some("http://gpu-box:11434/".to_string()),
        ];
        for change in variants {
            let mut config = settings();
            change(&mut config);
            assert_ne!(base.digest, CacheKey::from_bytes(path, b"a,b", &config).digest);
        }
    }

    #[test]
    fn test_key_ignores_unrelated_settings() {
        let path = Path::new("cases.csv");
        let mut config = settings();
        config.pool_size = 7;
        config.request_timeout_secs = 5;

        assert_eq!(
            CacheKey::from_bytes(path, b"a,b", &settings()),
            CacheKey::from_bytes(path, b"a,b", &config)
        );
    }

    #[test]
    fn test_store_and_load() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path().join("cache")).unwrap();
        let key = key("/tmp/cases.csv", b"x");

        assert!(cache.load(&key).unwrap().is_none());

        let stored = report("m");
        assert!(cache.store(&key, &stored).unwrap());

        assert_eq!(cache.load(&key).unwrap(), Some(stored));
    }

    #[test]
    fn test_report_with_failed_steps_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path()).unwrap();
        let key = key("/tmp/cases.csv", b"x");

        assert!(!cache.store(&key, &report_with_failed_step()).unwrap());
        assert!(cache.load(&key).unwrap().is_none());
        assert!(cache.entry_files().unwrap().is_empty());
    }

    #[test]
    fn test_failed_run_keeps_previous_entry() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path()).unwrap();
        let old_key = key("/tmp/cases.csv", b"old");
        let new_key = key("/tmp/cases.csv", b"new");

        cache.store(&old_key, &report("m")).unwrap();
        assert!(!cache.store(&new_key, &report_with_failed_step()).unwrap());

        assert!(cache.load(&old_key).unwrap().is_some());
        assert!(cache.load(&new_key).unwrap().is_none());
    }

    #[test]
    fn test_new_contents_invalidate_previous_entry() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path()).unwrap();
        let old_key = key("/tmp/cases.csv", b"old");
        let new_key = key("/tmp/cases.csv", b"new");

        cache.store(&old_key, &report("m")).unwrap();
        cache.store(&new_key, &report("m")).unwrap();

        assert!(cache.load(&old_key).unwrap().is_none());
        assert!(cache.load(&new_key).unwrap().is_some());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::new(dir.path()).unwrap();
        let key = key("/tmp/c.csv", b"x");
        let entry = dir.path().join(format!("{}.json", key.digest));
        std::fs::write(&entry, "{ nope").unwrap();

        assert!(cache.load(&key).unwrap().is_none());
        assert!(!entry.exists());
    }
}
