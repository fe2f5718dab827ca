//! Update command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::config::{Config, RangeSource};
use crate::consolidate::consolidate_with_report;
use crate::jobs::JobManager;
use crate::loader::{load_range_file, write_range_file};
use crate::lock::LockGuard;
use crate::utils::{format_count, format_reduction};

/// Run the update command
///
/// The output is only rewritten when every selected source reloaded; a
/// partial reload would shrink the ban list.
pub fn run(config_path: &Path, dry_run: bool, only: &[String]) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    for name in only {
        match config.sources.iter().find(|s| &s.name == name) {
            None => anyhow::bail!("Unknown range source '{}'", name),
            Some(source) if !source.enabled => {
                anyhow::bail!("Range source '{}' is disabled", name)
            }
            Some(_) => {}
        }
    }

    let sources: Vec<&RangeSource> = config
        .enabled_sources()
        .into_iter()
        .filter(|s| only.is_empty() || only.contains(&s.name))
        .collect();

    if sources.is_empty() {
        warn!("No range sources enabled. Check your configuration.");
        return Ok(());
    }

    info!("Reloading {} range sources...", sources.len());

    // Each source reloads as its own job kind, so sources load in parallel
    let jobs = JobManager::new(config.jobs);
    let mut handles = Vec::new();
    for source in &sources {
        let path = source.resolved_path(config_path);
        let job_type = format!("reload:{}", source.name);
        match jobs.spawn(&job_type, move || load_range_file(path))? {
            Some(handle) => handles.push((source.name.as_str(), handle)),
            None => anyhow::bail!(
                "Reload of '{}' was refused by the job policy; output left untouched",
                source.name
            ),
        }
    }

    let mut ranges = Vec::new();
    for (name, handle) in handles {
        let loaded = handle
            .join()
            .map_err(|_| anyhow::anyhow!("Reload job for '{}' panicked", name))?
            .with_context(|| format!("Failed to load range source '{}'", name))?;
        info!("Loaded {} - {} ranges", name, format_count(loaded.len() as u64));
        ranges.extend(loaded);
    }

    let (merged, report) = consolidate_with_report(ranges);
    let lines: Vec<String> = merged.iter().map(ToString::to_string).collect();

    info!(
        "Consolidated {} ranges in {} passes, {} addresses covered",
        format_reduction(report.input_count, report.output_count),
        report.passes,
        format_count(report.addresses)
    );

    let output = config.output_path(config_path);
    if dry_run {
        info!("[DRY-RUN] Would write {} ranges to {:?}", lines.len(), output);
        return Ok(());
    }

    let _lock = LockGuard::acquire(&output)?;
    write_range_file(&output, &lines)?;
    info!("Wrote {} ranges to {:?}", lines.len(), output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Config with two sources in a scratch directory
    fn setup(global: &str, enwiki: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("global_list.txt"), global).unwrap();
        fs::write(dir.path().join("enwiki_list.txt"), enwiki).unwrap();
        let config_path = dir.path().join("config.yaml");
        Config::default().save(&config_path).unwrap();
        (dir, config_path)
    }

    #[test]
    fn test_update_merges_all_sources() {
        let (dir, config_path) = setup(
            "# global\n10.0.0.0/26\n10.0.0.64/26\n",
            "10.0.0.128/25\n192.168.0.0/24\n",
        );
        run(&config_path, false, &[]).unwrap();

        let out = fs::read_to_string(dir.path().join("consolidated.txt")).unwrap();
        assert_eq!(out, "10.0.0.0/24\n192.168.0.0/24\n");
    }

    #[test]
    fn test_update_single_source() {
        let (dir, config_path) = setup("10.0.0.0/25\n10.0.0.128/25\n", "172.16.0.0/12\n");
        run(&config_path, false, &["global".to_string()]).unwrap();

        let out = fs::read_to_string(dir.path().join("consolidated.txt")).unwrap();
        assert_eq!(out, "10.0.0.0/24\n");
    }

    #[test]
    fn test_update_dry_run_writes_nothing() {
        let (dir, config_path) = setup("10.0.0.0/8\n", "11.0.0.0/8\n");
        run(&config_path, true, &[]).unwrap();
        assert!(!dir.path().join("consolidated.txt").exists());
    }

    #[test]
    fn test_update_invalid_range_keeps_old_output() {
        let (dir, config_path) = setup("10.0.0.0/8\n", "10.0.0.1/24\n");
        let output = dir.path().join("consolidated.txt");
        fs::write(&output, "1.2.3.0/24\n").unwrap();

        let err = run(&config_path, false, &[]).unwrap_err();
        assert!(format!("{:#}", err).contains("10.0.0.1/24"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "1.2.3.0/24\n");
    }

    #[test]
    fn test_update_refused_reload_keeps_old_output() {
        let (dir, config_path) = setup("10.0.0.0/8\n", "11.0.0.0/8\n");
        let mut config = Config::load(&config_path).unwrap();
        config.jobs.populate_new_type = false;
        config.save(&config_path).unwrap();
        let output = dir.path().join("consolidated.txt");
        fs::write(&output, "1.2.3.0/24\n").unwrap();

        let err = run(&config_path, false, &[]).unwrap_err();
        assert!(err.to_string().contains("refused"), "{}", err);
        assert_eq!(fs::read_to_string(&output).unwrap(), "1.2.3.0/24\n");
    }

    #[test]
    fn test_update_error_names_file_and_line() {
        let (_dir, config_path) = setup("10.0.0.0/8\n# c\n\nbogus\n", "11.0.0.0/8\n");
        let msg = format!("{:#}", run(&config_path, false, &[]).unwrap_err());
        assert!(msg.contains("Failed to load range source 'global'"), "{}", msg);
        assert!(msg.contains("global_list.txt:4: rejected 'bogus'"), "{}", msg);
    }

    #[test]
    fn test_update_disabled_source() {
        let (_dir, config_path) = setup("10.0.0.0/8\n", "11.0.0.0/8\n");
        let mut config = Config::load(&config_path).unwrap();
        config.sources[1].enabled = false;
        config.save(&config_path).unwrap();

        let err = run(&config_path, false, &["enwiki".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Range source 'enwiki' is disabled");
    }

    #[test]
    fn test_update_unknown_source() {
        let (_dir, config_path) = setup("", "");
        let err = run(&config_path, false, &["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Unknown range source"));
    }

    #[test]
    fn test_update_missing_source_file() {
        let (dir, config_path) = setup("10.0.0.0/8\n", "");
        fs::remove_file(dir.path().join("enwiki_list.txt")).unwrap();
        let err = run(&config_path, false, &[]).unwrap_err();
        assert!(err.to_string().contains("enwiki"));
    }

    #[test]
    fn test_update_no_enabled_sources() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut config = Config::default();
        for source in &mut config.sources {
            source.enabled = false;
        }
        config.save(&config_path).unwrap();

        run(&config_path, false, &[]).unwrap();
        assert!(!dir.path().join("consolidated.txt").exists());
    }
}
