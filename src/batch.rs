//! In-place rewriting of many files

use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use log::{error, info, warn};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use zipdoc_core::{Direction, FilterSet, PassthroughGuard, TranscodeMode};

/// A file found under one of the input paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    pub path: PathBuf,
    /// Path relative to the directory it was found in; used for pattern matching
    pub relative: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub path: PathBuf,
    pub mode: TranscodeMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileResult {
    Rewritten,
    /// Output identical to the file on disk
    Unchanged,
    /// Not a usable archive; left alone
    PassedThrough,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub rewritten: usize,
    pub unchanged: usize,
    pub passed_through: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.rewritten + self.unchanged + self.passed_through + self.failed
    }
}

/// Expand directories recursively; plain files are taken as given.
pub fn collect_files(inputs: &[PathBuf]) -> Vec<FoundFile> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(FoundFile {
                path: input.clone(),
                relative: input.clone(),
            });
        } else if input.is_dir() {
            for entry in walkdir::WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path().to_path_buf();
                let relative = path.strip_prefix(input).unwrap_or(&path).to_path_buf();
                files.push(FoundFile { path, relative });
            }
        } else {
            warn!("Skipping {}: not a file or directory", input.display());
        }
    }
    files
}

/// Jobs for files that some rule of `direction` selects.
pub fn plan(files: &[FoundFile], filters: &FilterSet, direction: Direction) -> Vec<Job> {
    files
        .iter()
        .filter_map(|file| {
            filters
                .resolve(direction, &file.relative)
                .map(|mode| Job {
                    path: file.path.clone(),
                    mode,
                })
        })
        .collect()
}

/// Transcode one file and replace it if the result differs. Links are
/// never followed or replaced.
pub fn process_file(guard: &PassthroughGuard, job: &Job) -> Result<FileResult> {
    let metadata = fs::symlink_metadata(&job.path)
        .with_context(|| format!("Failed to stat {}", job.path.display()))?;
    if metadata.file_type().is_symlink() {
        info!("zipdoc: Skipped {} '{}': symbolic link", job.mode.action(), job.path.display());
        return Ok(FileResult::PassedThrough);
    }

    let input = fs::read(&job.path).with_context(|| format!("Failed to read {}", job.path.display()))?;
    let outcome = guard.filter(&input, job.mode, &job.path.to_string_lossy());

    if !outcome.is_transcoded() {
        return Ok(FileResult::PassedThrough);
    }
    if outcome.data == input {
        return Ok(FileResult::Unchanged);
    }

    write_atomic(&job.path, &outcome.data)?;
    Ok(FileResult::Rewritten)
}

/// Run all jobs in parallel. Every job is attempted; the first I/O error is
/// returned afterwards.
pub fn run(jobs: &[Job], guard: &PassthroughGuard, progress: Option<&ProgressBar>) -> Result<BatchSummary> {
    if let Some(pb) = progress {
        pb.set_length(jobs.len() as u64);
    }

    let results: Vec<Result<FileResult>> = jobs
        .par_iter()
        .map(|job| {
            let result = process_file(guard, job);
            if let Some(pb) = progress {
                pb.set_message(job.path.display().to_string());
                pb.inc(1);
            }
            result
        })
        .collect();

    let mut summary = BatchSummary::default();
    let mut first_error = None;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(FileResult::Rewritten) => summary.rewritten += 1,
            Ok(FileResult::Unchanged) => summary.unchanged += 1,
            Ok(FileResult::PassedThrough) => summary.passed_through += 1,
            Err(e) => {
                error!("{}: {:#}", job.path.display(), e);
                summary.failed += 1;
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if summary.failed > 1 => Err(e.context(format!("{} files failed", summary.failed))),
        Some(e) => Err(e),
        None => Ok(summary),
    }
}

/// Replace `path` with `data` via a temporary file in the same directory.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        fs::set_permissions(tmp.path(), permissions)?;
    }
    tmp.persist(path)
        .map_err(|e| anyhow!("Failed to replace {}: {}", path.display(), e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipdoc_core::{CompressionMethod, Entry, FilterConfig, ZipReader, ZipWriter};

    fn deflated_archive() -> Vec<u8> {
        let mut writer = ZipWriter::new();
        writer
            .add_entry(&Entry::new("content.xml"), b"<doc>hello hello hello</doc>", CompressionMethod::Deflated)
            .unwrap();
        writer.finish(b"").unwrap()
    }

    #[test]
    fn test_collect_files_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
        fs::write(dir.path().join("docs/a.docx"), b"a").unwrap();
        fs::write(dir.path().join("docs/sub/b.odt"), b"b").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]);
        let relative: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();
        assert_eq!(relative, vec![PathBuf::from("docs/a.docx"), PathBuf::from("docs/sub/b.odt")]);
    }

    #[test]
    fn test_plan_uses_rules() {
        let files = vec![
            FoundFile {
                path: PathBuf::from("/w/a.docx"),
                relative: PathBuf::from("a.docx"),
            },
            FoundFile {
                path: PathBuf::from("/w/notes.txt"),
                relative: PathBuf::from("notes.txt"),
            },
        ];
        let filters = FilterConfig::default().compile().unwrap();
        let jobs = plan(&files, &filters, Direction::Encode);
        assert_eq!(
            jobs,
            vec![Job {
                path: PathBuf::from("/w/a.docx"),
                mode: TranscodeMode::ToStored
            }]
        );
    }

    #[test]
    fn test_process_file_rewrites_then_leaves_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.docx");
        fs::write(&path, deflated_archive()).unwrap();

        let guard = PassthroughGuard::default();
        let job = Job {
            path: path.clone(),
            mode: TranscodeMode::ToStored,
        };
        assert_eq!(process_file(&guard, &job).unwrap(), FileResult::Rewritten);
        let data = fs::read(&path).unwrap();
        let reader = ZipReader::new(&data).unwrap();
        assert_eq!(reader.entries()[0].method, CompressionMethod::Stored);

        assert_eq!(process_file(&guard, &job).unwrap(), FileResult::Unchanged);
    }

    #[test]
    fn test_non_zip_is_not_touched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("link.docx");
        fs::write(&path, b"../elsewhere/link.docx").unwrap();

        let jobs = vec![Job {
            path: path.clone(),
            mode: TranscodeMode::ToCompressed,
        }];
        let summary = run(&jobs, &PassthroughGuard::default(), None).unwrap();
        assert_eq!(summary.passed_through, 1);
        assert_eq!(summary.total(), 1);
        assert_eq!(fs::read(&path).unwrap(), b"../elsewhere/link.docx");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.docx");
        let link = dir.path().join("link.docx");
        let original = deflated_archive();
        fs::write(&target, &original).unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let files = collect_files(&[link.clone()]);
        let jobs: Vec<Job> = files
            .into_iter()
            .map(|f| Job {
                path: f.path,
                mode: TranscodeMode::ToStored,
            })
            .collect();
        let summary = run(&jobs, &PassthroughGuard::default(), None).unwrap();

        assert_eq!(summary.passed_through, 1);
        assert_eq!(summary.rewritten, 0);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&target).unwrap(), original);
    }

    #[test]
    fn test_missing_file_fails_batch() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![Job {
            path: dir.path().join("gone.docx"),
            mode: TranscodeMode::ToStored,
        }];
        assert!(run(&jobs, &PassthroughGuard::default(), None).is_err());
    }
}
