/*!
 * Orchestration of the fix workflow.
 *
 * One controller instance serves one run: it wires the repairer, the merge
 * policy and the correction pipeline from the loaded configuration, then
 * drives them over a single file or a whole folder.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::available_parallelism;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::app_config::Config;
use crate::correction::{CorrectionCache, CorrectionPipeline};
use crate::correctors::{ChineseCorrector, EnglishCorrector, LanguageToolClient};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::repair::{MergePolicy, TimelineRepairer};
use crate::report::{CueOperation, FixReport};
use crate::subtitle_processor::{CueCollection, SubtitleFormat};

/// Where the fixed output goes and in which format
#[derive(Debug, Clone)]
pub struct OutputTarget {
    /// Explicit output path; defaults to overwriting the input
    pub path: Option<PathBuf>,

    /// Explicit output format; wins over any extension sniffing
    pub format: Option<SubtitleFormat>,
}

/// Drives parse, repair, merge, correct and write for one run
pub struct Controller {
    config: Config,
}

impl Controller {
    pub fn new(config: Config) -> Self {
        Controller { config }
    }

    /// Fix a single subtitle file, returning the per-file report
    pub async fn run_file(
        &self,
        input: &Path,
        target: &OutputTarget,
        dry_run: bool,
    ) -> Result<FixReport> {
        let content = FileManager::read_to_string(input)?;
        let collection = CueCollection::parse(&content, input.to_path_buf())
            .map_err(AppError::Subtitle)
            .with_context(|| format!("Failed to parse {}", input.display()))?;

        let output_path = match &target.path {
            Some(p) => p.clone(),
            None => input.to_path_buf(),
        };
        let output_format = self.resolve_output_format(collection.format, target, &output_path);

        let mut report = FixReport::new(
            collection.format,
            output_format,
            collection.cues.len(),
            dry_run,
        );
        let mut cues = collection.cues;

        let repairer = TimelineRepairer::new(self.config.min_duration_ms);
        repairer.repair(&mut cues, &mut report);

        let policy = MergePolicy::new(self.config.terminal_punctuation.clone());
        let mut cues = policy.merge(cues, &mut report);

        repairer.flag_infeasible(&cues, &mut report);

        let pipeline = self.build_pipeline()?;
        pipeline.correct_all(&mut cues, &mut report).await;

        if !self.config.preserve_numbering {
            for (i, cue) in cues.iter().enumerate() {
                if cue.index != i + 1 {
                    report.record(cue.index, CueOperation::Renumbered);
                }
            }
        }

        report.final_count = cues.len();

        if dry_run {
            info!(
                "Dry run, not writing {}: {}",
                output_path.display(),
                report
            );
            return Ok(report);
        }

        let serialized =
            CueCollection::serialize(&cues, output_format, self.config.preserve_numbering);
        FileManager::write_atomic(&output_path, &serialized)?;
        info!("Wrote {}: {}", output_path.display(), report);
        Ok(report)
    }

    /// Fix every subtitle file under a folder, concurrently.
    ///
    /// Outputs land next to their inputs; per-file failures are logged and
    /// counted, and the run fails if any file failed.
    pub async fn run_folder(&self, folder: &Path, dry_run: bool) -> Result<Vec<FixReport>> {
        let files = FileManager::find_subtitle_files(folder)?;
        if files.is_empty() {
            warn!("No subtitle files found under {}", folder.display());
            return Ok(Vec::new());
        }
        info!("Processing {} subtitle file(s)", files.len());

        let progress = Arc::new(ProgressBar::new(files.len() as u64));
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let concurrency = available_parallelism().map(|n| n.get()).unwrap_or(4);
        let results: Vec<(PathBuf, Result<FixReport>)> = stream::iter(files)
            .map(|file| {
                let progress = Arc::clone(&progress);
                async move {
                    let target = OutputTarget {
                        path: None,
                        format: None,
                    };
                    let result = self.run_file(&file, &target, dry_run).await;
                    progress.inc(1);
                    (file, result)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;
        progress.finish_and_clear();

        let mut reports = Vec::with_capacity(results.len());
        let mut failures = 0;
        for (file, result) in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("Failed to fix {}: {:#}", file.display(), e);
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            anyhow::bail!("{} of {} file(s) failed", failures, reports.len() + failures);
        }
        Ok(reports)
    }

    /// Explicit format wins, then the output extension, then the input format
    fn resolve_output_format(
        &self,
        input_format: SubtitleFormat,
        target: &OutputTarget,
        output_path: &Path,
    ) -> SubtitleFormat {
        if let Some(format) = target.format {
            return format;
        }
        if target.path.is_some() {
            if let Some(format) = SubtitleFormat::from_extension(output_path) {
                return format;
            }
        }
        input_format
    }

    fn build_pipeline(&self) -> Result<CorrectionPipeline> {
        let grammar = if self.config.enable_grammar {
            let client = LanguageToolClient::new(
                &self.config.grammar.endpoint,
                &self.config.grammar.language,
                self.config.grammar.timeout_secs,
            )
            .map_err(AppError::Corrector)?;
            Some(client)
        } else {
            None
        };

        Ok(CorrectionPipeline::new(
            ChineseCorrector::new(self.config.typo_map.clone()),
            EnglishCorrector::new(grammar),
            CorrectionCache::with_capacities(
                self.config.chinese_cache_capacity,
                self.config.english_cache_capacity,
            ),
            self.config.context_window,
        ))
    }
}
