use anyhow::{Context, Result};
use rand::Rng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::api::{AreaScope, OverpassClient, build_query};
use crate::config::ScraperConfig;
use crate::domain::Category;
use crate::osm::Normalizer;
use crate::output::write_records;

/// Outcome of one finished job
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub category: Category,
    /// Elements returned by Overpass
    pub fetched: usize,
    /// Records written to the output file
    pub written: usize,
    /// Elements dropped for lack of coordinates
    pub skipped: usize,
    pub path: PathBuf,
}

impl JobReport {
    /// One-line completion message for the console
    pub fn summary(&self) -> String {
        format!(
            "Saved {} {} records to {}",
            self.written,
            self.category.label(),
            self.path.display()
        )
    }
}

/// Progress notifications emitted by [`Pipeline::run_all`]
#[derive(Debug)]
pub enum JobEvent<'a> {
    Started(Category),
    Finished(&'a JobReport),
}

/// Query → fetch → normalize → write, once per category
pub struct Pipeline<R> {
    client: OverpassClient,
    scope: AreaScope,
    output_dir: PathBuf,
    normalizer: Normalizer<R>,
}

impl Pipeline<StdRng> {
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let client =
            OverpassClient::new(&config.overpass).context("Failed to create HTTP client")?;
        let normalizer = Normalizer::from_seed(config.synthesis.clone(), config.seed);

        Ok(Self::new(
            client,
            config.scope.clone(),
            config.output_dir.clone(),
            normalizer,
        ))
    }
}

impl<R: Rng> Pipeline<R> {
    pub fn new(
        client: OverpassClient,
        scope: AreaScope,
        output_dir: PathBuf,
        normalizer: Normalizer<R>,
    ) -> Self {
        Self {
            client,
            scope,
            output_dir,
            normalizer,
        }
    }

    /// Run a single category end to end and overwrite its output file
    pub fn run_job(&mut self, category: Category) -> Result<JobReport> {
        let query = build_query(&self.scope, &category.clauses());
        debug!(job = category.label(), url = self.client.url(), %query, "Sending Overpass query");

        let response = self
            .client
            .fetch(&query)
            .with_context(|| format!("Failed to fetch {} data", category.label()))?;

        let normalized = self.normalizer.normalize_all(
            &response,
            category.label(),
            category.category_key(),
        );
        debug!(
            job = category.label(),
            skipped = normalized.skipped,
            by_kind = ?normalized.skipped_by_kind,
            "Dropped elements without coordinates"
        );

        let path = write_records(&self.output_dir, category.file_name(), &normalized.records)
            .with_context(|| format!("Failed to write {} data", category.label()))?;

        let report = JobReport {
            category,
            fetched: response.elements.len(),
            written: normalized.records.len(),
            skipped: normalized.skipped,
            path,
        };
        info!(
            job = category.label(),
            fetched = report.fetched,
            written = report.written,
            path = %report.path.display(),
            "Job finished"
        );

        Ok(report)
    }

    /// Run every category in order, stopping at the first failure
    ///
    /// Jobs after a failing one are not started and their files are left
    /// untouched.
    pub fn run_all<F>(&mut self, mut on_event: F) -> Result<Vec<JobReport>>
    where
        F: FnMut(JobEvent<'_>),
    {
        let mut reports = Vec::with_capacity(Category::ALL.len());

        for category in Category::ALL {
            on_event(JobEvent::Started(category));
            let report = self.run_job(category)?;
            on_event(JobEvent::Finished(&report));
            reports.push(report);
        }

        Ok(reports)
    }
}
