//! Split session: plans a split and generates each planned file.

use crate::budget::TokenBudgets;
use crate::errors::Error;
use crate::prompts;
use serde::Serialize;
use split_client::{ClientConfig, ResilientCaller, Strategy, Transport};
use split_extract::{
    clean_code, count_tests_in_code, parse_filenames, parse_source_and_test, FilenamePlan,
    Language,
};

/// A named file and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name as shown to the model, e.g. `server.go`.
    pub name: String,
    /// Full file contents.
    pub content: String,
}

impl SourceFile {
    /// Creates a source file.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// What to split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRequest {
    /// The file to split.
    pub source: SourceFile,
    /// Its existing test file, if any.
    pub tests: Option<SourceFile>,
    /// Generate source files only: ignore `tests` and skip stub generation.
    pub skip_tests: bool,
}

impl SplitRequest {
    /// Requests a split of `source` with no existing tests.
    #[must_use]
    pub const fn new(source: SourceFile) -> Self {
        Self {
            source,
            tests: None,
            skip_tests: false,
        }
    }

    /// Splits `tests` alongside the source.
    #[must_use]
    pub fn with_tests(mut self, tests: SourceFile) -> Self {
        self.tests = Some(tests);
        self
    }

    /// Skips every test file.
    #[must_use]
    pub const fn skip_tests(mut self, skip: bool) -> Self {
        self.skip_tests = skip;
        self
    }

    /// The test file to split alongside the source, unless tests are skipped.
    #[must_use]
    pub fn tests_to_split(&self) -> Option<&SourceFile> {
        if self.skip_tests {
            None
        } else {
            self.tests.as_ref()
        }
    }
}

/// Source and test code generated together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPair {
    /// Cleaned source code.
    pub source: String,
    /// Cleaned test code; empty when the model returned none.
    pub test: String,
    /// Number of test declarations in `test`.
    pub test_count: usize,
}

/// Outcome of one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Contents were generated.
    #[serde(rename = "created")]
    Generated,
    /// Generation failed; see [`GeneratedFile::error`].
    Failed,
}

/// One output file of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Output file name.
    pub name: String,
    /// Whether generation succeeded.
    pub status: FileStatus,
    /// Line count of `contents`.
    pub lines: usize,
    /// Number of test declarations, for test files split from existing tests.
    #[serde(skip_serializing_if = "no_tests")]
    pub test_count: Option<usize>,
    /// Why generation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Generated contents; empty when generation failed.
    #[serde(skip)]
    pub contents: String,
}

#[allow(clippy::ref_option)]
fn no_tests(count: &Option<usize>) -> bool {
    count.unwrap_or(0) == 0
}

impl GeneratedFile {
    fn generated(name: impl Into<String>, contents: String) -> Self {
        Self {
            name: name.into(),
            status: FileStatus::Generated,
            lines: count_lines(&contents),
            test_count: None,
            error: None,
            contents,
        }
    }

    fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FileStatus::Failed,
            lines: 0,
            test_count: None,
            error: Some(error.into()),
            contents: String::new(),
        }
    }

    /// Whether this file was generated.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.status == FileStatus::Generated
    }
}

/// Result of a whole split run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    /// Name of the file that was split.
    pub source_file: String,
    /// Name of the test file split alongside it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_file: Option<String>,
    /// Planned source filenames, in plan order.
    pub planned: Vec<String>,
    /// Every output file, generated or failed, in generation order.
    pub files: Vec<GeneratedFile>,
}

impl SplitReport {
    /// Files that were generated.
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter().filter(|f| f.is_generated())
    }

    /// Files that failed.
    pub fn failed(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter().filter(|f| !f.is_generated())
    }

    /// Whether no output file failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Newline count plus one; empty text counts as one line.
fn count_lines(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Drives the model through a split: one planning call, then one or two
/// generation calls per planned file.
#[derive(Debug, Clone)]
pub struct Splitter<T = Strategy> {
    caller: ResilientCaller<T>,
    budgets: TokenBudgets,
    language: Language,
}

impl Splitter<Strategy> {
    /// Builds a splitter with a caller configured by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the caller cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self::with_caller(ResilientCaller::new(config)?))
    }

    /// Builds a splitter configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the caller cannot be built.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: Transport> Splitter<T> {
    /// Builds a splitter over an existing caller.
    #[must_use]
    pub fn with_caller(caller: ResilientCaller<T>) -> Self {
        Self {
            caller,
            budgets: TokenBudgets::default(),
            language: Language::GO,
        }
    }

    /// Replaces the token budgets.
    #[must_use]
    pub const fn with_budgets(mut self, budgets: TokenBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    /// The underlying caller.
    pub const fn caller(&self) -> &ResilientCaller<T> {
        &self.caller
    }

    /// Asks the model which source files to split `source` into.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Call`] if the call fails and [`Error::NothingPlanned`]
    /// if the response names no source files.
    pub async fn plan(
        &self,
        source: &SourceFile,
        tests: Option<&SourceFile>,
    ) -> Result<FilenamePlan, Error> {
        let response = self
            .caller
            .call(&prompts::plan_prompt(source, tests), self.budgets.plan)
            .await?;

        let plan = parse_filenames(&response, &self.language);
        if plan.is_empty() {
            tracing::warn!(
                event = "plan_empty",
                source_file = %source.name,
                "plan_empty"
            );
            return Err(Error::NothingPlanned);
        }

        tracing::info!(
            event = "split_planned",
            source_file = %source.name,
            files = %plan.files().join(", "),
            "Will create: {}",
            plan.files().join(", ")
        );
        Ok(plan)
    }

    /// Generates `target` and its test file from the source and its tests.
    ///
    /// Both halves are cleaned of markdown fences.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Call`] if the call fails.
    pub async fn generate_pair(
        &self,
        target: &str,
        source: &SourceFile,
        tests: &SourceFile,
    ) -> Result<GeneratedPair, Error> {
        let test_target = self.language.test_filename_for(target);
        let response = self
            .caller
            .call(
                &prompts::pair_prompt(target, &test_target, source, tests),
                self.budgets.pair,
            )
            .await?;

        let pair = parse_source_and_test(&response);
        let test = clean_code(&pair.test);
        Ok(GeneratedPair {
            source: clean_code(&pair.source),
            test_count: count_tests_in_code(&test, &self.language),
            test,
        })
    }

    /// Generates the code of `target` alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Call`] if the call fails.
    pub async fn generate_source(&self, target: &str, source: &SourceFile) -> Result<String, Error> {
        let code = self
            .caller
            .call(&prompts::source_prompt(target, source), self.budgets.source)
            .await?;
        Ok(clean_code(&code))
    }

    /// Generates test stubs for the freshly generated `code` of `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Call`] if the call fails.
    pub async fn generate_stubs(&self, target: &str, code: &str) -> Result<String, Error> {
        let stubs = self
            .caller
            .call(&prompts::stub_prompt(target, code), self.budgets.stubs)
            .await?;
        Ok(clean_code(&stubs))
    }

    /// Plans the split and generates every planned file in memory.
    ///
    /// With an existing test file each source file is generated together
    /// with its tests; otherwise the source is generated alone and followed
    /// by test stubs. A file that fails is recorded as
    /// [`FileStatus::Failed`] and the run moves on to the next one.
    ///
    /// # Errors
    ///
    /// Only planning failures abort the run: [`Error::Call`] or
    /// [`Error::NothingPlanned`].
    pub async fn split(&self, request: &SplitRequest) -> Result<SplitReport, Error> {
        let tests = request.tests_to_split();
        let plan = self.plan(&request.source, tests).await?;

        let mut files = Vec::new();
        let total = plan.len();
        for (index, target) in plan.iter().enumerate() {
            tracing::info!(
                event = "file_generation_started",
                step = index + 1,
                total,
                file = %target,
                "file_generation_started"
            );
            match tests {
                Some(tests) => {
                    self.split_pair(target, &request.source, tests, &mut files)
                        .await;
                }
                None => {
                    self.split_source(target, &request.source, !request.skip_tests, &mut files)
                        .await;
                }
            }
        }

        let report = SplitReport {
            source_file: request.source.name.clone(),
            test_file: tests.map(|t| t.name.clone()),
            planned: plan.into_inner(),
            files,
        };
        tracing::info!(
            event = "split_finished",
            generated = report.generated().count(),
            failed = report.failed().count(),
            "split_finished"
        );
        Ok(report)
    }

    async fn split_pair(
        &self,
        target: &str,
        source: &SourceFile,
        tests: &SourceFile,
        files: &mut Vec<GeneratedFile>,
    ) {
        let test_target = self.language.test_filename_for(target);
        let pair = match self.generate_pair(target, source, tests).await {
            Ok(pair) => pair,
            Err(e) => {
                log_failure(target, &e);
                files.push(GeneratedFile::failed(target, e.to_string()));
                files.push(GeneratedFile::failed(test_target, e.to_string()));
                return;
            }
        };

        // Checked on the cleaned source, so a blank or whitespace-only reply
        // fails here instead of producing an empty file.
        if pair.source.is_empty() {
            let reason = "could not parse source from response";
            tracing::warn!(event = "file_failed", file = %target, error = reason, "file_failed");
            files.push(GeneratedFile::failed(target, reason));
            return;
        }
        files.push(GeneratedFile::generated(target, pair.source));

        if !pair.test.is_empty() {
            let mut test_file = GeneratedFile::generated(test_target, pair.test);
            test_file.test_count = Some(pair.test_count);
            files.push(test_file);
        }
    }

    async fn split_source(
        &self,
        target: &str,
        source: &SourceFile,
        with_stubs: bool,
        files: &mut Vec<GeneratedFile>,
    ) {
        let code = match self.generate_source(target, source).await {
            Ok(code) => code,
            Err(e) => {
                log_failure(target, &e);
                files.push(GeneratedFile::failed(target, e.to_string()));
                return;
            }
        };

        if !with_stubs {
            files.push(GeneratedFile::generated(target, code));
            return;
        }

        let test_target = self.language.test_filename_for(target);
        let stubs = self.generate_stubs(target, &code).await;
        files.push(GeneratedFile::generated(target, code));
        match stubs {
            Ok(stubs) => files.push(GeneratedFile::generated(test_target, stubs)),
            Err(e) => {
                log_failure(&test_target, &e);
                files.push(GeneratedFile::failed(test_target, e.to_string()));
            }
        }
    }
}

fn log_failure(file: &str, error: &Error) {
    tracing::warn!(event = "file_failed", file = %file, error = %error, "file_failed");
}
