use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use sdkup_analysis::{
    AreaKeywords, ChangeClassifier, ChangeTypeKeywords, ClassifierKeywords, MergeDecisionPolicy,
    PolicyLabels, ReleaseAnalyzer, RiskAssessor, UpgradeAnalysisAggregator,
};
use sdkup_core::MergeMethod;
use sdkup_parse::{HeaderMatching, ReleaseNoteParser, SectionKeywords};

/// Contents of `sdkup.toml`. Every table and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct UpdaterConfig {
    pub sdk: SdkConfig,
    pub repository: RepositoryConfig,
    pub http: HttpConfig,
    pub analysis: AnalysisConfig,
    pub keywords: KeywordConfig,
    pub pull_request: PullRequestConfig,
    pub tests: TestsConfig,
}

impl UpdaterConfig {
    /// Splits release bodies into sections with the configured keywords.
    #[must_use]
    pub fn parser(&self) -> ReleaseNoteParser {
        ReleaseNoteParser::new(self.keywords.sections.clone())
            .with_header_matching(self.analysis.header_matching)
    }

    /// The classify and rate pipeline with the configured keywords.
    #[must_use]
    pub fn aggregator(&self) -> UpgradeAnalysisAggregator {
        let classifier = ChangeClassifier::new(self.keywords.classifier());
        let assessor = self
            .analysis
            .high_risk_threshold
            .map_or_else(RiskAssessor::default, RiskAssessor::with_high_risk_threshold);

        UpgradeAnalysisAggregator::new(ReleaseAnalyzer::new(classifier, assessor))
            .with_clamp_to_target(self.analysis.clamp_to_target)
    }

    #[must_use]
    pub fn merge_policy(&self) -> MergeDecisionPolicy {
        MergeDecisionPolicy::new(self.pull_request.labels.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SdkConfig {
    /// Manifest packages bumped together.
    pub packages: Vec<String>,
    /// Package whose pinned and published versions drive the update.
    pub primary_package: Option<String>,
    pub release_repository: String,
    pub display_name: String,
    /// Regexes identifying source files that use the SDK.
    pub import_patterns: Vec<String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            packages: vec!["strands-agents".to_string(), "strands-agents-tools".to_string()],
            primary_package: None,
            release_repository: "strands-agents/sdk-python".to_string(),
            display_name: "Strands".to_string(),
            import_patterns: [
                r"from strands\.models import",
                r"from strands import Agent",
                r"from strands\.tools import",
                r"import strands",
                r"from strands_agents_tools import",
                r"import strands_agents_tools",
            ]
            .iter()
            .map(|p| (*p).to_string())
            .collect(),
        }
    }
}

impl SdkConfig {
    #[must_use]
    pub fn primary_package(&self) -> &str {
        self.primary_package
            .as_deref()
            .or_else(|| self.packages.first().map(String::as_str))
            .unwrap_or("strands-agents")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RepositoryConfig {
    /// `owner/repo` that receives pull requests.
    pub name: Option<String>,
    pub base_branch: String,
    pub manifest: PathBuf,
    pub branch_prefix: String,
    pub remote: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            name: None,
            base_branch: "main".to_string(),
            manifest: PathBuf::from("backend/requirements.txt"),
            branch_prefix: "sdk-update/".to_string(),
            remote: "origin".to_string(),
        }
    }
}

impl RepositoryConfig {
    #[must_use]
    pub fn branch_name(&self, version: &str) -> String {
        format!("{}{version}", self.branch_prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub page_size: u32,
    pub api_base: Option<String>,
    pub pypi_base: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            page_size: 20,
            api_base: None,
            pypi_base: None,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Drop listed releases newer than the upgrade target.
    pub clamp_to_target: bool,
    pub header_matching: HeaderMatching,
    pub high_risk_threshold: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct KeywordConfig {
    pub sections: SectionKeywords,
    pub change_types: ChangeTypeKeywords,
    pub areas: AreaKeywords,
}

impl KeywordConfig {
    #[must_use]
    pub fn classifier(&self) -> ClassifierKeywords {
        ClassifierKeywords {
            change_types: self.change_types.clone(),
            areas: self.areas.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PullRequestConfig {
    pub labels: PolicyLabels,
    pub reviewers: Vec<String>,
    pub merge_method: MergeMethod,
    pub draft: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteFormat {
    /// Counts are read from the pytest summary line.
    #[default]
    Pytest,
    /// Only the exit status is considered.
    ExitCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TestSuiteConfig {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Relative to the project root.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub format: SuiteFormat,
}

fn default_required() -> bool {
    true
}

impl TestSuiteConfig {
    fn pytest(name: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: "pytest".to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            working_dir: Some(PathBuf::from("backend")),
            env: [
                ("DATABASE_URL", "sqlite+aiosqlite:///:memory:"),
                ("SECRET_KEY", "test-secret-key"),
                ("DEBUG", "false"),
            ]
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
            required: true,
            format: SuiteFormat::Pytest,
        }
    }

    fn ruff() -> Self {
        Self {
            name: "lint".to_string(),
            program: "ruff".to_string(),
            args: ["check", "app", "tests", "--ignore", "E501"]
                .iter()
                .map(|a| (*a).to_string())
                .collect(),
            working_dir: Some(PathBuf::from("backend")),
            env: BTreeMap::new(),
            required: true,
            format: SuiteFormat::ExitCode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TestsConfig {
    pub suites: Vec<TestSuiteConfig>,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            suites: vec![
                TestSuiteConfig::ruff(),
                TestSuiteConfig::pytest(
                    "unit",
                    &["tests/", "-v", "-m", "unit", "--tb=short", "--no-header"],
                ),
                TestSuiteConfig::pytest(
                    "sdk",
                    &[
                        "tests/test_strands_service.py",
                        "-v",
                        "-m",
                        "sdk",
                        "--tb=short",
                        "--no-header",
                    ],
                ),
            ],
        }
    }
}
