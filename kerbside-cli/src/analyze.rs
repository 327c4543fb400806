//! Analyse command implementation for the Kerbside CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use kerbside_core::safety::{SafetyScorer, attach_model_scores};
use kerbside_core::{
    AnalysisConfig, IssueFilter, IssueKind, LayerKind, LayerState, RouteAnalysis, analyze_routes,
};
use kerbside_data::fs::{file_is_file, read_utf8_file};
use kerbside_data::{
    HttpSafetyScorer, HttpSafetyScorerConfig, LayerSources, ResponseField, load_layers,
    load_routes,
};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ANALYSIS_CONFIG, ARG_CENTERLINES, ARG_CURB_RAMPS, ARG_ROUTES, ARG_SIDEWALKS,
    ARG_SPEED_LIMITS, ARG_STREETLIGHTS, ARG_TREES, CliError, ENV_ROUTES,
};

/// Number of ranked routes printed when `--k` is not given.
pub(crate) const DEFAULT_K: usize = 3;

/// CLI arguments for the `analyze` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Analyse candidate walking routes against sidewalk, lighting, \
                 tree, curb ramp, speed limit and centreline layers. Routes are \
                 read from a JSON file and each layer from a GeoJSON file; a \
                 layer left unset is treated as empty. The ranked analyses are \
                 printed as JSON.",
    about = "Flag and rank candidate routes for accessibility"
)]
#[ortho_config(prefix = "KERBSIDE")]
pub(crate) struct AnalyzeArgs {
    /// Path to a JSON file of candidate routes.
    #[arg(long = ARG_ROUTES, value_name = "path")]
    #[serde(default)]
    pub(crate) routes: Option<Utf8PathBuf>,
    /// GeoJSON sidewalk layer.
    #[arg(long = ARG_SIDEWALKS, value_name = "path")]
    #[serde(default)]
    pub(crate) sidewalks: Option<Utf8PathBuf>,
    /// GeoJSON street lamp layer.
    #[arg(long = ARG_STREETLIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) streetlights: Option<Utf8PathBuf>,
    /// GeoJSON street tree layer.
    #[arg(long = ARG_TREES, value_name = "path")]
    #[serde(default)]
    pub(crate) trees: Option<Utf8PathBuf>,
    /// GeoJSON curb ramp layer.
    #[arg(long = ARG_CURB_RAMPS, value_name = "path")]
    #[serde(default)]
    pub(crate) curb_ramps: Option<Utf8PathBuf>,
    /// GeoJSON posted speed limit layer.
    #[arg(long = ARG_SPEED_LIMITS, value_name = "path")]
    #[serde(default)]
    pub(crate) speed_limits: Option<Utf8PathBuf>,
    /// GeoJSON street centreline layer.
    #[arg(long = ARG_CENTERLINES, value_name = "path")]
    #[serde(default)]
    pub(crate) centerlines: Option<Utf8PathBuf>,
    /// JSON file overriding thresholds, weights and attribute names.
    #[arg(long = ARG_ANALYSIS_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) analysis_config: Option<Utf8PathBuf>,
    /// Number of ranked routes to print.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) k: Option<usize>,
    /// Treat the request as a night-time request.
    #[arg(long)]
    #[serde(default)]
    pub(crate) night: bool,
    /// Local hour of the request; night is derived from the night window.
    #[arg(long, value_name = "hour")]
    #[serde(default)]
    pub(crate) hour: Option<u8>,
    /// Only report these issue kinds (comma separated).
    #[arg(long, value_name = "kinds", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) issues: Option<Vec<IssueKind>>,
    /// Base URL of a route safety prediction service.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) scorer_url: Option<String>,
    /// Aggregate of the prediction response to report.
    #[arg(long, value_name = "field")]
    #[serde(default)]
    pub(crate) scorer_field: Option<ResponseField>,
    /// Timeout for prediction requests, in seconds.
    #[arg(long, value_name = "secs")]
    #[serde(default)]
    pub(crate) scorer_timeout_secs: Option<u64>,
}

impl AnalyzeArgs {
    pub(crate) fn into_config(self) -> Result<AnalyzeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AnalyzeConfig::try_from(merged)
    }
}

/// Resolved `analyze` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AnalyzeConfig {
    /// Path to the routes file.
    pub(crate) routes: Utf8PathBuf,
    /// Configured layer files.
    pub(crate) layers: LayerSources,
    /// Optional engine configuration file.
    pub(crate) analysis_config: Option<Utf8PathBuf>,
    /// Number of ranked routes to keep.
    pub(crate) k: usize,
    /// Explicit night flag.
    pub(crate) night: bool,
    /// Local hour used with the night window.
    pub(crate) hour: Option<u8>,
    /// Issue kinds to present.
    pub(crate) issue_filter: IssueFilter,
    /// Remote scorer configuration, when a URL was given.
    pub(crate) scorer: Option<HttpSafetyScorerConfig>,
}

impl AnalyzeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.routes, ARG_ROUTES)?;
        for kind in LayerKind::ALL {
            if let Some(path) = self.layers.source(kind) {
                Self::require_existing(path, layer_arg(kind))?;
            }
        }
        if let Some(path) = &self.analysis_config {
            Self::require_existing(path, ARG_ANALYSIS_CONFIG)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Decide whether the night model applies.
    pub(crate) fn is_night(&self, engine: &AnalysisConfig) -> bool {
        self.night || self.hour.is_some_and(|hour| engine.night.contains(hour))
    }
}

impl TryFrom<AnalyzeArgs> for AnalyzeConfig {
    type Error = CliError;

    fn try_from(args: AnalyzeArgs) -> Result<Self, Self::Error> {
        let routes = args.routes.ok_or(CliError::MissingArgument {
            field: ARG_ROUTES,
            env: ENV_ROUTES,
        })?;
        if let Some(hour) = args.hour.filter(|hour| *hour >= 24) {
            return Err(CliError::InvalidHour { hour });
        }

        let layers = [
            (LayerKind::Sidewalks, args.sidewalks),
            (LayerKind::Streetlights, args.streetlights),
            (LayerKind::Trees, args.trees),
            (LayerKind::CurbRamps, args.curb_ramps),
            (LayerKind::SpeedLimits, args.speed_limits),
            (LayerKind::Centerlines, args.centerlines),
        ]
        .into_iter()
        .filter_map(|(kind, path)| path.map(|found| (kind, found)))
        .fold(LayerSources::new(), |sources, (kind, path)| {
            sources.with_source(kind, path)
        });

        let issue_filter = args
            .issues
            .map_or_else(IssueFilter::all, IssueFilter::only);

        let scorer = args.scorer_url.map(|url| {
            let config = HttpSafetyScorerConfig::new(url)
                .with_response_field(args.scorer_field.unwrap_or_default());
            match args.scorer_timeout_secs {
                Some(secs) => config.with_timeout(Duration::from_secs(secs)),
                None => config,
            }
        });

        Ok(Self {
            routes,
            layers,
            analysis_config: args.analysis_config,
            k: args.k.unwrap_or(DEFAULT_K),
            night: args.night,
            hour: args.hour,
            issue_filter,
            scorer,
        })
    }
}

const fn layer_arg(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Sidewalks => ARG_SIDEWALKS,
        LayerKind::Streetlights => ARG_STREETLIGHTS,
        LayerKind::Trees => ARG_TREES,
        LayerKind::CurbRamps => ARG_CURB_RAMPS,
        LayerKind::SpeedLimits => ARG_SPEED_LIMITS,
        LayerKind::Centerlines => ARG_CENTERLINES,
    }
}

/// Builds the optional remote scorer for an analyse invocation.
pub(crate) trait ScorerBuilder {
    fn build(&self, config: &AnalyzeConfig) -> Result<Option<Box<dyn SafetyScorer>>, CliError>;
}

pub(crate) struct DefaultScorerBuilder;

impl ScorerBuilder for DefaultScorerBuilder {
    fn build(&self, config: &AnalyzeConfig) -> Result<Option<Box<dyn SafetyScorer>>, CliError> {
        let Some(scorer_config) = config.scorer.clone() else {
            return Ok(None);
        };
        let base_url = scorer_config.base_url.clone();
        let scorer = HttpSafetyScorer::with_config(scorer_config)
            .map_err(|source| CliError::BuildScorer { base_url, source })?;
        Ok(Some(Box::new(scorer)))
    }
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_analyze_with(args, &DefaultScorerBuilder, &mut stdout)
}

pub(crate) fn run_analyze_with(
    args: AnalyzeArgs,
    builder: &dyn ScorerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_analyze_config(args)?;
    let analyses = execute_analyze(&config, builder)?;
    write_analyses(writer, &analyses)
}

pub(crate) fn resolve_analyze_config(args: AnalyzeArgs) -> Result<AnalyzeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_analyze(
    config: &AnalyzeConfig,
    builder: &dyn ScorerBuilder,
) -> Result<Vec<RouteAnalysis>, CliError> {
    let engine = match &config.analysis_config {
        Some(path) => load_analysis_config(path)?,
        None => AnalysisConfig::default(),
    };
    let routes = load_routes(&config.routes)?;
    let layers = LayerState::ready(load_layers(&config.layers)?);

    let mut analyses = analyze_routes(&routes, &layers, &engine, config.k);
    if let Some(scorer) = builder.build(config)? {
        let is_night = config.is_night(&engine);
        attach_model_scores(&mut analyses, scorer.as_ref(), is_night);
    }
    info!(
        "ranked {} of {} candidate routes",
        analyses.len(),
        routes.len()
    );

    Ok(analyses
        .into_iter()
        .map(|analysis| analysis.with_issue_filter(&config.issue_filter))
        .collect())
}

/// Loads engine thresholds, weights and attribute names from JSON.
pub(crate) fn load_analysis_config(path: &Utf8Path) -> Result<AnalysisConfig, CliError> {
    let text = read_utf8_file(path).map_err(|source| CliError::ReadAnalysisConfig {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ParseAnalysisConfig {
        path: path.to_path_buf(),
        source,
    })
}

fn write_analyses(writer: &mut dyn Write, analyses: &[RouteAnalysis]) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(analyses).map_err(CliError::SerialiseAnalyses)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AnalyzeConfig, CliError> {
    let merged = AnalyzeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AnalyzeConfig::try_from(merged)
}
