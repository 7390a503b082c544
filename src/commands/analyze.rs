use crate::analysis::{ArchitectureReport, LayerAnalysis};
use crate::config::{self, LayermapConfig};
use crate::graph;
use crate::io::{create_writer, OutputFormat};
use crate::observability::{set_current_graph, set_phase, AnalysisPhase};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct AnalyzeConfig {
    pub graph: PathBuf,
    pub config: Option<PathBuf>,
    /// `None` falls back to `[output] default_format`, then terminal
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub layers: Option<Vec<String>>,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let _graph_ctx = set_current_graph(&config.graph);

    let settings = load_settings(config.config.as_ref())?;
    let format = resolve_format(config.format, &settings)?;
    let report = analyze_graph(&config, &settings)?;

    let _phase = set_phase(AnalysisPhase::OutputGeneration);
    let mut writer = create_writer(format, config.output.as_deref())?;
    writer.write_report(&report)?;

    if let Some(path) = &config.output {
        log::info!("Report written to {}", path.display());
    }
    Ok(())
}

/// Load the graph and run the analysis without writing anything
pub fn analyze_graph(config: &AnalyzeConfig, settings: &LayermapConfig) -> Result<ArchitectureReport> {
    let mut graph = {
        let _phase = set_phase(AnalysisPhase::LoadingGraph);
        graph::load_graph(&config.graph)
            .with_context(|| format!("Failed to load graph from {}", config.graph.display()))?
    };
    tracing::info!(
        graph = %config.graph.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph loaded"
    );

    let analysis = LayerAnalysis::new(settings, &graph, config.layers.clone())
        .context("Failed to build the layer table")?;
    Ok(analysis.run(&mut graph))
}

fn load_settings(path: Option<&PathBuf>) -> Result<LayermapConfig> {
    let _phase = set_phase(AnalysisPhase::LoadingConfig);
    match path {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(config::load_config()),
    }
}

fn resolve_format(requested: Option<OutputFormat>, settings: &LayermapConfig) -> Result<OutputFormat> {
    if let Some(format) = requested {
        return Ok(format);
    }
    match settings
        .output
        .as_ref()
        .and_then(|o| o.default_format.as_deref())
    {
        Some(name) => name.parse().map_err(|e: String| anyhow::anyhow!(e)),
        None => Ok(OutputFormat::default()),
    }
}
