use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use common::{topological_order, PipelineRequest, PipelineStats};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

/// - Local: default http://localhost:8000
/// - En Docker: BACKEND_URL=http://backend:8000
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "CLI para enviar pipelines al backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Envía un pipeline (JSON con nodes y edges) a /pipelines/parse
    Submit {
        #[arg(value_name = "PIPELINE_JSON")]
        file: String,

        /// URL base del backend
        #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
        url: String,
    },
    /// Valida el pipeline localmente, sin backend
    Check {
        #[arg(value_name = "PIPELINE_JSON")]
        file: String,

        /// Muestra también el orden topológico si es un DAG
        #[arg(long)]
        order: bool,
    },
}

/// Cuerpo de error que devuelve el backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

pub fn load_pipeline(path: impl AsRef<Path>) -> Result<PipelineRequest> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("no se pudo leer {}", path.display()))?;
    let pipeline = serde_json::from_str(&raw)
        .with_context(|| format!("{} no es un pipeline válido", path.display()))?;
    Ok(pipeline)
}

pub fn format_stats(stats: &PipelineStats) -> String {
    format!(
        "Pipeline:\n  nodos: {}\n  aristas: {}\n  es DAG: {}",
        stats.num_nodes,
        stats.num_edges,
        if stats.is_dag { "sí" } else { "no (tiene ciclos)" }
    )
}

async fn submit(client: &Client, base_url: &str, pipeline: &PipelineRequest) -> Result<PipelineStats> {
    let url = format!("{}/pipelines/parse", base_url.trim_end_matches('/'));
    info!(
        "enviando pipeline a {} (nodos={}, aristas={})",
        url,
        pipeline.nodes.len(),
        pipeline.edges.len()
    );

    let resp = client
        .post(&url)
        .json(pipeline)
        .send()
        .await
        .with_context(|| format!("no se pudo conectar con {}", url))?;

    let status = resp.status();
    if !status.is_success() {
        warn!("el backend devolvió {}", status);
        match resp.json::<ErrorBody>().await {
            Ok(body) => bail!("error HTTP {}: {} ({})", status, body.error, body.code),
            Err(_) => bail!("error HTTP {}", status),
        }
    }

    let stats: PipelineStats = resp.json().await.context("respuesta inválida del backend")?;
    Ok(stats)
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Submit { file, url } => {
            let pipeline = load_pipeline(&file)?;
            let client = Client::new();

            let stats = submit(&client, &url, &pipeline).await?;
            println!("{}", format_stats(&stats));
        }

        Commands::Check { file, order } => {
            let pipeline = load_pipeline(&file)?;
            let stats = pipeline.stats();
            println!("{}", format_stats(&stats));

            if order {
                if let Some(ids) = topological_order(&pipeline.nodes, &pipeline.edges) {
                    println!("  orden: {}", ids.join(" -> "));
                }
            }
        }
    }

    Ok(())
}
