//! `orda`: the API server, the background news pipeline and knowledge
//! index maintenance.

mod config;
mod services;
mod telemetry;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use orda_core::Embedding;
use orda_rag::diagnostics::inspect_namespace;
use orda_rag::{IndexPopulator, KnowledgeBase};
use orda_server::{router, serve, shutdown_signal, AppState};
use tokio_util::sync::CancellationToken;

use crate::config::{OrdaConfig, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "orda", version, about = "News insight and investment game server")]
struct Cli {
    #[command(flatten)]
    config: OrdaConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API and run the pipeline on a schedule.
    Serve {
        #[command(flatten)]
        server: ServerConfig,

        /// Do not schedule pipeline runs. Manual refresh still works.
        #[arg(long)]
        no_pipeline: bool,
    },
    /// Rebuild both namespaces of the knowledge index from the CSV files.
    Populate,
    /// Run the news pipeline on its schedule until interrupted.
    Pipeline {
        /// Run once and exit.
        #[arg(long)]
        once: bool,
    },
    /// Print what each knowledge index namespace holds.
    Diagnose,
}

#[tokio::main]
async fn main() {
    config::load_dotenv();
    let cli = Cli::parse();

    let _guard = match telemetry::init_tracing(&cli.config.log.log_level, &cli.config.log.log_file) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    };

    if let Err(err) = run(cli).await {
        let message = format!("{err:#}");
        tracing::error!(error = %message, "orda terminated with error");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting orda");
    let config = cli.config;
    match cli.command {
        Command::Serve {
            server,
            no_pipeline,
        } => run_server(&config, &server, no_pipeline).await,
        Command::Populate => populate(&config).await,
        Command::Pipeline { once } => run_pipeline(&config, once).await,
        Command::Diagnose => diagnose(&config).await,
    }
}

async fn run_server(config: &OrdaConfig, server: &ServerConfig, no_pipeline: bool) -> anyhow::Result<()> {
    let llm = services::chat_llm(&config.openai)?;
    let repository = services::repository(&config.mysql).await;
    let reference = Arc::new(services::reference_data(&config.paths.data_dir));
    let simulation = Arc::new(services::simulation_service(config, llm.clone())?);

    let mut state = AppState::new(
        repository.clone(),
        reference,
        simulation,
        config.paths.results_dir.clone(),
        config.paths.static_dir.clone(),
    );

    let shutdown = CancellationToken::new();
    let mut scheduler = None;
    match services::rag_service(config, llm.clone()).await {
        Ok(rag) => {
            let rag = Arc::new(rag);
            state = state.with_rag(rag.clone());
            let background = services::background_pipeline(config, llm, rag, repository)?;
            state = state.with_pipeline(background.clone());
            if no_pipeline {
                tracing::info!("pipeline schedule disabled");
            } else {
                let interval = config.pipeline.interval()?;
                scheduler = Some(tokio::spawn(
                    background.run_scheduled(interval, shutdown.child_token()),
                ));
            }
        }
        Err(err) => {
            let message = format!("{err:#}");
            tracing::warn!(error = %message, "analysis and pipeline disabled");
        }
    }

    let signal = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal.cancel();
    });

    let result = serve(router(state), server.addr(), shutdown.clone()).await;
    shutdown.cancel();
    if let Some(handle) = scheduler {
        if let Err(err) = handle.await {
            tracing::warn!(error = %err, "pipeline scheduler ended abnormally");
        }
    }
    result.context("server error")
}

async fn populate(config: &OrdaConfig) -> anyhow::Result<()> {
    let reference = orda_rag::ReferenceData::load_dir(&config.paths.data_dir)
        .context("reference data is required to populate the index")?;
    let embedder = services::embedder(&config.openai)?;
    let api_key = config.pinecone.api_key()?;
    let admin = orda_pinecone::PineconeIndexAdmin::new(
        config.pinecone.pinecone_control_url.clone(),
        api_key.clone(),
    )?;

    let report = IndexPopulator::new(admin, api_key, embedder, config.pinecone.pinecone_index_name.clone())
        .populate(&KnowledgeBase::new(&reference))
        .await?;
    tracing::info!(
        host = %report.host,
        industries = report.industries,
        past_issues = report.past_issues,
        total_vectors = report.stats.total_vector_count,
        "knowledge index rebuilt"
    );
    Ok(())
}

async fn run_pipeline(config: &OrdaConfig, once: bool) -> anyhow::Result<()> {
    let llm = services::chat_llm(&config.openai)?;
    let repository = services::repository(&config.mysql).await;
    let rag = Arc::new(services::rag_service(config, llm.clone()).await?);
    let background = services::background_pipeline(config, llm, rag, repository)?;

    if once {
        let run = background
            .run_once()
            .await
            .context("pipeline run failed, see the log for the failing step")?;
        println!("{}", serde_json::to_string_pretty(&run.final_summary)?);
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal.cancel();
    });
    background
        .run_scheduled(config.pipeline.interval()?, shutdown)
        .await;
    Ok(())
}

async fn diagnose(config: &OrdaConfig) -> anyhow::Result<()> {
    let embedder = services::embedder(&config.openai)?;
    let dimension = embedder.dimension();
    let mut reports = Vec::new();
    for (mode, store) in services::namespace_stores(&config.pinecone, embedder).await? {
        reports.push(inspect_namespace(&store, mode, dimension).await);
    }
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
