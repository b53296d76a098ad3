//! CLI entry point for contract graph search.
//!
//! Each subcommand runs one search operation and prints its result as JSON
//! on stdout. Logs go to stderr.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use contracts_core::{ClauseType, ContractsConfig};
use contracts_graph::{GraphClient, GraphConfig};
use contracts_search::openai::OpenAiCompatClient;
use contracts_search::{ContractSearchService, Text2CypherGenerator};

#[derive(Parser)]
#[command(name = "contract-search")]
#[command(about = "Structured and semantic search over the contracts knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: contracts).
    #[arg(short, long, default_value = "contracts", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Get one contract with its parties and clause types.
    Contract {
        #[arg(long)]
        id: i64,
    },
    /// Get one contract with its excerpts grouped by clause type.
    Excerpts {
        #[arg(long)]
        id: i64,
    },
    /// List contracts of the organization best matching a name.
    Contracts {
        #[arg(long)]
        organization: String,
    },
    /// List the clause types present in the graph.
    ClauseTypes,
    /// List contracts having a clause of the given type.
    WithClause {
        #[arg(long)]
        clause_type: ClauseType,
    },
    /// List contracts having no clause of the given type.
    WithoutClause {
        #[arg(long)]
        clause_type: ClauseType,
    },
    /// Find contracts whose excerpts are semantically close to a text.
    Similar {
        #[arg(long)]
        text: String,
    },
    /// Answer an aggregation question in natural language.
    Ask {
        #[arg(long)]
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ContractsConfig::load(&cli.config)?;

    // Connect to Neo4j.
    let graph = Arc::new(GraphClient::connect(&GraphConfig::from(&config.neo4j)).await?);

    let llm = Arc::new(OpenAiCompatClient::from_settings(&config.llm)?);
    let generator = Arc::new(Text2CypherGenerator::new(llm.clone(), graph.clone()));
    let service =
        ContractSearchService::new(graph, llm, generator).with_settings(config.search.clone());

    match cli.command {
        Command::Contract { id } => {
            let agreement = service
                .get_contract(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Contract {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&agreement)?);
        }
        Command::Excerpts { id } => {
            let agreement = service
                .get_contract_excerpts(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Contract {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&agreement)?);
        }
        Command::Contracts { ref organization } => {
            let agreements = service.get_contracts(organization).await?;
            println!("{}", serde_json::to_string_pretty(&agreements)?);
        }
        Command::ClauseTypes => {
            let types = service.get_contract_clause_types().await?;
            println!("{}", serde_json::to_string_pretty(&types)?);
        }
        Command::WithClause { ref clause_type } => {
            let agreements = service.get_contracts_with_clause_type(clause_type).await?;
            println!("{}", serde_json::to_string_pretty(&agreements)?);
        }
        Command::WithoutClause { ref clause_type } => {
            let agreements = service.get_contracts_without_clause(clause_type).await?;
            println!("{}", serde_json::to_string_pretty(&agreements)?);
        }
        Command::Similar { ref text } => {
            let agreements = service.get_contracts_similar_text(text).await?;
            println!("{}", serde_json::to_string_pretty(&agreements)?);
        }
        Command::Ask { ref question } => {
            let answer = service.answer_aggregation_question(question).await?;
            print!("{answer}");
        }
    }

    Ok(())
}
