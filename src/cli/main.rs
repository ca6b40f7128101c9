use clap::{Parser, Subcommand};
use records_manager::filters::{self, operator_catalog, FieldType, FilterConfig};
use records_manager::models::EntityType;
use reqwest::Client;
use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "records-cli")]
#[command(about = "Records Manager CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "RECORDS_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the filterable fields of an entity
    Fields {
        #[arg(value_name = "ENTITY")]
        entity: String,
    },

    /// List the operators applicable to a field type
    Operators {
        #[arg(value_name = "FIELD_TYPE")]
        field_type: String,
    },

    /// Check a filter configuration for missing pieces
    Validate {
        /// JSON filter file; stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Compile a filter configuration and print the predicate
    Compile {
        #[arg(short = 'E', long)]
        entity: String,

        /// JSON filter file; stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Encode a filter configuration into a shareable token
    Encode {
        /// JSON filter file; stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Decode a shared token into a filter configuration
    Decode {
        #[arg(value_name = "TOKEN")]
        token: String,

        /// Fail on a bad token instead of printing an empty filter
        #[arg(short, long)]
        strict: bool,
    },

    /// Search records on the server
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Comma-separated entity types
        #[arg(short, long)]
        types: Option<String>,

        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(short = 'r', long)]
        include_related: bool,
    },

    /// Check server health
    Health,
}

fn read_config(file: Option<PathBuf>) -> Result<FilterConfig, Box<dyn Error>> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fields { entity } => {
            print_json(&filters::fields_for_name(&entity))?;
        }

        Commands::Operators { field_type } => {
            let field_type = FieldType::from_str(&field_type)
                .map_err(|_| format!("unknown field type `{field_type}`"))?;
            print_json(&operator_catalog(field_type))?;
        }

        Commands::Validate { file } => {
            let result = filters::validate(&read_config(file)?);
            print_json(&result)?;
            if !result.is_valid {
                std::process::exit(1);
            }
        }

        Commands::Compile { entity, file } => {
            let entity_type = EntityType::from_str(&entity)
                .map_err(|_| format!("unknown entity `{entity}`"))?;
            let config = read_config(file)?;

            match filters::compile(&config, entity_type) {
                Ok(predicate) => print_json(&predicate)?,
                Err(err) => {
                    for issue in err.issues() {
                        eprintln!("error: {}", issue);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Encode { file } => {
            println!("{}", filters::encode(&read_config(file)?));
        }

        Commands::Decode { token, strict } => {
            let config = if strict {
                filters::decode_strict(&token)?
            } else {
                filters::decode(&token)
            };
            print_json(&config)?;
        }

        Commands::Search {
            query,
            types,
            limit,
            include_related,
        } => {
            let mut params = vec![("q", query)];
            if let Some(types) = types {
                params.push(("types", types));
            }
            if let Some(limit) = limit {
                params.push(("limit", limit.to_string()));
            }
            if include_related {
                params.push(("include_related", "true".to_string()));
            }

            let response = Client::new()
                .get(format!("{}/v1/search", cli.endpoint))
                .query(&params)
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            print_json(&body)?;
        }

        Commands::Health => {
            let response = Client::new()
                .get(format!("{}/health", cli.endpoint))
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            print_json(&body)?;
        }
    }

    Ok(())
}
