use anyhow::Result;
use clap::Parser;

use gleaner::client::QueryClient;
use gleaner::config::CONFIG;
use gleaner::query::{Filter, QuerySpec};

/// Query the PatentsView API and print one JSON object per flattened row.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
struct Args {
    /// Equality filters as field=value pairs, combined with AND.
    #[arg(short = 'q', long = "filter", value_parser = parse_key_value, required = true)]
    filters: Vec<(String, String)>,

    /// Comma-separated fields to request.
    #[arg(
        short = 'f',
        long,
        value_delimiter = ',',
        default_value = "patent_id,patent_title,patent_date"
    )]
    fields: Vec<String>,

    /// Page size for the single bulk request.
    #[arg(long)]
    per_page: Option<u64>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected field=value, got `{s}`"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut terms: Vec<Filter> = args
        .filters
        .into_iter()
        .map(|(field, value)| Filter::eq(field, value))
        .collect();
    let filter = if terms.len() == 1 {
        terms.remove(0)
    } else {
        Filter::and(terms)
    };

    let spec = QuerySpec::new(filter).fields(args.fields);
    let per_page = args.per_page.unwrap_or(CONFIG.default_per_page);

    let client = QueryClient::patents();
    let rows = client.fetch_all(spec, per_page).await?;
    for row in &rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}
