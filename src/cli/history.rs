use crate::cli::{HistoryArgs, HistoryCommand, OutputFormat};
use parthought::analysis::priority_order;
use parthought::config::Config;
use parthought::history::HistoryStore;
use parthought::output::{render_history, render_markdown};
use parthought::session::Session;

pub async fn execute(args: HistoryArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;
    let store = HistoryStore::load(&config.history.path, config.history.capacity);

    match args.command {
        HistoryCommand::List { format } => {
            let entries = store.snapshot().await;
            match format {
                OutputFormat::Text => print!("{}", render_history(&entries)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(entries.as_slice())?)
                }
            }
        }
        HistoryCommand::Show { id, format } => {
            let record = store
                .find(id)
                .await
                .ok_or_else(|| anyhow::anyhow!("No saved scenario with id {}", id))?;

            let mut session = Session::new(config.default_weights);
            session.load_scenario(&record);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Text => match &session.result {
                    Some(result) => print!("{}", render_markdown(result)),
                    None => {
                        println!("Problem: {}", session.problem);
                        println!("Context: {}", session.context);
                        println!("Priorities: {}", priority_order(&session.weights));
                    }
                },
            }
            println!("\nShare: ?{}", session.share_query()?);
        }
    }

    Ok(())
}
