use crate::cli::{ShareArgs, ShareCommand};
use anyhow::Context;
use parthought::config::Config;
use parthought::share;
use url::Url;

pub fn execute(args: ShareArgs) -> anyhow::Result<()> {
    match args.command {
        ShareCommand::Encode {
            problem,
            context,
            weights,
            base,
            config,
        } => {
            let config = Config::load_or_default(&config)?;
            let weights = match weights {
                Some(overrides) => config
                    .default_weights
                    .with_overrides(&overrides)
                    .map_err(anyhow::Error::msg)?,
                None => config.default_weights,
            };

            match base {
                Some(base) => {
                    let base = Url::parse(&base)
                        .with_context(|| format!("Invalid base URL '{}'", base))?;
                    println!("{}", share::link(&base, &problem, &context, &weights)?);
                }
                None => println!("?{}", share::encode(&problem, &context, &weights)?),
            }
        }
        ShareCommand::Decode { link } => {
            let shared = share::decode(&link);
            println!("{}", serde_json::to_string_pretty(&shared)?);
        }
    }

    Ok(())
}
