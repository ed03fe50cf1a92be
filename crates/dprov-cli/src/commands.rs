use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use dprov_core::DataProvider;
use dprov_http::{
    BaseRequestSource, HttpProvider, PluginPipeline, ReqwestTransport, SourcedProvider,
    TracingSignposter,
};
use dprov_store::{DataStorage, FileStorage, PrefixedStorage};
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Uri};

use crate::cli::*;
use crate::config::Config;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)?;
    match cli.command {
        Command::Get(args) => cmd_get(&config, args).await,
        Command::Put(args) => cmd_put(&config, args).await,
        Command::Cat(args) => cmd_cat(&config, args).await,
        Command::Stat(args) => cmd_stat(&config, args, cli.format).await,
        Command::Rm(args) => cmd_rm(&config, args).await,
        Command::Exists(args) => cmd_exists(&config, args).await,
    }
}

fn open_storage(config: &Config) -> PrefixedStorage<FileStorage> {
    config.storage.open()
}

fn parse_headers(raw: &[String]) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for line in raw {
        let Some((name, value)) = line.split_once(':') else {
            bail!("header {line:?} is not `name: value`");
        };
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("header name in {line:?}"))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("header value in {line:?}"))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

async fn cmd_get(config: &Config, args: GetArgs) -> anyhow::Result<()> {
    let uri: Uri = args.url.parse().with_context(|| format!("invalid url {:?}", args.url))?;
    let source = BaseRequestSource::new(uri).with_headers(parse_headers(&args.headers)?);

    let pipeline = if config.referer {
        PluginPipeline::with_default_plugins()
    } else {
        PluginPipeline::new()
    };
    let transport = ReqwestTransport::new(&config.transport)?;
    let provider = HttpProvider::with_pipeline(transport, pipeline)
        .with_signposter(Arc::new(TracingSignposter::new()));

    let (body, response) = SourcedProvider::new(source, provider).fetch().await?;
    println!(
        "{} {} ({} bytes)",
        "✓".green().bold(),
        response.status.to_string().bold(),
        body.len()
    );

    if let Some(key) = args.save {
        open_storage(config).write(&key, &body).await?;
        println!("  saved as {}", key.yellow());
    }
    Ok(())
}

async fn cmd_put(config: &Config, args: PutArgs) -> anyhow::Result<()> {
    let data = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    open_storage(config).write(&args.key, &data).await?;
    println!(
        "{} Stored {} ({} bytes, {})",
        "✓".green().bold(),
        args.key.yellow(),
        data.len(),
        config.storage.compression
    );
    Ok(())
}

async fn cmd_cat(config: &Config, args: KeyArgs) -> anyhow::Result<()> {
    let data = open_storage(config).read(&args.key).await?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&data)?;
    stdout.flush()?;
    Ok(())
}

async fn cmd_stat(config: &Config, args: KeyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let attrs = open_storage(config).attributes(&args.key).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&attrs)?),
        OutputFormat::Text => {
            println!("{}", args.key.yellow().bold());
            println!("  Size:     {} bytes on disk", attrs.size);
            println!("  Modified: {}", attrs.modified.to_rfc3339());
            match attrs.created {
                Some(created) => println!("  Created:  {}", created.to_rfc3339()),
                None => println!("  Created:  {}", "unknown".dimmed()),
            }
        }
    }
    Ok(())
}

async fn cmd_rm(config: &Config, args: KeyArgs) -> anyhow::Result<()> {
    open_storage(config).delete(&args.key).await?;
    println!("Deleted {}", args.key.yellow());
    Ok(())
}

async fn cmd_exists(config: &Config, args: KeyArgs) -> anyhow::Result<()> {
    if open_storage(config).exists(&args.key).await {
        println!("{} {}", "✓".green(), args.key.yellow());
    } else {
        println!("{} {} not stored", "✗".red(), args.key.yellow());
    }
    Ok(())
}
