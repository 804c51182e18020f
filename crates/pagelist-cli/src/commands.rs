use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use pagelist::{ListConfig, PagedList};
use pagelist_store::FileStateStore;
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = list_config(&cli)?;
    let store = Arc::new(
        FileStateStore::open(&cli.store)
            .with_context(|| format!("opening state file {}", cli.store.display()))?,
    );
    tracing::debug!(
        store = %cli.store.display(),
        page_size = config.page_size,
        encoding = ?config.encoding,
        "resolved list configuration"
    );
    let open = |name: &str| PagedList::with_config(name, &config, store.clone());
    let format = cli.format;

    match cli.command {
        Command::Push(args) => cmd_push(&open(&args.list), &args.values, format),
        Command::Get(args) => {
            let value = open(&args.list).get(args.index)?;
            print_value(args.index, &value, format);
            Ok(())
        }
        Command::Last(args) => {
            let (index, value) = open(&args.list).last_entry()?;
            print_value(index, &value, format);
            Ok(())
        }
        Command::Page(args) => cmd_page(&open(&args.list), args.page, format),
        Command::Len(args) => {
            let len = open(&args.list).len()?;
            match format {
                OutputFormat::Text => println!("{}", len.to_string().bold()),
                OutputFormat::Json => println!("{}", json!({ "list": args.list, "len": len })),
            }
            Ok(())
        }
        Command::Range(args) => cmd_range(&open(&args.list), args.start, args.end, format),
        Command::Meta(args) => cmd_meta(&open(&args.list), format),
    }
}

fn list_config(cli: &Cli) -> anyhow::Result<ListConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ListConfig::from_toml_str(&text)?
        }
        None => ListConfig::default(),
    };
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    Ok(config)
}

fn print_value(index: u64, value: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{} {}", format!("[{index}]").dimmed(), value),
        OutputFormat::Json => println!("{}", json!({ "index": index, "value": value })),
    }
}

fn cmd_push(list: &PagedList, values: &[String], format: OutputFormat) -> anyhow::Result<()> {
    for value in values {
        let index = list.append(value.as_str())?;
        match format {
            OutputFormat::Text => println!(
                "{} {} {}",
                "✓".green(),
                format!("[{index}]").yellow(),
                value
            ),
            OutputFormat::Json => println!("{}", json!({ "index": index, "value": value })),
        }
    }
    Ok(())
}

fn cmd_page(list: &PagedList, page: u64, format: OutputFormat) -> anyhow::Result<()> {
    let values = list.get_page(page)?;
    match format {
        OutputFormat::Text => {
            println!(
                "Page {} of {} ({} elements)",
                page.to_string().bold(),
                list.identity().cyan(),
                values.len()
            );
            let first = (page - 1) * list.page_size();
            for (i, value) in values.iter().enumerate() {
                println!("  {} {}", format!("[{}]", first + i as u64).dimmed(), value);
            }
        }
        OutputFormat::Json => println!("{}", json!({ "page": page, "values": values })),
    }
    Ok(())
}

fn cmd_range(
    list: &PagedList,
    start: u64,
    end: Option<u64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    list.range(start, end, |index, value| {
        match format {
            OutputFormat::Text => println!("{} {}", format!("[{index}]").dimmed(), value),
            OutputFormat::Json => rows.push(json!({ "index": index, "value": value })),
        }
        Ok::<_, pagelist::ListError>(())
    })?;
    if let OutputFormat::Json = format {
        println!("{}", serde_json::Value::Array(rows));
    }
    Ok(())
}

fn cmd_meta(list: &PagedList, format: OutputFormat) -> anyhow::Result<()> {
    let meta = list.meta()?;
    match format {
        OutputFormat::Text => {
            println!("List: {}", list.identity().cyan().bold());
            println!("  Page size: {}", list.page_size());
            println!("  Elements: {}", meta.total_count.to_string().bold());
            println!("  Last page: {}", meta.last_page_number);
            println!("  Metadata key: {}", list.keys().meta_key().dimmed());
        }
        OutputFormat::Json => println!(
            "{}",
            json!({
                "list": list.identity(),
                "pageSize": list.page_size(),
                "totalCount": meta.total_count,
                "lastPageNumber": meta.last_page_number,
            })
        ),
    }
    Ok(())
}
