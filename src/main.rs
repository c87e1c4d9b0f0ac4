use anyhow::{anyhow, bail, Context, Result};
use crossterm::style::Stylize;
use std::path::PathBuf;
use std::time::Instant;

use pd_tables::config::Config;
use pd_tables::data::data_view::SortDirection;
use pd_tables::data::loaders;
use pd_tables::state::notifications::NotificationLevel;
use pd_tables::ui::table_display::{DisplayOptions, TerminalSink};
use pd_tables::utils::app_paths::AppPaths;
use pd_tables::PdTable;

fn print_help() {
    println!(
        "{}",
        "pd-tables - Virtual-scrolling table viewer".blue().bold()
    );
    println!();
    println!("{}", "Usage:".yellow());
    println!("  pd-tables [OPTIONS] <FILE.csv|FILE.json>");
    println!("  pd-tables [OPTIONS] --url <LOAD_URL>");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}      - Filter rows (case-insensitive)", "--search <TEXT>".green());
    println!("  {}  - Sort by column index", "--sort <COL>[:desc]".green());
    println!("  {}        - Scroll offset in pixels", "--scroll <PX>".green());
    println!("  {}           - Show page N (paged mode)", "--page <N>".green());
    println!("  {}            - Rows per window/page", "--rows <N>".green());
    println!("  {}   - Select rows by id", "--select <id,...>".green());
    println!("  {}     - Export filtered rows to CSV", "--export <FILE>".green());
    println!("  {}               - Copy selected rows to clipboard", "--copy".green());
    println!("  {}              - Print statistics as JSON", "--stats".green());
    println!("  {}      - Use a specific config file", "--config <FILE>".green());
    println!("  {}            - Debug logging (or set PD_TABLES_LOG)", "--verbose".green());
    println!(
        "  {}        - Initialize configuration with wizard",
        "--init-config".green()
    );
    println!(
        "  {}    - Generate config file with defaults",
        "--generate-config".green()
    );
    println!("  {}               - Show this help", "--help".green());
    println!();
}

#[derive(Debug, Default)]
struct CliOptions {
    file: Option<PathBuf>,
    url: Option<String>,
    config: Option<PathBuf>,
    search: Option<String>,
    sort: Option<(usize, SortDirection)>,
    scroll: Option<u64>,
    page: Option<usize>,
    rows: Option<usize>,
    select: Vec<String>,
    export: Option<String>,
    copy: bool,
    stats: bool,
    verbose: bool,
    help: bool,
    init_config: bool,
    generate_config: bool,
}

fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    fn value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a String> {
        iter.next()
            .ok_or_else(|| anyhow!("{} requires a value", flag))
    }

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => options.help = true,
            "--verbose" | "-v" => options.verbose = true,
            "--init-config" => options.init_config = true,
            "--generate-config" => options.generate_config = true,
            "--copy" => options.copy = true,
            "--stats" => options.stats = true,
            "--url" => options.url = Some(value(&mut iter, arg)?.clone()),
            "--config" => options.config = Some(PathBuf::from(value(&mut iter, arg)?)),
            "--search" => options.search = Some(value(&mut iter, arg)?.clone()),
            "--export" => options.export = Some(value(&mut iter, arg)?.clone()),
            "--sort" => options.sort = Some(parse_sort(value(&mut iter, arg)?)?),
            "--scroll" => {
                options.scroll = Some(
                    value(&mut iter, arg)?
                        .parse()
                        .context("--scroll expects a pixel offset")?,
                )
            }
            "--page" => {
                let page: usize = value(&mut iter, arg)?
                    .parse()
                    .context("--page expects a page number")?;
                if page == 0 {
                    bail!("--page starts at 1");
                }
                options.page = Some(page);
            }
            "--rows" => {
                options.rows = Some(
                    value(&mut iter, arg)?
                        .parse()
                        .context("--rows expects a row count")?,
                )
            }
            "--select" => options.select.extend(
                value(&mut iter, arg)?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            ),
            other if other.starts_with("--") => bail!("Unknown option: {}", other),
            file => options.file = Some(PathBuf::from(file)),
        }
    }

    Ok(options)
}

fn parse_sort(arg: &str) -> Result<(usize, SortDirection)> {
    let (column, direction) = match arg.split_once(':') {
        Some((column, dir)) => (column, dir),
        None => (arg, "asc"),
    };
    let column = column
        .parse()
        .with_context(|| format!("Invalid sort column: {}", column))?;
    let direction = match direction.to_ascii_lowercase().as_str() {
        "asc" | "ascending" => SortDirection::Ascending,
        "desc" | "descending" => SortDirection::Descending,
        other => bail!("Invalid sort direction: {}", other),
    };
    Ok((column, direction))
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Error creating config directory")?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .context("Error writing config file")?;
    println!("Configuration file created at: {:?}", path);
    println!("Edit this file to customize pd-tables.");
    Ok(())
}

async fn run(options: CliOptions) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(rows) = options.rows {
        config.table.visible_rows = rows;
        config.table.page_size = rows;
    }
    if options.page.is_some() {
        config.table.virtual_scroll = false;
    }
    if !options.select.is_empty() {
        config.table.selectable = true;
    }
    if let Some(url) = &options.url {
        config.api.load_url = Some(url.clone());
    }

    let records = match &options.file {
        Some(path) => {
            let loaded = loaders::load_file(path)?;
            if config.table.columns.is_empty() {
                config.table.columns = loaded.columns;
            }
            loaded.records
        }
        None if config.api.load_url.is_some() => Vec::new(),
        None => bail!("No data file given (use --help for usage)"),
    };

    let should_load = options.url.is_some() || config.api.auto_load;
    let mut table = PdTable::from_config(config, records)?;
    if should_load {
        table.load().await?;
    }

    let display = DisplayOptions {
        headers: table.columns().header_labels(),
        color: true,
        highlight_open: table.config().search.highlight_open.clone(),
        highlight_close: table.config().search.highlight_close.clone(),
        show_selection: table.config().table.selectable,
    };
    let mut table = table.with_sink(Box::new(TerminalSink::new(display)));

    if let Some(search) = &options.search {
        table.set_search(search);
    }
    if let Some((column, direction)) = options.sort {
        let sort = table.sort_by_column(column);
        if sort.direction != direction {
            table.sort_by_column(column);
        }
    }
    if let Some(offset) = options.scroll {
        table.scroll_to(offset);
    }
    if let Some(page) = options.page {
        table.goto_page(page - 1);
    }
    for key in &options.select {
        let id = table
            .store()
            .iter()
            .find(|row| row.record.natural_key().as_deref() == Some(key.as_str()))
            .map(|row| row.id);
        match id {
            Some(id) => table.select_row(id, true),
            None => eprintln!("{}", format!("No row with id {}", key).yellow()),
        }
    }

    // Everything above coalesces into a single render
    table.on_frame(Instant::now());

    if let Some(filename) = &options.export {
        let path = AppPaths::export_path(filename);
        let bytes = table.export_csv_to_file(&path)?;
        println!(
            "{}",
            format!("Exported {} bytes to {}", bytes, path.display()).green()
        );
    }

    if options.copy {
        let text = table.copy_selected()?;
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => clipboard
                .set_text(text)
                .map_err(|e| anyhow!("Failed to copy to clipboard: {}", e))?,
            Err(e) => {
                eprintln!("{}", format!("Clipboard unavailable ({}), printing instead", e).yellow());
                println!("{}", text);
            }
        }
    }

    if options.stats {
        println!("{}", serde_json::to_string_pretty(&table.stats())?);
    }

    for notification in table.take_notifications() {
        let line = notification.format_for_display();
        match notification.level {
            NotificationLevel::Error => eprintln!("{}", line.red()),
            NotificationLevel::Warning => eprintln!("{}", line.yellow()),
            _ => eprintln!("{}", line.green()),
        }
    }

    table.destroy();
    Ok(())
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(2);
        }
    };

    if options.help {
        print_help();
        return;
    }

    if options.init_config {
        match Config::init_wizard() {
            Ok(_) => {
                println!("\nConfiguration initialized successfully!");
                return;
            }
            Err(e) => {
                eprintln!("Error initializing config: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    if options.generate_config {
        if let Err(e) = generate_config() {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = pd_tables::utils::logging::init_tracing(options.verbose) {
        eprintln!("{}", format!("Warning: {:#}", e).yellow());
    }

    if let Err(e) = run(options).await {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
