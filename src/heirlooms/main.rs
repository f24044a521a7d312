use chrono::Utc;
use clap::Parser;
use colored::*;
use heirlooms::api::{CmdMessage, HeirloomApi, MessageLevel};
use heirlooms::auth::Credentials;
use heirlooms::config::HeirloomsConfig;
use heirlooms::error::{HeirloomError, Result};
use heirlooms::logging::{init_logging, DEFAULT_LOG_LEVEL};
use heirlooms::model::{Heirloom, HeirloomSummary};
use heirlooms::store::fs_backend::FsBackend;
use heirlooms::store::heirloom_store::HeirloomStore;
use std::io::Write;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        let code = if e.is_client_error() { 2 } else { 1 };
        std::process::exit(code);
    }
}

struct AppContext {
    api: HeirloomApi<FsBackend>,
    config: HeirloomsConfig,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let _logger = init_logging(level)?;

    let ctx = init_context(&cli)?;
    ctx.api
        .authorize(cli.user.as_deref(), cli.password.as_deref())?;

    match cli.command {
        Some(Commands::Create { description, image }) => handle_create(&ctx, description, image),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::View { id }) => handle_view(&ctx, &id),
        Some(Commands::Edit {
            id,
            description,
            image,
        }) => handle_edit(&ctx, &id, description, image),
        Some(Commands::Delete { id }) => handle_delete(&ctx, &id),
        Some(Commands::Image { id, output }) => handle_image(&ctx, &id, output),
        Some(Commands::Search { term }) => handle_search(&ctx, &term),
        Some(Commands::Config) => handle_config(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let mut config = HeirloomsConfig::load(cli.config.as_deref())?;
    if let Some(root) = &cli.root {
        config.records_root = Some(root.clone());
    }

    let backend = FsBackend::new(config.records_root());
    let store = HeirloomStore::new(backend, config.allocator()?);
    let mut api = HeirloomApi::new(store);
    if let Some(auth_file) = &config.auth_file {
        api = api.with_credentials(Credentials::load(auth_file)?);
    }

    Ok(AppContext { api, config })
}

fn handle_create(
    ctx: &AppContext,
    description: Option<String>,
    image: Option<PathBuf>,
) -> Result<()> {
    let image = image.map(|path| read_image_file(&path)).transpose()?;
    let result = ctx.api.create_heirloom(description, image)?;
    for heirloom in &result.affected_heirlooms {
        println!("{}", heirloom.id);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_heirlooms()?;
    print_summaries(&result.listed_heirlooms);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.view_heirloom(id)?;
    for heirloom in &result.affected_heirlooms {
        print_full_heirloom(ctx, heirloom, result.image_paths.first().map(PathBuf::as_path));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &AppContext,
    id: &str,
    description: Option<String>,
    image: Option<PathBuf>,
) -> Result<()> {
    let image = image.map(|path| read_image_file(&path)).transpose()?;
    let result = ctx.api.edit_heirloom(Some(id), description, image)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.delete_heirloom(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_image(ctx: &AppContext, id: &str, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.fetch_image(id)?;
    let bytes = result.image.unwrap_or_default();
    match output {
        Some(path) => {
            std::fs::write(&path, &bytes).map_err(|e| HeirloomError::write(&path, e))?;
            print_messages(&[CmdMessage::success(format!(
                "Image written to {}",
                path.display()
            ))]);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|_| stdout.flush())
                .map_err(|e| HeirloomError::write("<stdout>", e))?;
        }
    }
    Ok(())
}

fn handle_search(ctx: &AppContext, term: &str) -> Result<()> {
    let result = ctx.api.search_heirlooms(term)?;
    print_summaries(&result.listed_heirlooms);
    Ok(())
}

fn handle_config(ctx: &AppContext) -> Result<()> {
    let json = serde_json::to_string_pretty(&ctx.config)
        .map_err(|e| HeirloomError::Config(e.to_string()))?;
    println!("{}", json);
    println!(
        "{}",
        format!("records root: {}", ctx.config.records_root().display()).dimmed()
    );
    Ok(())
}

fn read_image_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        HeirloomError::InvalidInput(format!("cannot read image {}: {}", path.display(), e))
    })
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

fn print_full_heirloom(ctx: &AppContext, heirloom: &Heirloom, image_path: Option<&Path>) {
    println!("{} {}", heirloom.id.to_string().yellow(), heirloom.title().bold());
    println!("--------------------------------");
    println!("{}", heirloom.description);
    println!("--------------------------------");
    if let Some(path) = image_path {
        println!(
            "{} {} ({} bytes)",
            "image:".dimmed(),
            path.display(),
            heirloom.image.len()
        );
    }
    println!("{} {}", "url:".dimmed(), ctx.config.image_url(&heirloom.id));
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

fn print_summaries(summaries: &[HeirloomSummary]) {
    if summaries.is_empty() {
        println!("No heirlooms found.");
        return;
    }

    for summary in summaries {
        let id_str = format!("{}  ", summary.id);
        let time_ago = summary
            .modified_at
            .map(format_time_ago)
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        let fixed_width = id_str.width() + TIME_WIDTH + 2;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&summary.title, available);
        let padding = available.saturating_sub(title_display.width());

        println!(
            "{}{}{}  {}",
            id_str.yellow(),
            title_display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
