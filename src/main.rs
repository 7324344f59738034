use clap::Parser;
use cli::{Cli, Command, ZipCommand};
use color_eyre::eyre::eyre;
use lognote::archive::{ArchiveNode, ArchiveReader};
use lognote::color::{Color, color_for_name};
use lognote::config::Config;
use lognote::group::GroupRegistry;
use lognote::rich_line::TextFormat;
use lognote::session::{Session, default_group_name};
use lognote::sorter::SortOrder;
use num_format::{Locale, ToFormattedString};
use serde_json::json;
use std::path::Path;
use tracing::info;

pub mod cli;
pub mod logging;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    crate::logging::init(&log_path)?;

    let config = Config::load(&args.config);
    if let Some(path) = config.get_path() {
        info!("Loaded config from {path}");
    }

    match args.command {
        Command::Open {
            files,
            group,
            color,
            json,
        } => {
            let group = group.unwrap_or_else(|| default_group_name(&files[0]));
            let color = resolve_color(color.as_deref(), &group)?;
            let mut session = Session::new(&config)?;
            let mut total_lines = 0;
            for file in &files {
                let parts = session.open_file(file, &group, color)?;
                total_lines += parts.iter().map(|p| p.line_count).sum::<usize>();
            }
            print_groups(session.registry(), json)?;
            if !json {
                println!(
                    "{} lines loaded",
                    total_lines.to_formatted_string(&Locale::en)
                );
            }
        }
        Command::Zip { command } => match command {
            ZipCommand::List { archive } => {
                let reader = ArchiveReader::open(&archive)?;
                for node in reader.entries() {
                    print_node(&node, 0);
                }
            }
            ZipCommand::Extract {
                archive,
                entries,
                group,
                json,
            } => {
                let group = group.unwrap_or_else(|| default_group_name(&archive));
                let mut session = Session::new(&config)?;
                let entries: Vec<&str> = entries.iter().map(String::as_str).collect();
                session.open_archive_entries(&archive, &entries, &group, None)?;
                print_groups(session.registry(), json)?;
            }
        },
        Command::Find {
            file,
            query,
            case_sensitive,
            json,
        } => {
            let mut session = Session::new(&config)?;
            session.set_case_sensitive(case_sensitive);
            let parts = session.open_file(&file, &default_group_name(&file), None)?;
            let matches = session.find_all_in_parts(&parts, &query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                for m in &matches {
                    println!("{:>8}: {}", m.line_number, m.line);
                }
                println!(
                    "{} matching lines",
                    matches.len().to_formatted_string(&Locale::en)
                );
            }
        }
        Command::Curate {
            file,
            lines,
            output,
            highlight,
            color,
            append,
        } => {
            let mut session = Session::new(&config)?;
            if append && output.exists() {
                session.load_curated(&output)?;
            }
            let parts = session.open_file(&file, &default_group_name(&file), None)?;
            for line_number in lines {
                if !session.curate_part_line(&parts, line_number)? {
                    return Err(eyre!("{:?} has no line {line_number}", file));
                }
            }
            if let Some(text) = highlight {
                let count = session.format_all_occurrences(&text, TextFormat::background(color));
                println!(
                    "Highlighted {} occurrences",
                    count.to_formatted_string(&Locale::en)
                );
            }
            session.save_curated(&output)?;
            println!(
                "Wrote {} lines to {}",
                session.document().len().to_formatted_string(&Locale::en),
                output.display()
            );
        }
        Command::Sort {
            html,
            descending,
            key,
            output,
        } => {
            let mut session = Session::new(&config)?;
            session.load_curated(&html)?;
            session
                .document_mut()
                .sort(SortOrder::from_ascending(!descending), key.unwrap_or(config.sort_key));
            let output = output.unwrap_or_else(|| html.clone());
            session.save_curated(&output)?;
            println!(
                "Sorted {} lines into {}",
                session.document().len().to_formatted_string(&Locale::en),
                output.display()
            );
        }
    }

    Ok(())
}

fn resolve_color(color: Option<&str>, group: &str) -> color_eyre::Result<Option<Color>> {
    match color {
        None => Ok(None),
        Some("auto") => Ok(Some(color_for_name(group))),
        Some(name) => name.parse::<Color>().map(Some).map_err(|e| eyre!(e)),
    }
}

fn print_groups(registry: &GroupRegistry, as_json: bool) -> color_eyre::Result<()> {
    if as_json {
        let groups: Vec<_> = registry
            .list_groups()
            .iter()
            .map(|g| {
                json!({
                    "name": g.name(),
                    "color": g.color().to_hex(),
                    "files": g.files().iter().map(|f| f.display_name.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }
    for group in registry.list_groups() {
        println!("{} [{}]", group.name(), group.color());
        for file in group.files() {
            println!("  {}  ({})", file.display_name, display_path(file.get_path()));
        }
    }
    Ok(())
}

fn print_node(node: &ArchiveNode, depth: usize) {
    let suffix = if node.is_dir { "/" } else { "" };
    println!("{}{}{suffix}", "  ".repeat(depth), node.name);
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn display_path(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
