use anyhow::Context;
use colored::Colorize;
use shelf_collection::{CollectionManager, SortOptions};

use crate::cli::*;
use crate::config::ShelfConfig;
use crate::note::Note;

type Notes = CollectionManager<Note>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = ShelfConfig::load(cli.config.as_deref())?;
    let path = cli.store.clone().unwrap_or_else(|| config.path.clone());

    // Only `add` may bring a collection into existence.
    let require_exist = !matches!(cli.command, Command::Add(_));
    let mut notes = Notes::open_with_config(&path, require_exist, &config.store)
        .with_context(|| format!("opening collection {}", path.display()))?;

    match cli.command {
        Command::Add(args) => cmd_add(&mut notes, args, cli.format),
        Command::Get(args) => cmd_get(&notes, args, cli.format),
        Command::List(args) => {
            let options = config.sort_options(args.sort_by.as_deref(), args.order.as_deref());
            cmd_list(&notes, args.tag.as_deref(), &options, cli.format)
        }
        Command::Update(args) => cmd_update(&mut notes, args, cli.format),
        Command::Delete(args) => cmd_delete(&mut notes, args),
        Command::Info => cmd_info(&notes, &path),
    }
}

fn cmd_add(notes: &mut Notes, args: AddArgs, format: OutputFormat) -> anyhow::Result<()> {
    let note = notes.create(Note::new(args.title, args.body, args.tags))?;
    match format {
        OutputFormat::Json => print_json(&note),
        OutputFormat::Text => {
            println!("{} Added note {}", "✓".green().bold(), format!("#{}", note.id).yellow());
            Ok(())
        }
    }
}

fn cmd_get(notes: &Notes, args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let note = notes.get(args.id)?;
    match format {
        OutputFormat::Json => print_json(&note),
        OutputFormat::Text => {
            print_note(&note);
            if !note.body.is_empty() {
                println!();
                println!("{}", note.body);
            }
            Ok(())
        }
    }
}

fn cmd_list(
    notes: &Notes,
    tag: Option<&str>,
    options: &SortOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let listed = list_notes(notes, tag, options);
    match format {
        OutputFormat::Json => print_json(&listed),
        OutputFormat::Text => {
            if listed.is_empty() {
                println!("No notes.");
            }
            for note in &listed {
                print_note(note);
            }
            Ok(())
        }
    }
}

fn cmd_update(notes: &mut Notes, args: UpdateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let current = notes.get(args.id)?;
    let note = notes.update(apply_update(current, args))?;
    match format {
        OutputFormat::Json => print_json(&note),
        OutputFormat::Text => {
            println!("{} Updated note {}", "✓".green().bold(), format!("#{}", note.id).yellow());
            Ok(())
        }
    }
}

fn cmd_delete(notes: &mut Notes, args: DeleteArgs) -> anyhow::Result<()> {
    notes.delete(args.id)?;
    println!("Deleted note {}", format!("#{}", args.id).yellow());
    Ok(())
}

fn cmd_info(notes: &Notes, path: &std::path::Path) -> anyhow::Result<()> {
    println!("Collection: {}", path.display().to_string().bold());
    println!("Layout: {}", notes.backend_kind().to_string().cyan());
    println!("Notes: {}", notes.len());
    Ok(())
}

/// Notes matching `tag` (all when `None`), ordered by `options`.
fn list_notes(notes: &Notes, tag: Option<&str>, options: &SortOptions) -> Vec<Note> {
    match tag {
        Some(tag) => notes.get_sorted_list(Some(&|n: &Note| n.has_tag(tag)), options),
        None => notes.get_all_sorted(options),
    }
}

/// Merge the fields given on the command line into `note`.
fn apply_update(mut note: Note, args: UpdateArgs) -> Note {
    if let Some(title) = args.title {
        note.title = title;
    }
    if let Some(body) = args.body {
        note.body = body;
    }
    if args.clear_tags {
        note.tags.clear();
    } else if !args.tags.is_empty() {
        note.tags = args.tags;
    }
    note
}

fn print_note(note: &Note) {
    let tags = if note.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", note.tags.join(", "))
    };
    println!(
        "{}  {}{}  {}",
        format!("#{}", note.id).yellow().bold(),
        note.title,
        tags.blue(),
        note.modification_date.format("%Y-%m-%d %H:%M").to_string().dimmed(),
    );
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
