use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, info_span};

use pkt_cli::config::{Settings, settings_path, settings_to_toml, state_dir};
use pkt_cli::report::{format_mapping_report, format_validation_report};
use pkt_cli::workflow::{
    RenderJob, auto_map_fields, inspect_table, load_mapping, parse_fields_file,
    parse_message_file, render_messages, save_mapping,
};
use pkt_ingest::{CsvTable, read_csv_file, recipients_from_table};
use pkt_map::ResolveContext;
use pkt_model::{CsvReference, FieldMapping};
use pkt_output::write_zip_to_path;
use pkt_persistence::{JsonFileStore, StateStore};
use pkt_template::TokenGrammar;

use crate::cli::{GrammarArg, InspectArgs, MapArgs, RenderArgs, ZipArgs};
use crate::summary::{print_inspect, print_mapping_table};

/// Settings and locations shared by every command.
pub struct CommandContext {
    pub settings: Settings,
    pub config_path: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
}

impl CommandContext {
    fn state_store(&self) -> Result<JsonFileStore> {
        let dir = self
            .state_dir
            .clone()
            .or_else(state_dir)
            .context("could not determine the state folder; pass --state-dir")?;
        Ok(JsonFileStore::in_dir(&dir))
    }
}

fn read_table(path: &Path) -> Result<CsvTable> {
    read_csv_file(path).with_context(|| format!("load {}", path.display()))
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let table = read_table(&args.csv)?;
    let summary = inspect_table(&table);
    print_inspect(&summary);
    Ok(())
}

pub fn run_map(ctx: &CommandContext, args: &MapArgs) -> Result<()> {
    let span = info_span!("map", fields = %args.fields.display());
    let _guard = span.enter();

    let table = read_table(&args.csv)?;
    let text = fs::read_to_string(&args.fields)
        .with_context(|| format!("read field list {}", args.fields.display()))?;
    let fields = parse_fields_file(&text);
    let mut mapping = match &args.mapping {
        Some(path) => load_mapping(path)?,
        None => FieldMapping::new(),
    };
    debug!(
        fields = fields.len(),
        headers = table.headers.len(),
        existing = mapping.len(),
        "auto-mapping"
    );

    let report = auto_map_fields(
        &fields,
        &table.headers,
        &mut mapping,
        ctx.settings.map.auto_map_config(),
    );
    print_mapping_table(&fields, &mapping);
    print!("{}", format_mapping_report(&report, &mapping));

    if let Some(path) = &args.mapping {
        save_mapping(path, &mapping)?;
        info!("Saved mapping to {}", path.display());
    }
    if args.save {
        let mut store = ctx.state_store()?;
        let mut state = store.load()?;
        state.mapping = mapping;
        store.save(&state)?;
    }
    Ok(())
}

pub fn run_render(ctx: &CommandContext, args: &RenderArgs) -> Result<()> {
    let table = read_table(&args.csv)?;
    let recipients = recipients_from_table(&table);
    let text = fs::read_to_string(&args.template)
        .with_context(|| format!("read template {}", args.template.display()))?;
    let template = parse_message_file(&text);

    let title = args.title.clone().unwrap_or_else(|| {
        args.template
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let grammar = match args.grammar {
        Some(GrammarArg::SnakeCase) => TokenGrammar::SnakeCase,
        Some(GrammarArg::Extended) => TokenGrammar::Extended,
        None => ctx.settings.render.grammar,
    };
    let date_format = args
        .date_format
        .clone()
        .unwrap_or_else(|| ctx.settings.render.date_format.clone());
    let resolve = ResolveContext::today().with_date_format(date_format);

    let job = RenderJob {
        template: &template,
        packet_title: &title,
        sender_name: &ctx.settings.sender.name,
        sender_email: &ctx.settings.sender.email,
        grammar,
        resolve: &resolve,
    };
    let rendered = render_messages(&job, &recipients);
    if rendered.is_empty() {
        println!("No recipients in {}", args.csv.display());
    }
    for (name, message) in rendered {
        println!("=== {name} ===");
        println!("Subject: {}", message.subject);
        println!();
        println!("{}", message.body);
        if let Some(findings) = format_validation_report(&message.report) {
            for line in findings.lines() {
                println!("! {line}");
            }
        }
        println!();
    }
    Ok(())
}

pub fn run_zip(args: &ZipArgs) -> Result<()> {
    let count = write_zip_to_path(&args.dir, &args.out)
        .with_context(|| format!("archive {}", args.dir.display()))?;
    println!("Wrote {} ({count} files)", args.out.display());
    Ok(())
}

pub fn run_import(ctx: &CommandContext, args: &InspectArgs) -> Result<()> {
    let table = read_table(&args.csv)?;
    let recipients = recipients_from_table(&table);
    let filename = args
        .csv
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stored_path = fs::canonicalize(&args.csv).unwrap_or_else(|_| args.csv.clone());
    let snapshot = table.snapshot(CsvReference {
        filename,
        stored_path,
        imported_at: Utc::now(),
    });

    let mut store = ctx.state_store()?;
    let mut state = store.load()?;
    let count = recipients.len();
    state.replace_import(snapshot, recipients);
    store.save(&state)?;
    println!(
        "Imported {count} recipients from {} into {}",
        args.csv.display(),
        store.path().display()
    );
    Ok(())
}

pub fn run_reset(ctx: &CommandContext) -> Result<()> {
    let mut store = ctx.state_store()?;
    let mut state = store.load()?;
    state.reset();
    store.save(&state)?;
    println!("Cleared saved packet in {}", store.path().display());
    Ok(())
}

pub fn run_config(ctx: &CommandContext) -> Result<()> {
    let path = ctx.config_path.clone().or_else(settings_path);
    match path {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (no settings path on this platform)"),
    }
    print!("{}", settings_to_toml(&ctx.settings)?);
    Ok(())
}
