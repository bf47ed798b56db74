use std::{
    collections::HashMap,
    fs::{self, File},
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use annotation_navigator::{
    HeadlessHost, HostEvent, HostRequest, Navigator, NavigatorSettings, RawAnnotation, Rect,
    ViewportSize, host::SimulatedEventSource, panic_handler::initialize_panic_handler,
};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Deserialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Replays a scripted viewer session through the annotation navigator and prints
/// what the navigator asked the viewer to do.
#[derive(Parser, Debug)]
#[command(name = "annotation-navigator", version, about)]
struct Args {
    /// JSON session script
    script: PathBuf,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write debug logs to this file instead of warnings to stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the final list as HTML markup
    #[arg(long)]
    html: bool,
}

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default = "default_viewport")]
    viewport: ViewportSize,
    /// Elements present on screen before the first step
    #[serde(default)]
    elements: HashMap<String, Rect>,
    steps: Vec<Step>,
}

fn default_viewport() -> ViewportSize {
    ViewportSize::new(800.0, 600.0)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Add(RawAnnotation),
    Remove(String),
    Select(String),
    Next,
    Previous,
    Filter(Option<String>),
    Place { id: String, rect: Rect },
    Unplace(String),
    WaitMs(u64),
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => WriteLogger::init(
            LevelFilter::Debug,
            Config::default(),
            File::create(path).with_context(|| format!("Failed to create log file {path:?}"))?,
        )?,
        None => TermLogger::init(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }
    Ok(())
}

fn load_script(path: &Path) -> Result<Script> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read script {path:?}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse script {path:?}"))
}

fn describe(request: &HostRequest) -> String {
    match request {
        HostRequest::ScrollToPage(page) => format!("scroll to page {page}"),
        HostRequest::Focus { id, found: true } => format!("focus {id}"),
        HostRequest::Focus { id, found: false } => format!("focus {id} (element missing)"),
    }
}

fn report(label: &str, host: &HeadlessHost, navigator: &Navigator<HeadlessHost, HeadlessHost>) {
    let requests = host.take_requests();
    let cursor = navigator
        .cursor()
        .map_or_else(|| "-".to_string(), |c| c.to_string());
    println!("{label:<24} cursor={cursor:<3} entries={}", navigator.view().len());
    for request in requests {
        println!("    -> {}", describe(&request));
    }
}

/// Delivers scripted host notifications the same way a live viewer subscription does.
fn deliver(navigator: &mut Navigator<HeadlessHost, HeadlessHost>, event: HostEvent) {
    let mut source = SimulatedEventSource::new(vec![event]);
    navigator.drain_events(&mut source);
}

fn apply(step: Step, navigator: &mut Navigator<HeadlessHost, HeadlessHost>, host: &HeadlessHost) {
    match step {
        Step::Add(raw) => deliver(navigator, HostEvent::added(raw)),
        Step::Remove(id) => deliver(navigator, HostEvent::removed(id)),
        Step::Select(id) => navigator.select_by_id(&id),
        Step::Next => navigator.next(),
        Step::Previous => navigator.previous(),
        Step::Filter(kind) => navigator.set_kind_filter(kind),
        Step::Place { id, rect } => host.place_element(id, rect),
        Step::Unplace(id) => host.remove_element(&id),
        Step::WaitMs(ms) => {
            thread::sleep(Duration::from_millis(ms));
            navigator.run_due_focus(Instant::now());
        }
    }
}

fn main() -> Result<()> {
    initialize_panic_handler();
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings = NavigatorSettings::load_or_default(args.settings.as_deref());
    let script = load_script(&args.script)?;
    info!(
        "Replaying {} steps from {:?}",
        script.steps.len(),
        args.script
    );

    let host = HeadlessHost::new(script.viewport);
    for (id, rect) in script.elements {
        host.place_element(id, rect);
    }
    let mut navigator = Navigator::with_settings(host.clone(), host.clone(), &settings);

    for step in script.steps {
        let label = format!("{step:?}");
        apply(step, &mut navigator, &host);
        report(&label, &host, &navigator);
    }

    while let Some(due) = navigator.next_focus_due() {
        thread::sleep(due.saturating_duration_since(Instant::now()));
        navigator.run_due_focus(Instant::now());
        report("(pending focus)", &host, &navigator);
    }

    println!();
    let view = navigator.view();
    if args.html {
        println!("{}", view.to_html());
    } else {
        for entry in &view.entries {
            let marker = if entry.selected { '>' } else { ' ' };
            println!(
                "{marker} {:<12} {:<10} {:<8} {}",
                entry.action.id, entry.kind_name, entry.page_text, entry.position_text
            );
        }
    }

    info!("Replay finished, focused element: {:?}", host.focused());
    Ok(())
}
