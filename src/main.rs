mod args;

use args::{Args, Command};
use screen_finder::{
    Finder, FinderResult, Highlighter, Location, Matcher, Pattern, Region, ScreenSource,
    Settings, SnapshotHighlighter, StaticScreen, TemplateMatcher,
};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;

/// What a command produced, before it is printed
struct Outcome {
    success: bool,
    locations: Vec<Location>,
}

impl Outcome {
    fn found(locations: Vec<Location>) -> Self {
        Self {
            success: true,
            locations,
        }
    }

    fn flag(success: bool) -> Self {
        Self {
            success,
            locations: Vec::new(),
        }
    }
}

/// Machine-readable result printed with `--json`
#[derive(Debug, Serialize)]
struct Report<'a> {
    command: &'a str,
    pattern: String,
    region: Option<Region>,
    success: bool,
    locations: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            args::print_help();
            return ExitCode::from(2);
        }
    };

    let default_filter = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = run(&args);
    if args.json {
        print_report(&args, &result);
    }

    match result {
        Ok(outcome) if outcome.success => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) if e.is_not_found() => {
            if !args.json {
                eprintln!("❌ {e}");
            }
            ExitCode::from(1)
        }
        Err(e) => {
            if !args.json {
                eprintln!("❌ {e}");
            }
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> FinderResult<Outcome> {
    let screen = StaticScreen::from_file(&args.screen)?;
    let (width, height) = screen.dimensions();
    log::debug!("📸 Screen {} ({}x{})", args.screen.display(), width, height);

    let mut pattern = Pattern::new(&args.pattern)?;
    if let Some(similarity) = args.similarity {
        pattern = pattern.similar(similarity);
    }

    let mut settings = Settings::default()
        .with_highlight(args.highlight.is_some())
        // A snapshot file needs no time on screen
        .with_highlight_duration(Duration::ZERO);
    if let Some(color) = args.color {
        settings = settings.with_highlight_color(color);
    }

    let matcher = TemplateMatcher::with_settings(&screen, &settings);
    let finder = Finder::new(matcher, settings);

    match &args.highlight {
        Some(output) => {
            let highlighter = SnapshotHighlighter::new(&screen, output).with_system_font();
            let finder = finder.with_highlighter(highlighter);
            let outcome = run_command(&finder, &pattern, args)?;
            if snapshot_written(args, &outcome) {
                println!("🖍️ Highlight saved to {}", output.display());
            }
            Ok(outcome)
        }
        None => run_command(&finder, &pattern, args),
    }
}

/// Only located patterns are drawn, so only then does a snapshot exist
fn snapshot_written(args: &Args, outcome: &Outcome) -> bool {
    outcome.success && !args.json && args.command != Command::WaitVanish
}

fn run_command<M: Matcher, H: Highlighter>(
    finder: &Finder<M, H>,
    pattern: &Pattern,
    args: &Args,
) -> FinderResult<Outcome> {
    let region = args.region.as_ref();
    let outcome = match args.command {
        Command::Find => Outcome::found(vec![finder.find(pattern, region)?]),
        Command::FindAll => Outcome::found(finder.find_all(pattern, region)?),
        Command::Exists => Outcome::flag(finder.exists(pattern, args.timeout, region)?),
        Command::Verify => Outcome::flag(finder.verify(pattern, args.timeout, region)?),
        Command::WaitVanish => Outcome::flag(finder.wait_vanish(pattern, args.timeout, region)?),
    };

    if !args.json {
        print_outcome(args.command, pattern, &outcome);
    }
    Ok(outcome)
}

fn print_outcome(command: Command, pattern: &Pattern, outcome: &Outcome) {
    match command {
        Command::Find => {
            if let Some(location) = outcome.locations.first() {
                println!("✅ {} found at {}", pattern.name(), location);
            }
        }
        Command::FindAll => {
            println!("✅ {} match(es) of {}", outcome.locations.len(), pattern.name());
            for (i, location) in outcome.locations.iter().enumerate() {
                println!("    {}. {}", i + 1, location);
            }
        }
        Command::Exists if outcome.success => println!("✅ {} exists", pattern.name()),
        Command::Exists => println!("❌ {} does not exist", pattern.name()),
        Command::Verify => println!("✅ {} verified", pattern.name()),
        Command::WaitVanish => println!("✅ {} vanished", pattern.name()),
    }
}

fn report<'a>(args: &'a Args, result: &FinderResult<Outcome>) -> Report<'a> {
    let (success, locations, error) = match result {
        Ok(outcome) => (outcome.success, outcome.locations.clone(), None),
        Err(e) => (false, Vec::new(), Some(e.to_string())),
    };
    Report {
        command: args.command.name(),
        pattern: args.pattern.display().to_string(),
        region: args.region,
        success,
        locations,
        error,
    }
}

fn print_report(args: &Args, result: &FinderResult<Outcome>) {
    match serde_json::to_string_pretty(&report(args, result)) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode report: {}", e),
    }
}
