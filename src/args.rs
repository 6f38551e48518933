use screen_finder::{Color, Region};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HIGHLIGHT_FILE: &str = "highlight.png";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Find,
    FindAll,
    Exists,
    Verify,
    WaitVanish,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "find" => Some(Command::Find),
            "find-all" => Some(Command::FindAll),
            "exists" => Some(Command::Exists),
            "verify" => Some(Command::Verify),
            "wait-vanish" => Some(Command::WaitVanish),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Find => "find",
            Command::FindAll => "find-all",
            Command::Exists => "exists",
            Command::Verify => "verify",
            Command::WaitVanish => "wait-vanish",
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub command: Command,
    pub screen: PathBuf,
    pub pattern: PathBuf,
    pub region: Option<Region>,
    pub similarity: Option<f32>,
    pub timeout: Option<Duration>,
    /// Output file for the highlight snapshot, `None` when highlighting is off
    pub highlight: Option<PathBuf>,
    pub color: Option<Color>,
    /// Print a JSON report on stdout instead of status lines
    pub json: bool,
    pub debug_mode: bool,
}

impl Args {
    /// Parse the process arguments. `Ok(None)` means help or version was printed.
    pub fn parse() -> Result<Option<Self>, String> {
        Self::parse_from(std::env::args().skip(1))
    }

    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Option<Self>, String> {
        let mut command: Option<Command> = None;
        let mut screen: Option<PathBuf> = None;
        let mut pattern: Option<PathBuf> = None;
        let mut region: Option<Region> = None;
        let mut similarity: Option<f32> = None;
        let mut timeout: Option<Duration> = None;
        let mut highlight: Option<PathBuf> = None;
        let mut color: Option<Color> = None;
        let mut json: bool = false;
        let mut debug_mode: bool = false;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return Ok(None);
            } else if arg == "--version" || arg == "-v" {
                println!(
                    "Screen Finder v{} (built {})",
                    env!("APP_VERSION_DISPLAY"),
                    env!("APP_BUILD_YEAR")
                );
                return Ok(None);
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--json" {
                json = true;
            } else if arg == "--highlight" {
                highlight = Some(PathBuf::from(DEFAULT_HIGHLIGHT_FILE));
            } else if let Some(val) = arg.strip_prefix("--highlight=") {
                highlight = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--screen=") {
                screen = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--pattern=") {
                pattern = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--region=") {
                region = Some(
                    Region::parse(val)
                        .ok_or_else(|| format!("Invalid region '{val}', expected x,y,w,h"))?,
                );
            } else if let Some(val) = arg.strip_prefix("--similarity=") {
                match val.parse::<f32>() {
                    Ok(s) if (0.0..=1.0).contains(&s) => similarity = Some(s),
                    _ => return Err(format!("Invalid similarity value: {val}")),
                }
            } else if let Some(val) = arg.strip_prefix("--timeout=") {
                let secs = val
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid timeout value: {val}"))?;
                timeout = Some(
                    Duration::try_from_secs_f64(secs)
                        .map_err(|_| format!("Invalid timeout value: {val}"))?,
                );
            } else if let Some(val) = arg.strip_prefix("--color=") {
                color = Some(
                    Color::from_name(val).ok_or_else(|| format!("Unknown color '{val}'"))?,
                );
            } else if let Some(cmd) = Command::from_name(&arg) {
                if command.is_some() {
                    return Err(format!("Only one command allowed, got extra '{arg}'"));
                }
                command = Some(cmd);
            } else {
                return Err(format!("Unknown argument: {arg}"));
            }
        }

        Ok(Some(Args {
            command: command.ok_or("Missing command")?,
            screen: screen.ok_or("Missing --screen=FILE")?,
            pattern: pattern.ok_or("Missing --pattern=FILE")?,
            region,
            similarity,
            timeout,
            highlight,
            color,
            json,
            debug_mode,
        }))
    }
}

pub fn print_help() {
    println!("🔎 Screen Finder");
    println!();
    println!("USAGE:");
    println!("    screen-finder <COMMAND> --screen=FILE --pattern=FILE [FLAGS]");
    println!();
    println!("COMMANDS:");
    println!("    find                Best match of the pattern (single pass)");
    println!("    find-all            Every match of the pattern (single pass)");
    println!("    exists              Wait for the pattern, report yes/no");
    println!("    verify              Wait for the pattern, fail if it does not appear");
    println!("    wait-vanish         Wait for the pattern to disappear");
    println!();
    println!("FLAGS:");
    println!("    --screen=FILE       Screenshot to search in (PNG/JPEG)");
    println!("    --pattern=FILE      Pattern image to look for");
    println!("    --region=x,y,w,h    Restrict the search to a region");
    println!("    --similarity=F      Minimum similarity 0.0-1.0 (default 0.8)");
    println!("    --timeout=SECS      Wait timeout (default 3)");
    println!("    --highlight[=FILE]  Save matches drawn on the screenshot");
    println!("                        (default {DEFAULT_HIGHLIGHT_FILE})");
    println!("    --color=NAME        Highlight color");
    println!("                        (red, green, blue, yellow, orange, white, black)");
    println!("    --json              Print the outcome as JSON");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXIT CODES:");
    println!("    0 found / vanished, 1 not found / did not vanish, 2 usage or other error");
    println!();
    println!("EXAMPLES:");
    println!("    screen-finder find --screen=screen.png --pattern=button.png");
    println!("    screen-finder find-all --screen=screen.png --pattern=icon.png --highlight");
    println!("    screen-finder exists --screen=s.png --pattern=ok.png --region=0,0,80,60 --json");
}
