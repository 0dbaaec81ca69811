use anyhow::{Context, Result, bail};
use codepanel_config::SiteConfig;
use codepanel_engine::PlainHighlighter;
use crossterm::{
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env, fs,
    io::stdout,
    path::{Path, PathBuf},
    process,
};

mod layout;
mod markdown;
mod preview;

const USAGE: &str = "Usage:
  codepanel render <file.md> [--config <path>] [--output <path>]
  codepanel preview <file.md> [--config <path>]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Render {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    Preview {
        input: PathBuf,
    },
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    command: Command,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let (command, rest) = args.split_first()?;
    let mut input = None;
    let mut config = None;
    let mut output = None;

    let mut rest = rest.iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(rest.next()?)),
            "--output" | "-o" => output = Some(PathBuf::from(rest.next()?)),
            flag if flag.starts_with('-') => return None,
            path if input.is_none() => input = Some(PathBuf::from(path)),
            _ => return None,
        }
    }

    let input = input?;
    let command = match command.as_str() {
        "render" => Command::Render { input, output },
        "preview" if output.is_none() => Command::Preview { input },
        _ => return None,
    };
    Some(Args { command, config })
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load_from_path(path)?
            .with_context(|| format!("config file '{}' not found", path.display())),
        None => {
            let config = SiteConfig::load()?;
            if config.is_none() {
                info!(
                    "no config at {}, using defaults",
                    SiteConfig::config_path().display()
                );
            }
            Ok(config.unwrap_or_default())
        }
    }
}

fn page_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string())
}

fn read_markdown(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("failed to read '{}'", input.display()))
}

fn render(input: &Path, output: Option<&Path>, config: &SiteConfig) -> Result<()> {
    let source = read_markdown(input)?;
    let page = markdown::render_page(&page_title(input), &source, config, &PlainHighlighter);
    match output {
        Some(output) => {
            fs::write(output, page)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
            info!("wrote {}", output.display());
        }
        None => print!("{page}"),
    }
    Ok(())
}

fn run_preview(input: &Path, config: &SiteConfig) -> Result<()> {
    let source = read_markdown(input)?;
    let (width, _) = terminal::size()?;
    let mut app = preview::App::new(&page_title(input), &source, config, width)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = preview::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn init_logging(to_file: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    if to_file {
        // The terminal belongs to the preview while it runs.
        let path = env::temp_dir().join("codepanel-preview.log");
        let file = fs::File::create(&path)
            .with_context(|| format!("failed to create log file '{}'", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(args) = parse_args(&args) else {
        eprintln!("{USAGE}");
        process::exit(1);
    };

    init_logging(matches!(args.command, Command::Preview { .. }))?;
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Render { input, output } => render(input, output.as_deref(), &config),
        Command::Preview { input } => {
            if !input.is_file() {
                bail!("'{}' is not a file", input.display());
            }
            run_preview(input, &config)
        }
    }
}
