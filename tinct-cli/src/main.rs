//! Tinct CLI
//!
//! Runs the inline styling engine over HTML from a file or the command line:
//! sanitize it, apply a style to a character range, or dump its DOM tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use tinct_dom::{DomTree, NodeId};
use tinct_editor::{
    Change, EditorConfig, FormatProperty, Gradient, InlineEditor, StyleIntent, sanitize_styled_html_with_report,
    text_range,
};
use tinct_html::{format_tree, parse_fragment};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Tinct - inline rich-text styling from the command line
#[derive(Parser, Debug)]
#[command(name = "tinct")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Sanitize a saved document
    tinct sanitize ./note.html

    # Sanitize inline HTML and show what was removed
    tinct sanitize --report --html '<b onclick="x">hi</b>'

    # Make characters 6..11 red and bold
    tinct style --html 'Hello world' --start 6 --end 11 --color red --bold

    # Apply a gradient
    tinct style --html 'Hello' --start 0 --end 5 \
        --gradient '{"type":"linear","angle":90,"stops":[{"color":"red","position":0},{"color":"blue","position":100}]}'

    # Toggle italic the way a toolbar button would
    tinct style ./note.html --start 0 --end 4 --toggle italic

    # Print the DOM tree
    tinct tree --html '<span style="color: red">x</span>'
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Editor config file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sanitize HTML and print the result
    Sanitize {
        #[command(flatten)]
        input: Input,

        /// Also print what the sanitizer removed, as JSON
        #[arg(long)]
        report: bool,
    },

    /// Apply a style to a character range and print the resulting HTML
    Style(StyleArgs),

    /// Print the DOM tree of the (sanitized) HTML
    Tree {
        #[command(flatten)]
        input: Input,

        /// Parse the HTML as given, without sanitizing it first
        #[arg(long)]
        raw: bool,
    },
}

/// Where the HTML comes from.
#[derive(Args, Debug)]
struct Input {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Use this HTML string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
struct StyleArgs {
    #[command(flatten)]
    input: Input,

    /// First character of the range (counted in characters of the text)
    #[arg(long)]
    start: usize,

    /// One past the last character of the range
    #[arg(long)]
    end: usize,

    /// A complete style intent as JSON; missing fields are kept, null unsets
    #[arg(long, value_name = "JSON")]
    intent: Option<String>,

    /// Solid text color
    #[arg(long, value_name = "CSS_COLOR")]
    color: Option<String>,

    /// Gradient fill as JSON
    #[arg(long, value_name = "JSON")]
    gradient: Option<String>,

    /// Remove any color or gradient fill
    #[arg(long, conflicts_with_all = ["color", "gradient"])]
    no_fill: bool,

    /// Set bold
    #[arg(long)]
    bold: bool,

    /// Remove bold
    #[arg(long, conflicts_with = "bold")]
    no_bold: bool,

    /// Set italic
    #[arg(long)]
    italic: bool,

    /// Remove italic
    #[arg(long, conflicts_with = "italic")]
    no_italic: bool,

    /// Set underline
    #[arg(long)]
    underline: bool,

    /// Remove underline
    #[arg(long, conflicts_with = "underline")]
    no_underline: bool,

    /// Toggle a format instead of applying an intent
    #[arg(long, value_enum, conflicts_with_all = ["intent", "color", "gradient", "no_fill"])]
    toggle: Option<FormatArg>,

    /// Skip merging identical neighbouring spans afterwards
    #[arg(long)]
    no_normalize: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Bold,
    Italic,
    Underline,
}

impl From<FormatArg> for FormatProperty {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Bold => Self::FontWeight,
            FormatArg::Italic => Self::FontStyle,
            FormatArg::Underline => Self::TextDecoration,
        }
    }
}

impl StyleArgs {
    /// Build the intent from `--intent` and the individual flags; flags win.
    fn intent(&self) -> Result<StyleIntent> {
        let mut intent: StyleIntent = match &self.intent {
            Some(json) => serde_json::from_str(json).context("invalid --intent JSON")?,
            None => StyleIntent::default(),
        };
        if let Some(color) = &self.color {
            intent.color = Change::Set(color.clone());
        }
        if let Some(json) = &self.gradient {
            let gradient = Gradient::from_json(json).context("invalid --gradient JSON")?;
            intent.gradient = Change::Set(gradient);
        }
        if self.no_fill {
            intent.color = Change::Unset;
            intent.gradient = Change::Unset;
        }
        let formats = [
            (FormatProperty::FontWeight, self.bold, self.no_bold),
            (FormatProperty::FontStyle, self.italic, self.no_italic),
            (FormatProperty::TextDecoration, self.underline, self.no_underline),
        ];
        for (property, on, off) in formats {
            if on {
                *intent.format_mut(property) = Change::Set(property.active_value().to_string());
            } else if off {
                *intent.format_mut(property) = Change::Unset;
            }
        }
        Ok(intent)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Sanitize { input, report } => run_sanitize(input, *report),
        Command::Style(args) => run_style(args, config),
        Command::Tree { input, raw } => run_tree(input, *raw),
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the flags.
fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let config = EditorConfig::from_json_file(path).context("failed to load editor config")?;
    debug!(?config, "loaded config");
    Ok(config)
}

/// Load HTML from CLI arguments
fn read_input(input: &Input) -> Result<String> {
    if let Some(html) = &input.html {
        Ok(html.clone())
    } else if let Some(path) = &input.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        bail!("expected a FILE argument or --html")
    }
}

fn run_sanitize(input: &Input, report: bool) -> Result<()> {
    let html = read_input(input)?;
    let (clean, summary) = sanitize_styled_html_with_report(&html);
    if !report {
        println!("{clean}");
        return Ok(());
    }

    println!("{}", "=== Sanitized HTML ===".bold());
    println!("{clean}");
    println!("\n{}", "=== Report ===".bold());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if summary.is_clean() {
        println!("{}", "input was already clean".green());
    } else {
        println!("{}", "input was modified".yellow());
    }
    Ok(())
}

fn run_style(args: &StyleArgs, config: EditorConfig) -> Result<()> {
    let html = read_input(&args.input)?;
    let mut tree = DomTree::new();
    let host = tree.create_element("div");
    tree.append_child(NodeId::ROOT, host);
    let mut editor = InlineEditor::new(host, config);
    editor.load_html(&mut tree, &html);

    let Some(range) = text_range(&tree, host, args.start, args.end) else {
        let len = tree.text_content(host).chars().count();
        bail!("range {}..{} does not fit the text ({len} characters)", args.start, args.end);
    };
    tree.set_selection(range);
    editor.on_selection_change(&tree);

    let span = if let Some(format) = args.toggle {
        editor.toggle_format(&mut tree, format.into())
    } else {
        let intent = args.intent()?;
        if intent.is_empty() {
            bail!("nothing to apply: pass --color, --gradient, a format flag or --intent");
        }
        debug!(intent = %serde_json::to_string(&intent)?, "applying");
        editor.apply_style(&mut tree, &intent)
    };
    if span.is_none() {
        bail!("could not style characters {}..{}", args.start, args.end);
    }

    if !args.no_normalize {
        let merges = editor.normalize(&mut tree);
        info!(merges, "normalized");
    }
    println!("{}", editor.save_html(&tree));
    Ok(())
}

fn run_tree(input: &Input, raw: bool) -> Result<()> {
    let html = read_input(input)?;
    let mut tree = DomTree::new();
    let host = tree.create_element("div");
    tree.append_child(NodeId::ROOT, host);
    if raw {
        parse_fragment(&mut tree, host, &html);
    } else {
        let mut editor = InlineEditor::new(host, EditorConfig::default());
        editor.load_html(&mut tree, &html);
    }

    println!("{}", "=== DOM Tree ===".bold());
    print!("{}", format_tree(&tree, host));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_args(args: &[&str]) -> StyleArgs {
        let argv = ["tinct", "style", "--html", "x", "--start", "0", "--end", "1"]
            .into_iter()
            .chain(args.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Style(args) => args,
            other => panic!("expected style command, got {other:?}"),
        }
    }

    #[test]
    fn test_flags_build_intent() {
        let intent = style_args(&["--color", "red", "--bold", "--no-italic"]).intent().unwrap();
        assert_eq!(intent.color, Change::Set("red".to_string()));
        assert_eq!(intent.font_weight, Change::Set("700".to_string()));
        assert_eq!(intent.font_style, Change::Unset);
        assert_eq!(intent.text_decoration, Change::Keep);
        assert_eq!(intent.gradient, Change::Keep);
    }

    #[test]
    fn test_flags_override_intent_json() {
        let args = style_args(&["--intent", r#"{"color": "blue", "fontWeight": null}"#, "--bold"]);
        let intent = args.intent().unwrap();
        assert_eq!(intent.color, Change::Set("blue".to_string()));
        assert_eq!(intent.font_weight, Change::Set("700".to_string()));
    }

    #[test]
    fn test_no_fill_unsets_both() {
        let intent = style_args(&["--no-fill"]).intent().unwrap();
        assert!(intent.color.is_unset());
        assert!(intent.gradient.is_unset());
    }

    #[test]
    fn test_bad_gradient_is_an_error() {
        assert!(style_args(&["--gradient", r#"{"stops":[]}"#]).intent().is_err());
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        let argv = ["tinct", "style", "--html", "x", "--start", "0", "--end", "1", "--bold", "--no-bold"];
        assert!(Cli::try_parse_from(argv).is_err());
        let argv = ["tinct", "style", "--html", "x", "--start", "0", "--end", "1", "--toggle", "bold", "--color", "red"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tinct", "tree", "--html", "x", "-vv", "--config", "c.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
    }
}
