//! CLI entry point for `mailshell`: a line-oriented REPL over a message
//! directory tree.

use std::io::{BufRead, Write};

use clap::Parser;

use mailshell::config;
use mailshell::error::Result;
use mailshell::model::address::Address;
use mailshell::model::header::Header;
use mailshell::model::message::Message;
use mailshell::mua::Mua;
use mailshell::render;

#[derive(Parser)]
#[command(name = "mailshell", version, about = "Terminal mail user agent")]
struct Cli {
    /// Base directory holding one sub-directory per mailbox
    #[arg(value_name = "DIR")]
    base_dir: std::path::PathBuf,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level);

    let mut mua = Mua::open(&cli.base_dir)?;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", mua.prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else { continue };

        match command {
            "LSM" => print!("{}", render::mailbox_table(&mua)),
            "MBOX" => {
                if run_indexed(words.next(), |n| mua.select(n)).is_err() {
                    println!("Unknown command");
                }
            }
            "LSE" => match mua.current().and_then(|m| render::message_table(&m, &config)) {
                Ok(table) => print!("{table}"),
                Err(_) => println!("Unknown command"),
            },
            "READ" => {
                let card = run_indexed(words.next(), |n| {
                    let message = mua.read_message(n)?;
                    render::message_card(&message, &config)
                });
                match card {
                    Ok(card) => print!("{card}"),
                    Err(_) => println!("Unknown command"),
                }
            }
            "COMPOSE" => {
                if handle_compose(&mut lines, &mut mua).is_err() {
                    println!("Unknown command");
                }
            }
            "DELETE" => {
                if run_indexed(words.next(), |n| mua.delete_message(n)).is_err() {
                    println!("Unknown command");
                }
            }
            c if c.starts_with('#') => continue,
            "EXIT" => return Ok(()),
            _ => println!("Unknown command"),
        }
    }

    Ok(())
}

/// Parse a 1-based index argument and run the operation on it.
fn run_indexed<T>(
    arg: Option<&str>,
    op: impl FnOnce(usize) -> Result<T>,
) -> std::result::Result<T, ()> {
    let index: usize = arg.and_then(|a| a.parse().ok()).ok_or(())?;
    op(index).map_err(|_| ())
}

/// The COMPOSE flow: header lines, then a text body and an html body each
/// terminated by a lone `.`; both present makes a multipart message.
fn handle_compose(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    mua: &mut Mua,
) -> anyhow::Result<()> {
    let sender = Address::decode(&prompt_line(lines, "From: ")?)?;
    let recipients = match Header::decode("to", &prompt_line(lines, "To: ")?)? {
        Some(Header::Recipients(addresses)) => addresses,
        _ => anyhow::bail!("unreadable recipient list"),
    };
    let subject = match Header::decode("subject", &prompt_line(lines, "Subject: ")?)? {
        Some(Header::Subject(text)) => text,
        _ => anyhow::bail!("unreadable subject"),
    };
    let date = match Header::decode("date", &prompt_line(lines, "Date: ")?)? {
        Some(Header::Date(instant)) => instant,
        _ => anyhow::bail!("unreadable date"),
    };

    let text_body = read_body(lines, "Text body (. to end): ")?;
    let html_body = read_body(lines, "Html body (. to end): ")?;

    let message = match (text_body.is_empty(), html_body.is_empty()) {
        (false, false) => Message::multipart(sender, recipients, subject, date, text_body, html_body)?,
        (false, true) => Message::singlepart(sender, recipients, subject, date, text_body, false)?,
        (true, false) => Message::singlepart(sender, recipients, subject, date, html_body, true)?,
        (true, true) => anyhow::bail!("a message needs at least one body"),
    };

    mua.save_message(message)?;
    Ok(())
}

/// Print a prompt and read one line.
fn prompt_line(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    prompt: &str,
) -> std::io::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    lines.next().unwrap_or_else(|| Ok(String::new()))
}

/// Accumulate body lines until a lone `.`; each line contributes
/// `line + "\n"`.
fn read_body(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    prompt: &str,
) -> std::io::Result<String> {
    println!("{prompt}");
    let mut body = String::new();
    loop {
        let Some(line) = lines.next() else { break };
        let line = line?;
        if line == "." {
            break;
        }
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}

/// Set up tracing with stderr output.
fn setup_logging(level: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
