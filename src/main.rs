#[cfg(feature = "audio")]
mod audio;
mod logger;
mod notification;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use data::audio::Sound;
use data::history::{Buffer, FilterChain};
use data::message::highlight::{self, Highlight};
use data::message::{Flags, Received};
use data::notification::Notifications;
use data::search::Search;
use data::{Config, Message, config};
use itertools::Itertools;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "hark", version, about)]
struct Args {
    /// Configuration file, instead of the one in the config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log everything to stderr
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search a message history, one JSON message per line
    Search {
        history: PathBuf,
        /// e.g. `from:ann in:#rust has:link is:sub regex:"kappa \d+" hello`
        query: Vec<String>,
        /// Name of the searched history, shown in the title
        #[arg(long, default_value = "")]
        channel: String,
        /// Login name of the local user
        #[arg(long)]
        nick: Option<String>,
    },
    /// Resolve and dispatch the highlights of a message history
    Highlights {
        history: PathBuf,
        /// Login name of the local user
        #[arg(long)]
        nick: Option<String>,
        /// Behave as if the window had focus
        #[arg(long)]
        focused: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;

    logger::setup(args.debug, config.logs.file_level.into())?;
    log::info!("hark ({VERSION}) has started");

    match args.command {
        Command::Search {
            history,
            query,
            channel,
            nick,
        } => search(
            &config,
            &history,
            &query.join(" "),
            channel,
            nick.as_deref(),
        ),
        Command::Highlights {
            history,
            nick,
            focused,
        } => highlights(&config, &history, nick.as_deref(), focused),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()));
    }

    Config::create_template_config();

    match Config::load() {
        Ok(config) => Ok(config),
        Err(config::Error::Read(_)) => Ok(Config::default()),
        Err(error) => Err(error).context("failed to load config"),
    }
}

fn search(
    config: &Config,
    history: &Path,
    query: &str,
    channel: String,
    nick: Option<&str>,
) -> anyhow::Result<()> {
    let context = highlight::Context::new(&config.highlights, nick);
    let mut buffer = Buffer::new(config.history.limit);

    buffer.extend(read_history(history)?.into_iter().map(|mut message| {
        highlight::resolve_and_apply(&mut message, &context);
        message
    }));

    let filter_set = FilterChain::from_config(config);
    let mut search = Search::new(channel, &buffer);

    if !filter_set.is_empty() {
        search.set_filter_set(Some(Arc::new(filter_set)));
    }

    let results = search.search(query);

    println!("{}", search.title());

    for message in &results.messages {
        println!("{}", format_message(message));
    }

    log::info!(
        "{} of {} messages matched {query:?}",
        results.len(),
        buffer.len()
    );

    Ok(())
}

fn highlights(
    config: &Config,
    history: &Path,
    nick: Option<&str>,
    focused: bool,
) -> anyhow::Result<()> {
    notification::prepare();

    for url in config
        .highlights
        .sound_urls()
        .filter(|url| url.scheme() != "file")
    {
        log::warn!("sound {url} is not a local file and won't be played");
    }

    let context = highlight::Context::new(&config.highlights, nick);
    let mut notifications = Notifications::new();
    let mut sink = notification::Sink::new(config);

    for mut message in read_history(history)? {
        let highlight = highlight::resolve_and_apply(&mut message, &context);

        if highlight == Highlight::default() {
            continue;
        }

        println!("{} {}", format_message(&message), describe(&highlight));

        notifications.notify(config, &message, &highlight, focused, &mut sink);
    }

    sink.finish();

    Ok(())
}

fn read_history(path: &Path) -> anyhow::Result<Vec<Message>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut messages = vec![];

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Received>(&line) {
            Ok(received) => messages.push(received.into_message()),
            Err(error) => {
                log::warn!(
                    "skipping line {} of {}: {error}",
                    index + 1,
                    path.display()
                );
            }
        }
    }

    log::debug!("read {} messages from {}", messages.len(), path.display());

    Ok(messages)
}

fn format_message(message: &Message) -> String {
    let timestamp = message
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S");
    let marker = if message.flags.contains(Flags::HIGHLIGHTED) {
        "*"
    } else {
        " "
    };

    format!(
        "{timestamp} {marker} {} <{}> {}",
        message.channel, message.login_name, message.text
    )
}

fn describe(highlight: &Highlight) -> String {
    let mut parts = vec![];

    if highlight.highlighted {
        parts.push("highlighted".to_string());
    }
    if highlight.alert {
        parts.push("alert".to_string());
    }
    if let Some(sound) = &highlight.sound {
        parts.push(match sound {
            Sound::Custom(url) => format!("sound {url}"),
            Sound::Fallback => "sound".to_string(),
        });
    }
    if let Some(color) = highlight.color {
        parts.push(format!("color {color}"));
    }
    if highlight.show_in_mentions {
        parts.push("mention".to_string());
    }

    format!("[{}]", parts.iter().join(", "))
}
