use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use storydeck::core::config::{self, DeckConfig};
use storydeck::core::ports::{ChannelPort, SidePort, SidePorts};
use storydeck::core::registry::StoryBook;
use storydeck::stories::{self, ACTIONS_PORT, INBOUND_PORT};
use storydeck::tui;

#[derive(Parser)]
#[command(name = "storydeck", about = "Terminal explorer for UI component stories")]
struct Args {
    /// Story to open first (also STORYDECK_STORY)
    #[arg(short, long)]
    story: Option<String>,

    /// Print registered stories and exit
    #[arg(long)]
    list: bool,

    /// Config file to use instead of ~/.storydeck/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let (deck_config, config_error) = match loaded {
        Ok(c) => (c, None),
        Err(e) => (DeckConfig::default(), Some(e)),
    };
    let resolved = config::resolve(&deck_config, args.story.as_deref());

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = resolved
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Debug);
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Falling back to default config: {}", e);
    }
    log::info!("Storydeck starting with config: {:?}", resolved);

    let actions = Rc::new(ChannelPort::new());
    let inbound = Rc::new(ChannelPort::new());
    let mut ports = SidePorts::new();
    ports.insert(ACTIONS_PORT.to_string(), actions.clone() as Rc<dyn SidePort>);
    ports.insert(INBOUND_PORT.to_string(), inbound.clone() as Rc<dyn SidePort>);

    let mut book = StoryBook::new();
    stories::register(&mut book, &resolved.collection, ports).map_err(io::Error::other)?;

    if args.list {
        for entry in book.entries() {
            println!("{}/{}", entry.collection, entry.name);
        }
        return Ok(());
    }

    tui::run(&resolved, &book, actions, inbound)
}
