//! miditype - Use a MIDI controller as a computer keyboard
//!
//! Connects to a MIDI input port and turns note events into simulated key presses.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use miditype::{
    config::Config,
    midi::MidiListener,
    output::{self, KeyboardOutput, NullKeyboard, RdevKeyboard},
    session::Session,
    translator::EventTranslator,
};

#[derive(Parser)]
#[command(name = "miditype")]
#[command(author, version, about = "Use a MIDI controller as a computer keyboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: ~/.config/miditype/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// MIDI input port name (case-insensitive substring match)
    #[arg(short, long)]
    port: Option<String>,

    /// Only react to this MIDI channel (0-15)
    #[arg(long)]
    channel: Option<u8>,

    /// Milliseconds a note must stay held before its key starts repeating
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Milliseconds between repeated key presses
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Log key events instead of emitting them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file
    Init,
    /// Show the configuration file path
    ConfigPath,
    /// List available MIDI input ports
    ListPorts,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let path = Config::create_default_config_file()?;
            println!("Created default config at: {}", path.display());
            return Ok(());
        }
        Some(Commands::ConfigPath) => {
            let path = Config::config_path()?;
            println!("{}", path.display());
            return Ok(());
        }
        Some(Commands::ListPorts) => {
            let ports = MidiListener::ports()?;
            if ports.is_empty() {
                println!("No MIDI input ports found");
            } else {
                println!("Available MIDI input ports:");
                for port in ports {
                    println!("  {}: {}", port.index, port.name);
                }
            }
            return Ok(());
        }
        None => {}
    }

    // Load config
    let mut config = if let Some(path) = cli.config {
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        Config::load_or_default()
    };

    // Apply CLI overrides
    if cli.port.is_some() {
        config.midi.port = cli.port;
    }
    if let Some(channel) = cli.channel {
        config.midi.channel = Some(channel.min(15));
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.repeat.delay_ms = delay_ms;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.repeat.interval_ms = interval_ms;
    }

    let keymap = config.keymap()?;
    if keymap.is_empty() {
        log::warn!("Key map is empty; run `miditype init` and edit the config file");
    } else {
        log::info!("Loaded {} key binding(s)", keymap.len());
    }

    // Pick the keyboard backend
    let output: Arc<dyn KeyboardOutput> = if cli.dry_run {
        log::info!("Dry run: key events will be logged, not emitted");
        Arc::new(NullKeyboard)
    } else if !output::is_available() {
        log::warn!("No display found, key events will be logged, not emitted");
        Arc::new(NullKeyboard)
    } else {
        log::info!("Keyboard output via rdev");
        Arc::new(RdevKeyboard::new())
    };

    // Connect MIDI input
    let listener = match &config.midi.port {
        Some(name) => MidiListener::connect_by_name(name)?,
        None => {
            let ports = MidiListener::ports()?;
            match ports.len() {
                0 => anyhow::bail!("No MIDI input ports found"),
                1 => MidiListener::connect(0)?,
                _ => {
                    println!("Available MIDI input ports:");
                    for port in &ports {
                        println!("  {}: {}", port.index, port.name);
                    }
                    let index = prompt_port_index(ports.len())?;
                    MidiListener::connect(index)?
                }
            }
        }
    };

    println!(
        "🎹 miditype listening on '{}' (Ctrl+C to quit)",
        listener.port_name()
    );

    // Ctrl+C flips the shutdown flag; the session loop notices and cleans up
    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down");
        handler_flag.store(true, Ordering::Relaxed);
    })?;

    let translator = EventTranslator::new(keymap, output, config.repeat_settings());
    let session = Session::new(translator, shutdown).with_channel(config.midi.channel);
    session.run(listener.events())?;

    Ok(())
}

fn prompt_port_index(count: usize) -> Result<usize> {
    print!("Select MIDI input port [0-{}]: ", count - 1);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let index: usize = line
        .trim()
        .parse()
        .context("Port selection must be a number")?;
    if index >= count {
        anyhow::bail!("Port {} does not exist", index);
    }
    Ok(index)
}
