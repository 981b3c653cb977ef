// Keyboard client: WASD drive, R/F lift, T/G head, 1-8 routines, space speaks,
// P toggles free play, shift/alt for fast/slow, Esc quits
use std::collections::HashMap;
use std::io::stdout;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vector_remote::config::{TOPIC_CMD_CONFIG, TOPIC_CMD_KEY};
use vector_remote::messages::{ConfigRequest, KeyMessage};
use vector_remote::teleop::keys::KEY_FREEPLAY;

const INPUT_TIMEOUT_MS: u64 = 100; // Synthetic release after this long without a repeat
const POLL_MS: u64 = 20;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(version, about = "Drive the robot from this terminal")]
struct TeleopArgs {
    /// Text the robot speaks when space is released
    #[arg(long = "say")]
    say_text: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = TeleopArgs::parse();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let pub_key = session.declare_publisher(TOPIC_CMD_KEY).await?;
    let pub_config = session.declare_publisher(TOPIC_CMD_CONFIG).await?;

    if let Some(text) = args.say_text {
        let req = ConfigRequest::SetSayText { text };
        pub_config.put(serde_json::to_string(&req)?).await?;
    }

    info!("Controls: WASD=drive, R/F=lift, T/G=head, 1-8=routines, Space=say, P=free play, Esc=quit");

    // Real key releases need the kitty keyboard protocol
    let has_release = supports_keyboard_enhancement().unwrap_or(false);
    if !has_release {
        warn!(
            "Terminal does not report key releases, releasing after {}ms without repeat",
            INPUT_TIMEOUT_MS
        );
    }

    enable_raw_mode()?;
    if has_release {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let result = run_teleop(&pub_key, &pub_config, has_release).await;
    if has_release {
        execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;

    result
}

/// Browser-style keyCode for a terminal key, if the runtime knows it
fn key_code_for(code: KeyCode) -> Option<u32> {
    match code {
        KeyCode::Char(' ') => Some(b' ' as u32),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase() as u32),
        _ => None,
    }
}

async fn run_teleop(
    pub_key: &zenoh::pubsub::Publisher<'_>,
    pub_config: &zenoh::pubsub::Publisher<'_>,
    has_release: bool,
) -> Result<(), BoxError> {
    // Held keys and when they were last seen down
    let mut held: HashMap<u32, (Instant, KeyModifiers)> = HashMap::new();
    let mut freeplay = false;

    loop {
        if event::poll(Duration::from_millis(POLL_MS))? {
            if let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event::read()?
            {
                let quit = code == KeyCode::Esc
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL));
                if quit && kind != KeyEventKind::Release {
                    break;
                }

                if let Some(key_code) = key_code_for(code) {
                    let is_down = kind != KeyEventKind::Release;
                    if is_down {
                        held.insert(key_code, (Instant::now(), modifiers));
                    } else {
                        held.remove(&key_code);
                    }
                    send_key(pub_key, key_code, modifiers, is_down).await?;

                    if !is_down && key_code == KEY_FREEPLAY {
                        freeplay = toggle_freeplay(pub_config, freeplay).await?;
                    }
                }
            }
        }

        if !has_release {
            let timeout = Duration::from_millis(INPUT_TIMEOUT_MS);
            let expired: Vec<(u32, KeyModifiers)> = held
                .iter()
                .filter(|(_, (seen, _))| seen.elapsed() > timeout)
                .map(|(&key_code, &(_, modifiers))| (key_code, modifiers))
                .collect();
            for (key_code, modifiers) in expired {
                held.remove(&key_code);
                send_key(pub_key, key_code, modifiers, false).await?;
                if key_code == KEY_FREEPLAY {
                    freeplay = toggle_freeplay(pub_config, freeplay).await?;
                }
            }
        }
    }

    // Let go of everything still held so the robot stops
    for (key_code, (_, modifiers)) in held.drain() {
        send_key(pub_key, key_code, modifiers, false).await?;
    }
    Ok(())
}

async fn send_key(
    publisher: &zenoh::pubsub::Publisher<'_>,
    key_code: u32,
    modifiers: KeyModifiers,
    is_down: bool,
) -> Result<(), BoxError> {
    let msg = KeyMessage {
        key_code,
        has_shift: modifiers.contains(KeyModifiers::SHIFT),
        has_ctrl: modifiers.contains(KeyModifiers::CONTROL),
        has_alt: modifiers.contains(KeyModifiers::ALT),
        is_down,
    };
    publisher.put(serde_json::to_string(&msg)?).await?;
    Ok(())
}

async fn toggle_freeplay(
    publisher: &zenoh::pubsub::Publisher<'_>,
    was_enabled: bool,
) -> Result<bool, BoxError> {
    let enabled = !was_enabled;
    info!("Free play: {}", if enabled { "ON" } else { "OFF" });
    let req = ConfigRequest::SetFreeplay { enabled };
    publisher.put(serde_json::to_string(&req)?).await?;
    Ok(enabled)
}
