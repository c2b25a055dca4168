//! TetrECS terminal client (default binary).
//!
//! Owns a tokio runtime for the session actor and the server connection, and
//! runs the keyboard/render loop synchronously on the main thread.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use tetrecs::adapter::{ClientConfig, Communicator};
use tetrecs::core::{GameState, MultiplayerGame, RandomPieces, ScoreTable};
use tetrecs::engine::{LogMedia, ScoreStore, Session, SessionHandle, SessionSnapshot};
use tetrecs::input::{handle_key_event, should_quit, AimCursor, ChatOutcome, ChatPrompt};
use tetrecs::term::{Canvas, GameView, Overlay, TerminalRenderer, Viewport};
use tetrecs::types::{
    GameAction, GameCommand, InboundMessage, OutboundMessage, ScoreRecord, GRID_COLS, GRID_ROWS,
};

const FRAME_MS: u64 = 33;
const ONLINE_REPLY_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Mode {
    Single,
    Multi,
}

#[derive(Debug, Parser)]
#[command(name = "tetrecs", about = "5x5 block-placement puzzle with networked multiplayer")]
struct Cli {
    #[arg(long, value_enum, default_value = "single")]
    mode: Mode,

    #[arg(
        long,
        env = "TETRECS_SERVER_URL",
        default_value = "ws://127.0.0.1:9700",
        help = "Game server WebSocket URL"
    )]
    server: String,

    #[arg(long, default_value = "lobby", help = "Channel to create or join")]
    channel: String,

    #[arg(long, help = "Create the channel instead of joining it")]
    create: bool,

    #[arg(long, help = "Nickname on the server")]
    nick: Option<String>,

    #[arg(long, help = "Ask the server to start the match once in the channel")]
    start: bool,

    #[arg(long, default_value = "Player", help = "Name recorded with high scores")]
    name: String,

    #[arg(long, env = "TETRECS_SCORES_PATH", default_value = "scores.txt")]
    scores_file: PathBuf,

    #[arg(long, env = "TETRECS_LOG_PATH", default_value = "tetrecs.log")]
    log_file: PathBuf,

    #[arg(long, help = "Seed for single-player pieces (default: clock)")]
    seed: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    info!(mode = ?cli.mode, "starting tetrecs");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let _enter = rt.enter();

    let store = ScoreStore::new(&cli.scores_file);
    let table = store.load();

    let final_state = match cli.mode {
        Mode::Single => run_single(&cli, &table)?,
        Mode::Multi => run_multi(&rt, &cli, &table)?,
    };

    let score = final_state.game.pending_score;
    println!("Final score: {score} (level {})", final_state.game.level);
    if table.beats(score) {
        match store.record(&cli.name, score) {
            Ok(Some(rank)) => println!("New high score! Rank {}", rank + 1),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "could not save high score"),
        }
    }
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}

fn run_single(cli: &Cli, table: &ScoreTable) -> Result<SessionSnapshot> {
    let pieces = match cli.seed {
        Some(seed) => RandomPieces::new(seed),
        None => RandomPieces::from_time(),
    };
    let session = Session::spawn(GameState::new(GRID_COLS, GRID_ROWS, pieces), LogMedia);
    with_terminal(|term| play(term, session, None, table.high_score()))
}

fn run_multi(rt: &Runtime, cli: &Cli, table: &ScoreTable) -> Result<SessionSnapshot> {
    let config = ClientConfig::from_env().with_url(cli.server.clone());
    let mut comm = rt
        .block_on(Communicator::connect(config))
        .with_context(|| format!("connecting to {}", cli.server))?;
    println!("Connected to {}, waiting for the match to start...", cli.server);
    rt.block_on(handshake(&mut comm, cli))?;

    let session = Session::spawn_connected(MultiplayerGame::new(), LogMedia, comm.sender());
    let result = with_terminal(|term| play(term, session, Some(&mut comm), table.high_score()));

    if let Ok(snapshot) = &result {
        let record = ScoreRecord::new(cli.name.clone(), snapshot.game.pending_score);
        if let Err(err) = rt.block_on(submit_online_score(&mut comm, record)) {
            warn!(error = %format!("{err:#}"), "online high scores unavailable");
        }
    }
    comm.send(OutboundMessage::Part);
    result
}

/// NICK, CREATE/JOIN, optional START, then wait for the server's START.
async fn handshake(comm: &mut Communicator, cli: &Cli) -> Result<()> {
    if let Some(nick) = &cli.nick {
        comm.send(OutboundMessage::Nick(nick.clone()));
    }
    if cli.create {
        comm.send(OutboundMessage::Create(cli.channel.clone()));
    } else {
        comm.send(OutboundMessage::Join(cli.channel.clone()));
    }
    if cli.start {
        comm.send(OutboundMessage::Start);
    }

    loop {
        match comm.recv().await {
            Some(InboundMessage::Start) => return Ok(()),
            Some(InboundMessage::Error(text)) => bail!("server refused: {text}"),
            Some(InboundMessage::Joined(channel)) => info!(%channel, "joined channel"),
            Some(InboundMessage::Host) => info!("hosting channel"),
            Some(other) => debug!(verb = other.verb(), "ignored before match start"),
            None => bail!("connection closed before the match started"),
        }
    }
}

/// Fetch the online table and submit `record` if it makes the cut.
async fn submit_online_score(comm: &mut Communicator, record: ScoreRecord) -> Result<()> {
    comm.send(OutboundMessage::HiScoresRequest);
    let online = loop {
        match tokio::time::timeout(ONLINE_REPLY_TIMEOUT, comm.recv()).await? {
            Some(InboundMessage::HiScores(records)) => break ScoreTable::from_records(records),
            Some(_) => continue,
            None => bail!("connection closed"),
        }
    };
    if !online.beats(record.score) {
        return Ok(());
    }
    info!(%record, "submitting online high score");
    comm.send(OutboundMessage::HiScore(record));
    loop {
        match tokio::time::timeout(ONLINE_REPLY_TIMEOUT, comm.recv()).await? {
            Some(InboundMessage::NewScore) => return Ok(()),
            Some(_) => continue,
            None => bail!("connection closed"),
        }
    }
}

fn with_terminal<T>(f: impl FnOnce(&mut TerminalRenderer) -> Result<T>) -> Result<T> {
    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = f(&mut term);
    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Countdown bar state, restarted on every timer generation.
struct TimerBar {
    generation: u64,
    started: Instant,
}

impl TimerBar {
    fn fraction(&mut self, generation: u64, delay_ms: u32) -> f32 {
        if generation != self.generation {
            self.generation = generation;
            self.started = Instant::now();
        }
        let elapsed = self.started.elapsed().as_millis() as f32;
        1.0 - elapsed / delay_ms.max(1) as f32
    }
}

fn play(
    term: &mut TerminalRenderer,
    mut session: SessionHandle,
    mut comm: Option<&mut Communicator>,
    high_score: u32,
) -> Result<SessionSnapshot> {
    let multiplayer = comm.is_some();
    let view = GameView::default();
    let mut canvas = Canvas::new(0, 0);
    let mut aim = AimCursor::new(GRID_COLS, GRID_ROWS);
    let mut chat = ChatPrompt::new();
    let mut timer = TimerBar {
        generation: u64::MAX,
        started: Instant::now(),
    };
    let mut status: Option<&str> = None;

    loop {
        if let Some(comm) = comm.as_deref_mut() {
            while let Some(message) = comm.try_recv() {
                session.deliver(message);
            }
            if !comm.is_connected() && status.is_none() {
                warn!("server connection lost");
                status = Some("Disconnected from server");
                session.shutdown();
            }
        }
        // Drain UI-facing events; rendering works from snapshots.
        while session.try_event().is_some() {}

        let snapshot = session.snapshot();
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let overlay = Overlay {
            aim: Some((aim.x() as u8, aim.y() as u8)),
            timer_fraction: timer.fraction(
                snapshot.game.timer_generation,
                snapshot.game.timer_delay_ms,
            ),
            high_score,
            chat_prompt: chat.is_open().then(|| chat.text()),
            status: if snapshot.closed {
                Some("Game over - press any key")
            } else {
                status
            },
        };
        view.render_into(
            &snapshot.game,
            snapshot.multiplayer.as_ref(),
            &overlay,
            Viewport::new(w, h),
            &mut canvas,
        );
        term.present(&mut canvas)?;

        if snapshot.closed {
            wait_for_key()?;
            return Ok(snapshot);
        }

        if !event::poll(Duration::from_millis(FRAME_MS))? {
            continue;
        }
        match event::read()? {
            Event::Resize(_, _) => term.invalidate(),
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if chat.is_open() {
                    if let ChatOutcome::Submit(text) = chat.handle_key(key) {
                        session.command(GameCommand::Chat(text));
                    }
                    continue;
                }
                if should_quit(key) {
                    session.command(GameCommand::Leave);
                    continue;
                }
                match handle_key_event(key) {
                    Some(GameAction::OpenChat) if multiplayer => chat.open(),
                    Some(action) => {
                        if let Some(command) = aim.resolve(action) {
                            session.command(command);
                        }
                    }
                    None => {}
                }
            }
            _ => {}
        }
    }
}

fn wait_for_key() -> Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
