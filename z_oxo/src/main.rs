use std::path::PathBuf;

use clap::Parser;
use console::{Key, Term};
use z_oxo::term_render::{cell_for_key, render_game};
use z_oxo::{AnsiTermStyle, OxoGame};
use zenoh::key_expr::KeyExpr;
use zenoh_oxo::{GameEvent, Node, RoomName, SessionExt, StepResult, TransportConfig, DEFAULT_PORT};

/// z_oxo - noughts and crosses over Zenoh
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Room to join; a random one is generated when omitted
    #[arg(short, long)]
    room: Option<String>,

    /// Zenoh router host; peers are scouted when omitted
    #[arg(long)]
    host: Option<String>,

    /// Zenoh router port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path to Zenoh config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Key expression prefix
    #[arg(short, long)]
    prefix: Option<KeyExpr<'static>>,
}

enum Input {
    Cell(u8, u8),
    Quit,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(args));
    // The keyboard thread may still sit in read_key(); do not wait for it
    runtime.shutdown_background();
    result
}

async fn run(args: Args) -> anyhow::Result<()> {

    let mut transport = TransportConfig::new().with_port(args.port);
    if let Some(host) = args.host.clone() {
        transport = transport.with_host(host).with_mode("client".to_string());
    }
    if let Some(config_path) = args.config.clone() {
        transport = transport.with_config_file(config_path);
    }
    let session = zenoh_oxo::network::connect(&transport).await?;

    let mut node_builder = session.declare_oxo_node().step_timeout_break_ms(50);
    if let Some(prefix) = args.prefix.clone() {
        node_builder = node_builder.prefix(prefix);
    }
    let mut node = node_builder.await?;

    let room = match args.room {
        Some(name) => RoomName::from_name(name)?,
        None => RoomName::generate(),
    };

    println!("=== z_oxo - noughts and crosses over Zenoh ===");
    println!("Session: {}", node.id());
    println!("Room: {}", room);
    println!("Controls:");
    println!("  1-9 - Play the numbered cell");
    println!("  q - Quit");
    println!();

    node.join(room).await?;

    let (input_tx, input_rx) = flume::unbounded();
    let keyboard_task = tokio::task::spawn_blocking(move || {
        let input_term = Term::stdout();
        loop {
            let input = match input_term.read_key() {
                Ok(Key::Char('q')) | Ok(Key::Char('Q')) | Ok(Key::Escape) => Input::Quit,
                Ok(Key::Char(c)) => match cell_for_key(c) {
                    Some((x, y)) => Input::Cell(x, y),
                    None => continue,
                },
                Ok(_) => continue,
                Err(_) => Input::Quit,
            };
            let quit = matches!(input, Input::Quit);
            if input_tx.send(input).is_err() || quit {
                break;
            }
        }
    });

    let render_term = Term::stdout();
    let mut game = OxoGame::new();
    render(&render_term, &game)?;

    loop {
        let mut dirty = false;

        match node.step().await? {
            StepResult::Event(event) => {
                tracing::debug!("{}", event);
                match event {
                    GameEvent::GameStart { is_player_one } => game.game_start(is_player_one),
                    GameEvent::GameAlreadyStarted => game.game_already_started(),
                    GameEvent::MoveMade { x, y } => {
                        game.move_made(x, y);
                    }
                }
                dirty = true;
            }
            StepResult::Timeout => {}
            StepResult::Stop => break,
        }

        while let Ok(input) = input_rx.try_recv() {
            match input {
                Input::Cell(x, y) => {
                    if let Some((x, y)) = game.click_cell(x, y) {
                        play(&mut node, x, y).await;
                        dirty = true;
                    }
                }
                Input::Quit => {
                    game.window_closed();
                    dirty = true;
                }
            }
        }

        if dirty {
            render(&render_term, &game)?;
        }
        if game.status().ends_session() {
            break;
        }
    }

    node.stop().await?;
    keyboard_task.abort();

    println!("{}", node.stats());
    Ok(())
}

async fn play(node: &mut Node, x: u8, y: u8) {
    if let Err(e) = node.make_move(x, y).await {
        tracing::warn!("Failed to send move ({}, {}): {}", x, y, e);
    }
}

fn render(term: &Term, game: &OxoGame) -> anyhow::Result<()> {
    term.clear_screen()?;
    term.move_cursor_to(0, 0)?;
    for line in render_game(game, &AnsiTermStyle) {
        term.write_line(&line)?;
    }
    term.flush()?;
    Ok(())
}
