use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io;
use std::sync::Arc;
use sutra_flashcards::{
    App, Config, HttpBackend, LocalStore, Worker, calculate_main_layout, handle_key,
    handle_mouse, logger, ui,
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = Config::from_env();

    if let Err(e) = logger::init(&config.log_path()) {
        eprintln!("Warning: could not open log file: {}", e);
    }
    logger::log(&format!("Starting, backend at {}", config.backend_url));

    let store = match LocalStore::open(&config.db_path()) {
        Ok(store) => store,
        Err(e) => {
            logger::log(&format!(
                "Failed to open settings database, using memory: {}",
                e
            ));
            LocalStore::open_in_memory().map_err(io::Error::other)?
        }
    };

    let backend = HttpBackend::new(&config.backend_url).map_err(io::Error::other)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut worker = Worker::new(Arc::new(backend), tx);

    let mut app = App::new(config, store);
    app.start();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app, &mut worker, &mut rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        logger::log(&format!("Exited with error: {}", e));
    }
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut Worker,
    rx: &mut mpsc::UnboundedReceiver<sutra_flashcards::ApiResponse>,
) -> io::Result<()> {
    let mut events = EventStream::new();

    while !app.should_quit() {
        for request in app.take_requests() {
            worker.dispatch(request);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key);
                }
                Some(Ok(Event::Mouse(mouse))) => {
                    let size = terminal.size()?;
                    let layout = calculate_main_layout(Rect::new(0, 0, size.width, size.height));
                    handle_mouse(app, mouse, layout.card_area);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            },
            Some(response) = rx.recv() => app.handle_response(response),
        }
    }

    Ok(())
}
