use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use term_frontend::channel::{AsyncNotification, UiHandle};
use term_frontend::components::ComponentContext;
use term_frontend::components::ProgressNotification;
use term_frontend::components::debug_log::{LogBuffer, install_panic_hook, set_global_log_buffer};
use term_frontend::config::{self, ScreenSaverBehavior, Settings, SettingsError};
use term_frontend::drivers::OutputDriver;
use term_frontend::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_frontend::help::HelpPrompt;
use term_frontend::keybindings::{InputAction, InputEvent, KeyBindings};
use term_frontend::runner::run_window;
use term_frontend::screen::{Screen, StackRequests};
use term_frontend::screensaver::BasicScreensaver;
use term_frontend::theme;
use term_frontend::tracing_sub;
use term_frontend::ui::UiFrame;
use term_frontend::window::{NowPlaying, PowerHooks, Window};

const SLIDES: [&str; 4] = [
    "Space Lizards II",
    "Turbo Kart Deluxe",
    "Castle of Echoes",
    "Neon Harbor",
];

const SONGS: [&str; 3] = ["Chiptune Sunrise", "Bitcrushed Blues", "Arcade Nights"];

#[derive(Parser, Debug)]
#[command(
    name = "term-frontend",
    version = env!("CARGO_PKG_VERSION"),
    about = "Demo front-end: a menu, a modal dialog, background notifications and a screensaver",
    long_about = indoc::indoc! {"
        Demo front-end: a menu, a modal dialog, background notifications and a screensaver.

        Arrows or hjkl move, Enter selects, Esc goes back, Space and Tab act as
        start and select while a slideshow screensaver is running.
        Ctrl+F toggles the framerate overlay, Ctrl+L the log overlay and
        Ctrl+Q quits.
    "}
)]
struct Cli {
    /// Idle time before the screensaver starts. 0 disables it.
    #[arg(short = 's', long = "screensaver", value_name = "SECONDS")]
    screensaver_secs: Option<u64>,

    /// What the screensaver shows: dim, black, slideshow or "random video".
    #[arg(short = 'b', long = "behavior", value_name = "MODE")]
    behavior: Option<ScreenSaverBehavior>,

    /// Never go to sleep, even when idle.
    #[arg(long)]
    no_sleep: bool,

    /// Show the framerate overlay from the start.
    #[arg(long)]
    framerate: bool,

    /// Hide the clock.
    #[arg(long)]
    no_clock: bool,

    /// Override any setting, e.g. `--set audio.display_titles=false`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings, SettingsError> {
        let mut settings = Settings::default();
        if let Some(secs) = self.screensaver_secs {
            settings.set_int(config::SCREENSAVER_TIME, (secs as i64).saturating_mul(1000));
        }
        if let Some(behavior) = self.behavior {
            settings.set_string(config::SCREENSAVER_BEHAVIOR, behavior.as_str());
        }
        if self.framerate {
            settings.set_bool(config::DRAW_FRAMERATE, true);
        }
        if self.no_clock {
            settings.set_bool(config::DRAW_CLOCK, false);
        }
        for raw in &self.overrides {
            settings.apply_override(raw)?;
        }
        Ok(settings)
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let log = LogBuffer::default();
    set_global_log_buffer(log.clone());
    install_panic_hook();
    tracing_sub::init_default(cli.verbose);

    let settings = cli.settings().map_err(io::Error::other)?;
    let mut window = Window::new(settings);
    window.set_log_buffer(log);
    window.set_allow_sleep(!cli.no_sleep);
    window.set_power_hooks(Box::new(LoggedPower));

    let behavior = window.settings().screensaver_behavior();
    let saver = BasicScreensaver::new(behavior)
        .with_items(SLIDES)
        .on_launch(|item| tracing::info!(item, "launch requested from screensaver"));
    window.set_screensaver(Box::new(saver));

    let radio = Arc::new(Radio::default());
    window.set_now_playing(radio.clone());
    spawn_radio(radio);

    window.push_screen(Menu::new(window.handle()));

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    output.draw(|mut frame| window.render_loading_screen(&mut frame, "starting up", Some(1.0)))?;

    let result = run_window(
        &mut output,
        ConsoleInputDriver::new(),
        &mut window,
        Duration::from_millis(16),
        |event, window| match event {
            Some(Event::Key(key)) => {
                key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL)
            }
            Some(_) => false,
            None => window.stack().is_empty(),
        },
    );

    output.exit()?;
    result
}

struct LoggedPower;

impl PowerHooks for LoggedPower {
    fn on_sleep(&mut self) {
        tracing::info!("display asleep");
    }

    fn on_wake(&mut self) {
        tracing::info!("display awake");
    }
}

#[derive(Default)]
struct Radio {
    pending: Mutex<Option<String>>,
}

impl NowPlaying for Radio {
    fn take_song_name(&self) -> Option<String> {
        self.pending.lock().ok().and_then(|mut pending| pending.take())
    }
}

fn spawn_radio(radio: Arc<Radio>) {
    thread::spawn(move || {
        for song in SONGS.iter().cycle() {
            thread::sleep(Duration::from_secs(20));
            if let Ok(mut pending) = radio.pending.lock() {
                *pending = Some(format!("Now playing: {song}"));
            }
        }
    });
}

fn start_download(handle: UiHandle<Window>, active: Arc<AtomicUsize>) {
    active.fetch_add(1, Ordering::SeqCst);
    thread::spawn(move || {
        let progress = Arc::new(ProgressNotification::new("Downloading"));
        let widget: Arc<dyn AsyncNotification> = progress.clone();
        handle.register_notification(Arc::clone(&widget));
        for percent in 0..=100u8 {
            progress.set_percent(percent);
            thread::sleep(Duration::from_millis(40));
        }
        handle.unregister_notification(&widget);
        active.fetch_sub(1, Ordering::SeqCst);
        handle.display_notification("Download finished", 0);
    });
}

const MENU_ITEMS: [&str; 5] = [
    "Show a message",
    "Notify from a worker",
    "Start a download",
    "Slide to details",
    "Quit",
];

struct Menu {
    handle: UiHandle<Window>,
    selected: usize,
    downloads: Arc<AtomicUsize>,
}

impl Menu {
    fn new(handle: UiHandle<Window>) -> Self {
        Self {
            handle,
            selected: 0,
            downloads: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn activate(&mut self, requests: &mut StackRequests) {
        match self.selected {
            0 => requests.push(MessageBox::new("Hello from a modal dialog.")),
            1 => {
                let handle = self.handle.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(300));
                    handle.display_notification("A worker thread says hi", 0);
                });
            }
            2 => start_download(self.handle.clone(), Arc::clone(&self.downloads)),
            3 => self.handle.post_to_ui_thread(|window| {
                window.push_sliding(Details);
            }),
            _ => requests.close_self(),
        }
    }
}

impl Screen for Menu {
    fn name(&self) -> &str {
        "menu"
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                if idx == self.selected {
                    Line::styled(
                        format!("> {item}"),
                        Style::default()
                            .fg(theme::accent_alt())
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Line::from(format!("  {item}"))
                }
            })
            .collect();
        let border = if ctx.focused() {
            Style::default().fg(theme::accent())
        } else {
            Style::default()
        };
        let body = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title("term-frontend")
                    .borders(Borders::ALL)
                    .border_style(border),
            ),
            body,
        );
    }

    fn handle_input(
        &mut self,
        _bindings: &KeyBindings,
        event: &InputEvent,
        requests: &mut StackRequests,
    ) -> bool {
        match event.action {
            Some(InputAction::Up) => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            Some(InputAction::Down) => {
                self.selected = (self.selected + 1).min(MENU_ITEMS.len() - 1);
                true
            }
            Some(InputAction::A) => {
                self.activate(requests);
                true
            }
            Some(InputAction::B) => {
                requests.close_self();
                true
            }
            _ => false,
        }
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![
            HelpPrompt::new("up", "move"),
            HelpPrompt::new("down", "move"),
            HelpPrompt::new("a", "select"),
            HelpPrompt::new("b", "quit"),
        ]
    }

    fn is_processing(&self) -> bool {
        self.downloads.load(Ordering::SeqCst) > 0
    }
}

struct MessageBox {
    text: String,
}

impl MessageBox {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Screen for MessageBox {
    fn name(&self) -> &str {
        "message box"
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let width = area.width.min(40);
        let height = area.height.min(5);
        let rect = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(self.text.as_str())
                .wrap(Wrap { trim: true })
                .block(Block::default().title("message").borders(Borders::ALL)),
            rect,
        );
    }

    fn handle_input(
        &mut self,
        _bindings: &KeyBindings,
        event: &InputEvent,
        requests: &mut StackRequests,
    ) -> bool {
        if event.is(InputAction::A) || event.is(InputAction::B) {
            requests.close_self();
            return true;
        }
        false
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![HelpPrompt::new("a", "ok")]
    }

    fn is_modal(&self) -> bool {
        true
    }
}

struct Details;

impl Screen for Details {
    fn name(&self) -> &str {
        "details"
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let body = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        frame.render_widget(Clear, body);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from("This screen was pushed from a posted function."),
                Line::from("Paste text here to see it logged."),
            ])
            .block(Block::default().title("details").borders(Borders::ALL)),
            body,
        );
    }

    fn handle_input(
        &mut self,
        _bindings: &KeyBindings,
        event: &InputEvent,
        requests: &mut StackRequests,
    ) -> bool {
        if event.is(InputAction::B) {
            requests.close_self();
            return true;
        }
        false
    }

    fn text_input(&mut self, text: &str) {
        tracing::info!(chars = text.chars().count(), "pasted into details");
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![HelpPrompt::new("b", "back")]
    }
}
