//! Booking Wizard - terminal front end
//!
//! Walks through a reservation against the API at `BOOKING_API_BASE_URL`
//! (default http://localhost:3000/api). Start the mock first:
//!
//!   cargo run -p booking-mock
//!   cargo run -p booking-client --example booking_tui

use booking_client::{
    BackgroundDriver, BookingWizard, ClientConfig, Command, Completion, NetworkHttpClient,
    WizardError, WizardResult, WizardStep,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{prelude::*, widgets::*};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget, TuiWidgetState};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ContactField {
    #[default]
    Name,
    Phone,
}

struct App {
    wizard: BookingWizard,
    driver: BackgroundDriver<NetworkHttpClient>,
    base_url: String,
    /// Guest count input (step 1)
    guests: Input,
    /// Contact inputs (step 3)
    name: Input,
    phone: Input,
    contact_field: ContactField,
    /// Highlighted slot (step 2)
    slot_list: ListState,
    logger_state: TuiWidgetState,
}

impl App {
    fn new(driver: BackgroundDriver<NetworkHttpClient>, base_url: String) -> Self {
        Self {
            wizard: BookingWizard::new(),
            driver,
            base_url,
            guests: Input::default(),
            name: Input::default(),
            phone: Input::default(),
            contact_field: ContactField::default(),
            slot_list: ListState::default(),
            logger_state: TuiWidgetState::new(),
        }
    }

    /// Hands a command to the driver; refusals are already on the banner
    /// or only worth a log line.
    fn run(&mut self, result: WizardResult<Command>) {
        match result {
            Ok(command) => self.driver.dispatch(command),
            Err(WizardError::Validation(_)) => {}
            Err(e) => tracing::debug!(error = %e, "Ignored"),
        }
    }

    fn apply(&mut self, completion: Completion) {
        if self.wizard.apply(completion) && self.wizard.step() == WizardStep::SelectingTime {
            let first_open = self.wizard.slots().iter().position(|s| s.available);
            self.slot_list.select(first_open.or(Some(0)));
        }
    }

    fn start_over(&mut self) {
        self.driver.reset(&mut self.wizard);
        self.guests.reset();
        self.name.reset();
        self.phone.reset();
        self.contact_field = ContactField::Name;
        self.slot_list.select(None);
    }

    fn move_slot(&mut self, down: bool) {
        let len = self.wizard.slots().len();
        if len == 0 {
            return;
        }
        let current = self.slot_list.selected().unwrap_or(0);
        let next = if down {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.slot_list.select(Some(next));
    }

    /// Returns false when the user asked to quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return false;
        }

        match self.wizard.step() {
            WizardStep::CollectingGuests => match key.code {
                KeyCode::Enter => {
                    let input = self.guests.value().to_string();
                    let result = self.wizard.submit_guest_count(&input);
                    self.run(result);
                }
                _ => {
                    self.guests.handle_event(&Event::Key(key));
                }
            },
            WizardStep::SelectingTime => match key.code {
                KeyCode::Up => self.move_slot(false),
                KeyCode::Down => self.move_slot(true),
                KeyCode::Enter => {
                    let picked = self
                        .slot_list
                        .selected()
                        .and_then(|i| self.wizard.slots().get(i))
                        .map(|slot| slot.time.clone());
                    if let Some(time) = picked
                        && let Err(e) = self.wizard.select_time(&time)
                    {
                        tracing::debug!(error = %e, "Slot not selectable");
                    }
                }
                _ => {}
            },
            WizardStep::CollectingContact => match key.code {
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    self.contact_field = match self.contact_field {
                        ContactField::Name => ContactField::Phone,
                        ContactField::Phone => ContactField::Name,
                    };
                }
                KeyCode::Enter => {
                    let name = self.name.value().to_string();
                    let phone = self.phone.value().to_string();
                    let result = self.wizard.submit_contact(&name, &phone);
                    self.run(result);
                }
                _ => {
                    let field = match self.contact_field {
                        ContactField::Name => &mut self.name,
                        ContactField::Phone => &mut self.phone,
                    };
                    field.handle_event(&Event::Key(key));
                }
            },
            WizardStep::Confirmed => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('r')) {
                    self.start_over();
                }
            }
        }
        true
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize TUI Logger with Tracing
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,booking_client=debug"));

    tracing_subscriber::registry()
        .with(tui_logger::tracing_subscriber_layer())
        .with(env_filter)
        .init();

    tui_logger::init_logger(log::LevelFilter::Info).ok();
    tui_logger::set_default_level(log::LevelFilter::Debug);

    let config = ClientConfig::from_env();
    let client = config.build_http_client()?;
    let (driver, mut completions) = BackgroundDriver::new(client);
    let mut app = App::new(driver, config.base_url.clone());
    tracing::info!("Using reservation API at {}", config.base_url);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &mut completions).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    completions: &mut mpsc::UnboundedReceiver<Completion>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        while let Ok(completion) = completions.try_recv() {
            app.apply(completion);
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
            && !app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let banner_height = if app.wizard.error().is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(8),                // Step
            Constraint::Length(1),             // Help
            Constraint::Length(8),             // Logs
        ])
        .split(f.area());

    // Header
    let step = app.wizard.step();
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " Restaurant Reservation ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" Step {}/4: {} ", step.number(), step.title())),
        Span::styled(
            format!(" {}", app.base_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, chunks[0]);

    // Banner
    if let Some(error) = app.wizard.error() {
        let banner = Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        f.render_widget(banner, chunks[1]);
    }

    // Step body
    match step {
        WizardStep::CollectingGuests => {
            render_input(f, chunks[2], " Number of Guests ", &app.guests, true);
        }
        WizardStep::SelectingTime => render_slots(f, chunks[2], app),
        WizardStep::CollectingContact => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[2]);
            render_input(
                f,
                rows[0],
                " Name ",
                &app.name,
                app.contact_field == ContactField::Name,
            );
            render_input(
                f,
                rows[1],
                " Phone Number ",
                &app.phone,
                app.contact_field == ContactField::Phone,
            );
        }
        WizardStep::Confirmed => render_confirmation(f, chunks[2], app),
    }

    // Help
    let help = if app.wizard.is_loading() {
        "Loading...".to_string()
    } else {
        match step {
            WizardStep::CollectingGuests => "Enter: find available times | Esc: quit",
            WizardStep::SelectingTime => "Up/Down: choose | Enter: select | Esc: quit",
            WizardStep::CollectingContact => "Tab: switch field | Enter: complete reservation | Esc: quit",
            WizardStep::Confirmed => "r/Enter: make another reservation | Esc: quit",
        }
        .to_string()
    };
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[3],
    );

    // Logs (TuiLoggerWidget)
    let logs = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Logs ")
                .border_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::DIM),
                )
                .borders(Borders::ALL),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White))
        .state(&app.logger_state);
    f.render_widget(logs, chunks[4]);
}

fn render_input(f: &mut Frame, area: Rect, title: &str, input: &Input, focused: bool) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let area = Rect {
        height: area.height.min(3),
        ..area
    };

    let width = area.width.max(3) - 3;
    let scroll = input.visual_scroll(width as usize);
    let paragraph = Paragraph::new(input.value())
        .style(style)
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);

    if focused {
        f.set_cursor_position((
            area.x + ((input.visual_cursor().max(scroll) - scroll) as u16) + 1,
            area.y + 1,
        ));
    }
}

fn render_slots(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .wizard
        .slots()
        .iter()
        .map(|slot| {
            if slot.available {
                ListItem::new(Line::from(Span::styled(
                    slot.time.clone(),
                    Style::default().fg(Color::Green),
                )))
            } else {
                ListItem::new(Line::from(Span::styled(
                    format!("{} (unavailable)", slot.time),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )))
            }
        })
        .collect();

    let block = Block::default()
        .title(" Select a Time ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    if items.is_empty() {
        f.render_widget(Paragraph::new("No times returned").block(block), area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, area, &mut app.slot_list);
}

fn render_confirmation(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Reservation Confirmed!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Reservation Details:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(confirmation) = app.wizard.confirmation() {
        lines.extend(confirmation.summary_lines().into_iter().map(Line::from));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
