//! App: the interactive race controller.
//!
//! [`App`] owns the roster, the widgets and at most one running race. It is
//! driven by three event streams (keyboard input, race events and UI
//! ticks) and never blocks on any of them, so it can be exercised in tests
//! without a terminal. [`run`] wires it to a real [`Engine`].

use std::io::{self, Write};

use crossbeam_channel::{select, unbounded, Receiver, Sender};

use crate::actor::{
    Engine, EngineConfig, InputEvent, KeyCode, RaceActor, RaceEvent, RacePlan, TickerActor,
};
use crate::buffer::{Buffer, Cell, Modifiers, Rgb, Style};
use crate::config::Config;
use crate::horse::Horse;
use crate::layout::{AppLayout, Rect};
use crate::race::{Finish, Race, RaceOutcome, RaceRules, SeededSource, REQUIRED_LANES};
use crate::surface::StdoutSurface;
use crate::widget::{
    FormOutcome, HorseForm, RosterView, Severity, StatusBar, TextInput, TextInputConfig, TrackView,
    Widget, FORM_HEIGHT, FORM_WIDTH,
};

const HEADER_BG: Rgb = Rgb::new(40, 40, 60);
const TITLE: Style = Style::new(Rgb::new(255, 215, 0), HEADER_BG);
const HINTS: Style = Style::new(Rgb::new(150, 150, 170), HEADER_BG);
const TITLE_TEXT: &str = "Paddock";
const HINT_TEXT: &str = "a add horse · s start · q quit";
const LENGTH_DIGITS: usize = 6;
const LENGTH_FIELD_WIDTH: u16 = 14;

/// Message shown when a race is started with too few horses.
pub const TOO_FEW_HORSES: &str = "At least 2 horses are required to start the race.";

/// Interactive race controller.
pub struct App {
    horses: Vec<Horse>,
    rules: RaceRules,
    seed: Option<u64>,
    symbols: Vec<char>,
    default_confidence: f64,
    races_started: u64,

    width: u16,
    height: u16,
    layout: AppLayout,
    length: TextInput,
    track: TrackView,
    roster: RosterView,
    status: StatusBar,
    form: Option<HorseForm>,

    race: Option<RaceActor>,
    race_tx: Sender<RaceEvent>,
    race_rx: Receiver<RaceEvent>,

    running: bool,
    dirty: bool,
}

impl App {
    /// Controller for a `width` x `height` screen, preloaded from `config`.
    pub fn new(config: Config, width: u16, height: u16) -> Self {
        let (race_tx, race_rx) = unbounded();
        let rules = config.rules();

        let mut length = TextInput::with_config(
            Rect::ZERO,
            TextInputConfig::numeric("Length: ", LENGTH_DIGITS),
        );
        length.set_content(&config.race.length.to_string());
        length.set_focused(true);

        let mut app = Self {
            horses: config.roster,
            rules,
            seed: config.race.seed,
            symbols: config.ui.symbols,
            default_confidence: config.ui.default_confidence,
            races_started: 0,
            width,
            height,
            layout: AppLayout::compute(width, height),
            length,
            track: TrackView::new(Rect::ZERO),
            roster: RosterView::new(Rect::ZERO),
            status: StatusBar::new(Rect::ZERO),
            form: None,
            race: None,
            race_tx,
            race_rx,
            running: true,
            dirty: true,
        };
        app.apply_layout();
        app.roster.set_horses(&app.horses);
        app.status.set_notice(
            Severity::Info,
            "Add at least two horses, then press s to race.",
        );
        app.refresh_state_label();
        app
    }

    /// False once the user asked to quit.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a race thread is active.
    pub const fn is_racing(&self) -> bool {
        self.race.is_some()
    }

    /// Horses entered so far, in lane order.
    pub fn horses(&self) -> &[Horse] {
        &self.horses
    }

    /// Text currently shown on the track.
    pub fn track_text(&self) -> &str {
        self.track.text()
    }

    /// Status line notice.
    pub fn notice(&self) -> (Severity, &str) {
        (self.status.severity(), self.status.notice())
    }

    /// Whether the horse form is open.
    pub const fn form_open(&self) -> bool {
        self.form.is_some()
    }

    /// Events from the running race, for `select!` loops.
    pub const fn race_events(&self) -> &Receiver<RaceEvent> {
        &self.race_rx
    }

    /// Whether anything changed since the last [`render`](Self::render).
    pub fn needs_redraw(&self) -> bool {
        self.dirty
            || self.length.needs_redraw()
            || self.track.needs_redraw()
            || self.roster.needs_redraw()
            || self.status.needs_redraw()
            || self.form.as_ref().is_some_and(Widget::needs_redraw)
    }

    /// React to one input event.
    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key { code: KeyCode::Char('c'), modifiers } if modifiers.control => {
                self.quit();
            }
            InputEvent::Resize { width, height } => self.resize(*width, *height),
            InputEvent::Shutdown => self.quit(),
            InputEvent::Error(message) => {
                log::error!("input error: {message}");
                self.status.set_notice(Severity::Error, message.clone());
            }
            _ if self.form.is_some() => self.handle_form_input(event),
            InputEvent::Key { code, .. } => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.quit(),
                KeyCode::Char('a') => self.open_form(),
                KeyCode::Char('s') | KeyCode::Enter => self.start_race(),
                _ => {
                    self.length.handle_input(event);
                }
            },
            InputEvent::Paste(_) => {
                self.length.handle_input(event);
            }
        }
    }

    /// Apply one event from the race thread.
    pub fn handle_race_event(&mut self, event: RaceEvent) {
        match event {
            RaceEvent::Surface(update) => self.track.apply(update),
            RaceEvent::Finished { outcome, horses } => {
                if let Some(actor) = self.race.take() {
                    actor.join();
                }
                for (lane, horse) in horses {
                    if let Some(slot) = self.horses.get_mut(lane - 1) {
                        *slot = horse;
                    }
                }
                self.roster.set_horses(&self.horses);
                match outcome {
                    Ok(outcome) => self.report_outcome(&outcome),
                    Err(e) => {
                        log::warn!("race could not run: {e}");
                        self.status.set_notice(Severity::Error, e.to_string());
                    }
                }
                self.refresh_state_label();
            }
        }
    }

    /// Validate the inputs and launch a race on its own thread.
    pub fn start_race(&mut self) {
        if self.race.is_some() {
            self.status
                .set_notice(Severity::Warning, "A race is already running.");
            return;
        }

        let text = self.length.content().trim();
        let length = match text.parse::<u32>() {
            Ok(length) if length > 0 => length,
            _ => {
                log::warn!("refusing race length {text:?}");
                self.status.set_notice(
                    Severity::Error,
                    format!("Invalid race length {text:?}: enter a positive whole number."),
                );
                return;
            }
        };

        if self.horses.len() < REQUIRED_LANES {
            log::warn!("refusing to start with {} horse(s)", self.horses.len());
            self.status.set_notice(Severity::Warning, TOO_FEW_HORSES);
            return;
        }

        // A configured seed still gives each race of the session its own draws.
        let seed = self.seed.map(|seed| seed.wrapping_add(self.races_started));
        self.races_started += 1;
        log::info!(
            "starting race of length {length} with {} horse(s)",
            self.horses.len()
        );

        let plan = RacePlan::new(length, self.horses.clone(), self.rules).with_seed(seed);
        self.race = Some(RaceActor::spawn(plan, self.race_tx.clone()));
        self.status.set_notice(Severity::Info, "And they're off!");
        self.refresh_state_label();
    }

    /// Track a new screen size.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.layout = AppLayout::compute(width, height);
        self.apply_layout();
    }

    /// Compose the whole screen into `buffer`.
    pub fn render(&mut self, buffer: &mut Buffer) {
        let header = self.layout.header;
        buffer.fill(header, Cell::new(' ').with_bg(HEADER_BG));
        buffer.put_str(
            header.x + 1,
            header.y,
            header.right(),
            TITLE_TEXT,
            TITLE.with_modifiers(Modifiers::BOLD),
        );
        self.length.render(buffer);
        let hints_x = self.length.bounds().right() + 2;
        buffer.put_str(hints_x, header.y, header.right(), HINT_TEXT, HINTS);

        self.track.render(buffer);
        self.roster.render(buffer);
        self.status.render(buffer);
        if let Some(form) = &self.form {
            form.render(buffer);
        }

        self.length.clear_redraw();
        self.track.clear_redraw();
        self.roster.clear_redraw();
        self.status.clear_redraw();
        if let Some(form) = &mut self.form {
            form.clear_redraw();
        }
        self.dirty = false;
    }

    fn handle_form_input(&mut self, event: &InputEvent) {
        let Some(form) = &mut self.form else {
            return;
        };
        match form.handle_key(event) {
            FormOutcome::Ignored | FormOutcome::Consumed => {}
            FormOutcome::Rejected(reason) => {
                self.status.set_notice(Severity::Warning, reason);
            }
            FormOutcome::Cancelled => self.close_form(),
            FormOutcome::Submitted(horse) => {
                self.close_form();
                self.add_horse(horse);
            }
        }
    }

    fn add_horse(&mut self, horse: Horse) {
        let message = format!("New horse added: {horse}");
        log::info!("{message}");
        if !self.is_racing() {
            self.track.set_text(&format!("{message}\n"));
        }
        self.status.set_notice(Severity::Info, message);
        self.horses.push(horse);
        self.roster.set_horses(&self.horses);
        self.refresh_state_label();
    }

    fn open_form(&mut self) {
        let bounds = Rect::from_size(self.width, self.height).centered(FORM_WIDTH, FORM_HEIGHT);
        self.form = Some(HorseForm::new(
            bounds,
            &self.symbols,
            self.default_confidence,
        ));
        self.dirty = true;
    }

    fn close_form(&mut self) {
        self.form = None;
        self.dirty = true;
    }

    fn quit(&mut self) {
        if let Some(actor) = &self.race {
            if !actor.is_finished() {
                log::info!("quitting with a race still running");
            }
        }
        self.running = false;
    }

    fn report_outcome(&mut self, outcome: &RaceOutcome) {
        log::info!("race finished after {} tick(s): {:?}", outcome.ticks, outcome.finish);
        let (severity, notice) = match &outcome.finish {
            Finish::Winner { name, .. } => (
                Severity::Info,
                format!("{name} wins after {} ticks!", outcome.ticks),
            ),
            Finish::AllFallen => (
                Severity::Warning,
                "Every horse fell. There is no winner.".to_string(),
            ),
            Finish::Stalled => (
                Severity::Warning,
                "No standing horse can move. The race was called off.".to_string(),
            ),
        };
        self.status.set_notice(severity, notice);
    }

    fn refresh_state_label(&mut self) {
        let state = if self.is_racing() { "racing" } else { "idle" };
        self.status
            .set_right(format!("{} horses · {state} ", self.horses.len()));
    }

    fn apply_layout(&mut self) {
        let AppLayout {
            header,
            track,
            roster,
            status,
        } = self.layout;
        let title_end = header.x + 1 + u16::try_from(TITLE_TEXT.len()).unwrap_or(0);
        let length_x = title_end + 2;
        self.length.set_bounds(Rect::new(
            length_x,
            header.y,
            LENGTH_FIELD_WIDTH.min(header.right().saturating_sub(length_x)),
            header.height,
        ));
        self.track.set_bounds(track);
        self.roster.set_bounds(roster);
        self.status.set_bounds(status);
        if let Some(form) = &mut self.form {
            form.set_bounds(
                Rect::from_size(self.width, self.height).centered(FORM_WIDTH, FORM_HEIGHT),
            );
        }
        self.dirty = true;
    }
}

/// Run the interactive UI until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up.
pub fn run(config: Config) -> io::Result<()> {
    let mut engine = Engine::with_config(EngineConfig::default())?;
    let ticker = TickerActor::from_fps(config.ui.target_fps);
    let mut app = App::new(config, engine.width(), engine.height());

    let input_rx = engine.input_receiver().clone();
    let race_rx = app.race_events().clone();
    let tick_rx = ticker.receiver().clone();

    app.render(engine.buffer_mut());
    engine.request_redraw();

    while app.is_running() {
        select! {
            recv(input_rx) -> event => {
                let Ok(event) = event else {
                    log::error!("input thread stopped");
                    break;
                };
                if let InputEvent::Resize { width, height } = event {
                    engine.handle_resize(width, height);
                }
                app.handle_input(&event);
            }
            recv(race_rx) -> event => {
                if let Ok(event) = event {
                    app.handle_race_event(event);
                }
            }
            recv(tick_rx) -> tick => {
                if tick.is_err() {
                    break;
                }
                if app.needs_redraw() {
                    app.render(engine.buffer_mut());
                    engine.request_update();
                }
            }
        }
    }

    ticker.join();
    Ok(())
}

/// Run one race without the TUI, drawing frames on `out`.
///
/// The roster fills lanes in order. Returns the outcome together with the
/// horses as they left the track.
pub fn run_headless<W: Write>(
    config: &Config,
    out: W,
) -> crate::error::Result<(RaceOutcome, Vec<(usize, Horse)>)> {
    let mut race = Race::with_parts(
        config.race.length,
        StdoutSurface::new(out),
        config.rules(),
        Box::new(SeededSource::from_optional_seed(config.race.seed)),
    )?;
    for (i, horse) in config.roster.iter().cloned().enumerate() {
        // Reported on the surface; lanes 1 to 3 still race.
        let _ = race.add_horse(horse, i + 1);
    }
    let outcome = race.start_race()?;
    let mut horses = race.into_horses();
    horses.sort_by_key(|(lane, _)| *lane);
    Ok((outcome, horses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(horses: &[(&str, f64)]) -> Config {
        let mut config = Config::default();
        config.race.length = 5;
        config.race.tick_interval_ms = 0;
        config.race.fall_scale = 0.0;
        config.race.seed = Some(11);
        config.roster = horses
            .iter()
            .map(|(name, confidence)| Horse::new('H', *name, *confidence))
            .collect();
        config
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_input(&InputEvent::key(code));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn finish_race(app: &mut App) {
        let events = app.race_events().clone();
        while app.is_racing() {
            let event = events
                .recv_timeout(Duration::from_secs(5))
                .expect("race should report back");
            app.handle_race_event(event);
        }
    }

    #[test]
    fn test_start_needs_two_horses() {
        let mut app = App::new(config(&[("Solo", 0.5)]), 80, 24);
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.is_racing());
        assert_eq!(app.notice(), (Severity::Warning, TOO_FEW_HORSES));
    }

    #[test]
    fn test_invalid_length_is_reported() {
        let mut app = App::new(config(&[("Ace", 1.0), ("Bee", 0.0)]), 80, 24);
        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.is_racing());
        assert_eq!(app.notice().0, Severity::Error);

        type_str(&mut app, "0");
        press(&mut app, KeyCode::Enter);
        assert!(!app.is_racing());
        assert_eq!(app.notice().0, Severity::Error);
    }

    #[test]
    fn test_form_adds_horse() {
        let mut app = App::new(config(&[]), 80, 24);
        press(&mut app, KeyCode::Char('a'));
        assert!(app.form_open());

        // Letters go to the form, not to the app's own shortcuts.
        type_str(&mut app, "Sally");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert!(!app.form_open());
        assert_eq!(app.horses().len(), 1);
        assert_eq!(app.horses()[0].name(), "Sally");
        assert_eq!(app.horses()[0].symbol(), '♞');
        assert_eq!(
            app.track_text(),
            "New horse added: Sally, Symbol: ♞, Confidence: 0.5\n"
        );
        assert!(app.is_running());
    }

    #[test]
    fn test_form_escape_only_closes_form() {
        let mut app = App::new(config(&[]), 80, 24);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.form_open());
        assert!(app.is_running());
        press(&mut app, KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_race_runs_and_updates_roster() {
        let mut app = App::new(config(&[("Ace", 1.0), ("Bee", 0.0)]), 80, 24);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.is_racing());

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.notice(), (Severity::Warning, "A race is already running."));

        finish_race(&mut app);
        assert!(app.track_text().ends_with("And the winner is Ace"));
        assert_eq!(app.notice(), (Severity::Info, "Ace wins after 5 ticks!"));
        assert_eq!(app.horses()[0].confidence(), 1.0);
        assert_eq!(app.horses()[1].confidence(), 0.0);
    }

    #[test]
    fn test_extra_horse_is_reported_by_race() {
        let mut app = App::new(
            config(&[("Ace", 1.0), ("Bee", 0.0), ("Cob", 0.0), ("Dun", 0.9)]),
            80,
            24,
        );
        press(&mut app, KeyCode::Char('s'));

        let events = app.race_events().clone();
        let first = events.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            first,
            RaceEvent::Surface(crate::surface::SurfaceUpdate::Append(
                "Cannot add horse to lane 4 because there is no such lane".to_string()
            ))
        );
        app.handle_race_event(first);
        finish_race(&mut app);
        assert_eq!(app.horses()[3].confidence(), 0.9);
    }

    #[test]
    fn test_render_composes_screen() {
        let mut app = App::new(config(&[("Ace", 1.0), ("Bee", 0.0)]), 80, 24);
        let mut buffer = Buffer::new(80, 24);
        app.render(&mut buffer);
        assert!(!app.needs_redraw());

        let header = buffer.row_text(0);
        assert!(header.starts_with(" Paddock  Length: 5"));
        assert!(header.contains(HINT_TEXT));
        assert!(buffer.row_text(1).contains("Horses (2)"));
        assert!(buffer.row_text(23).ends_with("2 horses · idle "));

        app.handle_input(&InputEvent::Resize {
            width: 100,
            height: 30,
        });
        assert!(app.needs_redraw());
    }

    #[test]
    fn test_headless_race_writes_frames() {
        let mut out = Vec::new();
        let (outcome, horses) =
            run_headless(&config(&[("Ace", 1.0), ("Bee", 0.0)]), &mut out).unwrap();
        assert_eq!(outcome.finish.winner_name(), Some("Ace"));
        assert_eq!(horses[0].1.distance_travelled(), 5);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\x1b[2J").count(), 6);
        assert!(text.ends_with("And the winner is Ace"));
    }

    #[test]
    fn test_headless_needs_two_lanes() {
        let err = run_headless(&config(&[("Solo", 1.0)]), Vec::new()).unwrap_err();
        assert_eq!(err, crate::error::RaceError::MissingLane { lane: 2 });
    }

    #[test]
    fn test_ctrl_c_quits_from_form() {
        let mut app = App::new(config(&[]), 80, 24);
        press(&mut app, KeyCode::Char('a'));
        app.handle_input(&InputEvent::Key {
            code: KeyCode::Char('c'),
            modifiers: crate::actor::KeyModifiers::CONTROL,
        });
        assert!(!app.is_running());
    }
}
