use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;

use super::{NowPlaying, PowerHooks};
use crate::channel::{AsyncNotification, UiChannel, UiHandle};
use crate::component_context::ComponentContext;
use crate::components::{
    ActivityIndicator, Clock, Component, HelpBar, InfoPopup, LogBuffer, LogTail,
    render_loading_screen,
};
use crate::config::{self, Settings};
use crate::constants::{ASYNC_NOTIFICATION_PADDING, SMALL_SCREEN_COLUMNS};
use crate::help::{HelpPrompt, HelpStyle};
use crate::idle::{IdleStateMachine, InputGate};
use crate::keybindings::{InputAction, InputEvent, KeyBindings};
use crate::pacer::FramePacer;
use crate::screen::{Screen, ScreenExtra, ScreenId, ScreenStack, Screensaver};
use crate::theme::Theme;
use crate::ui::UiFrame;

const LOADING_TITLE: &str = "Loading";
const MODAL_BACK_GLYPH: &str = "b";
const MODAL_BACK_ACTION: &str = "close";

/// Owns every screen and overlay and drives them from the UI thread.
///
/// Each tick the caller feeds pending input through [`Window::input`], then
/// calls [`Window::update`] with the elapsed time and [`Window::render`]
/// with the frame to draw into. Other threads reach the window only
/// through the [`UiHandle`] returned by [`Window::handle`].
pub struct Window {
    stack: ScreenStack,
    channel: UiChannel<Window>,
    handle: UiHandle<Window>,
    idle: IdleStateMachine,
    pacer: FramePacer,
    settings: Settings,
    bindings: KeyBindings,
    theme: Theme,
    help_bar: HelpBar,
    info_popup: Option<InfoPopup>,
    clock: Clock,
    activity: ActivityIndicator,
    log_tail: Option<LogTail>,
    frame_stats: Option<String>,
    extras: Vec<Box<dyn ScreenExtra>>,
    screensaver: Option<Box<dyn Screensaver>>,
    now_playing: Option<Arc<dyn NowPlaying>>,
    power: Option<Box<dyn PowerHooks>>,
    help_rendered_early: bool,
}

impl Default for Window {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Window {
    pub fn new(settings: Settings) -> Self {
        let channel = UiChannel::new();
        channel.set_default_duration_secs(settings.get_int(config::DISPLAY_TITLES_TIME));
        let handle = channel.handle();
        Self {
            stack: ScreenStack::new(),
            channel,
            handle,
            idle: IdleStateMachine::new(settings.screensaver_time_ms()),
            pacer: FramePacer::new(),
            settings,
            bindings: KeyBindings::default(),
            theme: Theme::default(),
            help_bar: HelpBar::new(),
            info_popup: None,
            clock: Clock::new(),
            activity: ActivityIndicator::new(),
            log_tail: None,
            frame_stats: None,
            extras: Vec::new(),
            screensaver: None,
            now_playing: None,
            power: None,
            help_rendered_early: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Changes to the idle threshold or the default notification duration
    /// take effect after [`Window::reload_settings`].
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn reload_settings(&mut self) {
        self.idle
            .set_threshold_ms(self.settings.screensaver_time_ms());
        self.channel
            .set_default_duration_secs(self.settings.get_int(config::DISPLAY_TITLES_TIME));
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_screensaver(&mut self, screensaver: Box<dyn Screensaver>) {
        self.cancel_screensaver();
        self.screensaver = Some(screensaver);
    }

    pub fn set_now_playing(&mut self, source: Arc<dyn NowPlaying>) {
        self.now_playing = Some(source);
    }

    pub fn set_power_hooks(&mut self, hooks: Box<dyn PowerHooks>) {
        self.power = Some(hooks);
    }

    /// Show the tail of `log` while `DrawLog` is on.
    pub fn set_log_buffer(&mut self, log: LogBuffer) {
        self.log_tail = Some(LogTail::new(log));
    }

    // -- screen stack --

    pub fn push_screen<S: Screen + 'static>(&mut self, screen: S) -> ScreenId {
        self.push_boxed(Box::new(screen))
    }

    pub fn push_boxed(&mut self, screen: Box<dyn Screen>) -> ScreenId {
        let id = self.stack.push(screen);
        self.refresh_help_if_dirty();
        id
    }

    /// Push with a short horizontal slide from the previous top.
    pub fn push_sliding<S: Screen + 'static>(&mut self, screen: S) -> ScreenId {
        let id = self.stack.push_sliding(Box::new(screen));
        self.refresh_help_if_dirty();
        id
    }

    /// Remove `id` wherever it sits in the stack. Absent ids are ignored.
    pub fn remove_screen(&mut self, id: ScreenId) -> Option<Box<dyn Screen>> {
        let removed = self.stack.pop(id);
        self.refresh_help_if_dirty();
        removed
    }

    pub fn peek(&self) -> Option<ScreenId> {
        self.stack.top()
    }

    pub fn stack(&self) -> &ScreenStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut ScreenStack {
        &mut self.stack
    }

    pub fn is_processing(&self) -> bool {
        self.stack.is_processing() || self.extras.iter().any(|extra| extra.is_processing())
    }

    // -- cross-thread mailbox --

    /// Producer handle for background threads.
    pub fn handle(&self) -> UiHandle<Window> {
        self.handle.clone()
    }

    pub fn display_notification(&self, text: impl Into<String>, duration_ms: i64) {
        self.handle.display_notification(text, duration_ms);
    }

    pub fn post_to_ui_thread<F>(&self, func: F)
    where
        F: FnOnce(&mut Window) + Send + 'static,
    {
        self.handle.post_to_ui_thread(func);
    }

    pub fn register_notification(&self, component: Arc<dyn AsyncNotification>) -> bool {
        self.handle.register_notification(component)
    }

    pub fn unregister_notification(&self, component: &Arc<dyn AsyncNotification>) -> bool {
        self.handle.unregister_notification(component)
    }

    /// Run everything posted so far. Work posted by these functions waits
    /// for the next call.
    pub fn process_posted_functions(&mut self) {
        let functions = self.channel.take_deferred();
        if functions.is_empty() {
            return;
        }
        tracing::debug!(count = functions.len(), "running posted functions");
        for func in functions {
            func(self);
        }
    }

    fn process_song_title(&mut self) {
        if !self.settings.get_bool(config::DISPLAY_TITLES) {
            return;
        }
        let Some(title) = self.now_playing.as_ref().and_then(|np| np.take_song_name()) else {
            return;
        };
        self.display_notification(title, 0);
    }

    fn process_notification_message(&mut self) {
        if let Some(message) = self.channel.pop_next_message() {
            tracing::debug!(
                text = %message.text,
                duration_ms = message.duration_ms,
                "showing notification"
            );
            self.info_popup = Some(InfoPopup::new(message));
        }
    }

    pub fn info_popup(&self) -> Option<&InfoPopup> {
        self.info_popup.as_ref()
    }

    pub fn stop_info_popup(&mut self) {
        self.info_popup = None;
    }

    // -- help prompts --

    pub fn help_prompts(&self) -> &[HelpPrompt] {
        self.help_bar.prompts()
    }

    /// Replace the help bar contents. The list is aggregated before display.
    pub fn set_help_prompts(&mut self, prompts: Vec<HelpPrompt>, style: Option<HelpStyle>) {
        self.help_bar.set_prompts(prompts, style);
        self.clock.force_refresh();
    }

    /// Rebuild the help bar from the top screen.
    pub fn refresh_help(&mut self) {
        let Some(top) = self.stack.top_screen() else {
            self.help_bar.clear();
            return;
        };
        let mut prompts = top.help_prompts();
        if top.is_modal() {
            prompts.push(HelpPrompt::new(MODAL_BACK_GLYPH, MODAL_BACK_ACTION));
        }
        let style = top.help_style();
        self.set_help_prompts(prompts, style);
    }

    fn refresh_help_if_dirty(&mut self) {
        if self.stack.take_help_refresh() {
            self.refresh_help();
        }
    }

    // -- idle, screensaver and sleep --

    pub fn normalize_next_update(&mut self) {
        self.pacer.normalize_next_update();
    }

    pub fn allow_sleep(&self) -> bool {
        self.idle.allow_sleep()
    }

    pub fn set_allow_sleep(&mut self, allow: bool) {
        self.idle.set_allow_sleep(allow);
    }

    pub fn is_sleeping(&self) -> bool {
        self.idle.is_sleeping()
    }

    pub fn is_screensaver_active(&self) -> bool {
        self.idle.is_screensaver_active()
    }

    pub fn idle(&self) -> &IdleStateMachine {
        &self.idle
    }

    /// Start the installed screensaver. Returns false when none is
    /// installed or it is already running.
    pub fn start_screensaver(&mut self) -> bool {
        let Some(saver) = self.screensaver.as_mut() else {
            return false;
        };
        if !self.idle.enter_screensaver() {
            return false;
        }
        self.stack.for_each_mut(|screen| screen.on_screensaver_activate());
        for extra in &mut self.extras {
            extra.on_screensaver_activate();
        }
        saver.start();
        tracing::info!("screensaver activated");
        true
    }

    /// Returns true if a running screensaver was stopped.
    pub fn cancel_screensaver(&mut self) -> bool {
        if !self.idle.leave_screensaver() {
            return false;
        }
        self.screensaver_stopped();
        true
    }

    fn screensaver_stopped(&mut self) {
        if let Some(saver) = self.screensaver.as_mut() {
            saver.stop();
            saver.reset_counts();
        }
        self.stack
            .for_each_mut(|screen| screen.on_screensaver_deactivate());
        for extra in &mut self.extras {
            extra.on_screensaver_deactivate();
        }
        tracing::info!("screensaver deactivated");
    }

    fn update_idle(&mut self) {
        if !self.idle.threshold_reached() {
            return;
        }
        self.start_screensaver();
        let busy = self.is_processing();
        let permits = self
            .screensaver
            .as_ref()
            .is_none_or(|saver| saver.allow_sleep());
        if self.idle.should_sleep(busy, permits) && self.idle.enter_sleep() {
            tracing::info!("going to sleep");
            if let Some(power) = self.power.as_mut() {
                power.on_sleep();
            }
        }
    }

    // -- input --

    pub fn input(&mut self, event: &Event) {
        let input = self.bindings.translate(event);
        self.dispatch(&input);
    }

    pub fn dispatch(&mut self, input: &InputEvent) {
        if self.screensaver_controls(input) {
            return;
        }

        let was_screensaver = self.idle.is_screensaver_active();
        match self.idle.register_input() {
            InputGate::Wake => {
                if was_screensaver {
                    self.screensaver_stopped();
                }
                tracing::info!("waking up");
                if let Some(power) = self.power.as_mut() {
                    power.on_wake();
                }
                return;
            }
            InputGate::CancelScreensaver => {
                self.screensaver_stopped();
                return;
            }
            InputGate::Forward => {}
        }

        if self.debug_toggle(input) {
            return;
        }
        if input.pressed {
            self.activity.on_input();
        }

        match &input.raw {
            Event::Paste(text) => self.stack.text_input(text),
            _ => {
                self.stack.dispatch_input(&self.bindings, input);
            }
        }
        self.refresh_help_if_dirty();
    }

    pub fn text_input(&mut self, text: &str) {
        self.stack.text_input(text);
    }

    /// Browsable screensavers take directional input and select to step
    /// through items and start to launch the current one.
    fn screensaver_controls(&mut self, input: &InputEvent) -> bool {
        if !self.idle.is_screensaver_active()
            || !self.settings.get_bool(config::SCREENSAVER_CONTROLS)
            || !self.settings.screensaver_behavior().is_browsable()
        {
            return false;
        }
        let Some(saver) = self.screensaver.as_mut() else {
            return false;
        };
        if saver.current_item().is_none() {
            return false;
        }
        if input.is_directional() || input.is(InputAction::Select) {
            if input.pressed {
                saver.advance_to_next();
            }
            return true;
        }
        if input.is(InputAction::Start) && input.pressed {
            self.idle.register_input();
            self.screensaver_stopped();
            if let Some(saver) = self.screensaver.as_mut() {
                saver.launch_current_item();
            }
            // The next input runs the wake handshake.
            self.idle.enter_sleep();
            return true;
        }
        false
    }

    fn debug_toggle(&mut self, input: &InputEvent) -> bool {
        let Some(key) = input.key() else {
            return false;
        };
        if key.kind != KeyEventKind::Press || !key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        let setting = match key.code {
            KeyCode::Char('f') => config::DRAW_FRAMERATE,
            KeyCode::Char('l') => config::DRAW_LOG,
            _ => return false,
        };
        let enabled = self.settings.toggle(setting);
        tracing::debug!(setting, enabled, "toggled overlay");
        true
    }

    // -- per-tick update --

    pub fn update(&mut self, delta_ms: u32) {
        self.process_posted_functions();
        self.process_song_title();
        self.process_notification_message();

        let delta_ms = self.pacer.advance(delta_ms);
        if self.settings.get_bool(config::DRAW_FRAMERATE) {
            self.frame_stats = self.pacer.last_stats().map(|stats| stats.label());
        }
        if self.settings.get_bool(config::DRAW_CLOCK) {
            self.clock.update(delta_ms);
        }
        self.activity.update(delta_ms);
        if let Some(popup) = self.info_popup.as_mut() {
            popup.update(delta_ms);
            if popup.expired() {
                self.info_popup = None;
            }
        }

        self.idle.advance(delta_ms);
        self.stack.update(delta_ms);
        self.refresh_help_if_dirty();
        if let Some(saver) = self.screensaver.as_mut() {
            saver.update(delta_ms);
        }
        self.update_idle();
    }

    // -- rendering --

    pub fn frame_stats(&self) -> Option<&str> {
        self.frame_stats.as_deref()
    }

    /// Draw the help bar now, underneath whatever is drawn next, and skip
    /// the regular help pass of the following [`Window::render`].
    pub fn render_help_early(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        self.help_bar.render(frame, area, &self.theme);
        self.help_rendered_early = true;
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        let help_done = std::mem::take(&mut self.help_rendered_early);
        let compact = self.stack.len() > 1 && area.width < SMALL_SCREEN_COLUMNS;

        self.stack.render(frame, area, self.theme.wash);

        if !compact && !help_done {
            self.help_bar.render(frame, area, &self.theme);
        }
        if self.settings.get_bool(config::DRAW_FRAMERATE)
            && let Some(stats) = &self.frame_stats
        {
            frame.set_string(area.x, area.y, stats, self.theme.clock);
        }
        if self.settings.get_bool(config::DRAW_LOG)
            && let Some(log) = self.log_tail.as_mut()
        {
            log.render(frame, area, &self.theme);
        }
        if !compact && self.settings.get_bool(config::DRAW_CLOCK) {
            self.clock.render(frame, area, &self.theme);
        }
        if !compact && self.settings.get_bool(config::SHOW_CONTROLLER_ACTIVITY) {
            self.activity.render(frame, area, &self.theme);
        }
        if !self.idle.is_screensaver_active()
            && let Some(popup) = self.info_popup.as_mut()
        {
            popup.render(frame, area, &self.theme);
        }
        self.render_notifications(frame, area);

        // Drawn even when inactive so a screensaver can fade itself out.
        if let Some(saver) = self.screensaver.as_mut() {
            saver.render(frame, area);
        }
        let ctx = ComponentContext::decoration();
        for extra in &mut self.extras {
            extra.render(frame, area, &ctx);
        }
    }

    /// Registered widgets stack down the right edge in registration order.
    fn render_notifications(&self, frame: &mut UiFrame<'_>, area: Rect) {
        let right = area.x.saturating_add(area.width);
        let mut y = area.y.saturating_add(ASYNC_NOTIFICATION_PADDING);
        for widget in self.channel.notifications() {
            let (width, height) = widget.size();
            let width = width.min(area.width.saturating_sub(1));
            if width == 0 || height == 0 {
                continue;
            }
            let rect = Rect::new(right.saturating_sub(width + 1), y, width, height);
            widget.render(frame, rect, &self.theme);
            y = y.saturating_add(height + ASYNC_NOTIFICATION_PADDING);
        }
    }

    pub fn render_loading_screen(
        &self,
        frame: &mut UiFrame<'_>,
        text: &str,
        percent: Option<f32>,
    ) {
        render_loading_screen(frame, &self.theme, LOADING_TITLE, text, percent);
    }

    // -- lifecycle --

    /// Install a new theme and its extras. Extras are drawn in ascending
    /// z-index; equal indices keep their given order.
    pub fn on_theme_changed(&mut self, theme: Theme, mut extras: Vec<Box<dyn ScreenExtra>>) {
        for extra in &mut self.extras {
            extra.on_hide();
        }
        extras.sort_by_key(|extra| extra.z_index());
        for extra in &mut extras {
            extra.on_show();
        }
        tracing::info!(theme = %theme.name, extras = extras.len(), "theme changed");
        self.extras = extras;
        self.theme = theme;
        self.clock.force_refresh();
        self.refresh_help();
    }

    /// Resume after the application regained the display.
    pub fn reactivate(&mut self) {
        for extra in &mut self.extras {
            extra.on_show();
        }
        self.stack.for_each_mut(|screen| screen.on_show());
        self.normalize_next_update();
        self.refresh_help();
    }

    /// Hand the display to something else, e.g. a launched program.
    pub fn suspend(&mut self) {
        self.stack.for_each_mut(|screen| screen.on_hide());
        for extra in &mut self.extras {
            extra.on_hide();
        }
    }
}
