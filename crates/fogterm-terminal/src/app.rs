//! Application runner.
//!
//! The [`Application`] owns the control tree, the terminal and the focus
//! manager. Input arrives from an [`InputSource`] thread over a bounded
//! queue; every layout and paint pass runs on the thread that called
//! [`Application::run`], one key at a time.

use crate::config::AppConfig;
use crate::error::TuiError;
use crate::input::KeyBinding;
use crate::input_source::{CrosstermEvents, InputEvent, InputSource};
use crate::terminal::Terminal;
use fogterm_core::{
    tab_order, ControlId, ControlTree, DrawOptions, FocusError, FocusManager, KeyInfo, KeyOutcome,
    NavigationMode, Rect, RedrawReason, TreeEvent,
};
use std::sync::mpsc::RecvTimeoutError;
use tracing::{debug, trace, warn};

/// Drain rounds per pass. Focus rebuilds and widget hooks queue follow-up
/// events.
const MAX_DRAIN_ROUNDS: usize = 16;

/// Drives a control tree on a terminal.
#[derive(Debug)]
pub struct Application<T: Terminal> {
    tree: ControlTree,
    root: ControlId,
    terminal: T,
    config: AppConfig,
    focus: Option<FocusManager>,
    options: DrawOptions,
    extent: Rect,
    running: bool,
    last_key: Option<KeyInfo>,
}

impl<T: Terminal> Application<T> {
    /// Create an application for the tree below `root`.
    ///
    /// The configured colors are copied into every inheriting color slot
    /// below the root.
    ///
    /// # Errors
    ///
    /// Fails if `root` is unknown, is not a container or sits inside
    /// another container.
    pub fn new(
        mut tree: ControlTree,
        root: ControlId,
        terminal: T,
        config: AppConfig,
    ) -> Result<Self, TuiError> {
        let control = tree.get(root)?;
        if !control.is_container() {
            return Err(FocusError::RootNotContainer(root).into());
        }
        if control.container().is_some() {
            return Err(FocusError::RootHasContainer(root).into());
        }
        tree.apply_inherited_colors(root, config.fore_color, config.back_color)?;

        let options = if config.debug {
            DrawOptions::debug()
        } else {
            DrawOptions::default()
        };
        let (width, height) = config.fallback_size();
        Ok(Self {
            tree,
            root,
            terminal,
            config,
            focus: None,
            options,
            extent: Rect::from_extent(width, height),
            running: false,
            last_key: None,
        })
    }

    /// The control tree.
    #[must_use]
    pub const fn tree(&self) -> &ControlTree {
        &self.tree
    }

    /// Mutable access to the tree. Changes made while running are picked up
    /// by the next [`Application::process_pending`].
    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    /// Root container.
    #[must_use]
    pub const fn root(&self) -> ControlId {
        self.root
    }

    /// The terminal.
    #[must_use]
    pub const fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Mutable access to the terminal.
    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Focus manager, if one was installed.
    #[must_use]
    pub const fn focus_manager(&self) -> Option<&FocusManager> {
        self.focus.as_ref()
    }

    /// Currently focused control.
    #[must_use]
    pub fn focused(&self) -> Option<ControlId> {
        self.focus.as_ref().and_then(FocusManager::focused)
    }

    /// Terminal area the root is laid out in.
    #[must_use]
    pub const fn extent(&self) -> Rect {
        self.extent
    }

    /// Whether [`Application::start`] ran and [`Application::stop`] did not.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Install a focus manager built on this application's tree.
    ///
    /// # Errors
    ///
    /// [`TuiError::AlreadyRunning`] once started.
    pub fn set_focus_manager(&mut self, manager: FocusManager) -> Result<(), TuiError> {
        if self.running {
            return Err(TuiError::AlreadyRunning);
        }
        self.focus = Some(manager);
        Ok(())
    }

    /// Install a focus manager starting at the first control in tab order.
    ///
    /// Returns `false` if nothing below the root accepts input.
    ///
    /// # Errors
    ///
    /// [`TuiError::AlreadyRunning`] once started.
    pub fn focus_first(&mut self, mode: NavigationMode) -> Result<bool, TuiError> {
        if self.running {
            return Err(TuiError::AlreadyRunning);
        }
        let Some(&first) = tab_order(&self.tree, self.root).first() else {
            return Ok(false);
        };
        let manager = FocusManager::new(&mut self.tree, self.root, first, mode)?;
        self.focus = Some(manager);
        Ok(true)
    }

    /// Lay out and paint the whole tree, then start listening for changes.
    ///
    /// # Errors
    ///
    /// [`TuiError::AlreadyRunning`] if called twice, otherwise terminal,
    /// layout and paint failures.
    pub fn start(&mut self) -> Result<(), TuiError> {
        if self.running {
            return Err(TuiError::AlreadyRunning);
        }
        self.terminal.enter()?;

        let (width, height) = self.terminal.size().unwrap_or_else(|| {
            let fallback = self.config.fallback_size();
            warn!(
                width = fallback.0,
                height = fallback.1,
                "terminal size unavailable, using fallback"
            );
            fallback
        });
        self.extent = Rect::from_extent(width, height);
        if let Some(palette) = self.options.debug.as_mut() {
            palette.reset();
        }
        self.repaint_all()?;

        self.tree.drain_events();
        self.tree.subscribe();
        self.running = true;
        debug!(root = %self.root, extent = ?self.extent, "application started");
        Ok(())
    }

    /// Stop listening for changes and release the terminal. Calling it on
    /// a stopped application does nothing.
    ///
    /// # Errors
    ///
    /// Terminal failures while leaving the alternate screen.
    pub fn stop(&mut self) -> Result<(), TuiError> {
        if !self.running {
            return Ok(());
        }
        self.running = false;
        self.tree.unsubscribe();
        self.terminal.leave()?;
        debug!(root = %self.root, "application stopped");
        Ok(())
    }

    /// Repaint whatever the queued tree events require.
    ///
    /// Returns the number of events handled.
    ///
    /// # Errors
    ///
    /// [`TuiError::NotRunning`] before [`Application::start`], otherwise
    /// layout, paint and focus failures.
    pub fn process_pending(&mut self) -> Result<usize, TuiError> {
        if !self.running {
            return Err(TuiError::NotRunning);
        }
        let mut handled = 0;
        for _ in 0..MAX_DRAIN_ROUNDS {
            let events = self.tree.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.handle_tree_event(event)?;
                handled += 1;
            }
        }
        if handled > 0 {
            self.draw_status()?;
            self.terminal.surface().flush()?;
        }
        Ok(handled)
    }

    /// Deliver one key press.
    ///
    /// The focused control gets first refusal; keys it ignores go to the
    /// focus manager if it declares them. Returns whether anyone handled
    /// the key.
    ///
    /// # Errors
    ///
    /// [`TuiError::NotRunning`] before [`Application::start`], otherwise
    /// handler and repaint failures.
    pub fn dispatch_key(&mut self, info: &KeyInfo) -> Result<bool, TuiError> {
        if !self.running {
            return Err(TuiError::NotRunning);
        }
        self.last_key = Some(*info);

        let mut handled = false;
        if let Some(id) = self.focused() {
            if self.tree.get(id)?.is_focused() {
                handled = self.tree.handle_key(id, info)? != KeyOutcome::Ignored;
            }
        }
        if !handled {
            if let Some(manager) = self.focus.as_mut() {
                if manager.handles(info.key) {
                    manager.handle_key(&mut self.tree, info.key)?;
                    handled = true;
                }
            }
        }
        trace!(key = %info.key, handled, "key dispatched");

        self.process_pending()?;
        if self.config.debug {
            self.draw_status()?;
            self.terminal.surface().flush()?;
        }
        Ok(handled)
    }

    /// Relayout the whole tree for a new terminal size.
    ///
    /// # Errors
    ///
    /// [`TuiError::NotRunning`] before [`Application::start`], otherwise
    /// layout and paint failures.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), TuiError> {
        if !self.running {
            return Err(TuiError::NotRunning);
        }
        debug!(width, height, "terminal resized");
        self.extent = Rect::from_extent(width, height);
        self.repaint_all()?;
        self.process_pending()?;
        Ok(())
    }

    /// Handle one event from the input thread. Returns `true` for the quit
    /// key.
    ///
    /// # Errors
    ///
    /// Same as [`Application::dispatch_key`] and [`Application::resize`].
    pub fn handle_event(&mut self, event: InputEvent) -> Result<bool, TuiError> {
        match event {
            InputEvent::Key(info) if self.config.quit_key.matches(&info) => {
                debug!(key = %self.config.quit_key, "quit key pressed");
                Ok(true)
            }
            InputEvent::Key(info) => self.dispatch_key(&info).map(|_| false),
            InputEvent::Resize(width, height) => self.resize(width, height).map(|()| false),
        }
    }

    /// Run on the real terminal until the quit key arrives.
    ///
    /// # Errors
    ///
    /// Any failure of the loop; the application is stopped either way.
    pub fn run(&mut self) -> Result<(), TuiError> {
        let mut input = InputSource::spawn(
            CrosstermEvents,
            self.config.poll_interval(),
            self.config.input_queue,
        )?;
        self.run_with_input(&mut input)
    }

    /// Run with events from `input` until the quit key arrives or the input
    /// thread ends, then stop both.
    ///
    /// # Errors
    ///
    /// Any failure of the loop; the application is stopped either way.
    pub fn run_with_input(&mut self, input: &mut InputSource) -> Result<(), TuiError> {
        self.run_with(input, |_| Ok(()))
    }

    /// Like [`Application::run_with_input`], calling `after_event` after
    /// every handled event. Tree changes it makes are painted before the
    /// next event is read.
    ///
    /// # Errors
    ///
    /// Any failure of the loop or of `after_event`; the application is
    /// stopped either way.
    pub fn run_with<F>(
        &mut self,
        input: &mut InputSource,
        mut after_event: F,
    ) -> Result<(), TuiError>
    where
        F: FnMut(&mut Self) -> Result<(), TuiError>,
    {
        if !self.running {
            self.start()?;
        }
        let result = self.event_loop(input, &mut after_event);
        input.stop();
        let stopped = self.stop();
        result.and(stopped)
    }

    fn event_loop<F>(&mut self, input: &InputSource, after_event: &mut F) -> Result<(), TuiError>
    where
        F: FnMut(&mut Self) -> Result<(), TuiError>,
    {
        loop {
            match input.recv_timeout(self.config.poll_interval()) {
                Ok(event) => {
                    if self.handle_event(event)? {
                        return Ok(());
                    }
                    after_event(self)?;
                    self.process_pending()?;
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.process_pending()?;
                }
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }
    }

    fn repaint_all(&mut self) -> Result<(), TuiError> {
        self.terminal.set_extent(self.extent.width, self.extent.height);
        self.tree.compute_boundary(self.root, 0, 0, self.extent)?;
        let back = self.tree.get(self.root)?.back_color();
        self.terminal.clear(back)?;
        self.tree.draw(self.root, self.terminal.surface(), &mut self.options)?;
        self.draw_status()?;
        self.terminal.surface().flush()?;
        Ok(())
    }

    fn handle_tree_event(&mut self, event: TreeEvent) -> Result<(), TuiError> {
        trace!(?event, "handling tree event");
        match event {
            TreeEvent::Redraw { id, reason } => self.redraw(id, reason),
            TreeEvent::ChildAdded { container, .. } | TreeEvent::ChildRemoved { container, .. } => {
                if self.in_tree(container) {
                    self.relayout_and_draw(container)?;
                    self.rebuild_focus()?;
                }
                Ok(())
            }
            TreeEvent::TabOrderChanged { id } => {
                if self.in_tree(id) {
                    self.rebuild_focus()?;
                }
                Ok(())
            }
            TreeEvent::FocusChanged { .. } => Ok(()),
        }
    }

    fn redraw(&mut self, id: ControlId, reason: RedrawReason) -> Result<(), TuiError> {
        if !self.in_tree(id) {
            return Ok(());
        }
        if id == self.root {
            return if reason == RedrawReason::ContentChanged {
                self.paint(id)
            } else {
                self.repaint_all()
            };
        }
        if reason.needs_container_repaint() {
            if let Some(container) = self.tree.container_of(id)? {
                return self.relayout_and_draw(container);
            }
        }
        if reason == RedrawReason::BecameBigger {
            return self.relayout_and_draw(id);
        }
        self.paint(id)
    }

    fn relayout_and_draw(&mut self, id: ControlId) -> Result<(), TuiError> {
        if id == self.root {
            return self.repaint_all();
        }
        // queued before an attach; the pending ChildAdded lays it out
        if self.tree.get(id)?.boundary().is_none() {
            trace!(%id, "relayout skipped, not laid out yet");
            return Ok(());
        }
        self.tree.relayout(id)?;
        self.tree.draw(id, self.terminal.surface(), &mut self.options)?;
        Ok(())
    }

    /// Draw `id` without a layout pass unless part of its subtree was
    /// attached since the last one.
    fn paint(&mut self, id: ControlId) -> Result<(), TuiError> {
        if self.tree.get(id)?.boundary().is_none() {
            trace!(%id, "paint skipped, not laid out yet");
            return Ok(());
        }
        if !self.laid_out(id) {
            self.tree.relayout(id)?;
        }
        self.tree.draw(id, self.terminal.surface(), &mut self.options)?;
        Ok(())
    }

    fn laid_out(&self, id: ControlId) -> bool {
        let Ok(control) = self.tree.get(id) else {
            return false;
        };
        control.boundary().is_some()
            && control.children().iter().all(|&child| self.laid_out(child))
    }

    fn rebuild_focus(&mut self) -> Result<(), TuiError> {
        if let Some(manager) = self.focus.as_mut() {
            manager.rebuild(&mut self.tree)?;
        }
        Ok(())
    }

    fn in_tree(&self, id: ControlId) -> bool {
        self.tree.exists(id) && self.tree.is_under(id, self.root)
    }

    fn draw_status(&mut self) -> Result<(), TuiError> {
        if !self.config.debug || self.extent.height < 2 {
            return Ok(());
        }
        let key = self
            .last_key
            .map(|info| KeyBinding::new(info.key, info.modifiers).to_string())
            .unwrap_or_default();
        let focused = self
            .focused()
            .and_then(|id| self.tree.get(id).ok())
            .map(|control| control.name().to_string())
            .unwrap_or_default();

        let width = usize::from(self.extent.width);
        let bottom = self.extent.bottom();
        let (fore, back) = (self.config.fore_color, self.config.back_color);
        for (row, text) in [
            (bottom - 2, format!("Key pressed: {key}")),
            (bottom - 1, format!("Focused: {focused}")),
        ] {
            let line = format!("{text:<width$}");
            self.terminal
                .surface()
                .write(0, row, &line, Some(self.extent), fore, back)?;
        }
        Ok(())
    }
}
