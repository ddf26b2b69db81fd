//! fogterm-demo: two group boxes with a counter, buttons and a progress bar.
//!
//! Run: cargo run -p fogterm-terminal --features demo --bin fogterm-demo
//!
//! Tab and the arrow keys move focus, Space or Enter press a button and
//! Ctrl+C quits. Logs go to `fogterm-demo.log`; set `FOGTERM_LOG=debug`
//! for layout and focus traces.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use clap::Parser;
use fogterm_core::{Control, ControlId, ControlTree, NavigationMode};
use fogterm_terminal::{
    AppConfig, Application, CrosstermEvents, CrosstermTerminal, InputSource, TuiError,
};
use fogterm_widgets::{Alignment, Button, Label, ProgressBar};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// fogterm widget demo
#[derive(Parser)]
#[command(name = "fogterm-demo", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Cycle panel colors and show key/focus status lines
    #[arg(long)]
    debug: bool,

    /// Directory for the log file
    #[arg(long, value_name = "DIR", default_value = ".")]
    log_dir: PathBuf,
}

/// What a button press asks the loop to do.
#[derive(Debug, Clone, Copy)]
enum Action {
    Increment,
    Clear,
    Move,
    Advance,
}

struct Handles {
    status: ControlId,
    progress: ControlId,
    mover: ControlId,
}

fn button(text: &str, action: Action, tx: &Sender<Action>) -> Result<Button, TuiError> {
    let tx = tx.clone();
    Ok(Button::new(text)?.on_press(move || {
        // the receiver only goes away at shutdown
        let _ = tx.send(action);
    }))
}

fn build(tx: &Sender<Action>) -> Result<(ControlTree, ControlId, Handles), TuiError> {
    let mut tree = ControlTree::new();
    let root = tree.insert(Control::panel().with_name("main"));

    let left = tree.insert(
        Control::groupbox("Left Box")?
            .with_name("left")
            .with_position(2, 1)
            .with_size(30, 10),
    );
    let caption = tree.insert(Control::leaf(Label::new("Status:")?).with_name("caption"));
    let status = tree.insert(
        Control::leaf(Label::new("")?.with_alignment(Alignment::Right))
            .with_name("status")
            .with_position(7, 0)
            .with_size(21, 0),
    );
    let increment = tree.insert(
        Control::leaf(button("Increment", Action::Increment, tx)?)
            .with_name("increment")
            .with_position(0, 2),
    );
    let clear = tree.insert(
        Control::leaf(button("Clear", Action::Clear, tx)?)
            .with_name("clear")
            .with_position(0, 3),
    );
    let mover = tree.insert(
        Control::leaf(button("Move", Action::Move, tx)?)
            .with_name("move")
            .with_position(0, 4),
    );
    for child in [caption, status, increment, clear, mover] {
        tree.add(left, child)?;
    }

    let right = tree.insert(
        Control::groupbox("Right Box")?
            .with_name("right")
            .with_position(34, 1)
            .with_size(30, 10),
    );
    let progress = tree.insert(
        Control::leaf(ProgressBar::new())
            .with_name("progress")
            .with_size(26, 0),
    );
    let advance = tree.insert(
        Control::leaf(button("Advance", Action::Advance, tx)?)
            .with_name("advance")
            .with_position(0, 2),
    );
    tree.add(right, progress)?;
    tree.add(right, advance)?;

    tree.add(root, left)?;
    tree.add(root, right)?;

    let handles = Handles {
        status,
        progress,
        mover,
    };
    Ok((tree, root, handles))
}

/// Demo state driven by button presses.
struct Demo {
    handles: Handles,
    actions: Receiver<Action>,
    count: u64,
}

impl Demo {
    fn apply(&mut self, app: &mut Application<CrosstermTerminal>) -> Result<(), TuiError> {
        let tree = app.tree_mut();
        for action in self.actions.try_iter() {
            match action {
                Action::Increment => {
                    self.count += 1;
                    let text = self.count.to_string();
                    tree.update_widget::<Label, _>(self.handles.status, |label| {
                        label.set_text(text)
                    })?;
                }
                Action::Clear => {
                    self.count = 0;
                    tree.update_widget::<Label, _>(self.handles.status, |label| {
                        label.set_text("")
                    })?;
                }
                Action::Move => {
                    let top = i32::from(tree.get(self.handles.mover)?.top());
                    tree.set_top(self.handles.mover, top + 1)?;
                }
                Action::Advance => {
                    let bar = tree.widget::<ProgressBar>(self.handles.progress)?;
                    let value = i32::from(bar.value());
                    let next = if value >= 100 { 0 } else { value + 10 };
                    tree.update_widget::<ProgressBar, _>(self.handles.progress, |bar| {
                        bar.set_value(next)
                    })?;
                }
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), TuiError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.debug |= cli.debug;

    let file_appender = tracing_appender::rolling::never(&cli.log_dir, "fogterm-demo.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env("FOGTERM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    let (tx, actions) = mpsc::channel();
    let (tree, root, handles) = build(&tx)?;
    let terminal = CrosstermTerminal::new(config.resolved_color_mode());
    let mut app = Application::new(tree, root, terminal, config)?;
    app.focus_first(NavigationMode::Spatial)?;

    let mut demo = Demo {
        handles,
        actions,
        count: 0,
    };
    let mut input = InputSource::spawn(
        CrosstermEvents,
        app.config().poll_interval(),
        app.config().input_queue,
    )?;

    info!("fogterm-demo starting");
    app.run_with(&mut input, |app| demo.apply(app))?;
    info!("fogterm-demo finished");
    Ok(())
}
