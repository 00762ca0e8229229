use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use campaign_core::{
    update, AppState, AppViewModel, CoreSettings, FormField, Msg, PollPhase, SessionView,
};
use campaign_engine::{CampaignApi, EngineHandle, ReqwestCampaignApi, SimulatedBackend};
use engine_logging::{clear_active_task, engine_error, engine_info, set_active_task};

use super::cli::{Cli, Command, ComposeArgs, SendArgs, StatusArgs, TestArgs};
use super::config::{self, AppConfig};
use super::effects::EffectRunner;
use super::logging;
use super::ui::{prompt, render::Renderer};

const EVENT_WAIT: Duration = Duration::from_millis(250);

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::initialize(cli.log.into());

    let mut config = config::load(cli.config.as_deref());
    if let Some(url) = cli.api_base_url {
        config.api_base_url = url;
    }

    match cli.command {
        Command::Send(args) => run_send(&config, cli.simulate, args),
        Command::Test(args) => run_test(&config, cli.simulate, args),
        Command::Status(args) => run_status(&config, cli.simulate, args),
    }
}

/// Owns the core state and feeds it messages, rendering whenever it changes.
struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
}

impl Session {
    fn new(settings: CoreSettings, engine: EngineHandle) -> Self {
        Self {
            state: AppState::with_settings(settings),
            runner: EffectRunner::new(engine),
            renderer: Renderer::new(),
        }
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            match &view.session {
                SessionView::Tracking { task_id, phase, .. } if !phase.is_terminal() => {
                    set_active_task(task_id.as_str())
                }
                _ => clear_active_task(),
            }
            for line in self.renderer.render(&view) {
                println!("{line}");
            }
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn next_msg(&self) -> Option<Msg> {
        self.runner.next_msg(EVENT_WAIT)
    }

    fn compose(&mut self, fields: Vec<FormField>) {
        for field in fields {
            self.dispatch(Msg::FormEdited(field));
        }
    }
}

fn run_send(config: &AppConfig, simulate: bool, args: SendArgs) -> anyhow::Result<ExitCode> {
    let mut settings = config.core_settings();
    settings.strategy = args.strategy.into();
    if let Some(ms) = args.interval_ms {
        settings.poll_interval = Duration::from_millis(ms);
    }
    if let Some(max) = args.max_recipients {
        settings.limits.max_recipients = max;
    }
    if let Some(threshold) = args.warn_threshold {
        settings.limits.warn_threshold = threshold;
    }

    let recipients = read_recipients(&args.recipients)?;
    let fields = compose_fields(&args.compose)?;
    let mut session = Session::new(settings, start_engine(config, simulate)?);
    session.compose(fields);
    session.dispatch(Msg::FormEdited(FormField::Recipients(recipients)));
    session.dispatch(Msg::SendClicked);

    loop {
        let view = session.view();
        if let Some(question) = &view.confirmation {
            let confirmed = args.yes || ask(question)?;
            if !confirmed {
                engine_info!("Campaign cancelled at confirmation");
            }
            session.dispatch(Msg::ConfirmationAnswered { confirmed });
            continue;
        }
        match &view.session {
            // Refused by the guard, declined, or rejected by the backend.
            SessionView::Idle => return Ok(ExitCode::FAILURE),
            SessionView::Tracking { phase, .. } if phase.is_terminal() => {
                return Ok(if *phase == PollPhase::Completed {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                });
            }
            SessionView::Submitting | SessionView::Tracking { .. } => {
                if let Some(msg) = session.next_msg() {
                    session.dispatch(msg);
                }
            }
        }
    }
}

fn run_test(config: &AppConfig, simulate: bool, args: TestArgs) -> anyhow::Result<ExitCode> {
    let fields = compose_fields(&args.compose)?;
    let mut session = Session::new(config.core_settings(), start_engine(config, simulate)?);
    session.compose(fields);
    session.dispatch(Msg::TestEmailRequested { recipient: args.to });

    let mut delivered = false;
    while session.view().test_pending {
        if let Some(msg) = session.next_msg() {
            delivered = matches!(msg, Msg::TestEmailSent { .. });
            session.dispatch(msg);
        }
    }
    Ok(if delivered {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_status(config: &AppConfig, simulate: bool, args: StatusArgs) -> anyhow::Result<ExitCode> {
    // A simulated backend lives only as long as one process, so it has no stored campaigns.
    if simulate {
        anyhow::bail!("`status` queries stored campaigns and cannot run with --simulate");
    }
    let api = ReqwestCampaignApi::new(config.client_settings())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building status runtime")?;

    match runtime.block_on(api.campaign_status(args.campaign_id)) {
        Ok(summary) => {
            println!(
                "Campaign {}: {} | Total: {} | Sent: {} | Failed: {}",
                summary.campaign_id, summary.status, summary.total, summary.sent, summary.failed
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            engine_error!("Campaign status query failed ({}): {}", err.kind, err);
            eprintln!("Failed to get campaign status: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn start_engine(config: &AppConfig, simulate: bool) -> anyhow::Result<EngineHandle> {
    if simulate {
        engine_info!("Using the simulated backend");
        EngineHandle::with_api(Arc::new(SimulatedBackend::default()))
            .context("starting the engine thread")
    } else {
        engine_info!("Using backend at {}", config.api_base_url);
        EngineHandle::new(config.client_settings()).context("starting the engine")
    }
}

fn ask(question: &str) -> anyhow::Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    Ok(prompt::confirm(question, &mut input, &mut output)?)
}

fn read_recipients(source: &Path) -> anyhow::Result<String> {
    if source == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading recipients from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(source)
        .with_context(|| format!("reading recipients from {}", source.display()))
}

fn compose_fields(compose: &ComposeArgs) -> anyhow::Result<Vec<FormField>> {
    let body = match (&compose.body, &compose.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("reading body from {}", path.display()))?,
        (None, None) => String::new(),
    };
    Ok(vec![
        FormField::SenderEmail(compose.from.clone()),
        FormField::SenderName(compose.from_name.clone()),
        FormField::Subject(compose.subject.clone()),
        FormField::Body(body),
        FormField::IsHtml(compose.html),
    ])
}
