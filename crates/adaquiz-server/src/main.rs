use std::env;
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use adaquiz_core::flashcards::{FlashcardGenerator, LlmFlashcardGenerator};
use adaquiz_core::llm_config::LlmConfig;
use adaquiz_core::quiz::generator::{LlmQuestionGenerator, QuestionGenerator};
use adaquiz_core::quiz::store::SessionStore;
use adaquiz_utils::net::create_listener;
use adaquiz_utils::tracing::TracingConfig;
use anyhow::Result;
use axum::serve;
use clap::Parser;

use crate::opt::{Commands, Run};

mod app;
mod opt;
mod routes;
mod session;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3030;

pub(crate) struct InnerAppState {
    questions: Arc<dyn QuestionGenerator>,
    flashcards: Arc<dyn FlashcardGenerator>,
    sessions: SessionStore,
}

#[derive(Clone)]
pub(crate) struct AppState(Arc<InnerAppState>);

impl AppState {
    pub(crate) fn new(
        questions: Arc<dyn QuestionGenerator>,
        flashcards: Arc<dyn FlashcardGenerator>,
        sessions: SessionStore,
    ) -> Self {
        Self(Arc::new(InnerAppState {
            questions,
            flashcards,
            sessions,
        }))
    }

    pub fn questions(&self) -> &dyn QuestionGenerator {
        self.0.questions.as_ref()
    }

    pub fn flashcards(&self) -> &dyn FlashcardGenerator {
        self.0.flashcards.as_ref()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.0.sessions
    }
}

async fn run(opt: Run) -> Result<()> {
    let _guard = adaquiz_utils::tracing::setup(
        TracingConfig::builder()
            .package(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .sentry_dsn(opt.sentry_dsn)
            .env(opt.env)
            .build(),
    )?;

    let llm_config = LlmConfig::try_from(opt.llm)
        .inspect_err(|error| tracing::error!(error = error as &dyn Error, "invalid llm configuration"))?;
    tracing::info!(base = %llm_config.provider().get_base(), model = llm_config.get_model(), "using llm");
    let llm_config = Arc::new(llm_config);

    let sessions = SessionStore::new(Duration::from_secs(opt.session.session_ttl_secs));
    app::spawn_session_pruner(sessions.clone(), Duration::from_secs(opt.session.prune_interval_secs));

    let state = AppState::new(
        Arc::new(LlmQuestionGenerator::new(Arc::clone(&llm_config))),
        Arc::new(LlmFlashcardGenerator::new(llm_config)),
        sessions,
    );
    let app = app::create_app(state, &opt.origins)?;

    let listener = create_listener((opt.host, opt.port), SocketAddr::new(DEFAULT_HOST, DEFAULT_PORT)).await?;

    let service = app.into_make_service();
    tracing::info!(local_addr = %listener.local_addr()?, "starting app");
    serve(listener, service).await?;
    Ok(())
}

fn main() -> Result<()> {
    unsafe { env::set_var("RUST_BACKTRACE", "1") };

    // Running without a .env file is the normal case in production
    let _ = dotenv::dotenv();

    let main = async {
        let opt = opt::Cli::parse();

        match opt.command {
            Commands::Run(o) => run(o).await?,
        }
        Ok(())
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(main)
}
