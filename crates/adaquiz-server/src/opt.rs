use std::net::IpAddr;

use adaquiz_utils::args::llm::LlmArgs;
use adaquiz_utils::args::session::SessionArgs;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "adaquiz", about = "Serve adaptive quizzes generated by a language model")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Run(Run),
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct Run {
    #[arg(long, env = "HOST")]
    pub(crate) host: Option<IpAddr>,

    #[arg(short, long, env = "PORT")]
    pub(crate) port: Option<u16>,

    #[command(flatten)]
    pub(crate) llm: LlmArgs,

    #[command(flatten)]
    pub(crate) session: SessionArgs,

    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        help = "Origins allowed to call the api, any origin if empty"
    )]
    pub(crate) origins: Vec<String>,

    #[arg(long = "sentry-dsn", env = "SENTRY_DSN", help = "Sentry url")]
    pub(crate) sentry_dsn: Option<String>,

    #[arg(
        long,
        env = "APP_ENV",
        default_value = "dev",
        help = "Set the environment used by sentry and prometheus"
    )]
    pub(crate) env: String,
}
