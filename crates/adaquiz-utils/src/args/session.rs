use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    #[arg(
        long,
        env = "SESSION_TTL_SECS",
        default_value_t = 1800,
        help = "Idle time after which a quiz session is dropped"
    )]
    pub session_ttl_secs: u64,

    #[arg(long, env = "SESSION_PRUNE_INTERVAL_SECS", default_value_t = 60)]
    pub prune_interval_secs: u64,
}
