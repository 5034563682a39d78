use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    select_integrations, Config, EntityFilter, Integration, RedditOptions, SpotifyOptions,
    TwitterOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fomo")]
#[command(about = "Consume social media content via CLI")]
struct Args {
    /// Hours since post creation
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    reddit_hours_ago: Option<i64>,

    /// Subreddits to include
    #[arg(long, num_args = 1.., conflicts_with = "reddit_exclude")]
    reddit_include: Option<Vec<String>>,

    /// Subreddits to exclude
    #[arg(long, num_args = 1..)]
    reddit_exclude: Option<Vec<String>>,

    /// Days since release
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    spotify_days_ago: Option<i64>,

    /// Followed artists to include
    #[arg(long, num_args = 1.., conflicts_with = "spotify_exclude")]
    spotify_include: Option<Vec<String>>,

    /// Followed artists to exclude
    #[arg(long, num_args = 1..)]
    spotify_exclude: Option<Vec<String>>,

    /// Hours since tweet creation
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    twitter_hours_ago: Option<i64>,

    /// Users to include
    #[arg(long, num_args = 1.., conflicts_with = "twitter_exclude")]
    twitter_include: Option<Vec<String>>,

    /// Users to exclude
    #[arg(long, num_args = 1..)]
    twitter_exclude: Option<Vec<String>>,

    /// Include retweets
    #[arg(long)]
    twitter_retweets: bool,

    /// Include replies
    #[arg(long)]
    twitter_replies: bool,

    /// Integrations to include
    #[arg(long, value_enum, num_args = 1.., conflicts_with = "integrations_exclude")]
    integrations_include: Option<Vec<Integration>>,

    /// Integrations to exclude
    #[arg(long, value_enum, num_args = 1..)]
    integrations_exclude: Option<Vec<Integration>>,
}

impl Args {
    fn reddit_options(&self, config: &Config) -> RedditOptions {
        RedditOptions {
            hours_ago: self.reddit_hours_ago.unwrap_or(config.reddit_hours_ago),
            subreddits: EntityFilter::new(self.reddit_include.clone(), self.reddit_exclude.clone()),
            timezone: config.timezone,
        }
    }

    fn spotify_options(&self, config: &Config) -> SpotifyOptions {
        SpotifyOptions {
            days_ago: self.spotify_days_ago.unwrap_or(config.spotify_days_ago),
            artists: EntityFilter::new(self.spotify_include.clone(), self.spotify_exclude.clone()),
        }
    }

    fn twitter_options(&self, config: &Config) -> TwitterOptions {
        TwitterOptions {
            hours_ago: self.twitter_hours_ago.unwrap_or(config.twitter_hours_ago),
            users: EntityFilter::new(self.twitter_include.clone(), self.twitter_exclude.clone()),
            include_retweets: self.twitter_retweets,
            include_replies: self.twitter_replies,
            timezone: config.timezone,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = Config::from_env()?;

    let integrations = select_integrations(
        &config.enabled_integrations,
        args.integrations_include.as_deref(),
        args.integrations_exclude.as_deref(),
    );

    if integrations.is_empty() {
        println!("No integrations to run. Check ENABLED_INTEGRATIONS and --integrations-* flags.");
        return Ok(());
    }

    for integration in integrations {
        tracing::info!(%integration, "running integration");

        let result = match integration {
            Integration::Reddit => shared::reddit::run(&args.reddit_options(&config)).await,
            Integration::Spotify => shared::spotify::run(&args.spotify_options(&config)).await,
            Integration::Twitter => shared::twitter::run(&args.twitter_options(&config)).await,
        };
        result.with_context(|| format!("The {} integration failed", integration))?;

        println!();
    }

    Ok(())
}
