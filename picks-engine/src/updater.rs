use crate::config::Config;
use crate::demo::demo_games;
use crate::discord::DiscordNotifier;
use crate::odds_api::client::{OddsApiClient, OddsApiError};
use crate::odds_api::{completed_results, extract_game};
use crate::publish::{commit_message, GitPublisher, PublishOutcome};
use crate::site;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use futures::future::join_all;
use odds_processor::analysis::analyze_game;
use odds_processor::parlay::{build_parlay, DEFAULT_LEGS};
use odds_processor::stats::{current_week, GameResult, SeasonTable};
use odds_processor::types::{Game, GameAnalysis, League, Parlay};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Latest report, shared between the scheduler and the HTTP server
pub type SharedReport = Arc<RwLock<Option<Report>>>;

/// Games further out than this are left for next week's run
const SLATE_DAYS: i64 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub run_id: Uuid,
    pub season: i32,
    pub week: u32,
    pub generated_at: DateTime<Utc>,
    pub leagues: Vec<LeagueReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueReport {
    pub league: League,
    pub games: Vec<GameAnalysis>,
    pub parlay: Parlay,
    /// Slate came from the built-in sample lines
    #[serde(default)]
    pub demo: bool,
}

struct LeagueFeed {
    league: League,
    games: Result<Vec<Game>, OddsApiError>,
    results: Result<Vec<GameResult>, OddsApiError>,
}

/// One full pass: record finished scores, analyze the slate, write the
/// site, then alert and publish. Alert and publish failures are logged and
/// do not fail the run.
pub async fn run_update(config: &Config) -> Result<Report> {
    let now = Utc::now();
    let today = now.with_timezone(&config.utc_offset).date_naive();
    let week = current_week(config.season_start, today);
    info!("🔥 Starting update: {} week {}", config.season_year, week);

    let feeds = join_all(League::ALL.iter().map(|&league| fetch_league(config, league))).await;

    let mut fresh = Vec::new();
    for feed in &feeds {
        match &feed.results {
            Ok(results) => fresh.extend(with_weeks(results, config.season_start, config.utc_offset)),
            Err(e) => warn!("Failed to fetch {} scores: {}", feed.league, e),
        }
    }
    let results = update_results(&config.results_path, fresh).await?;
    let table = SeasonTable::from_results(&results);
    info!("📊 Season table: {} teams from {} results", table.len(), results.len());

    let mut leagues = Vec::with_capacity(feeds.len());
    for feed in feeds {
        let (games, demo) = slate_for(config, feed.league, feed.games, now);
        let analyses: Vec<GameAnalysis> = games.iter().map(|g| analyze_game(g, &table, week)).collect();
        let parlay = build_parlay(&analyses, feed.league, DEFAULT_LEGS)
            .with_context(|| format!("failed to price {} parlay", feed.league))?;

        match parlay.odds {
            Some(odds) => info!("✅ {}: {} games, parlay {:+}", feed.league, analyses.len(), odds),
            None => info!("✅ {}: {} games, no parlay", feed.league, analyses.len()),
        }

        leagues.push(LeagueReport {
            league: feed.league,
            games: analyses,
            parlay,
            demo,
        });
    }

    let report = Report {
        run_id: Uuid::new_v4(),
        season: config.season_year,
        week,
        generated_at: now,
        leagues,
    };

    let html = site::render(&report, config.utc_offset);
    site::write_atomic(&config.site_output, &html)
        .await
        .with_context(|| format!("failed to write {}", config.site_output.display()))?;

    let report_file = report_path(&config.site_output);
    site::write_atomic(&report_file, &serde_json::to_string_pretty(&report)?)
        .await
        .with_context(|| format!("failed to write {}", report_file.display()))?;

    if let Some(url) = &config.discord_webhook_url {
        let notifier = DiscordNotifier::new(url.clone(), config.discord_min_confidence);
        match notifier.send_report(&report).await {
            Ok(()) => info!("📱 Discord alert sent"),
            Err(e) => warn!("Discord alert not sent: {}", e),
        }
    }

    if config.git_publish {
        let publisher = GitPublisher::new(
            config.git_repo_dir.clone(),
            config.git_remote.clone(),
            config.git_branch.clone(),
        );
        let paths = [
            config.site_output.as_path(),
            report_file.as_path(),
            config.results_path.as_path(),
        ];
        match publisher
            .publish(&paths, &commit_message(week, now, config.utc_offset))
            .await
        {
            Ok(PublishOutcome::Pushed) | Ok(PublishOutcome::NothingToCommit) => {}
            Err(e) => warn!("Git publish failed: {}", e),
        }
    }

    info!("🏁 Update {} complete", report.run_id);
    Ok(report)
}

async fn fetch_league(config: &Config, league: League) -> LeagueFeed {
    let mut client = OddsApiClient::new(
        config.odds_api_base_url.clone(),
        config.odds_api_key.clone(),
        config.odds_regions.clone(),
    );

    let results = client
        .fetch_scores(league, config.scores_days_from)
        .await
        .map(|events| completed_results(&events));
    let games = client.fetch_odds(league).await.map(|events| {
        events
            .iter()
            .map(|e| extract_game(e, league, &config.preferred_bookmaker))
            .collect()
    });

    LeagueFeed {
        league,
        games,
        results,
    }
}

/// Live games for the coming week, or the sample NFL slate when the feed
/// is down or empty and the fallback is enabled.
fn slate_for(
    config: &Config,
    league: League,
    fetched: Result<Vec<Game>, OddsApiError>,
    now: DateTime<Utc>,
) -> (Vec<Game>, bool) {
    let games = match fetched {
        Ok(games) => upcoming(games, now),
        Err(e) => {
            warn!("Failed to fetch {} odds: {}", league, e);
            Vec::new()
        }
    };

    if games.is_empty() && config.demo_fallback && league == League::Nfl {
        warn!("No live {} games, using demo slate", league);
        return (demo_games(now), true);
    }
    (games, false)
}

pub fn upcoming(mut games: Vec<Game>, now: DateTime<Utc>) -> Vec<Game> {
    let horizon = now + Duration::days(SLATE_DAYS);
    games.retain(|g| g.commence_time > now && g.commence_time <= horizon);
    games.sort_by_key(|g| g.commence_time);
    games
}

/// Tag finished games with the week of their local kickoff date
fn with_weeks<'a>(
    results: &'a [GameResult],
    season_start: NaiveDate,
    offset: FixedOffset,
) -> impl Iterator<Item = GameResult> + 'a {
    results.iter().map(move |r| GameResult {
        week: Some(current_week(
            season_start,
            r.commence_time.with_timezone(&offset).date_naive(),
        )),
        ..r.clone()
    })
}

/// `report.json` next to the site page
pub fn report_path(site_output: &Path) -> PathBuf {
    site_output.with_file_name("report.json")
}

pub async fn load_report(path: &Path) -> Option<Report> {
    let text = fs::read_to_string(path).await.ok()?;
    match serde_json::from_str(&text) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("Ignoring unreadable report {}: {}", path.display(), e);
            None
        }
    }
}

pub async fn load_results(path: &Path) -> Result<Vec<GameResult>> {
    match fs::read_to_string(path).await {
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("corrupt results file {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Append results not seen before (by event id). Returns how many were new.
pub fn merge_results(existing: &mut Vec<GameResult>, fresh: Vec<GameResult>) -> usize {
    let mut seen: HashSet<String> = existing.iter().map(|r| r.event_id.clone()).collect();
    let before = existing.len();
    for result in fresh {
        if seen.insert(result.event_id.clone()) {
            existing.push(result);
        }
    }
    existing.sort_by_key(|r| r.commence_time);
    existing.len() - before
}

/// Merge fresh scores into the results file. The file is written whenever
/// something was added or it does not exist yet, so it can always be staged.
async fn update_results(path: &Path, fresh: Vec<GameResult>) -> Result<Vec<GameResult>> {
    let exists = fs::try_exists(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut results = load_results(path).await?;
    let added = merge_results(&mut results, fresh);
    if added > 0 || !exists {
        site::write_atomic(path, &serde_json::to_string_pretty(&results)?)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("📊 Recorded {} new results ({} total)", added, results.len());
    }
    Ok(results)
}
