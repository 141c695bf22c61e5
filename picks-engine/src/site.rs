use crate::updater::{LeagueReport, Report};
use chrono::FixedOffset;
use odds_processor::parlay::DEFAULT_LEGS;
use odds_processor::picks::format_line;
use odds_processor::types::{GameAnalysis, Parlay};
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;
use tracing::info;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sharp Picks | NFL &amp; CFB Analysis</title>
    <style>
        body { background: #0f172a; color: #e2e8f0; font-family: system-ui, sans-serif; margin: 0; }
        main { max-width: 960px; margin: 0 auto; padding: 24px; }
        .card { background: #1e293b; border: 1px solid rgba(34, 197, 94, 0.3); border-radius: 12px; padding: 20px; margin-bottom: 20px; }
        .pick { background: rgba(34, 197, 94, 0.1); border-radius: 8px; padding: 12px; margin: 12px 0; }
        .units { background: #22c55e; color: #000; border-radius: 6px; padding: 2px 8px; font-weight: 700; }
        .conf-high { color: #4ade80; } .conf-mid { color: #facc15; } .conf-low { color: #fb923c; }
        .muted { color: #94a3b8; font-size: 0.9em; }
        h4 { color: #60a5fa; margin-bottom: 4px; }
    </style>
</head>
<body>
<main>
"#;

const TAIL: &str = "</main>\n</body>\n</html>\n";

/// Render the whole page for one report
pub fn render(report: &Report, offset: FixedOffset) -> String {
    let mut html = String::from(HEAD);
    let generated = report.generated_at.with_timezone(&offset);

    let _ = writeln!(
        html,
        "<header><h1>Sharp Picks</h1><p class=\"muted\">{} Week {} &middot; Updated {}</p></header>",
        report.season,
        report.week,
        generated.format("%Y-%m-%d %H:%M")
    );

    for league in &report.leagues {
        html.push_str(&parlay_section(&league.parlay));
    }
    for league in &report.leagues {
        html.push_str(&league_section(league, report.week, offset));
    }

    html.push_str(TAIL);
    html
}

fn parlay_section(parlay: &Parlay) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<section class=\"card\">");
    let _ = writeln!(html, "<h2>{} {}-Game Parlay</h2>", parlay.league, DEFAULT_LEGS);

    match parlay.odds {
        Some(odds) => {
            let _ = writeln!(html, "<p><strong>{odds:+}</strong></p>");
            for (i, leg) in parlay.legs.iter().enumerate() {
                let _ = writeln!(
                    html,
                    "<div class=\"pick\"><strong>Game {}</strong> <span class=\"{}\">{}% Confidence</span><br>{}<br><span class=\"muted\">{}</span></div>",
                    i + 1,
                    confidence_class(leg.confidence),
                    leg.confidence,
                    escape(&leg.pick),
                    escape(&leg.matchup)
                );
            }
        }
        None => {
            let _ = writeln!(html, "<p class=\"muted\">No parlay this week</p>");
        }
    }

    let _ = writeln!(html, "<p>{}</p>", escape(&parlay.reasoning));
    html.push_str("</section>\n");
    html
}

fn league_section(league: &LeagueReport, week: u32, offset: FixedOffset) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<h2>{} Week {} Analysis</h2>", league.league, week);
    if league.demo {
        let _ = writeln!(html, "<p class=\"muted\">Live odds unavailable, showing sample lines.</p>");
    }
    if league.games.is_empty() {
        let _ = writeln!(html, "<p class=\"muted\">No {} games on the board.</p>", league.league);
    }
    for game in &league.games {
        html.push_str(&game_card(game, offset));
    }
    html
}

fn game_card(card: &GameAnalysis, offset: FixedOffset) -> String {
    let game = &card.game;
    let pick = &card.pick;
    let score = &card.predicted_score;
    let kickoff = game.commence_time.with_timezone(&offset);
    let with_record = |team: &str, record: &Option<String>| match record {
        Some(r) => format!("{} ({})", escape(team), escape(r)),
        None => escape(team),
    };

    let mut html = String::new();
    let _ = writeln!(html, "<article class=\"card\">");
    let _ = writeln!(
        html,
        "<h3>{} @ {}</h3>",
        with_record(&game.away_team, &card.away_record),
        with_record(&game.home_team, &card.home_record)
    );
    let _ = writeln!(
        html,
        "<p class=\"muted\">{} &middot; {}</p>",
        kickoff.format("%A %b %-d, %-I:%M %p"),
        escape(&card.venue)
    );
    let _ = writeln!(
        html,
        "<p>Line: {} {} &middot; O/U {:.1}</p>",
        escape(last_word(&game.home_team)),
        format_line(game.spread),
        game.total
    );
    if let Some((away, home)) = card.fair_moneyline {
        let _ = writeln!(html, "<p class=\"muted\">No-vig moneyline: {away:+} / {home:+}</p>");
    }

    let _ = writeln!(
        html,
        "<div class=\"pick\"><strong>PICK: {} {}</strong> <span class=\"units\">{}</span> <span class=\"{}\">{}%</span><br>Predicted Score: {} {}, {} {} ({} {})</div>",
        escape(pick.short_team()),
        escape(&pick.line),
        pick.units,
        confidence_class(pick.confidence),
        pick.confidence,
        escape(last_word(&game.away_team)),
        score.away_score,
        escape(last_word(&game.home_team)),
        score.home_score,
        score.lean,
        score.total_projected
    );

    for (title, body) in [
        ("The Line", &card.analysis.the_line),
        ("The Matchup", &card.analysis.the_matchup),
        ("The Angle", &card.analysis.the_angle),
        ("The Bottom Line", &card.analysis.the_bottom_line),
    ] {
        let _ = writeln!(html, "<h4>{title}</h4><p>{}</p>", escape(body));
    }

    html.push_str("</article>\n");
    html
}

fn confidence_class(confidence: u8) -> &'static str {
    match confidence {
        80..=u8::MAX => "conf-high",
        70..=79 => "conf-mid",
        _ => "conf-low",
    }
}

fn last_word(team: &str) -> &str {
    team.split_whitespace().last().unwrap_or(team)
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write through a sibling temp file and rename, so readers never see a
/// half-written page.
pub async fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, contents).await?;
    fs::rename(&tmp, path).await?;
    info!("📝 Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_games;
    use chrono::Utc;
    use odds_processor::analysis::analyze_game;
    use odds_processor::parlay::build_parlay;
    use odds_processor::stats::SeasonTable;
    use odds_processor::types::League;
    use uuid::Uuid;

    fn sample_report() -> Report {
        let table = SeasonTable::from_results(&[]);
        let games: Vec<GameAnalysis> = demo_games(Utc::now())
            .iter()
            .map(|g| analyze_game(g, &table, 3))
            .collect();
        let parlay = build_parlay(&games, League::Nfl, DEFAULT_LEGS).unwrap();
        Report {
            run_id: Uuid::new_v4(),
            season: 2025,
            week: 3,
            generated_at: Utc::now(),
            leagues: vec![LeagueReport {
                league: League::Nfl,
                games,
                parlay,
                demo: true,
            }],
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("A&M <b>\"x\"</b>"), "A&amp;M &lt;b&gt;&quot;x&quot;&lt;/b&gt;");
    }

    #[test]
    fn page_contains_every_game_and_parlay() {
        let offset = FixedOffset::west_opt(4 * 3600).unwrap();
        let html = render(&sample_report(), offset);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("NFL Week 3 Analysis"));
        assert!(html.contains("NFL 3-Game Parlay"));
        assert!(html.contains("Kansas City Chiefs @ Buffalo Bills"));
        assert!(html.contains("Green Bay Packers @ Chicago Bears"));
        assert!(html.contains("showing sample lines"));
        assert!(html.ends_with("</html>\n"));
    }

    #[tokio::test]
    async fn atomic_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site").join("index.html");

        write_atomic(&path, "first").await.unwrap();
        write_atomic(&path, "second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("site").join("index.html.tmp").exists());
    }
}
