use anyhow::{Context, Result, anyhow};

use statsbomb_viewer::catalog::Catalog;
use statsbomb_viewer::config::AppConfig;
use statsbomb_viewer::grid::{format_match_date, sorted_indices};
use statsbomb_viewer::http_client::HttpJsonSource;
use statsbomb_viewer::session::{Controller, League, SessionState, Transition};

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    if let Err(err) = statsbomb_viewer::telemetry::init_tracing(&config.log_path) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let league = parse_league_arg()?.unwrap_or(League::ALL[0]);
    let season = parse_flag("--season").unwrap_or_else(|| league.default_season().to_string());
    let match_id = match parse_flag("--match") {
        Some(raw) => Some(
            raw.parse::<u64>()
                .with_context(|| format!("invalid match id '{raw}'"))?,
        ),
        None => None,
    };

    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("load catalog {}", config.catalog_path.display()))?;
    let source = HttpJsonSource::new(config.http_timeout_secs)?;
    let mut controller = Controller::new(
        catalog,
        source,
        config.base_url.clone(),
        config.cache_max_entries,
    );

    let mut state = SessionState::for_pair(league, &season)?;
    controller.apply(&mut state, Transition::Refresh)?;
    if let Some(id) = match_id {
        controller.apply(&mut state, Transition::SelectMatchRow(id))?;
    }

    println!(
        "{} {} ({} matches)",
        state.league.competition_name(),
        state.season,
        state.matches.len()
    );
    let records = state.matches.records();
    for idx in sorted_indices(records, state.sort) {
        let m = &records[idx];
        let marker = if state.selected_match_id == Some(m.match_id) {
            '>'
        } else {
            ' '
        };
        println!(
            "{marker} {} {:>10} {:<28} {}-{} {}",
            format_match_date(m.match_date),
            m.match_id,
            m.home_team,
            m.home_score,
            m.away_score,
            m.away_team
        );
    }

    for (team, players) in state.starting_eleven.teams() {
        println!();
        println!("{team} ({} starters)", players.len());
        for name in players {
            println!("  {name}");
        }
    }

    for line in state.log.lines() {
        if line.starts_with("[WARN]") {
            eprintln!("{line}");
        }
    }
    Ok(())
}

fn parse_league_arg() -> Result<Option<League>> {
    let Some(raw) = parse_flag("--league") else {
        return Ok(None);
    };
    League::ALL
        .into_iter()
        .find(|l| l.competition_name().eq_ignore_ascii_case(raw.trim()))
        .map(Some)
        .ok_or_else(|| anyhow!("unknown league '{raw}'"))
}

fn parse_flag(name: &str) -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == name {
            return args.next();
        }
        if let Some(rest) = arg.strip_prefix(name).and_then(|r| r.strip_prefix('=')) {
            return Some(rest.to_string());
        }
    }
    None
}
