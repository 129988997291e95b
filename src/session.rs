use crate::cache::{LruCache, MemoCache};
use crate::catalog::{Catalog, build_match_list_url};
use crate::error::{ViewerError, ViewerResult};
use crate::grid::{SortMode, sorted_indices};
use crate::http_client::JsonSource;
use crate::lineup::{StartingElevenView, TeamRoster, derive_starting_eleven, fetch_lineup};
use crate::match_list::{MatchListView, MatchRecord, fetch_match_list};
use crate::telemetry::EventLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    FifaWorldCup,
    LaLiga,
    PremierLeague,
}

impl League {
    pub const ALL: [League; 3] = [League::FifaWorldCup, League::LaLiga, League::PremierLeague];

    /// Name as it appears in the competition catalog.
    pub fn competition_name(self) -> &'static str {
        match self {
            League::FifaWorldCup => "FIFA World Cup",
            League::LaLiga => "La Liga",
            League::PremierLeague => "Premier League",
        }
    }

    pub fn seasons(self) -> &'static [&'static str] {
        match self {
            League::FifaWorldCup => &["2022", "2018"],
            League::LaLiga => &["2020/2021", "2019/2020", "2018/2019"],
            League::PremierLeague => &["2015/2016", "2003/2004"],
        }
    }

    pub fn default_season(self) -> &'static str {
        self.seasons()[0]
    }

    pub fn offers(self, season: &str) -> bool {
        self.seasons().contains(&season)
    }

    /// Season option following `current`, wrapping; the default if `current` is not offered.
    pub fn season_after(self, current: &str) -> &'static str {
        let seasons = self.seasons();
        seasons
            .iter()
            .position(|s| *s == current)
            .map(|pos| seasons[(pos + 1) % seasons.len()])
            .unwrap_or(self.default_season())
    }

    pub fn next(self) -> Self {
        match self {
            League::FifaWorldCup => League::LaLiga,
            League::LaLiga => League::PremierLeague,
            League::PremierLeague => League::FifaWorldCup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    ChooseLeague(League),
    ChooseSeason(String),
    SelectMatchRow(u64),
    /// Re-fetch the match list for the current pair, bypassing the cache.
    Refresh,
}

/// Everything one interactive session owns. Views are replaced wholesale,
/// never edited in place.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub league: League,
    pub season: String,
    pub selected_match_id: Option<u64>,
    pub matches: MatchListView,
    pub roster: TeamRoster,
    pub starting_eleven: StartingElevenView,
    pub sort: SortMode,
    /// Cursor position in display (sorted) order.
    pub cursor: usize,
    pub last_error: Option<ViewerError>,
    pub help_overlay: bool,
    pub log: EventLog,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        let league = League::ALL[0];
        Self {
            league,
            season: league.default_season().to_string(),
            selected_match_id: None,
            matches: MatchListView::default(),
            roster: TeamRoster::default(),
            starting_eleven: StartingElevenView::default(),
            sort: SortMode::default(),
            cursor: 0,
            last_error: None,
            help_overlay: false,
            log: EventLog::new(),
        }
    }

    /// A fresh session on `league`/`season`, before anything is fetched.
    pub fn for_pair(league: League, season: &str) -> ViewerResult<Self> {
        if !league.offers(season) {
            return Err(ViewerError::UnknownSeason {
                league: league.competition_name().to_string(),
                season: season.to_string(),
            });
        }
        Ok(Self {
            league,
            season: season.to_string(),
            ..Self::new()
        })
    }

    pub fn is_match_selected(&self) -> bool {
        self.selected_match_id.is_some()
    }

    pub fn selected_match(&self) -> Option<&MatchRecord> {
        self.selected_match_id.and_then(|id| self.matches.get(id))
    }

    pub fn sorted_rows(&self) -> Vec<&MatchRecord> {
        let records = self.matches.records();
        sorted_indices(records, self.sort)
            .into_iter()
            .map(|i| &records[i])
            .collect()
    }

    pub fn cursor_match_id(&self) -> Option<u64> {
        self.sorted_rows().get(self.cursor).map(|m| m.match_id)
    }

    pub fn select_next(&mut self) {
        let total = self.matches.len();
        if total > 0 && self.cursor + 1 < total {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Changes the display order, keeping the cursor on the same match.
    pub fn cycle_sort(&mut self) {
        let keep = self.cursor_match_id();
        self.sort = self.sort.next();
        self.move_cursor_to(keep);
    }

    fn move_cursor_to(&mut self, match_id: Option<u64>) {
        self.cursor = match_id
            .and_then(|id| self.sorted_rows().iter().position(|m| m.match_id == id))
            .unwrap_or(0);
    }

    fn clear_selection(&mut self) {
        self.selected_match_id = None;
        self.roster = TeamRoster::default();
        self.starting_eleven = StartingElevenView::default();
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.log.push_log(msg);
    }
}

/// Drives the catalog → match list → lineup chain for a `SessionState`.
pub struct Controller<S> {
    catalog: Catalog,
    source: S,
    base_url: String,
    match_cache: Box<dyn MemoCache<String, MatchListView>>,
    lineup_cache: Box<dyn MemoCache<u64, TeamRoster>>,
}

impl<S: JsonSource> Controller<S> {
    pub fn new(
        catalog: Catalog,
        source: S,
        base_url: impl Into<String>,
        cache_entries: usize,
    ) -> Self {
        Self::with_caches(
            catalog,
            source,
            base_url,
            Box::new(LruCache::new(cache_entries)),
            Box::new(LruCache::new(cache_entries)),
        )
    }

    pub fn with_caches(
        catalog: Catalog,
        source: S,
        base_url: impl Into<String>,
        match_cache: Box<dyn MemoCache<String, MatchListView>>,
        lineup_cache: Box<dyn MemoCache<u64, TeamRoster>>,
    ) -> Self {
        Self {
            catalog,
            source,
            base_url: base_url.into(),
            match_cache,
            lineup_cache,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn apply(&mut self, state: &mut SessionState, transition: Transition) -> ViewerResult<()> {
        match transition {
            Transition::ChooseLeague(league) => {
                state.league = league;
                if !league.offers(&state.season) {
                    state.season = league.default_season().to_string();
                }
                state.push_log(format!(
                    "[INFO] League: {} ({})",
                    league.competition_name(),
                    state.season
                ));
                self.refresh_matches(state, false)
            }
            Transition::ChooseSeason(season) => {
                if !state.league.offers(&season) {
                    return Err(ViewerError::UnknownSeason {
                        league: state.league.competition_name().to_string(),
                        season,
                    });
                }
                state.season = season;
                self.refresh_matches(state, false)
            }
            Transition::SelectMatchRow(match_id) => {
                if !state.matches.contains(match_id) {
                    return Err(ViewerError::UnknownMatch(match_id));
                }
                self.select_match(state, match_id);
                Ok(())
            }
            Transition::Refresh => self.refresh_matches(state, true),
        }
    }

    /// Replaces the match list for the current pair and auto-selects its first row.
    /// With `reload`, any cached list for the pair is dropped first.
    fn refresh_matches(&mut self, state: &mut SessionState, reload: bool) -> ViewerResult<()> {
        state.clear_selection();
        state.matches = MatchListView::default();
        state.cursor = 0;

        let url = match build_match_list_url(
            &self.catalog,
            &self.base_url,
            state.league.competition_name(),
            &state.season,
        ) {
            Ok(url) => url,
            Err(err) => {
                state.last_error = Some(err.clone());
                return Err(err);
            }
        };
        state.last_error = None;
        if reload {
            self.match_cache.remove(&url);
        }
        state.matches = fetch_match_list(
            &self.source,
            self.match_cache.as_mut(),
            &mut state.log,
            &url,
        );

        if let Some(first) = state.matches.first().map(|m| m.match_id) {
            self.select_match(state, first);
        }
        Ok(())
    }

    fn select_match(&mut self, state: &mut SessionState, match_id: u64) {
        state.selected_match_id = Some(match_id);
        state.roster = fetch_lineup(
            &self.source,
            self.lineup_cache.as_mut(),
            &mut state.log,
            &self.base_url,
            match_id,
        );
        state.starting_eleven = derive_starting_eleven(&state.roster);
        state.move_cursor_to(Some(match_id));
    }
}
