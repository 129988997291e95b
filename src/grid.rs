use chrono::NaiveDate;

use crate::lineup::StartingElevenView;
use crate::match_list::MatchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: &'static str,
    pub header: &'static str,
    /// Share of the grid width, in percent.
    pub width_pct: u16,
    pub hidden: bool,
}

pub const MATCH_COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec {
        field: "match_date",
        header: "Date",
        width_pct: 20,
        hidden: false,
    },
    ColumnSpec {
        field: "home_team",
        header: "Team 1",
        width_pct: 30,
        hidden: false,
    },
    ColumnSpec {
        field: "home_score",
        header: "",
        width_pct: 10,
        hidden: false,
    },
    ColumnSpec {
        field: "away_score",
        header: "",
        width_pct: 10,
        hidden: false,
    },
    ColumnSpec {
        field: "away_team",
        header: "Team 2",
        width_pct: 30,
        hidden: false,
    },
    ColumnSpec {
        field: "match_id",
        header: "Match",
        width_pct: 0,
        hidden: true,
    },
];

pub fn visible_columns() -> impl Iterator<Item = &'static ColumnSpec> {
    MATCH_COLUMNS.iter().filter(|c| !c.hidden)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    DateAsc,
    DateDesc,
    HomeTeam,
    AwayTeam,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::DateAsc => SortMode::DateDesc,
            SortMode::DateDesc => SortMode::HomeTeam,
            SortMode::HomeTeam => SortMode::AwayTeam,
            SortMode::AwayTeam => SortMode::DateAsc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::DateAsc => "DATE ↑",
            SortMode::DateDesc => "DATE ↓",
            SortMode::HomeTeam => "TEAM 1",
            SortMode::AwayTeam => "TEAM 2",
        }
    }
}

/// Display order over `records` as indices; ties keep source order.
pub fn sorted_indices(records: &[MatchRecord], sort: SortMode) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..records.len()).collect();
    match sort {
        SortMode::DateAsc => idx.sort_by_key(|&i| records[i].match_date),
        SortMode::DateDesc => {
            idx.sort_by(|&a, &b| records[b].match_date.cmp(&records[a].match_date))
        }
        SortMode::HomeTeam => idx.sort_by(|&a, &b| records[a].home_team.cmp(&records[b].home_team)),
        SortMode::AwayTeam => idx.sort_by(|&a, &b| records[a].away_team.cmp(&records[b].away_team)),
    }
    idx
}

pub fn format_match_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOutcome {
    Win,
    Loss,
    Draw,
}

pub fn home_outcome(m: &MatchRecord) -> ScoreOutcome {
    outcome(m.home_score, m.away_score)
}

pub fn away_outcome(m: &MatchRecord) -> ScoreOutcome {
    outcome(m.away_score, m.home_score)
}

fn outcome(own: u32, other: u32) -> ScoreOutcome {
    match own.cmp(&other) {
        std::cmp::Ordering::Greater => ScoreOutcome::Win,
        std::cmp::Ordering::Less => ScoreOutcome::Loss,
        std::cmp::Ordering::Equal => ScoreOutcome::Draw,
    }
}

/// Row-major table with one column per team. Shorter teams are padded with
/// empty cells.
pub fn starting_eleven_rows(view: &StartingElevenView) -> Vec<Vec<String>> {
    (0..view.max_len())
        .map(|row| {
            view.teams()
                .iter()
                .map(|(_, players)| players.get(row).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}
