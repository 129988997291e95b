use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::grid::{format_match_date, starting_eleven_rows};
use crate::session::SessionState;

pub struct ExportReport {
    pub matches: usize,
    pub teams: usize,
    pub starters: usize,
}

/// Writes the grid as shown (current sort) plus the selected match's starters.
pub fn export_session(path: &Path, state: &SessionState) -> Result<ExportReport> {
    let mut match_rows = vec![vec![
        "Match ID".to_string(),
        "Date".to_string(),
        "Team 1".to_string(),
        "Score 1".to_string(),
        "Score 2".to_string(),
        "Team 2".to_string(),
    ]];
    let rows = state.sorted_rows();
    for m in &rows {
        match_rows.push(vec![
            m.match_id.to_string(),
            format_match_date(m.match_date),
            m.home_team.clone(),
            m.home_score.to_string(),
            m.away_score.to_string(),
            m.away_team.clone(),
        ]);
    }

    let view = &state.starting_eleven;
    let mut lineup_rows = vec![
        view.teams()
            .iter()
            .map(|(team, _)| team.clone())
            .collect::<Vec<_>>(),
    ];
    lineup_rows.extend(starting_eleven_rows(view));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matches")?;
        write_rows(sheet, &match_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("StartingXI")?;
        write_rows(sheet, &lineup_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        matches: rows.len(),
        teams: view.teams().len(),
        starters: view.teams().iter().map(|(_, p)| p.len()).sum(),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
