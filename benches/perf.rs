use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use statsbomb_viewer::cache::{LruCache, MemoCache};
use statsbomb_viewer::catalog::{Catalog, build_match_list_url};
use statsbomb_viewer::grid::{SortMode, sorted_indices};
use statsbomb_viewer::lineup::{derive_starting_eleven, parse_lineup_json};
use statsbomb_viewer::match_list::{MatchListView, parse_match_list_json};

/// A full-season sized payload built from the fixture rows.
fn season_sized_matches_json(rows: usize) -> String {
    let mut out = String::from("[");
    for idx in 0..rows {
        if idx > 0 {
            out.push(',');
        }
        let day = idx % 28 + 1;
        let month = idx % 12 + 1;
        out.push_str(&format!(
            r#"{{"match_id": {}, "match_date": "2020-{month:02}-{day:02}", "kick_off": "21:00:00.000",
                "home_team": {{"home_team_id": {}, "home_team_name": "Home {}"}},
                "away_team": {{"away_team_id": {}, "away_team_name": "Away {}"}},
                "home_score": {}, "away_score": {}, "match_status": "available"}}"#,
            3_700_000 + idx,
            idx % 20,
            idx % 20,
            (idx + 7) % 20,
            (idx + 7) % 20,
            idx % 4,
            idx % 3
        ));
    }
    out.push(']');
    out
}

fn bench_match_list_parse(c: &mut Criterion) {
    c.bench_function("match_list_parse_fixture", |b| {
        b.iter(|| {
            let parsed = parse_match_list_json(black_box(MATCHES_JSON)).unwrap();
            black_box(parsed.view.len());
        })
    });

    let season = season_sized_matches_json(380);
    c.bench_function("match_list_parse_380", |b| {
        b.iter(|| {
            let parsed = parse_match_list_json(black_box(&season)).unwrap();
            black_box(parsed.view.len());
        })
    });
}

fn bench_lineup_parse(c: &mut Criterion) {
    c.bench_function("lineup_parse_and_derive", |b| {
        b.iter(|| {
            let parsed = parse_lineup_json(black_box(LINEUP_JSON)).unwrap();
            let view = derive_starting_eleven(&parsed.roster);
            black_box(view.max_len());
        })
    });
}

fn bench_grid_sort(c: &mut Criterion) {
    let view = parse_match_list_json(&season_sized_matches_json(380))
        .unwrap()
        .view;
    c.bench_function("grid_sort_home_team", |b| {
        b.iter(|| {
            let order = sorted_indices(black_box(view.records()), SortMode::HomeTeam);
            black_box(order.len());
        })
    });
}

fn bench_url_and_cache(c: &mut Criterion) {
    let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
    let view = parse_match_list_json(MATCHES_JSON).unwrap().view;
    let mut cache: LruCache<String, MatchListView> = LruCache::new(10);

    c.bench_function("url_build_and_cache_lookup", |b| {
        b.iter(|| {
            let url = build_match_list_url(
                black_box(&catalog),
                "http://bench/data",
                "La Liga",
                "2020/2021",
            )
            .unwrap();
            if cache.get(&url).is_none() {
                cache.put(url, view.clone());
            }
            black_box(cache.len());
        })
    });
}

criterion_group!(
    perf,
    bench_match_list_parse,
    bench_lineup_parse,
    bench_grid_sort,
    bench_url_and_cache
);
criterion_main!(perf);

static MATCHES_JSON: &str = include_str!("../tests/fixtures/matches_11_90.json");
static LINEUP_JSON: &str = include_str!("../tests/fixtures/lineup_3773386.json");
static CATALOG_JSON: &str = include_str!("../assets/competitions.json");
