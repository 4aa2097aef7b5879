use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio::runtime::Runtime;

use win4_scope::analysis::{
    self, Backtest, HotCold, PredictionMethod, backtest::backtest, hot_cold::hot_cold,
};
use win4_scope::config::{ANALYSIS, DRAW_CACHE_ACCEPTABLE_AGE_SECS, PAYOUTS, SOCRATA};
use win4_scope::data::draws::cache_version::write_draw_data_async;
use win4_scope::data::watchlist::watchlist_stats;
use win4_scope::utils::time_utils::epoch_sec_to_utc;
use win4_scope::{
    Cli, Combo, DrawCache, DrawCacheKey, DrawHistory, Session, SocrataClient, WatchlistStore,
    load_draw_data,
};

fn main() -> Result<()> {
    // A. Init logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse args
    let args = Cli::parse();
    let session = args
        .session
        .as_deref()
        .map(Session::from_str)
        .transpose()
        .map_err(|_| anyhow!("--session must be Midday or Evening"))?;

    // C. Data loading (blocking)
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let (history, signature) =
        rt.block_on(load_draw_data(DRAW_CACHE_ACCEPTABLE_AGE_SECS, &args))?;

    // D. Cache write-back (no-op unless the data came from the API)
    if let Err(e) = rt.block_on(write_draw_data_async(
        signature,
        history.clone(),
        SOCRATA.dataset.dataset_id.to_string(),
    )) {
        log::error!("Failed to write cache: {:#}", e);
    }

    // E. Watchlist mutations before the report
    let store = match &args.watchlist_file {
        Some(path) => WatchlistStore::new(path.clone()),
        None => WatchlistStore::at_default_path(),
    };
    if let Some(raw) = &args.add {
        let combo = Combo::parse(raw)?;
        if store.add(combo)? {
            println!("Added {} to the watchlist", combo);
        } else {
            println!("{} is already on the watchlist", combo);
        }
    }
    if let Some(raw) = &args.remove {
        let combo = Combo::parse(raw)?;
        if store.remove(combo)? {
            println!("Removed {} from the watchlist", combo);
        } else {
            println!("{} was not on the watchlist", combo);
        }
    }

    // F. Derived views go through the process-wide cache keyed by dataset
    // and parameters; re-running with --prefer-api is the explicit refresh.
    let cache = DrawCache::default();
    cache.store(
        DrawCacheKey::full(SOCRATA.dataset.dataset_id),
        history.clone(),
    );
    let view_key = DrawCacheKey::view(SOCRATA.dataset.dataset_id, args.days, session);
    let view = cache.get_or_insert_with(&view_key, || {
        let mut view = history.filter_session(session);
        if let Some(days) = args.days {
            view = view.recent_window(days);
        }
        view
    });

    // G. Report
    print_header(&history, &view, signature, session, args.days);
    print_freshness(&rt);
    if view.is_empty() {
        println!("\nNo draws match the selected filters.");
        return Ok(());
    }

    let window_days = args.days.unwrap_or(ANALYSIS.default_window_days);
    print_digit_frequency(&view);
    print_digit_sums(&view);
    print_rankings(&view);
    print_patterns(&view);
    print_repeats(&view);
    print_hot_cold(&view, window_days);
    print_backtest(&view, window_days);
    print_watchlist(&store, &history)?;

    if let Some(raw) = &args.check {
        let combo = Combo::parse(raw)?;
        print_check(combo, &history);
    }

    Ok(())
}

fn print_header(
    history: &DrawHistory,
    view: &DrawHistory,
    signature: &str,
    session: Option<Session>,
    days: Option<u32>,
) {
    println!("== {} ==", history.name);
    println!("Source: {}", signature);
    if let (Some(min), Some(max)) = (history.min_date(), history.max_date()) {
        println!(
            "Draws: {} total ({} to {})",
            history.len(),
            min,
            max
        );
    }
    let session_label = session.map_or("both sessions".to_string(), |s| s.to_string());
    let days_label = days.map_or("all time".to_string(), |d| format!("last {} days", d));
    println!("View: {} draws ({}, {})", view.len(), days_label, session_label);
}

/// Freshness badge from dataset metadata; purely informational, so any
/// failure is a warning rather than an error.
fn print_freshness(rt: &Runtime) {
    let metadata = rt.block_on(async {
        let client = SocrataClient::from_config()?;
        client.fetch_metadata().await.map_err(anyhow::Error::new)
    });
    match metadata {
        Ok(metadata) => {
            let stamp = metadata
                .data_updated_at
                .or(metadata.rows_updated_at)
                .map(epoch_sec_to_utc);
            match stamp {
                Some(date) if !date.is_empty() => println!("Dataset last updated: {}", date),
                _ => println!("Dataset last updated: unknown"),
            }
        }
        Err(e) => log::warn!("Freshness check failed: {:#}", e),
    }
}

fn print_digit_frequency(view: &DrawHistory) {
    let table = analysis::digit_frequency_table(&view.rows);
    println!("\n-- Digit frequency by position --");
    println!("        0     1     2     3     4     5     6     7     8     9");
    for position in 1..=4 {
        let row: Vec<String> = (0..10u8)
            .map(|d| format!("{:5}", table.count(position, d)))
            .collect();
        println!("P{} {}", position, row.join(" "));
    }
}

fn print_digit_sums(view: &DrawHistory) {
    let histogram = analysis::frequency::digit_sum_distribution(&view.rows);
    let mut ranked: Vec<(usize, u32)> = histogram
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    println!("\n-- Most common digit sums --");
    for (sum, count) in ranked.into_iter().take(5) {
        println!("sum {:2}: {} draws", sum, count);
    }
}

fn print_rankings(view: &DrawHistory) {
    let n = ANALYSIS.default_top_n.min(5);
    println!("\n-- Most drawn combos --");
    for entry in analysis::frequency::top_n(&view.rows, n) {
        println!("{} x{}", entry.combo, entry.count);
    }
    println!("-- Least drawn combos (of those seen) --");
    for entry in analysis::frequency::bottom_n(&view.rows, n) {
        println!("{} x{}", entry.combo, entry.count);
    }
}

fn print_patterns(view: &DrawHistory) {
    println!("\n-- Box-type distribution --");
    for share in analysis::patterns::pattern_distribution(&view.rows) {
        println!(
            "{:7} {} ({:>12}): {:6} draws ({:.2}%)",
            share.box_type.to_string(),
            share.box_type.pattern_label(),
            share.box_type.description(),
            share.count,
            share.pct
        );
    }

    let mirrors = analysis::patterns::mirror_analysis(&view.rows);
    println!(
        "Mirror ends {:.2}%, mirror middle {:.2}%, palindromes {:.2}%",
        mirrors.mirror_ends_pct(),
        mirrors.mirror_middle_pct(),
        mirrors.palindrome_pct()
    );
}

fn print_repeats(view: &DrawHistory) {
    println!("\n-- Repeated digit by position pair --");
    for repeat in analysis::patterns::repeat_analysis(&view.rows) {
        println!(
            "positions {}-{}: {:.2}%",
            repeat.positions.0,
            repeat.positions.1,
            100.0 * repeat.fraction
        );
    }
}

fn print_hot_cold(view: &DrawHistory, window_days: u32) {
    println!("\n-- Hot/cold combos ({}-day window) --", window_days);
    match hot_cold(view, window_days, &ANALYSIS.hot_cold) {
        HotCold::Report(report) => {
            for score in report.hot.iter().take(ANALYSIS.default_top_n) {
                println!(
                    "hot  {} x{} (p{:.1}, last seen {})",
                    score.combo, score.count, score.percentile, score.last_seen
                );
            }
            for score in report.cold.iter().take(ANALYSIS.default_top_n) {
                println!(
                    "cold {} x{} (p{:.1}, last seen {})",
                    score.combo, score.count, score.percentile, score.last_seen
                );
            }
            if report.hot.is_empty() && report.cold.is_empty() {
                println!("window frequencies are uniform; nothing qualifies");
            }
        }
        HotCold::InsufficientData { have, need } => {
            println!("not enough data: {} draws in window, need {}", have, need);
        }
    }
}

fn print_backtest(view: &DrawHistory, window_days: u32) {
    println!(
        "\n-- Naive backtest ({}-day window; a heuristic baseline, not a forecast) --",
        window_days
    );
    for method in [PredictionMethod::MostFrequent, PredictionMethod::HotDigits] {
        match backtest(view, window_days, method, ANALYSIS.hot_cold.min_draws_for_analysis) {
            Backtest::Report(report) => println!(
                "{:12}: {} evaluated, straight {:.3}%, box {:.3}%",
                method.to_string(),
                report.evaluated,
                100.0 * report.straight_rate(),
                100.0 * report.box_rate()
            ),
            Backtest::InsufficientData { have, need } => println!(
                "{:12}: not enough data ({} draws, need {})",
                method.to_string(),
                have,
                need
            ),
        }
    }
}

fn print_watchlist(store: &WatchlistStore, history: &DrawHistory) -> Result<()> {
    let entries = store.load()?;
    if entries.is_empty() {
        return Ok(());
    }

    println!("\n-- Watchlist --");
    for row in watchlist_stats(&entries, &history.rows) {
        let last_seen = row
            .report
            .last_seen_straight
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{} ({}): {} straight, {} box, last straight {} (box pays ${})",
            row.entry.combo,
            row.report.box_type,
            row.report.straight_hits,
            row.report.box_hits,
            last_seen,
            row.report.box_payout
        );
    }
    Ok(())
}

fn print_check(combo: Combo, history: &DrawHistory) {
    let report = analysis::check_combo(combo, &history.rows);
    println!("\n-- Mock drawing check for {} --", combo);
    println!(
        "{} box ({}), straight pays ${}, box pays ${}",
        report.box_type,
        report.box_type.pattern_label(),
        PAYOUTS.straight,
        report.box_payout
    );
    println!(
        "straight hits: {} (last {})",
        report.straight_hits,
        report
            .last_seen_straight
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string())
    );
    println!(
        "box hits: {} (last {})",
        report.box_hits,
        report
            .last_seen_box
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string())
    );
    for (session, count) in &report.straight_by_session {
        println!("  {} straight: {}", session, count);
    }
    for (session, count) in &report.box_by_session {
        println!("  {} box: {}", session, count);
    }
}
