//! Analysis and computation configuration

/// Settings for hot/cold scoring over the recent window
pub struct HotColdSettings {
    // Combos at or above this frequency percentile in the window are "hot"
    pub hot_threshold_percentile: f64,
    // Combos at or below this frequency percentile in the window are "cold"
    pub cold_threshold_percentile: f64,
    // Minimum number of draws required for windowed analysis
    // Below this threshold, results would be noise rather than signal
    pub min_draws_for_analysis: usize,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    // Default lookback window for hot/cold scoring and the backtest (days)
    pub default_window_days: u32,
    // Default list length for Top N / Bottom N combo rankings
    pub default_top_n: usize,

    // Sub-groups
    pub hot_cold: HotColdSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    default_window_days: 30,
    default_top_n: 20,

    hot_cold: HotColdSettings {
        hot_threshold_percentile: 75.0,
        cold_threshold_percentile: 25.0,
        min_draws_for_analysis: 10,
    },
};
