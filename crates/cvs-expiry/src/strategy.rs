//! # Expiry Strategies
//!
//! The six calculation rules and the decision tree that picks one for an
//! [`ExpiryContext`]. Each rule is a pure function of the context and the
//! test date; none performs I/O.
//!
//! ## Selection
//!
//! ```text
//! PSV
//!   COIF test type ───────────────────────────────▶ PsvDefault
//!   no history ── valid registration date ───────▶ PsvRegistrationAnniversary
//!              └─ otherwise ─────────────────────▶ PsvDefault
//!   history ─────────────────────────────────────▶ PsvMostRecent
//!
//! HGV / TRL
//!   first-test type ─────────────────────────────▶ HgvTrlFirstTest
//!   annual-test type and no history ─────────────▶ HgvTrlAnnualTest
//!   otherwise ───────────────────────────────────▶ HgvTrlMostRecent
//! ```
//!
//! ## Windows
//!
//! "Within two months" is `[today, today + 2 months)` everywhere except the
//! PSV most-recent rule, which uses the closed window
//! `[today, today + 2 months]`. PSV results are start of day; HGV/TRL results
//! fall on a month end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cvs_core::calendar::{add_months, add_years, is_within, last_day_of_month, sub_days, sub_months};
use cvs_core::{VehicleType, Window};

use crate::codes;
use crate::context::ExpiryContext;

/// Length of the early-test window, in months.
const EARLY_TEST_WINDOW_MONTHS: u32 = 2;

/// One of the six expiry calculation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStrategy {
    /// PSV: one year less a day from the test date.
    PsvDefault,
    /// PSV, no history: carry the registration anniversary forward when the
    /// test is taken early.
    PsvRegistrationAnniversary,
    /// PSV with history: carry the most recent expiry forward when the test
    /// is taken early.
    PsvMostRecent,
    /// HGV/TRL first test or first-test retest.
    HgvTrlFirstTest,
    /// HGV/TRL annual test with no history.
    HgvTrlAnnualTest,
    /// HGV/TRL with history.
    HgvTrlMostRecent,
}

impl ExpiryStrategy {
    /// Returns all six strategies.
    pub fn all() -> &'static [ExpiryStrategy] {
        &[
            Self::PsvDefault,
            Self::PsvRegistrationAnniversary,
            Self::PsvMostRecent,
            Self::HgvTrlFirstTest,
            Self::HgvTrlAnnualTest,
            Self::HgvTrlMostRecent,
        ]
    }

    /// Pick the strategy for `ctx`.
    ///
    /// Returns `None` for vehicle types that are never issued expiry dates.
    pub fn select(ctx: &ExpiryContext) -> Option<Self> {
        match ctx.vehicle_type {
            VehicleType::Psv => Some(select_psv(ctx)),
            VehicleType::Hgv | VehicleType::Trl => Some(select_hgv_trl(ctx)),
            VehicleType::Lgv | VehicleType::Car | VehicleType::Motorcycle => None,
        }
    }

    /// Compute the expiry date for `ctx` given the test date `today`.
    pub fn compute(self, ctx: &ExpiryContext, today: NaiveDate) -> NaiveDate {
        match self {
            Self::PsvDefault => psv_default(today),
            Self::PsvRegistrationAnniversary => psv_registration_anniversary(ctx, today),
            Self::PsvMostRecent => psv_most_recent(ctx, today),
            Self::HgvTrlFirstTest => hgv_trl_first_test(ctx, today),
            Self::HgvTrlAnnualTest => hgv_trl_annual_test(ctx, today),
            Self::HgvTrlMostRecent => hgv_trl_most_recent(ctx, today),
        }
    }

    /// Returns the snake_case identifier for this strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PsvDefault => "psv_default",
            Self::PsvRegistrationAnniversary => "psv_registration_anniversary",
            Self::PsvMostRecent => "psv_most_recent",
            Self::HgvTrlFirstTest => "hgv_trl_first_test",
            Self::HgvTrlAnnualTest => "hgv_trl_annual_test",
            Self::HgvTrlMostRecent => "hgv_trl_most_recent",
        }
    }
}

impl std::fmt::Display for ExpiryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Selection ───────────────────────────────────────────────────────

fn select_psv(ctx: &ExpiryContext) -> ExpiryStrategy {
    if codes::is_coif(&ctx.test_type_id) {
        ExpiryStrategy::PsvDefault
    } else if !ctx.has_history() {
        if ctx.has_regn_or_first_use_date() {
            ExpiryStrategy::PsvRegistrationAnniversary
        } else {
            ExpiryStrategy::PsvDefault
        }
    } else {
        ExpiryStrategy::PsvMostRecent
    }
}

fn select_hgv_trl(ctx: &ExpiryContext) -> ExpiryStrategy {
    if codes::is_first_test(&ctx.test_type_id) {
        ExpiryStrategy::HgvTrlFirstTest
    } else if codes::is_annual_test(&ctx.test_type_id) && !ctx.has_history() {
        ExpiryStrategy::HgvTrlAnnualTest
    } else {
        ExpiryStrategy::HgvTrlMostRecent
    }
}

// ─── PSV rules ───────────────────────────────────────────────────────

/// `[today, today + 2 months)` or `[today, today + 2 months]`.
fn in_early_window(date: NaiveDate, today: NaiveDate, window: Window) -> bool {
    is_within(date, today, add_months(today, EARLY_TEST_WINDOW_MONTHS), window)
}

fn psv_default(today: NaiveDate) -> NaiveDate {
    sub_days(add_years(today, 1), 1)
}

fn psv_registration_anniversary(ctx: &ExpiryContext, today: NaiveDate) -> NaiveDate {
    match ctx.regn_or_first_use_date {
        Some(regn) => {
            let anniversary = add_years(regn, 1);
            if in_early_window(anniversary, today, Window::HalfOpen) {
                add_years(anniversary, 1)
            } else {
                psv_default(today)
            }
        }
        None => psv_default(today),
    }
}

fn psv_most_recent(ctx: &ExpiryContext, today: NaiveDate) -> NaiveDate {
    if in_early_window(ctx.most_recent_expiry, today, Window::Closed) {
        add_years(ctx.most_recent_expiry, 1)
    } else {
        psv_default(today)
    }
}

// ─── HGV/TRL rules ───────────────────────────────────────────────────

fn hgv_trl_default(today: NaiveDate) -> NaiveDate {
    last_day_of_month(add_years(today, 1))
}

fn hgv_trl_first_test(ctx: &ExpiryContext, today: NaiveDate) -> NaiveDate {
    let anniversary = ctx
        .regn_or_first_use_date
        .map(|anchor| last_day_of_month(add_years(anchor, 1)));

    // Tested after the anniversary month.
    if anniversary.is_some_and(|anv| today > anv) {
        return hgv_trl_default(today);
    }
    if ctx.has_history() {
        return hgv_trl_default(today);
    }
    match anniversary {
        Some(anv) if today >= sub_months(anv, EARLY_TEST_WINDOW_MONTHS) => add_years(anv, 1),
        _ => hgv_trl_default(today),
    }
}

fn hgv_trl_annual_test(ctx: &ExpiryContext, today: NaiveDate) -> NaiveDate {
    let Some(anchor) = ctx.regn_or_first_use_date else {
        return hgv_trl_default(today);
    };
    let anniversary = last_day_of_month(add_years(anchor, 1));
    if in_early_window(anniversary, today, Window::HalfOpen) {
        last_day_of_month(add_years(anniversary, 1))
    } else {
        hgv_trl_default(today)
    }
}

fn hgv_trl_most_recent(ctx: &ExpiryContext, today: NaiveDate) -> NaiveDate {
    let month_end = last_day_of_month(ctx.most_recent_expiry);
    if in_early_window(month_end, today, Window::HalfOpen) {
        last_day_of_month(add_years(ctx.most_recent_expiry, 1))
    } else {
        hgv_trl_default(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvs_core::no_history_sentinel;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx(
        vehicle_type: VehicleType,
        test_type_id: &str,
        most_recent_expiry: Option<NaiveDate>,
        anchor: Option<NaiveDate>,
    ) -> ExpiryContext {
        ExpiryContext {
            vehicle_type,
            test_type_id: test_type_id.to_string(),
            most_recent_expiry: most_recent_expiry.unwrap_or_else(no_history_sentinel),
            regn_or_first_use_date: anchor,
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    #[test]
    fn psv_coif_always_selects_default() {
        for history in [None, Some(ymd(2020, 7, 1))] {
            for anchor in [None, Some(ymd(2019, 1, 1))] {
                let c = ctx(VehicleType::Psv, "142", history, anchor);
                assert_eq!(ExpiryStrategy::select(&c), Some(ExpiryStrategy::PsvDefault));
            }
        }
    }

    #[test]
    fn psv_selection_tree() {
        let no_history_no_regn = ctx(VehicleType::Psv, "1", None, None);
        let no_history_regn = ctx(VehicleType::Psv, "1", None, Some(ymd(2019, 1, 1)));
        let history = ctx(VehicleType::Psv, "1", Some(ymd(2020, 1, 1)), Some(ymd(2019, 1, 1)));

        assert_eq!(ExpiryStrategy::select(&no_history_no_regn), Some(ExpiryStrategy::PsvDefault));
        assert_eq!(
            ExpiryStrategy::select(&no_history_regn),
            Some(ExpiryStrategy::PsvRegistrationAnniversary)
        );
        assert_eq!(ExpiryStrategy::select(&history), Some(ExpiryStrategy::PsvMostRecent));
    }

    #[test]
    fn hgv_trl_selection_tree() {
        for vt in [VehicleType::Hgv, VehicleType::Trl] {
            let first = ctx(vt, "41", Some(ymd(2020, 1, 1)), None);
            let annual_fresh = ctx(vt, "94", None, None);
            let annual_history = ctx(vt, "94", Some(ymd(2020, 1, 1)), None);
            let unrecognised = ctx(vt, "999", None, None);

            assert_eq!(ExpiryStrategy::select(&first), Some(ExpiryStrategy::HgvTrlFirstTest));
            assert_eq!(ExpiryStrategy::select(&annual_fresh), Some(ExpiryStrategy::HgvTrlAnnualTest));
            assert_eq!(ExpiryStrategy::select(&annual_history), Some(ExpiryStrategy::HgvTrlMostRecent));
            assert_eq!(ExpiryStrategy::select(&unrecognised), Some(ExpiryStrategy::HgvTrlMostRecent));
        }
    }

    #[test]
    fn other_vehicle_types_select_nothing() {
        for vt in [VehicleType::Lgv, VehicleType::Car, VehicleType::Motorcycle] {
            assert_eq!(ExpiryStrategy::select(&ctx(vt, "94", None, None)), None);
        }
    }

    // ── PSV rules ────────────────────────────────────────────────────

    #[test]
    fn psv_default_is_one_year_less_a_day() {
        let c = ctx(VehicleType::Psv, "1", None, None);
        assert_eq!(ExpiryStrategy::PsvDefault.compute(&c, ymd(2020, 2, 1)), ymd(2021, 1, 31));
        assert_eq!(ExpiryStrategy::PsvDefault.compute(&c, ymd(2019, 11, 4)), ymd(2020, 11, 3));
    }

    #[test]
    fn psv_default_from_leap_day() {
        let c = ctx(VehicleType::Psv, "1", None, None);
        assert_eq!(ExpiryStrategy::PsvDefault.compute(&c, ymd(2020, 2, 29)), ymd(2021, 2, 27));
    }

    #[test]
    fn psv_registration_anniversary_inside_window() {
        // Anniversary 2020-06-15 is inside [2020-05-01, 2020-07-01).
        let c = ctx(VehicleType::Psv, "1", None, Some(ymd(2019, 6, 15)));
        assert_eq!(
            ExpiryStrategy::PsvRegistrationAnniversary.compute(&c, ymd(2020, 5, 1)),
            ymd(2021, 6, 15)
        );
    }

    #[test]
    fn psv_registration_anniversary_on_window_edges() {
        // Start of window is inclusive.
        let c = ctx(VehicleType::Psv, "1", None, Some(ymd(2019, 5, 1)));
        assert_eq!(
            ExpiryStrategy::PsvRegistrationAnniversary.compute(&c, ymd(2020, 5, 1)),
            ymd(2021, 5, 1)
        );
        // End of window is exclusive.
        let c = ctx(VehicleType::Psv, "1", None, Some(ymd(2019, 7, 1)));
        assert_eq!(
            ExpiryStrategy::PsvRegistrationAnniversary.compute(&c, ymd(2020, 5, 1)),
            ymd(2021, 4, 30)
        );
    }

    #[test]
    fn psv_registration_anniversary_far_or_past_falls_back() {
        let far = ctx(VehicleType::Psv, "1", None, Some(ymd(2019, 12, 1)));
        assert_eq!(
            ExpiryStrategy::PsvRegistrationAnniversary.compute(&far, ymd(2020, 5, 1)),
            ymd(2021, 4, 30)
        );
        let past = ctx(VehicleType::Psv, "1", None, Some(ymd(2019, 4, 30)));
        assert_eq!(
            ExpiryStrategy::PsvRegistrationAnniversary.compute(&past, ymd(2020, 5, 1)),
            ymd(2021, 4, 30)
        );
    }

    #[test]
    fn psv_most_recent_closed_window() {
        let today = ymd(2020, 5, 28);
        // today + 2 months exactly is inside the closed window.
        let edge = ctx(VehicleType::Psv, "1", Some(ymd(2020, 7, 28)), None);
        assert_eq!(ExpiryStrategy::PsvMostRecent.compute(&edge, today), ymd(2021, 7, 28));
        // One day beyond falls back.
        let beyond = ctx(VehicleType::Psv, "1", Some(ymd(2020, 7, 29)), None);
        assert_eq!(ExpiryStrategy::PsvMostRecent.compute(&beyond, today), ymd(2021, 5, 27));
        // Same-day expiry is carried forward.
        let same_day = ctx(VehicleType::Psv, "1", Some(today), None);
        assert_eq!(ExpiryStrategy::PsvMostRecent.compute(&same_day, today), ymd(2021, 5, 28));
        // Lapsed expiry falls back.
        let lapsed = ctx(VehicleType::Psv, "1", Some(ymd(2020, 5, 27)), None);
        assert_eq!(ExpiryStrategy::PsvMostRecent.compute(&lapsed, today), ymd(2021, 5, 27));
    }

    // ── HGV/TRL rules ────────────────────────────────────────────────

    #[test]
    fn first_test_without_anchor_is_month_end_next_year() {
        let c = ctx(VehicleType::Hgv, "41", None, None);
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2020, 5, 1)), ymd(2021, 5, 31));
    }

    #[test]
    fn first_test_after_anniversary_month() {
        let c = ctx(VehicleType::Hgv, "41", None, Some(ymd(2019, 4, 2)));
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2020, 5, 1)), ymd(2021, 5, 31));
    }

    #[test]
    fn first_test_within_two_months_of_anniversary() {
        // Anniversary month end 2020-04-30; window opens 2020-02-29.
        let c = ctx(VehicleType::Hgv, "41", None, Some(ymd(2019, 4, 2)));
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2020, 4, 1)), ymd(2021, 4, 30));
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2020, 4, 30)), ymd(2021, 4, 30));
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2020, 2, 29)), ymd(2021, 4, 30));
    }

    #[test]
    fn first_test_before_window_uses_test_date() {
        let c = ctx(VehicleType::Trl, "95", None, Some(ymd(2019, 4, 2)));
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2020, 2, 28)), ymd(2021, 2, 28));
    }

    #[test]
    fn first_test_with_history_uses_test_date() {
        let c = ctx(VehicleType::Hgv, "41", Some(ymd(2020, 4, 30)), Some(ymd(2019, 4, 2)));
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2020, 4, 1)), ymd(2021, 4, 30));
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2020, 3, 10)), ymd(2021, 3, 31));
    }

    #[test]
    fn first_test_february_anniversary_is_not_rounded_again() {
        // Anniversary month end 2019-02-28 plus one year stays on the 28th.
        let c = ctx(VehicleType::Hgv, "41", None, Some(ymd(2018, 2, 10)));
        assert_eq!(ExpiryStrategy::HgvTrlFirstTest.compute(&c, ymd(2019, 2, 1)), ymd(2020, 2, 28));
    }

    #[test]
    fn annual_test_without_anchor() {
        let c = ctx(VehicleType::Trl, "94", None, None);
        assert_eq!(ExpiryStrategy::HgvTrlAnnualTest.compute(&c, ymd(2020, 1, 15)), ymd(2021, 1, 31));
    }

    #[test]
    fn annual_test_anniversary_in_window() {
        // Anniversary month end 2020-06-30 is inside [2020-05-01, 2020-07-01).
        let c = ctx(VehicleType::Hgv, "94", None, Some(ymd(2019, 6, 3)));
        assert_eq!(ExpiryStrategy::HgvTrlAnnualTest.compute(&c, ymd(2020, 5, 1)), ymd(2021, 6, 30));
    }

    #[test]
    fn annual_test_anniversary_outside_window() {
        let c = ctx(VehicleType::Hgv, "94", None, Some(ymd(2019, 7, 3)));
        assert_eq!(ExpiryStrategy::HgvTrlAnnualTest.compute(&c, ymd(2020, 5, 1)), ymd(2021, 5, 31));
    }

    #[test]
    fn annual_test_window_end_is_exclusive() {
        // Anniversary month end 2020-06-30 is exactly today + 2 months.
        let c = ctx(VehicleType::Hgv, "94", None, Some(ymd(2019, 6, 5)));
        assert_eq!(ExpiryStrategy::HgvTrlAnnualTest.compute(&c, ymd(2020, 4, 30)), ymd(2021, 4, 30));
    }

    #[test]
    fn annual_test_window_start_is_inclusive() {
        // Anniversary month end 2020-04-30 is today.
        let c = ctx(VehicleType::Trl, "94", None, Some(ymd(2019, 4, 5)));
        assert_eq!(ExpiryStrategy::HgvTrlAnnualTest.compute(&c, ymd(2020, 4, 30)), ymd(2021, 4, 30));
    }

    #[test]
    fn most_recent_month_end_in_window() {
        // Expiry 2020-06-10 rounds to 2020-06-30, inside [2020-05-01, 2020-07-01).
        let c = ctx(VehicleType::Hgv, "94", Some(ymd(2020, 6, 10)), None);
        assert_eq!(ExpiryStrategy::HgvTrlMostRecent.compute(&c, ymd(2020, 5, 1)), ymd(2021, 6, 30));
    }

    #[test]
    fn most_recent_lapsed_uses_test_date() {
        let c = ctx(VehicleType::Hgv, "94", Some(ymd(2020, 4, 1)), None);
        assert_eq!(ExpiryStrategy::HgvTrlMostRecent.compute(&c, ymd(2020, 5, 1)), ymd(2021, 5, 31));
    }

    #[test]
    fn most_recent_window_end_is_exclusive() {
        // Month end 2020-07-31 vs window [2020-05-31, 2020-07-31).
        let c = ctx(VehicleType::Trl, "94", Some(ymd(2020, 7, 1)), None);
        assert_eq!(ExpiryStrategy::HgvTrlMostRecent.compute(&c, ymd(2020, 5, 31)), ymd(2021, 5, 31));
    }

    #[test]
    fn strategy_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for s in ExpiryStrategy::all() {
            assert!(seen.insert(s.as_str()), "duplicate name {s}");
            assert_eq!(serde_json::to_string(s).unwrap(), format!("\"{}\"", s.as_str()));
        }
    }
}
